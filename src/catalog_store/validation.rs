//! Field-level validation for the request layer.
//!
//! The store trusts its inputs except for referential existence, which the
//! database enforces. These helpers implement the field constraints the
//! calling layer must apply before reaching the facade: non-blank names and
//! titles, length caps, the release-year policy window, positive durations,
//! and pagination bounds.

use super::models::{AlbumFields, ArtistFields, TrackFields};
use thiserror::Error;
use uuid::Uuid;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_TITLE_LEN: usize = 150;
pub const MAX_GENRE_LEN: usize = 50;
pub const MIN_RELEASE_YEAR: i32 = 1900;
pub const MAX_RELEASE_YEAR: i32 = 2025;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field '{field}' is required but was blank")]
    BlankField { field: &'static str },
    #[error("Field '{field}' exceeds {max} characters (got {len})")]
    TooLong {
        field: &'static str,
        max: usize,
        len: usize,
    },
    #[error("Field '{field}' must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
        value: i64,
    },
    #[error("Field '{field}' must be positive, got {value}")]
    NonPositive { field: &'static str, value: i64 },
    #[error("'{value}' is not a valid identifier")]
    MalformedId { value: String },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check that a string is a well-formed UUID.
pub fn validate_id(value: &str) -> ValidationResult<()> {
    if Uuid::parse_str(value).is_err() {
        return Err(ValidationError::MalformedId {
            value: value.to_string(),
        });
    }
    Ok(())
}

/// Check pagination bounds: page size in [1, 100].
pub fn validate_page(page_size: usize) -> ValidationResult<()> {
    if page_size < 1 || page_size > MAX_PAGE_SIZE {
        return Err(ValidationError::OutOfRange {
            field: "page_size",
            min: 1,
            max: MAX_PAGE_SIZE as i64,
            value: page_size as i64,
        });
    }
    Ok(())
}

pub fn validate_artist_fields(fields: &ArtistFields) -> ValidationResult<()> {
    if fields.name.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "name" });
    }
    if fields.name.chars().count() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name",
            max: MAX_NAME_LEN,
            len: fields.name.chars().count(),
        });
    }
    if let Some(genre) = &fields.genre {
        if genre.chars().count() > MAX_GENRE_LEN {
            return Err(ValidationError::TooLong {
                field: "genre",
                max: MAX_GENRE_LEN,
                len: genre.chars().count(),
            });
        }
    }
    Ok(())
}

pub fn validate_album_fields(fields: &AlbumFields) -> ValidationResult<()> {
    if fields.title.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "title" });
    }
    if fields.title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title",
            max: MAX_TITLE_LEN,
            len: fields.title.chars().count(),
        });
    }
    if fields.release_year < MIN_RELEASE_YEAR || fields.release_year > MAX_RELEASE_YEAR {
        return Err(ValidationError::OutOfRange {
            field: "release_year",
            min: MIN_RELEASE_YEAR as i64,
            max: MAX_RELEASE_YEAR as i64,
            value: fields.release_year as i64,
        });
    }
    validate_id(&fields.artist_id)
}

pub fn validate_track_fields(fields: &TrackFields) -> ValidationResult<()> {
    if fields.title.trim().is_empty() {
        return Err(ValidationError::BlankField { field: "title" });
    }
    if fields.title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title",
            max: MAX_TITLE_LEN,
            len: fields.title.chars().count(),
        });
    }
    if fields.duration_seconds <= 0 {
        return Err(ValidationError::NonPositive {
            field: "duration_seconds",
            value: fields.duration_seconds as i64,
        });
    }
    validate_id(&fields.album_id)
}
