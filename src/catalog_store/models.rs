//! Value objects for the catalog store.
//!
//! Entities returned by the store are plain values with ids and timestamps
//! already rendered as strings; callers never see rusqlite row types.
//! The nested artist/album shapes are distinct types from the flat ones,
//! sharing only the base fields.

use serde::{Deserialize, Serialize};

// =============================================================================
// Core Entities
// =============================================================================

/// Artist entity as stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub genre: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Album entity as stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Album {
    pub id: String,
    pub title: String,
    pub release_year: i32,
    pub artist_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Track entity as stored.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub duration_seconds: i32,
    pub album_id: String,
    pub created_at: String,
    pub updated_at: String,
}

// =============================================================================
// Input Fields (caller-validated, see validation module)
// =============================================================================

/// Fields for creating or updating an artist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArtistFields {
    pub name: String,
    pub genre: Option<String>,
}

/// Fields for creating or updating an album.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlbumFields {
    pub title: String,
    pub release_year: i32,
    pub artist_id: String,
}

/// Fields for creating or updating a track.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrackFields {
    pub title: String,
    pub duration_seconds: i32,
    pub album_id: String,
}

// =============================================================================
// Nested/Composite Types
// =============================================================================

/// Album with its tracks, as produced by the aggregation pass.
///
/// Albums with no tracks appear with an empty track list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlbumWithTracks {
    pub id: String,
    pub title: String,
    pub release_year: i32,
    pub tracks: Vec<Track>,
}

/// Artist with the full album/track tree underneath.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArtistWithAlbums {
    pub id: String,
    pub name: String,
    pub genre: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub albums: Vec<AlbumWithTracks>,
}

// =============================================================================
// Delete-Guard Results
// =============================================================================

/// Result of a dry-run dependency check before deletion.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteCheck {
    pub allowed: bool,
    pub dependent_count: usize,
}

/// Outcome of a guarded delete.
///
/// Refusal because dependents exist is a normal value, not an error; callers
/// map `Blocked` to a conflict response carrying the count.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    Blocked { dependents: usize },
}

impl DeleteOutcome {
    pub fn is_deleted(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted)
    }
}
