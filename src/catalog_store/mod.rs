mod aggregator;
mod albums;
mod artists;
mod models;
mod schema;
mod store;
mod tracks;
mod trait_def;
mod validation;

pub use aggregator::{group_album_tracks, AlbumTrackRow};
pub use models::*;
pub use schema::CATALOG_VERSIONED_SCHEMAS;
pub use store::SqliteCatalogStore;
pub use trait_def::CatalogStore;
pub use validation::{
    validate_album_fields, validate_artist_fields, validate_id, validate_page,
    validate_track_fields, ValidationError, ValidationResult,
};

#[cfg(feature = "mock")]
pub use trait_def::MockCatalogStore;
