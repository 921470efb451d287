//! Discoteca: catalog data-access layer for artists, albums and tracks.
//!
//! The public surface is the repository facade on [`SqliteCatalogStore`]
//! (also behind the [`CatalogStore`] trait): per-entity create/list/get/
//! update/delete, dependency-checked deletes, and the aggregated
//! artist→albums→tracks tree.

pub mod catalog_store;
pub mod config;
pub mod sqlite_persistence;

// Re-export commonly used types for convenience
pub use catalog_store::{
    Album, AlbumFields, AlbumWithTracks, Artist, ArtistFields, ArtistWithAlbums, CatalogStore,
    DeleteCheck, DeleteOutcome, SqliteCatalogStore, Track, TrackFields,
};
pub use config::StoreConfig;
