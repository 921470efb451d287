//! CatalogStore trait definition.
//!
//! Abstracts the catalog operations behind a trait so callers can swap the
//! SQLite store for a test double or an alternative backend.

use super::models::{
    Album, AlbumFields, Artist, ArtistFields, ArtistWithAlbums, DeleteCheck, DeleteOutcome, Track,
    TrackFields,
};
use super::store::SqliteCatalogStore;
use anyhow::Result;

/// Catalog storage backend.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait CatalogStore: Send + Sync {
    // =========================================================================
    // Artists
    // =========================================================================

    /// Create an artist; id and timestamps are assigned by the store.
    fn create_artist(&self, fields: &ArtistFields) -> Result<Artist>;
    /// Get an artist by id. Absence is `Ok(None)`, not an error.
    fn get_artist(&self, id: &str) -> Result<Option<Artist>>;
    /// Get an artist with the nested album/track tree.
    fn get_artist_with_albums(&self, id: &str) -> Result<Option<ArtistWithAlbums>>;
    /// List artists, newest first, optionally filtered by name substring.
    fn list_artists(
        &self,
        page: usize,
        page_size: usize,
        name_filter: Option<&str>,
    ) -> Result<Vec<Artist>>;
    /// Update an artist in place. Returns false when no row matched.
    fn update_artist(&self, id: &str, fields: &ArtistFields) -> Result<bool>;
    /// Delete an artist, refusing while any album still references it.
    fn delete_artist(&self, id: &str) -> Result<DeleteOutcome>;
    /// Dry-run dependency check for artist deletion.
    fn can_delete_artist(&self, id: &str) -> Result<DeleteCheck>;

    // =========================================================================
    // Albums
    // =========================================================================

    /// Create an album; a dangling `artist_id` is an error.
    fn create_album(&self, fields: &AlbumFields) -> Result<Album>;
    /// Get an album by id. Absence is `Ok(None)`, not an error.
    fn get_album(&self, id: &str) -> Result<Option<Album>>;
    /// List albums, most recent release year first.
    fn list_albums(&self, page: usize, page_size: usize) -> Result<Vec<Album>>;
    /// List one artist's albums, earliest release year first.
    fn list_albums_by_artist(
        &self,
        artist_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Album>>;
    /// Update an album in place. Returns false when no row matched.
    fn update_album(&self, id: &str, fields: &AlbumFields) -> Result<bool>;
    /// Delete an album, refusing while any track still references it.
    fn delete_album(&self, id: &str) -> Result<DeleteOutcome>;
    /// Dry-run dependency check for album deletion.
    fn can_delete_album(&self, id: &str) -> Result<DeleteCheck>;

    // =========================================================================
    // Tracks
    // =========================================================================

    /// Create a track; a dangling `album_id` is an error.
    fn create_track(&self, fields: &TrackFields) -> Result<Track>;
    /// Get a track by id. Absence is `Ok(None)`, not an error.
    fn get_track(&self, id: &str) -> Result<Option<Track>>;
    /// List tracks, newest first.
    fn list_tracks(&self, page: usize, page_size: usize) -> Result<Vec<Track>>;
    /// List one album's tracks, alphabetical by title.
    fn list_tracks_by_album(
        &self,
        album_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Track>>;
    /// Update a track in place. Returns false when no row matched.
    fn update_track(&self, id: &str, fields: &TrackFields) -> Result<bool>;
    /// Delete a track by id. Returns false when no row matched.
    fn delete_track(&self, id: &str) -> Result<bool>;

    // =========================================================================
    // Counts (for metrics and open-time logging)
    // =========================================================================

    /// Total number of artists.
    fn artists_count(&self) -> usize;
    /// Total number of albums.
    fn albums_count(&self) -> usize;
    /// Total number of tracks.
    fn tracks_count(&self) -> usize;
}

impl CatalogStore for SqliteCatalogStore {
    fn create_artist(&self, fields: &ArtistFields) -> Result<Artist> {
        SqliteCatalogStore::create_artist(self, fields)
    }

    fn get_artist(&self, id: &str) -> Result<Option<Artist>> {
        SqliteCatalogStore::get_artist(self, id)
    }

    fn get_artist_with_albums(&self, id: &str) -> Result<Option<ArtistWithAlbums>> {
        SqliteCatalogStore::get_artist_with_albums(self, id)
    }

    fn list_artists(
        &self,
        page: usize,
        page_size: usize,
        name_filter: Option<&str>,
    ) -> Result<Vec<Artist>> {
        SqliteCatalogStore::list_artists(self, page, page_size, name_filter)
    }

    fn update_artist(&self, id: &str, fields: &ArtistFields) -> Result<bool> {
        SqliteCatalogStore::update_artist(self, id, fields)
    }

    fn delete_artist(&self, id: &str) -> Result<DeleteOutcome> {
        SqliteCatalogStore::delete_artist(self, id)
    }

    fn can_delete_artist(&self, id: &str) -> Result<DeleteCheck> {
        SqliteCatalogStore::can_delete_artist(self, id)
    }

    fn create_album(&self, fields: &AlbumFields) -> Result<Album> {
        SqliteCatalogStore::create_album(self, fields)
    }

    fn get_album(&self, id: &str) -> Result<Option<Album>> {
        SqliteCatalogStore::get_album(self, id)
    }

    fn list_albums(&self, page: usize, page_size: usize) -> Result<Vec<Album>> {
        SqliteCatalogStore::list_albums(self, page, page_size)
    }

    fn list_albums_by_artist(
        &self,
        artist_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Album>> {
        SqliteCatalogStore::list_albums_by_artist(self, artist_id, page, page_size)
    }

    fn update_album(&self, id: &str, fields: &AlbumFields) -> Result<bool> {
        SqliteCatalogStore::update_album(self, id, fields)
    }

    fn delete_album(&self, id: &str) -> Result<DeleteOutcome> {
        SqliteCatalogStore::delete_album(self, id)
    }

    fn can_delete_album(&self, id: &str) -> Result<DeleteCheck> {
        SqliteCatalogStore::can_delete_album(self, id)
    }

    fn create_track(&self, fields: &TrackFields) -> Result<Track> {
        SqliteCatalogStore::create_track(self, fields)
    }

    fn get_track(&self, id: &str) -> Result<Option<Track>> {
        SqliteCatalogStore::get_track(self, id)
    }

    fn list_tracks(&self, page: usize, page_size: usize) -> Result<Vec<Track>> {
        SqliteCatalogStore::list_tracks(self, page, page_size)
    }

    fn list_tracks_by_album(
        &self,
        album_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Track>> {
        SqliteCatalogStore::list_tracks_by_album(self, album_id, page, page_size)
    }

    fn update_track(&self, id: &str, fields: &TrackFields) -> Result<bool> {
        SqliteCatalogStore::update_track(self, id, fields)
    }

    fn delete_track(&self, id: &str) -> Result<bool> {
        SqliteCatalogStore::delete_track(self, id)
    }

    fn artists_count(&self) -> usize {
        SqliteCatalogStore::artists_count(self)
    }

    fn albums_count(&self) -> usize {
        SqliteCatalogStore::albums_count(self)
    }

    fn tracks_count(&self) -> usize {
        SqliteCatalogStore::tracks_count(self)
    }
}
