//! Flat-row-to-tree aggregation.
//!
//! The artist tree query returns a flat album⟕track join; this module
//! regroups it into `AlbumWithTracks` values. Grouping is a single pass
//! keyed by album id, preserving first-seen album order and the row order
//! of tracks within each album. The input rows are plain structs so the
//! grouping logic is testable without a database.

use super::models::{AlbumWithTracks, Track};
use std::collections::HashMap;

/// One row of the album⟕track join, as returned by the store.
///
/// Track columns are `None` when the album has no tracks (left join).
/// All rows sharing an album id carry identical album columns.
#[derive(Clone, Debug)]
pub struct AlbumTrackRow {
    pub album_id: String,
    pub album_title: String,
    pub release_year: i32,
    pub track_id: Option<String>,
    pub track_title: Option<String>,
    pub duration_seconds: Option<i32>,
    pub track_created_at: Option<String>,
    pub track_updated_at: Option<String>,
}

/// Group flat join rows into albums with their track lists.
///
/// Album fields come from the first row seen for each album id; every
/// non-null track row is appended to that album's list in input order.
/// No reordering happens beyond the grouping itself.
pub fn group_album_tracks(rows: Vec<AlbumTrackRow>) -> Vec<AlbumWithTracks> {
    let mut albums: Vec<AlbumWithTracks> = Vec::new();
    let mut index_by_album: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let album_index = match index_by_album.get(&row.album_id) {
            Some(index) => *index,
            None => {
                albums.push(AlbumWithTracks {
                    id: row.album_id.clone(),
                    title: row.album_title.clone(),
                    release_year: row.release_year,
                    tracks: Vec::new(),
                });
                index_by_album.insert(row.album_id.clone(), albums.len() - 1);
                albums.len() - 1
            }
        };

        if let (Some(id), Some(title), Some(duration_seconds), Some(created_at), Some(updated_at)) = (
            row.track_id,
            row.track_title,
            row.duration_seconds,
            row.track_created_at,
            row.track_updated_at,
        ) {
            albums[album_index].tracks.push(Track {
                id,
                title,
                duration_seconds,
                album_id: row.album_id,
                created_at,
                updated_at,
            });
        }
    }

    albums
}
