//! Track operations. Tracks have no dependents, so deletion is unguarded.

use super::models::{Track, TrackFields};
use super::store::SqliteCatalogStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

fn parse_track_row(row: &rusqlite::Row) -> rusqlite::Result<Track> {
    Ok(Track {
        id: row.get(0)?,
        title: row.get(1)?,
        duration_seconds: row.get(2)?,
        album_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn get_track_in(conn: &Connection, id: &str) -> Result<Option<Track>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title, duration_seconds, album_id, created_at, updated_at
         FROM tracks WHERE id = ?1",
    )?;
    match stmt.query_row(params![id], parse_track_row) {
        Ok(track) => Ok(Some(track)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl SqliteCatalogStore {
    /// Create a track; a dangling `album_id` aborts the transaction.
    pub fn create_track(&self, fields: &TrackFields) -> Result<Track> {
        self.write_tx(|conn| {
            let id = Self::new_id();
            let now = Self::now_utc();

            conn.execute(
                "INSERT INTO tracks (id, title, duration_seconds, album_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id, fields.title, fields.duration_seconds, fields.album_id, now],
            )
            .with_context(|| format!("Failed to insert track for album '{}'", fields.album_id))?;

            get_track_in(conn, &id)?
                .with_context(|| format!("Track '{}' missing after insert", id))
        })
    }

    /// Get a track by id.
    pub fn get_track(&self, id: &str) -> Result<Option<Track>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        get_track_in(&conn, id)
    }

    /// List tracks, newest first.
    pub fn list_tracks(&self, page: usize, page_size: usize) -> Result<Vec<Track>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, duration_seconds, album_id, created_at, updated_at FROM tracks
             ORDER BY created_at DESC, id ASC
             LIMIT ?1 OFFSET ?2",
        )?;

        let tracks = stmt
            .query_map(
                params![page_size as i64, (page * page_size) as i64],
                parse_track_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tracks)
    }

    /// List one album's tracks, alphabetical by title.
    pub fn list_tracks_by_album(
        &self,
        album_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Track>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, duration_seconds, album_id, created_at, updated_at FROM tracks
             WHERE album_id = ?1
             ORDER BY title ASC, id ASC
             LIMIT ?2 OFFSET ?3",
        )?;

        let tracks = stmt
            .query_map(
                params![album_id, page_size as i64, (page * page_size) as i64],
                parse_track_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(tracks)
    }

    /// Update a track in place, re-stamping `updated_at`.
    pub fn update_track(&self, id: &str, fields: &TrackFields) -> Result<bool> {
        self.write_tx(|conn| {
            let rows_affected = conn.execute(
                "UPDATE tracks SET title = ?1, duration_seconds = ?2, album_id = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    fields.title,
                    fields.duration_seconds,
                    fields.album_id,
                    Self::now_utc(),
                    id
                ],
            )?;
            Ok(rows_affected > 0)
        })
    }

    /// Delete a track by id. Returns false when no row matched.
    pub fn delete_track(&self, id: &str) -> Result<bool> {
        self.write_tx(|conn| {
            let rows_affected = conn.execute("DELETE FROM tracks WHERE id = ?1", params![id])?;
            Ok(rows_affected > 0)
        })
    }
}
