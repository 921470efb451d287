//! Album operations: CRUD, per-artist listing, and the track delete guard.

use super::models::{Album, AlbumFields, DeleteCheck, DeleteOutcome};
use super::store::SqliteCatalogStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

fn parse_album_row(row: &rusqlite::Row) -> rusqlite::Result<Album> {
    Ok(Album {
        id: row.get(0)?,
        title: row.get(1)?,
        release_year: row.get(2)?,
        artist_id: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn get_album_in(conn: &Connection, id: &str) -> Result<Option<Album>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, title, release_year, artist_id, created_at, updated_at
         FROM albums WHERE id = ?1",
    )?;
    match stmt.query_row(params![id], parse_album_row) {
        Ok(album) => Ok(Some(album)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl SqliteCatalogStore {
    /// Create an album; the artist foreign key is enforced by the store,
    /// so a dangling `artist_id` aborts the transaction.
    pub fn create_album(&self, fields: &AlbumFields) -> Result<Album> {
        self.write_tx(|conn| {
            let id = Self::new_id();
            let now = Self::now_utc();

            conn.execute(
                "INSERT INTO albums (id, title, release_year, artist_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
                params![id, fields.title, fields.release_year, fields.artist_id, now],
            )
            .with_context(|| format!("Failed to insert album for artist '{}'", fields.artist_id))?;

            get_album_in(conn, &id)?
                .with_context(|| format!("Album '{}' missing after insert", id))
        })
    }

    /// Get an album by id.
    pub fn get_album(&self, id: &str) -> Result<Option<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        get_album_in(&conn, id)
    }

    /// List albums, most recent release year first.
    pub fn list_albums(&self, page: usize, page_size: usize) -> Result<Vec<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, release_year, artist_id, created_at, updated_at FROM albums
             ORDER BY release_year DESC, id ASC
             LIMIT ?1 OFFSET ?2",
        )?;

        let albums = stmt
            .query_map(
                params![page_size as i64, (page * page_size) as i64],
                parse_album_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(albums)
    }

    /// List one artist's albums, earliest release year first.
    pub fn list_albums_by_artist(
        &self,
        artist_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Vec<Album>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let mut stmt = conn.prepare_cached(
            "SELECT id, title, release_year, artist_id, created_at, updated_at FROM albums
             WHERE artist_id = ?1
             ORDER BY release_year ASC, id ASC
             LIMIT ?2 OFFSET ?3",
        )?;

        let albums = stmt
            .query_map(
                params![artist_id, page_size as i64, (page * page_size) as i64],
                parse_album_row,
            )?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(albums)
    }

    /// Update an album in place, re-stamping `updated_at`.
    pub fn update_album(&self, id: &str, fields: &AlbumFields) -> Result<bool> {
        self.write_tx(|conn| {
            let rows_affected = conn.execute(
                "UPDATE albums SET title = ?1, release_year = ?2, artist_id = ?3, updated_at = ?4
                 WHERE id = ?5",
                params![
                    fields.title,
                    fields.release_year,
                    fields.artist_id,
                    Self::now_utc(),
                    id
                ],
            )?;
            Ok(rows_affected > 0)
        })
    }

    /// Delete an album, refusing while any track still references it.
    pub fn delete_album(&self, id: &str) -> Result<DeleteOutcome> {
        self.write_tx(|conn| {
            let dependents: i64 = conn.query_row(
                "SELECT COUNT(*) FROM tracks WHERE album_id = ?1",
                params![id],
                |r| r.get(0),
            )?;

            if dependents > 0 {
                return Ok(DeleteOutcome::Blocked {
                    dependents: dependents as usize,
                });
            }

            let rows_affected = conn.execute("DELETE FROM albums WHERE id = ?1", params![id])?;
            if rows_affected > 0 {
                Ok(DeleteOutcome::Deleted)
            } else {
                Ok(DeleteOutcome::NotFound)
            }
        })
    }

    /// Dry-run dependency check: can this album be deleted right now?
    pub fn can_delete_album(&self, id: &str) -> Result<DeleteCheck> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let dependents: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tracks WHERE album_id = ?1",
            params![id],
            |r| r.get(0),
        )?;

        Ok(DeleteCheck {
            allowed: dependents == 0,
            dependent_count: dependents as usize,
        })
    }
}
