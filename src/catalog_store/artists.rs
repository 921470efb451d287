//! Artist operations: CRUD, name search, and the aggregated artist tree.

use super::aggregator::{group_album_tracks, AlbumTrackRow};
use super::models::{Artist, ArtistFields, ArtistWithAlbums, DeleteCheck, DeleteOutcome};
use super::store::SqliteCatalogStore;
use anyhow::{Context, Result};
use rusqlite::{params, Connection};

fn parse_artist_row(row: &rusqlite::Row) -> rusqlite::Result<Artist> {
    Ok(Artist {
        id: row.get(0)?,
        name: row.get(1)?,
        genre: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}

fn get_artist_in(conn: &Connection, id: &str) -> Result<Option<Artist>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, name, genre, created_at, updated_at FROM artists WHERE id = ?1",
    )?;
    match stmt.query_row(params![id], parse_artist_row) {
        Ok(artist) => Ok(Some(artist)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl SqliteCatalogStore {
    /// Create an artist; id and timestamps are assigned here.
    ///
    /// Returns the row as stored, re-read inside the same transaction.
    pub fn create_artist(&self, fields: &ArtistFields) -> Result<Artist> {
        self.write_tx(|conn| {
            let id = Self::new_id();
            let now = Self::now_utc();

            conn.execute(
                "INSERT INTO artists (id, name, genre, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![id, fields.name, fields.genre, now],
            )?;

            get_artist_in(conn, &id)?
                .with_context(|| format!("Artist '{}' missing after insert", id))
        })
    }

    /// Get an artist by id. Absence is a normal outcome, not an error.
    pub fn get_artist(&self, id: &str) -> Result<Option<Artist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        get_artist_in(&conn, id)
    }

    /// List artists, newest first, with an optional case-insensitive
    /// substring filter on the name.
    pub fn list_artists(
        &self,
        page: usize,
        page_size: usize,
        name_filter: Option<&str>,
    ) -> Result<Vec<Artist>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let offset = (page * page_size) as i64;
        let limit = page_size as i64;

        let artists = match name_filter {
            Some(name) => {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, name, genre, created_at, updated_at FROM artists
                     WHERE LOWER(name) LIKE '%' || LOWER(?1) || '%'
                     ORDER BY created_at DESC, id ASC
                     LIMIT ?2 OFFSET ?3",
                )?;
                let artists = stmt
                    .query_map(params![name, limit, offset], parse_artist_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                artists
            }
            None => {
                let mut stmt = conn.prepare_cached(
                    "SELECT id, name, genre, created_at, updated_at FROM artists
                     ORDER BY created_at DESC, id ASC
                     LIMIT ?1 OFFSET ?2",
                )?;
                let artists = stmt
                    .query_map(params![limit, offset], parse_artist_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                artists
            }
        };

        Ok(artists)
    }

    /// Get an artist with the nested album/track tree.
    ///
    /// Albums are joined to tracks with a left join, so an album with no
    /// tracks still appears with an empty track list. Albums are ordered by
    /// ascending release year, tracks by insertion order within each album.
    pub fn get_artist_with_albums(&self, id: &str) -> Result<Option<ArtistWithAlbums>> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let artist = match get_artist_in(&conn, id)? {
            Some(artist) => artist,
            None => return Ok(None),
        };

        let mut stmt = conn.prepare_cached(
            "SELECT al.id, al.title, al.release_year,
                    t.id, t.title, t.duration_seconds, t.created_at, t.updated_at
             FROM albums al
             LEFT JOIN tracks t ON t.album_id = al.id
             WHERE al.artist_id = ?1
             ORDER BY al.release_year ASC, al.id ASC, t.rowid ASC",
        )?;

        let rows: Vec<AlbumTrackRow> = stmt
            .query_map(params![id], |row| {
                Ok(AlbumTrackRow {
                    album_id: row.get(0)?,
                    album_title: row.get(1)?,
                    release_year: row.get(2)?,
                    track_id: row.get(3)?,
                    track_title: row.get(4)?,
                    duration_seconds: row.get(5)?,
                    track_created_at: row.get(6)?,
                    track_updated_at: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let albums = group_album_tracks(rows);

        Ok(Some(ArtistWithAlbums {
            id: artist.id,
            name: artist.name,
            genre: artist.genre,
            created_at: artist.created_at,
            updated_at: artist.updated_at,
            albums,
        }))
    }

    /// Update an artist in place, re-stamping `updated_at`.
    ///
    /// Returns false when no row matched; that is not-found, never a
    /// validation failure.
    pub fn update_artist(&self, id: &str, fields: &ArtistFields) -> Result<bool> {
        self.write_tx(|conn| {
            let rows_affected = conn.execute(
                "UPDATE artists SET name = ?1, genre = ?2, updated_at = ?3 WHERE id = ?4",
                params![fields.name, fields.genre, Self::now_utc(), id],
            )?;
            Ok(rows_affected > 0)
        })
    }

    /// Delete an artist, refusing while any album still references it.
    ///
    /// The dependent count and the delete run in one transaction, so no
    /// album can slip in between the check and the removal.
    pub fn delete_artist(&self, id: &str) -> Result<DeleteOutcome> {
        self.write_tx(|conn| {
            let dependents: i64 = conn.query_row(
                "SELECT COUNT(*) FROM albums WHERE artist_id = ?1",
                params![id],
                |r| r.get(0),
            )?;

            if dependents > 0 {
                return Ok(DeleteOutcome::Blocked {
                    dependents: dependents as usize,
                });
            }

            let rows_affected = conn.execute("DELETE FROM artists WHERE id = ?1", params![id])?;
            if rows_affected > 0 {
                Ok(DeleteOutcome::Deleted)
            } else {
                Ok(DeleteOutcome::NotFound)
            }
        })
    }

    /// Dry-run dependency check: can this artist be deleted right now?
    pub fn can_delete_artist(&self, id: &str) -> Result<DeleteCheck> {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();

        let dependents: i64 = conn.query_row(
            "SELECT COUNT(*) FROM albums WHERE artist_id = ?1",
            params![id],
            |r| r.get(0),
        )?;

        Ok(DeleteCheck {
            allowed: dependents == 0,
            dependent_count: dependents as usize,
        })
    }
}
