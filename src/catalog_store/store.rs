//! SQLite-backed catalog store.
//!
//! Connection handling follows a single serialized write connection plus a
//! round-robin pool of read connections, all in WAL mode. Every write runs
//! inside a `BEGIN IMMEDIATE` transaction, committed on success and rolled
//! back on any failure, so no operation can leave a half-applied state.
//! The store owns UUID generation and timestamp stamping; inserts re-read
//! the stored row so callers always see server-assigned values.

use super::schema::CATALOG_VERSIONED_SCHEMAS;
use crate::config::StoreConfig;
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tracing::info;
use uuid::Uuid;

/// SQLite-backed store for the artist/album/track catalog.
#[derive(Clone)]
pub struct SqliteCatalogStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn migrate_if_needed(conn: &mut Connection) -> Result<()> {
    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    // Brand new database: create the latest schema directly
    let table_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        latest_schema.create(conn)?;
        return Ok(());
    }

    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;
    let mut current_version = (db_version - BASE_DB_VERSION as i64).max(0) as usize;
    if current_version >= latest_version {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for schema in CATALOG_VERSIONED_SCHEMAS.iter().skip(current_version + 1) {
        if let Some(migration_fn) = schema.migration {
            info!(
                "Migrating catalog db from version {} to {}",
                current_version, schema.version
            );
            migration_fn(&tx)?;
            current_version = schema.version;
        }
    }
    tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
    tx.commit()?;
    Ok(())
}

impl SqliteCatalogStore {
    /// Open a store described by a [`StoreConfig`].
    pub fn open(config: &StoreConfig) -> Result<Self> {
        Self::new(&config.db_path, config.read_pool_size)
    }

    /// Open (creating if needed) the catalog database at `db_path`.
    ///
    /// `read_pool_size` is the number of connections for concurrent read
    /// operations.
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> Result<Self> {
        let db_uri = db_path.as_ref().to_string_lossy().to_string();
        Self::open_uri(&db_uri, read_pool_size.max(1))
    }

    /// Open a private in-memory store, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        let uri = format!("file:discoteca-{}?mode=memory&cache=shared", Uuid::new_v4());
        Self::open_uri(&uri, 2)
    }

    fn open_uri(db_uri: &str, read_pool_size: usize) -> Result<Self> {
        let mut write_conn = Connection::open_with_flags(
            db_uri,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .context("Failed to open catalog database")?;

        migrate_if_needed(&mut write_conn)?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;
        write_conn.pragma_update(None, "foreign_keys", "ON")?;

        let artist_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM artists", [], |r| r.get(0))
            .unwrap_or(0);
        let album_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))
            .unwrap_or(0);
        let track_count: i64 = write_conn
            .query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get(0))
            .unwrap_or(0);

        info!(
            "Opened catalog: {} artists, {} albums, {} tracks",
            artist_count, album_count, track_count
        );

        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_uri,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_conn.pragma_update(None, "journal_mode", "WAL")?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteCatalogStore {
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_pool,
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub(crate) fn get_read_conn(&self) -> Arc<Mutex<Connection>> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        self.read_pool[index].clone()
    }

    /// Run `f` inside a write transaction.
    ///
    /// Commits when `f` returns Ok, rolls back otherwise. The write
    /// connection is serialized, so concurrent writers queue here.
    pub(crate) fn write_tx<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self.write_conn.lock().unwrap();
        conn.execute("BEGIN IMMEDIATE", [])?;

        match f(&conn) {
            Ok(value) => {
                conn.execute("COMMIT", [])?;
                Ok(value)
            }
            Err(e) => {
                let _ = conn.execute("ROLLBACK", []);
                Err(e)
            }
        }
    }

    /// Fresh UUID v4 for a new entity.
    pub(crate) fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// Current UTC instant, RFC 3339 with microsecond precision.
    pub(crate) fn now_utc() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    // =========================================================================
    // Counts
    // =========================================================================

    pub fn artists_count(&self) -> usize {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM artists", [], |r| r.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }

    pub fn albums_count(&self) -> usize {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM albums", [], |r| r.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }

    pub fn tracks_count(&self) -> usize {
        let read_conn = self.get_read_conn();
        let conn = read_conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get::<_, i64>(0))
            .unwrap_or(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog_store::models::ArtistFields;

    #[test]
    fn test_open_creates_schema_on_fresh_db() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(temp_dir.path().join("catalog.db"), 2).unwrap();
        assert_eq!(store.artists_count(), 0);
        assert_eq!(store.albums_count(), 0);
        assert_eq!(store.tracks_count(), 0);
    }

    #[test]
    fn test_reopen_preserves_data() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let db_path = temp_dir.path().join("catalog.db");

        {
            let store = SqliteCatalogStore::new(&db_path, 2).unwrap();
            store
                .create_artist(&ArtistFields {
                    name: "Persisted".to_string(),
                    genre: None,
                })
                .unwrap();
        }

        let store = SqliteCatalogStore::new(&db_path, 2).unwrap();
        assert_eq!(store.artists_count(), 1);
    }

    #[test]
    fn test_rolled_back_write_leaves_no_partial_state() {
        let store = SqliteCatalogStore::open_in_memory().unwrap();

        let result: Result<()> = store.write_tx(|conn| {
            conn.execute(
                "INSERT INTO artists (id, name, genre, created_at, updated_at)
                 VALUES ('a1', 'Doomed', NULL, 't', 't')",
                [],
            )?;
            anyhow::bail!("forced failure");
        });

        assert!(result.is_err());
        assert_eq!(store.artists_count(), 0);
    }

    #[test]
    fn test_in_memory_read_pool_sees_writes() {
        let store = SqliteCatalogStore::open_in_memory().unwrap();
        let artist = store
            .create_artist(&ArtistFields {
                name: "Visible".to_string(),
                genre: None,
            })
            .unwrap();

        // Writes go through the write connection; both listing paths read
        // through the pool.
        let all = store.list_artists(0, 10, None).unwrap();
        assert_eq!(all, vec![artist.clone()]);

        let filtered = store.list_artists(0, 10, Some("visi")).unwrap();
        assert_eq!(filtered, vec![artist]);
    }

    #[tokio::test]
    async fn test_concurrent_reads_no_blocking() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = SqliteCatalogStore::new(temp_dir.path().join("catalog.db"), 4).unwrap();

        let handles: Vec<_> = (0..10)
            .map(|_| {
                tokio::spawn({
                    let store = store.clone();
                    async move {
                        for _ in 0..100 {
                            let _ = store.artists_count();
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }
    }
}
