//! Integration tests for the catalog store, run against a real on-disk
//! SQLite database in a temp directory.

use chrono::DateTime;
use discoteca::{
    AlbumFields, ArtistFields, DeleteOutcome, SqliteCatalogStore, TrackFields,
};
use std::thread::sleep;
use std::time::Duration;
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteCatalogStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteCatalogStore::new(temp_dir.path().join("catalog.db"), 2).unwrap();
    (temp_dir, store)
}

fn artist_fields(name: &str, genre: Option<&str>) -> ArtistFields {
    ArtistFields {
        name: name.to_string(),
        genre: genre.map(|g| g.to_string()),
    }
}

fn album_fields(title: &str, release_year: i32, artist_id: &str) -> AlbumFields {
    AlbumFields {
        title: title.to_string(),
        release_year,
        artist_id: artist_id.to_string(),
    }
}

fn track_fields(title: &str, duration_seconds: i32, album_id: &str) -> TrackFields {
    TrackFields {
        title: title.to_string(),
        duration_seconds,
        album_id: album_id.to_string(),
    }
}

// =============================================================================
// Create / Get
// =============================================================================

#[test]
fn test_created_entities_round_trip_through_get() {
    let (_tmp, store) = open_store();

    let artist = store
        .create_artist(&artist_fields("Radiofonia", Some("rock")))
        .unwrap();
    assert_eq!(store.get_artist(&artist.id).unwrap().unwrap(), artist);

    let album = store
        .create_album(&album_fields("First LP", 2020, &artist.id))
        .unwrap();
    assert_eq!(store.get_album(&album.id).unwrap().unwrap(), album);

    let track = store
        .create_track(&track_fields("Opener", 180, &album.id))
        .unwrap();
    assert_eq!(store.get_track(&track.id).unwrap().unwrap(), track);
}

#[test]
fn test_create_assigns_id_and_equal_timestamps() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("Test", None)).unwrap();

    assert!(uuid::Uuid::parse_str(&artist.id).is_ok());
    assert_eq!(artist.created_at, artist.updated_at);
    assert!(DateTime::parse_from_rfc3339(&artist.created_at).is_ok());
    assert_eq!(artist.genre, None);
}

#[test]
fn test_get_missing_entity_is_absent_not_error() {
    let (_tmp, store) = open_store();
    let id = uuid::Uuid::new_v4().to_string();

    assert!(store.get_artist(&id).unwrap().is_none());
    assert!(store.get_album(&id).unwrap().is_none());
    assert!(store.get_track(&id).unwrap().is_none());
    assert!(store.get_artist_with_albums(&id).unwrap().is_none());
}

#[test]
fn test_create_album_with_dangling_artist_fails() {
    let (_tmp, store) = open_store();

    let result = store.create_album(&album_fields(
        "Orphan",
        2020,
        &uuid::Uuid::new_v4().to_string(),
    ));
    assert!(result.is_err());
    assert_eq!(store.albums_count(), 0);
}

#[test]
fn test_create_track_with_dangling_album_fails() {
    let (_tmp, store) = open_store();

    let result = store.create_track(&track_fields(
        "Orphan",
        180,
        &uuid::Uuid::new_v4().to_string(),
    ));
    assert!(result.is_err());
    assert_eq!(store.tracks_count(), 0);
}

// =============================================================================
// Update
// =============================================================================

#[test]
fn test_update_restamps_updated_at_only() {
    let (_tmp, store) = open_store();

    let artist = store
        .create_artist(&artist_fields("Before", Some("rock")))
        .unwrap();

    sleep(Duration::from_millis(5));
    let updated = store
        .update_artist(&artist.id, &artist_fields("After", Some("jazz")))
        .unwrap();
    assert!(updated);

    let after = store.get_artist(&artist.id).unwrap().unwrap();
    assert_eq!(after.id, artist.id);
    assert_eq!(after.name, "After");
    assert_eq!(after.genre, Some("jazz".to_string()));
    assert_eq!(after.created_at, artist.created_at);

    let before_ts = DateTime::parse_from_rfc3339(&artist.updated_at).unwrap();
    let after_ts = DateTime::parse_from_rfc3339(&after.updated_at).unwrap();
    assert!(after_ts > before_ts);
}

#[test]
fn test_album_update_restamps_updated_at_only() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("A", None)).unwrap();
    let album = store
        .create_album(&album_fields("Before", 2019, &artist.id))
        .unwrap();

    sleep(Duration::from_millis(5));
    let updated = store
        .update_album(&album.id, &album_fields("After", 2021, &artist.id))
        .unwrap();
    assert!(updated);

    let after = store.get_album(&album.id).unwrap().unwrap();
    assert_eq!(after.id, album.id);
    assert_eq!(after.title, "After");
    assert_eq!(after.release_year, 2021);
    assert_eq!(after.created_at, album.created_at);

    let before_ts = DateTime::parse_from_rfc3339(&album.updated_at).unwrap();
    let after_ts = DateTime::parse_from_rfc3339(&after.updated_at).unwrap();
    assert!(after_ts > before_ts);
}

#[test]
fn test_update_missing_entity_returns_false() {
    let (_tmp, store) = open_store();
    let id = uuid::Uuid::new_v4().to_string();

    assert!(!store.update_artist(&id, &artist_fields("X", None)).unwrap());
    assert!(!store
        .update_album(&id, &album_fields("X", 2020, &id))
        .unwrap());
    assert!(!store
        .update_track(&id, &track_fields("X", 60, &id))
        .unwrap());
}

#[test]
fn test_update_track_can_move_it_to_another_album() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("A", None)).unwrap();
    let album_a = store
        .create_album(&album_fields("A-side", 2020, &artist.id))
        .unwrap();
    let album_b = store
        .create_album(&album_fields("B-side", 2021, &artist.id))
        .unwrap();
    let track = store
        .create_track(&track_fields("Drifter", 120, &album_a.id))
        .unwrap();

    let moved = store
        .update_track(&track.id, &track_fields("Drifter", 120, &album_b.id))
        .unwrap();
    assert!(moved);
    assert_eq!(
        store.get_track(&track.id).unwrap().unwrap().album_id,
        album_b.id
    );

    // The old album no longer has dependents and can be deleted.
    assert!(store.delete_album(&album_a.id).unwrap().is_deleted());
}

// =============================================================================
// Delete-Guard
// =============================================================================

#[test]
fn test_delete_without_dependents_succeeds() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("Solo", None)).unwrap();
    assert_eq!(
        store.delete_artist(&artist.id).unwrap(),
        DeleteOutcome::Deleted
    );
    assert!(store.get_artist(&artist.id).unwrap().is_none());
}

#[test]
fn test_delete_artist_with_albums_is_blocked() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("Busy", None)).unwrap();
    store
        .create_album(&album_fields("One", 2019, &artist.id))
        .unwrap();
    store
        .create_album(&album_fields("Two", 2021, &artist.id))
        .unwrap();

    let check = store.can_delete_artist(&artist.id).unwrap();
    assert!(!check.allowed);
    assert_eq!(check.dependent_count, 2);

    assert_eq!(
        store.delete_artist(&artist.id).unwrap(),
        DeleteOutcome::Blocked { dependents: 2 }
    );
    // Row intact.
    assert!(store.get_artist(&artist.id).unwrap().is_some());
}

#[test]
fn test_delete_album_with_tracks_is_blocked() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("A", None)).unwrap();
    let album = store
        .create_album(&album_fields("LP", 2020, &artist.id))
        .unwrap();
    store
        .create_track(&track_fields("T1", 100, &album.id))
        .unwrap();

    let check = store.can_delete_album(&album.id).unwrap();
    assert!(!check.allowed);
    assert_eq!(check.dependent_count, 1);

    assert_eq!(
        store.delete_album(&album.id).unwrap(),
        DeleteOutcome::Blocked { dependents: 1 }
    );
    assert!(store.get_album(&album.id).unwrap().is_some());
}

#[test]
fn test_delete_missing_entity_reports_not_found() {
    let (_tmp, store) = open_store();
    let id = uuid::Uuid::new_v4().to_string();

    assert_eq!(store.delete_artist(&id).unwrap(), DeleteOutcome::NotFound);
    assert_eq!(store.delete_album(&id).unwrap(), DeleteOutcome::NotFound);
    assert!(!store.delete_track(&id).unwrap());
}

#[test]
fn test_can_delete_missing_entity_is_allowed_with_zero_count() {
    let (_tmp, store) = open_store();
    let id = uuid::Uuid::new_v4().to_string();

    let check = store.can_delete_artist(&id).unwrap();
    assert!(check.allowed);
    assert_eq!(check.dependent_count, 0);
}

#[test]
fn test_guarded_delete_scenario() {
    let (_tmp, store) = open_store();

    let artist = store
        .create_artist(&artist_fields("Test", Some("rock")))
        .unwrap();
    let album = store
        .create_album(&album_fields("LP", 2020, &artist.id))
        .unwrap();
    let track = store
        .create_track(&track_fields("T1", 180, &album.id))
        .unwrap();

    let check = store.can_delete_album(&album.id).unwrap();
    assert!(!check.allowed);
    assert_eq!(check.dependent_count, 1);

    assert!(store.delete_track(&track.id).unwrap());

    let check = store.can_delete_album(&album.id).unwrap();
    assert!(check.allowed);
    assert_eq!(check.dependent_count, 0);

    assert_eq!(
        store.delete_album(&album.id).unwrap(),
        DeleteOutcome::Deleted
    );
}

// =============================================================================
// Pagination & Listing
// =============================================================================

#[test]
fn test_pagination_slices_are_disjoint_and_contiguous() {
    let (_tmp, store) = open_store();

    for i in 0..25 {
        store
            .create_artist(&artist_fields(&format!("Artist {:02}", i), None))
            .unwrap();
    }

    let full = store.list_artists(0, 100, None).unwrap();
    assert_eq!(full.len(), 25);

    let page0 = store.list_artists(0, 10, None).unwrap();
    let page1 = store.list_artists(1, 10, None).unwrap();
    let page2 = store.list_artists(2, 10, None).unwrap();

    assert_eq!(page0.len(), 10);
    assert_eq!(page1.len(), 10);
    assert_eq!(page2.len(), 5);

    let stitched: Vec<_> = page0.into_iter().chain(page1).chain(page2).collect();
    assert_eq!(stitched, full);

    // Past the last page: empty, never an error.
    assert!(store.list_artists(3, 10, None).unwrap().is_empty());
    assert!(store.list_albums(5, 10).unwrap().is_empty());
    assert!(store.list_tracks(5, 10).unwrap().is_empty());
}

#[test]
fn test_artist_name_filter_is_case_insensitive_substring() {
    let (_tmp, store) = open_store();

    store
        .create_artist(&artist_fields("The Velvet Underground", None))
        .unwrap();
    store
        .create_artist(&artist_fields("Velvetones", None))
        .unwrap();
    store.create_artist(&artist_fields("Quartz", None)).unwrap();

    let hits = store.list_artists(0, 10, Some("vElVeT")).unwrap();
    assert_eq!(hits.len(), 2);
    for artist in &hits {
        assert!(artist.name.to_lowercase().contains("velvet"));
    }

    assert!(store.list_artists(0, 10, Some("zzz")).unwrap().is_empty());
}

#[test]
fn test_albums_list_orderings() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("A", None)).unwrap();
    store
        .create_album(&album_fields("Mid", 2010, &artist.id))
        .unwrap();
    store
        .create_album(&album_fields("New", 2021, &artist.id))
        .unwrap();
    store
        .create_album(&album_fields("Old", 1999, &artist.id))
        .unwrap();

    // Global listing: newest release year first.
    let all: Vec<i32> = store
        .list_albums(0, 10)
        .unwrap()
        .into_iter()
        .map(|a| a.release_year)
        .collect();
    assert_eq!(all, vec![2021, 2010, 1999]);

    // Per-artist listing: ascending release year.
    let by_artist: Vec<i32> = store
        .list_albums_by_artist(&artist.id, 0, 10)
        .unwrap()
        .into_iter()
        .map(|a| a.release_year)
        .collect();
    assert_eq!(by_artist, vec![1999, 2010, 2021]);
}

#[test]
fn test_tracks_by_album_ordered_by_title() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("A", None)).unwrap();
    let album = store
        .create_album(&album_fields("LP", 2020, &artist.id))
        .unwrap();
    for title in ["Charlie", "Alpha", "Bravo"] {
        store
            .create_track(&track_fields(title, 120, &album.id))
            .unwrap();
    }

    let titles: Vec<String> = store
        .list_tracks_by_album(&album.id, 0, 10)
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Alpha", "Bravo", "Charlie"]);
}

// =============================================================================
// Aggregation
// =============================================================================

#[test]
fn test_artist_tree_groups_tracks_and_keeps_empty_albums() {
    let (_tmp, store) = open_store();

    let artist = store
        .create_artist(&artist_fields("Grouped", Some("rock")))
        .unwrap();
    let album_x = store
        .create_album(&album_fields("X", 2018, &artist.id))
        .unwrap();
    let album_y = store
        .create_album(&album_fields("Y", 2022, &artist.id))
        .unwrap();

    let track1 = store
        .create_track(&track_fields("Zeta", 200, &album_x.id))
        .unwrap();
    let track2 = store
        .create_track(&track_fields("Alpha", 180, &album_x.id))
        .unwrap();

    let tree = store.get_artist_with_albums(&artist.id).unwrap().unwrap();

    assert_eq!(tree.id, artist.id);
    assert_eq!(tree.name, artist.name);
    assert_eq!(tree.albums.len(), 2);

    // Albums in ascending release-year order.
    assert_eq!(tree.albums[0].id, album_x.id);
    assert_eq!(tree.albums[1].id, album_y.id);

    // Tracks in insertion order, not title order.
    let x_tracks: Vec<&str> = tree.albums[0].tracks.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(x_tracks, vec![track1.id.as_str(), track2.id.as_str()]);

    // The track-less album is present with an empty list.
    assert!(tree.albums[1].tracks.is_empty());
}

#[test]
fn test_artist_tree_excludes_other_artists_albums() {
    let (_tmp, store) = open_store();

    let artist_a = store.create_artist(&artist_fields("A", None)).unwrap();
    let artist_b = store.create_artist(&artist_fields("B", None)).unwrap();
    store
        .create_album(&album_fields("A's", 2020, &artist_a.id))
        .unwrap();
    store
        .create_album(&album_fields("B's", 2020, &artist_b.id))
        .unwrap();

    let tree = store.get_artist_with_albums(&artist_a.id).unwrap().unwrap();
    assert_eq!(tree.albums.len(), 1);
    assert_eq!(tree.albums[0].title, "A's");
}

#[test]
fn test_artist_tree_with_no_albums() {
    let (_tmp, store) = open_store();

    let artist = store.create_artist(&artist_fields("Quiet", None)).unwrap();
    let tree = store.get_artist_with_albums(&artist.id).unwrap().unwrap();
    assert!(tree.albums.is_empty());
}
