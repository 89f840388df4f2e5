use crate::db::*;
use crate::error::{DatabaseError, Error};
use crate::types::{Category, EntryKind};
use std::path::Path;
use tempfile::NamedTempFile;

async fn open() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().unwrap();
    let db = Database::new(temp_file.path()).await.unwrap();
    (temp_file, db)
}

fn dir(category: Category, path: &str) -> NewEntry {
    NewEntry::new(EntryKind::Directory, category, path)
}

fn file(category: Category, path: &str, parent: Option<crate::types::EntryId>) -> NewEntry {
    NewEntry::new(EntryKind::File, category, path).with_parent(parent)
}

#[tokio::test]
async fn insert_and_get_round_trips_all_columns() {
    let (_tmp, db) = open().await;

    let mut entry = file(Category::Music, "/data/music/song.mp3", None);
    entry.display_name = Some("Song".into());
    entry.artist = Some("Artist".into());
    entry.album = Some("Album".into());
    entry.artwork = Some("aGVsbG8=".into());

    let id = db.insert_entry(&entry).await.unwrap();
    let row = db.get_entry(id).await.unwrap().expect("entry should exist");

    assert_eq!(row.id, id);
    assert_eq!(row.kind, EntryKind::File);
    assert_eq!(row.category, Category::Music);
    assert_eq!(row.path, "/data/music/song.mp3");
    assert_eq!(row.display_name.as_deref(), Some("Song"));
    assert_eq!(row.artist.as_deref(), Some("Artist"));
    assert_eq!(row.album.as_deref(), Some("Album"));
    assert_eq!(row.artwork.as_deref(), Some("aGVsbG8="));
    assert_eq!(row.parent_id, None);
    assert!(row.created_at > 0);
}

#[tokio::test]
async fn get_unknown_entry_returns_none() {
    let (_tmp, db) = open().await;
    assert!(db.get_entry(crate::types::EntryId(999)).await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_path_matches_exact_path_only() {
    let (_tmp, db) = open().await;
    let id = db
        .insert_entry(&dir(Category::Photo, "/data/photo/2024"))
        .await
        .unwrap();

    let found = db
        .find_by_path(Path::new("/data/photo/2024"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
    assert!(found.is_directory());

    assert!(
        db.find_by_path(Path::new("/data/photo"))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn duplicate_path_is_a_constraint_violation() {
    let (_tmp, db) = open().await;
    db.insert_entry(&file(Category::Music, "/data/music/a.mp3", None))
        .await
        .unwrap();

    let err = db
        .insert_entry(&file(Category::Music, "/data/music/a.mp3", None))
        .await
        .unwrap_err();

    assert!(
        matches!(err, Error::Database(DatabaseError::ConstraintViolation(_))),
        "expected constraint violation, got {err:?}"
    );
    assert_eq!(db.count_entries().await.unwrap(), 1);
}

#[tokio::test]
async fn find_children_filters_by_parent_and_category_in_insertion_order() {
    let (_tmp, db) = open().await;

    let album = db
        .insert_entry(&dir(Category::Music, "/data/music/album"))
        .await
        .unwrap();
    let b = db
        .insert_entry(&file(Category::Music, "/data/music/album/b.mp3", Some(album)))
        .await
        .unwrap();
    let a = db
        .insert_entry(&file(Category::Music, "/data/music/album/a.mp3", Some(album)))
        .await
        .unwrap();
    let top_photo = db
        .insert_entry(&file(Category::Photo, "/data/photo/x.jpg", None))
        .await
        .unwrap();

    let children: Vec<_> = db
        .find_children(Some(album), Category::Music)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(children, vec![b, a], "children must come back in insertion order");

    let top_music: Vec<_> = db
        .find_children(None, Category::Music)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(top_music, vec![album]);

    let top_photos: Vec<_> = db
        .find_children(None, Category::Photo)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(top_photos, vec![top_photo]);

    assert!(
        db.find_children(Some(album), Category::Photo)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn delete_entry_reports_whether_a_row_was_removed() {
    let (_tmp, db) = open().await;
    let id = db
        .insert_entry(&file(Category::Photo, "/data/photo/a.jpg", None))
        .await
        .unwrap();

    assert!(db.delete_entry(id).await.unwrap());
    assert!(!db.delete_entry(id).await.unwrap());
    assert!(db.get_entry(id).await.unwrap().is_none());
}

#[tokio::test]
async fn ids_are_not_reused_after_deletion() {
    let (_tmp, db) = open().await;
    let first = db
        .insert_entry(&file(Category::Photo, "/data/photo/a.jpg", None))
        .await
        .unwrap();
    db.delete_entry(first).await.unwrap();

    let second = db
        .insert_entry(&file(Category::Photo, "/data/photo/a.jpg", None))
        .await
        .unwrap();
    assert!(second > first);
}

#[tokio::test]
async fn child_names_skip_unnamed_entries() {
    let (_tmp, db) = open().await;
    let show = db
        .insert_entry(&dir(Category::Podcast, "/data/podcast/Show"))
        .await
        .unwrap();
    db.insert_entry(
        &file(Category::Podcast, "/data/podcast/Show/Ep1.mp3", Some(show))
            .with_display_name("Ep1"),
    )
    .await
    .unwrap();
    db.insert_entry(&file(
        Category::Podcast,
        "/data/podcast/Show/raw.mp3",
        Some(show),
    ))
    .await
    .unwrap();

    assert_eq!(db.child_names(show).await.unwrap(), vec!["Ep1".to_string()]);
}

#[tokio::test]
async fn find_directory_by_source_url_ignores_files() {
    let (_tmp, db) = open().await;

    let mut episode = file(Category::Podcast, "/data/podcast/ep.mp3", None);
    episode.source_url = Some("https://example.com/feed.xml".into());
    db.insert_entry(&episode).await.unwrap();

    assert!(
        db.find_directory_by_source_url("https://example.com/feed.xml")
            .await
            .unwrap()
            .is_none()
    );

    let mut show = dir(Category::Podcast, "/data/podcast/Show");
    show.source_url = Some("https://example.com/feed.xml".into());
    let show_id = db.insert_entry(&show).await.unwrap();

    let found = db
        .find_directory_by_source_url("https://example.com/feed.xml")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, show_id);
}

#[tokio::test]
async fn catalog_entry_conversion_keeps_fields() {
    let (_tmp, db) = open().await;
    let id = db
        .insert_entry(&dir(Category::Music, "/data/music/album").with_display_name("album"))
        .await
        .unwrap();
    let row = db.get_entry(id).await.unwrap().unwrap();
    let created_at = row.created_at;

    let entry: crate::types::CatalogEntry = row.into();
    assert_eq!(entry.id, id);
    assert_eq!(entry.kind, EntryKind::Directory);
    assert_eq!(entry.path, std::path::PathBuf::from("/data/music/album"));
    assert_eq!(entry.display_name.as_deref(), Some("album"));
    assert_eq!(entry.created_at.timestamp(), created_at);
}
