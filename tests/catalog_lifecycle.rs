//! End-to-end catalog lifecycle over a real directory tree
//!
//! Exercises the default collaborators: file-stem titles for audio and
//! `image`-based thumbnails for photos.

mod common;

use common::{create_library, png_bytes, write_file};
use media_catalog::{Category, EntryKind, RefreshOutcome};

#[tokio::test]
async fn sync_browse_refresh_and_delete() {
    let (library, _temp_dir) = create_library().await;
    let music = library.config().category_root(Category::Music);
    let photo = library.config().category_root(Category::Photo);

    write_file(&music, "Blue Train/01 Blue Train.mp3", b"not really audio");
    write_file(&music, "Blue Train/02 Moment's Notice.mp3", b"not really audio");
    write_file(&photo, "Holiday/beach.png", &png_bytes(640, 480));

    let report = library.full_sync().await.unwrap();
    assert_eq!(report.added, 5);
    assert_eq!(report.removed, 0);

    // Second pass over an unchanged tree is a no-op
    let report = library.full_sync().await.unwrap();
    assert_eq!((report.added, report.removed), (0, 0));

    let albums = library.list_children(Category::Music, None).await.unwrap();
    assert_eq!(albums.len(), 1);
    assert_eq!(albums[0].kind, EntryKind::Directory);
    assert_eq!(albums[0].display_name.as_deref(), Some("Blue Train"));

    let tracks = library
        .list_children(Category::Music, Some(albums[0].id))
        .await
        .unwrap();
    let titles: Vec<_> = tracks
        .iter()
        .map(|t| t.display_name.clone().unwrap())
        .collect();
    assert_eq!(titles, vec!["01 Blue Train", "02 Moment's Notice"]);

    let holiday = library.list_children(Category::Photo, None).await.unwrap();
    let pictures = library
        .list_children(Category::Photo, Some(holiday[0].id))
        .await
        .unwrap();
    assert_eq!(pictures.len(), 1);
    assert!(pictures[0].artwork.is_some(), "photos get a thumbnail");

    // Disk changes behind the catalog's back, then a scoped refresh
    std::fs::remove_file(music.join("Blue Train/01 Blue Train.mp3")).unwrap();
    write_file(&music, "Blue Train/03 Locomotion.mp3", b"not really audio");
    let outcome = library.refresh_directory(albums[0].id).await.unwrap();
    assert_eq!(
        outcome,
        RefreshOutcome::Rescanned {
            added: 1,
            removed: 1
        }
    );

    let outcome = library.delete_entry(albums[0].id).await;
    assert!(outcome.success, "{:?}", outcome.error);
    assert_eq!(outcome.removed_paths.len(), 3);
    assert!(!music.join("Blue Train").exists());
    assert!(
        library
            .list_children(Category::Music, None)
            .await
            .unwrap()
            .is_empty()
    );

    library.shutdown().await;
}

#[tokio::test]
async fn full_sync_drops_entries_for_removed_trees() {
    let (library, _temp_dir) = create_library().await;
    let photo = library.config().category_root(Category::Photo);
    write_file(&photo, "Old/a.png", &png_bytes(10, 10));
    write_file(&photo, "Old/b.png", &png_bytes(10, 10));
    library.full_sync().await.unwrap();

    std::fs::remove_dir_all(photo.join("Old")).unwrap();
    let report = library.full_sync().await.unwrap();

    assert_eq!(report.added, 0);
    assert_eq!(report.removed, 3);
    assert_eq!(library.db.count_entries().await.unwrap(), 0);
}
