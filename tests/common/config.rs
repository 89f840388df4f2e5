//! Test configuration helpers for creating libraries over temporary directories

use media_catalog::config::{LibraryConfig, PersistenceConfig};
use media_catalog::{Config, MediaLibrary};
use std::path::Path;
use tempfile::TempDir;

/// Configuration rooted in `dir`, with every category synced
pub fn test_config(dir: &Path) -> Config {
    Config {
        library: LibraryConfig {
            data_dir: dir.join("data"),
            sync_categories: media_catalog::Category::ALL.to_vec(),
            ..Default::default()
        },
        persistence: PersistenceConfig {
            database_path: dir.join("catalog.db"),
        },
        ..Default::default()
    }
}

/// Library with the default collaborators over a fresh temporary directory
pub async fn create_library() -> (MediaLibrary, TempDir) {
    let temp_dir = tempfile::tempdir().unwrap();
    let library = MediaLibrary::new(test_config(temp_dir.path()))
        .await
        .unwrap();
    (library, temp_dir)
}
