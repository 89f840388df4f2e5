//! Shared test helpers for creating MediaLibrary instances in tests.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::{TempDir, tempdir};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::extractor::{AudioMetadata, MetadataExtractor};
use crate::feed::{EpisodeInfo, FeedSource, ShowInfo};
use crate::library::{Collaborators, MediaLibrary};
use crate::search::SearchRegistry;
use crate::utils::file_stem_name;

/// Thumbnail returned for every image and remote artwork request
pub(crate) const FAKE_THUMBNAIL: &str = "dGh1bWI=";

/// Extractor that tags audio files as "<stem> (tagged)" without reading them
#[derive(Default)]
pub(crate) struct MockExtractor {
    /// File names whose extraction fails
    pub(crate) failing: Mutex<HashSet<String>>,
    pub(crate) artwork_requests: AtomicUsize,
}

impl MockExtractor {
    pub(crate) fn fail_on(&self, file_name: &str) {
        self.failing.lock().unwrap().insert(file_name.to_string());
    }

    fn check(&self, path: &Path) -> Result<()> {
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        if self.failing.lock().unwrap().contains(&name) {
            return Err(Error::Other(format!("cannot read {}", name)));
        }
        Ok(())
    }
}

#[async_trait]
impl MetadataExtractor for MockExtractor {
    async fn extract_audio(&self, path: &Path) -> Result<AudioMetadata> {
        self.check(path)?;
        Ok(AudioMetadata {
            title: file_stem_name(path).map(|stem| format!("{} (tagged)", stem)),
            artist: Some("Test Artist".to_string()),
            album: Some("Test Album".to_string()),
            artwork: None,
        })
    }

    async fn extract_image(&self, path: &Path) -> Result<Option<String>> {
        self.check(path)?;
        Ok(Some(FAKE_THUMBNAIL.to_string()))
    }

    async fn artwork_from_url(&self, _url: &str, _size: u32) -> Result<Option<String>> {
        self.artwork_requests.fetch_add(1, Ordering::SeqCst);
        Ok(Some(FAKE_THUMBNAIL.to_string()))
    }
}

/// In-memory feed with call counters
pub(crate) struct MockFeed {
    pub(crate) show: ShowInfo,
    pub(crate) episodes: Mutex<Vec<EpisodeInfo>>,
    pub(crate) show_requests: AtomicUsize,
    pub(crate) episode_requests: AtomicUsize,
}

impl MockFeed {
    pub(crate) fn new(title: &str, episodes: Vec<EpisodeInfo>) -> Self {
        Self {
            show: ShowInfo {
                title: title.to_string(),
                description: Some(format!("All about {}", title)),
                image: Some("https://example.com/show.jpg".to_string()),
            },
            episodes: Mutex::new(episodes),
            show_requests: AtomicUsize::new(0),
            episode_requests: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl FeedSource for MockFeed {
    async fn resolve_show(&self, _url: &str) -> Result<ShowInfo> {
        self.show_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.show.clone())
    }

    async fn list_episodes(&self, _url: &str) -> Result<Vec<EpisodeInfo>> {
        self.episode_requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.episodes.lock().unwrap().clone())
    }
}

/// Episode whose audio lives at `<base_url>/<slug>.mp3`
pub(crate) fn episode(title: &str, base_url: &str) -> EpisodeInfo {
    let slug = title.to_lowercase().replace(' ', "-");
    EpisodeInfo {
        title: title.to_string(),
        audio_url: Some(format!("{}/{}.mp3", base_url, slug)),
        image: None,
        description: Some(format!("{} description", title)),
    }
}

/// Config rooted inside `dir`
pub(crate) fn test_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.library.data_dir = dir.join("data");
    config.persistence.database_path = dir.join("catalog.db");
    config
}

/// Test library with mock collaborators.
/// Returns the library and the tempdir (which must be kept alive).
pub(crate) async fn create_test_library(
    extractor: Arc<MockExtractor>,
    feed: Arc<MockFeed>,
) -> (MediaLibrary, TempDir) {
    let temp_dir = tempdir().unwrap();
    let config = test_config(temp_dir.path());

    let library = MediaLibrary::with_collaborators(
        config,
        Collaborators {
            extractor,
            feeds: feed,
            search: SearchRegistry::new(),
        },
    )
    .await
    .unwrap();

    (library, temp_dir)
}

/// Test library with a default extractor and an empty feed
pub(crate) async fn create_default_test_library() -> (MediaLibrary, TempDir) {
    create_test_library(
        Arc::new(MockExtractor::default()),
        Arc::new(MockFeed::new("Empty Show", Vec::new())),
    )
    .await
}

/// Write a file (and its parent directories) under `root`
pub(crate) fn touch(root: &Path, relative: &str) -> std::path::PathBuf {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"media").unwrap();
    path
}
