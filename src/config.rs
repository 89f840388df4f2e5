//! Configuration types for media-catalog

use crate::error::{Error, Result};
use crate::types::Category;
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Main configuration for the media catalog
///
/// Fields are organized into logical sub-configs:
/// - [`library`](LibraryConfig) - media roots and artwork sizes
/// - [`persistence`](PersistenceConfig) - catalog database location
/// - [`download`](DownloadConfig) - network timeouts for feeds and episodes
/// - [`tasks`](TaskConfig) - background task retention
/// - [`server`](ApiConfig) - REST API binding and CORS
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Media roots and extraction settings
    #[serde(default)]
    pub library: LibraryConfig,

    /// Catalog storage
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Feed and episode fetching
    #[serde(default)]
    pub download: DownloadConfig,

    /// Background task bookkeeping
    #[serde(default)]
    pub tasks: TaskConfig,

    /// REST API server
    #[serde(default)]
    pub server: ApiConfig,
}

impl Config {
    /// Build a configuration from defaults overlaid with environment variables
    ///
    /// Recognized variables:
    /// - `MEDIA_DATA_PATH` - root holding the category directories
    /// - `MEDIA_DB_PATH` - catalog database file
    /// - `MEDIA_BIND_ADDRESS` - API bind address (e.g. `0.0.0.0:5000`)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reading variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(data_dir) = lookup("MEDIA_DATA_PATH") {
            if data_dir.trim().is_empty() {
                return Err(Error::Config {
                    message: "MEDIA_DATA_PATH must not be empty".to_string(),
                    key: Some("data_dir".to_string()),
                });
            }
            config.library.data_dir = PathBuf::from(data_dir);
        }

        if let Some(db_path) = lookup("MEDIA_DB_PATH") {
            if db_path.trim().is_empty() {
                return Err(Error::Config {
                    message: "MEDIA_DB_PATH must not be empty".to_string(),
                    key: Some("database_path".to_string()),
                });
            }
            config.persistence.database_path = PathBuf::from(db_path);
        }

        if let Some(bind) = lookup("MEDIA_BIND_ADDRESS") {
            config.server.bind_address = bind.parse().map_err(|e| Error::Config {
                message: format!("invalid MEDIA_BIND_ADDRESS '{}': {}", bind, e),
                key: Some("bind_address".to_string()),
            })?;
        }

        Ok(config)
    }

    /// Root directory for a category
    pub fn category_root(&self, category: Category) -> PathBuf {
        self.library.category_root(category)
    }
}

/// Media roots and extraction settings
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct LibraryConfig {
    /// Data directory holding one sub-directory per category (default: "data")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Music directory name under `data_dir` (default: "music")
    #[serde(default = "default_music_dir")]
    pub music_dir: String,

    /// Photo directory name under `data_dir` (default: "photo")
    #[serde(default = "default_photo_dir")]
    pub photo_dir: String,

    /// Podcast directory name under `data_dir` (default: "podcast")
    #[serde(default = "default_podcast_dir")]
    pub podcast_dir: String,

    /// Categories walked by a full sync (default: music and photo)
    ///
    /// Podcast shows are created by downloads, not discovered on disk.
    #[serde(default = "default_sync_categories")]
    pub sync_categories: Vec<Category>,

    /// Maximum thumbnail edge for music and photo artwork in pixels (default: 300)
    #[serde(default = "default_artwork_size")]
    pub artwork_size: u32,

    /// Maximum thumbnail edge for podcast artwork in pixels (default: 150)
    #[serde(default = "default_podcast_artwork_size")]
    pub podcast_artwork_size: u32,
}

impl LibraryConfig {
    /// Root directory for a category
    pub fn category_root(&self, category: Category) -> PathBuf {
        let name = match category {
            Category::Music => &self.music_dir,
            Category::Photo => &self.photo_dir,
            Category::Podcast => &self.podcast_dir,
        };
        self.data_dir.join(name)
    }
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            music_dir: default_music_dir(),
            photo_dir: default_photo_dir(),
            podcast_dir: default_podcast_dir(),
            sync_categories: default_sync_categories(),
            artwork_size: default_artwork_size(),
            podcast_artwork_size: default_podcast_artwork_size(),
        }
    }
}

/// Catalog storage configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PersistenceConfig {
    /// SQLite database path (default: "media-catalog.db")
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

/// Network settings for feed and episode fetching
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct DownloadConfig {
    /// Timeout for a single episode payload fetch (default: 30 seconds)
    #[serde(default = "default_episode_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub episode_timeout: Duration,

    /// Timeout for feed, artwork and search requests (default: 30 seconds)
    #[serde(default = "default_feed_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub feed_timeout: Duration,

    /// User agent sent with every outgoing request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            episode_timeout: default_episode_timeout(),
            feed_timeout: default_feed_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

/// Background task bookkeeping
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct TaskConfig {
    /// How long a finished task stays pollable (default: 1 hour)
    #[serde(default = "default_task_retention", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub retention: Duration,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            retention: default_task_retention(),
        }
    }
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:5000)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_music_dir() -> String {
    "music".into()
}

fn default_photo_dir() -> String {
    "photo".into()
}

fn default_podcast_dir() -> String {
    "podcast".into()
}

fn default_sync_categories() -> Vec<Category> {
    vec![Category::Music, Category::Photo]
}

fn default_artwork_size() -> u32 {
    300
}

fn default_podcast_artwork_size() -> u32 {
    150
}

fn default_database_path() -> PathBuf {
    PathBuf::from("media-catalog.db")
}

fn default_episode_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_feed_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_user_agent() -> String {
    format!("media-catalog/{}", env!("CARGO_PKG_VERSION"))
}

fn default_task_retention() -> Duration {
    Duration::from_secs(3600)
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
