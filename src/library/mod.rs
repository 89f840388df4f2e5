//! Media library facade split into focused submodules.
//!
//! The [`MediaLibrary`] struct and its methods are organized by domain:
//! - [`scanner`] - Filesystem enumeration on blocking threads
//! - [`sync`] - Full catalog ↔ filesystem reconciliation
//! - [`refresh`] - Scoped refresh of a single directory
//! - [`deletion`] - Recursive two-phase deletion
//! - [`podcast`] - Feed listing and background episode downloads

mod deletion;
mod podcast;
mod refresh;
pub(crate) mod scanner;
mod sync;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::extractor::{BasicExtractor, MetadataExtractor};
use crate::feed::{FeedSource, RssFeedSource};
use crate::search::{SearchRegistry, SearchResult};
use crate::tasks::TaskManager;
use crate::types::{CatalogEntry, Category, EntryId, TaskId, TaskStatus};
use crate::utils::build_http_client;

/// External collaborators used by the library
///
/// [`MediaLibrary::new`] wires the default implementations; tests and
/// embedders can supply their own through [`MediaLibrary::with_collaborators`].
pub struct Collaborators {
    /// Metadata and artwork extraction
    pub extractor: Arc<dyn MetadataExtractor>,
    /// Podcast feed access
    pub feeds: Arc<dyn FeedSource>,
    /// Podcast search backends
    pub search: SearchRegistry,
}

impl Collaborators {
    /// Default collaborators built from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            extractor: Arc::new(BasicExtractor::new(config)?),
            feeds: Arc::new(RssFeedSource::new(config)?),
            search: SearchRegistry::with_defaults(build_http_client(&config.download)?),
        })
    }
}

/// Main library instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone)]
pub struct MediaLibrary {
    /// Catalog store (public for integration tests to inspect rows)
    pub db: Arc<Database>,
    /// Configuration
    pub(crate) config: Arc<Config>,
    /// Per-file metadata extraction
    pub(crate) extractor: Arc<dyn MetadataExtractor>,
    /// Podcast feed access
    pub(crate) feeds: Arc<dyn FeedSource>,
    /// Podcast search backends
    pub(crate) search: Arc<SearchRegistry>,
    /// Background tasks and their progress
    pub(crate) tasks: Arc<TaskManager>,
    /// Client for episode payloads (bounded by the episode timeout)
    pub(crate) episode_client: reqwest::Client,
}

impl MediaLibrary {
    /// Create a new MediaLibrary instance with the default collaborators
    ///
    /// This opens (or creates) the catalog database, runs migrations and
    /// makes sure every category root exists under the data directory.
    pub async fn new(config: Config) -> Result<Self> {
        let collaborators = Collaborators::from_config(&config)?;
        Self::with_collaborators(config, collaborators).await
    }

    /// Create a MediaLibrary with explicit collaborators
    pub async fn with_collaborators(config: Config, collaborators: Collaborators) -> Result<Self> {
        for category in Category::ALL {
            let root = config.category_root(category);
            tokio::fs::create_dir_all(&root).await.map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create {} directory '{}': {}",
                        category,
                        root.display(),
                        e
                    ),
                ))
            })?;
        }

        let db = Database::new(&config.persistence.database_path).await?;

        let episode_client = reqwest::Client::builder()
            .timeout(config.download.episode_timeout)
            .user_agent(config.download.user_agent.clone())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            data_dir = %config.library.data_dir.display(),
            database = %config.persistence.database_path.display(),
            search_tools = ?collaborators.search.names(),
            "Media library initialized"
        );

        Ok(Self {
            db: Arc::new(db),
            tasks: Arc::new(TaskManager::new(config.tasks.retention)),
            config: Arc::new(config),
            extractor: collaborators.extractor,
            feeds: collaborators.feeds,
            search: Arc::new(collaborators.search),
            episode_client,
        })
    }

    /// Close the catalog store
    ///
    /// Background downloads still running will fail their next catalog write.
    pub async fn shutdown(&self) {
        tracing::info!(running_tasks = self.tasks.running().await, "Shutting down media library");
        self.db.close().await;
    }

    /// Configuration this library was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Entries of a category under `parent_id` (top-level when `None`), in insertion order
    pub async fn list_children(
        &self,
        category: Category,
        parent_id: Option<EntryId>,
    ) -> Result<Vec<CatalogEntry>> {
        if let Some(parent) = parent_id {
            let row = self
                .db
                .get_entry(parent)
                .await?
                .ok_or_else(|| Error::NotFound(format!("entry {}", parent)))?;
            if !row.is_directory() {
                return Err(Error::NotFound(format!("directory {}", parent)));
            }
        }

        let rows = self.db.find_children(parent_id, category).await?;
        Ok(rows.into_iter().map(CatalogEntry::from).collect())
    }

    /// A single entry by id
    pub async fn get_entry(&self, id: EntryId) -> Result<CatalogEntry> {
        self.db
            .get_entry(id)
            .await?
            .map(CatalogEntry::from)
            .ok_or_else(|| Error::NotFound(format!("entry {}", id)))
    }

    /// Progress of a background task (0 for unknown ids)
    pub async fn poll_progress(&self, task_id: &TaskId) -> u8 {
        self.tasks.poll(task_id).await
    }

    /// Full status of a background task
    pub async fn task_status(&self, task_id: &TaskId) -> Option<TaskStatus> {
        self.tasks.status(task_id).await
    }

    /// Wait for a background task to stop and return its final status
    pub async fn wait_for_task(&self, task_id: &TaskId) -> Option<TaskStatus> {
        self.tasks.wait(task_id).await
    }

    /// Names of the registered podcast search backends
    pub fn search_tools(&self) -> Vec<String> {
        self.search.names()
    }

    /// Search podcasts with the named backend
    pub async fn search_podcasts(&self, tool: &str, keyword: &str) -> Result<Vec<SearchResult>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(Error::InvalidInput("search keyword must not be empty".into()));
        }
        self.search.search(tool, keyword).await
    }
}
