//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`catalog`] - Sync, browsing, refresh and deletion of catalog entries
//! - [`podcasts`] - Feed listings and background episode downloads
//! - [`tasks`] - Background task progress
//! - [`search`] - Podcast search backends
//! - [`system`] - Health and OpenAPI

use serde::{Deserialize, Serialize};

use crate::types::TaskId;

mod catalog;
mod podcasts;
mod search;
mod system;
mod tasks;

// Re-export all handlers so `routes::function_name` continues to work
pub use catalog::*;
pub use podcasts::*;
pub use search::*;
pub use system::*;
pub use tasks::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Query parameters for GET /categories/:category/entries
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ListEntriesQuery {
    /// Parent directory entry; omit for top-level entries
    pub parent_id: Option<i64>,
}

/// Query parameters for GET /podcasts/episodes
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct FeedQuery {
    /// Feed URL
    pub url: String,
}

/// Request body for POST /podcasts/download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct DownloadEpisodesRequest {
    /// Feed URL of the show
    pub feed_url: String,
    /// Titles of the episodes to download
    #[serde(default)]
    pub selected: Vec<String>,
}

/// Response for POST /podcasts/download
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct TaskAccepted {
    /// Identifier to poll for progress
    pub task_id: TaskId,
}

/// Response for GET /tasks/:id/progress
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ProgressResponse {
    /// Progress 0-100 (0 for unknown tasks)
    pub progress: u8,
}

/// Request body for POST /search
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SearchRequest {
    /// Search backend name (see GET /search/tools)
    pub tool: String,
    /// Search keyword
    pub keyword: String,
}
