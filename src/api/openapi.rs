//! OpenAPI documentation and schema generation
//!
//! This module defines the OpenAPI specification for the media-catalog REST API
//! using utoipa for compile-time spec generation.

use utoipa::OpenApi;

/// OpenAPI documentation for the media-catalog REST API
///
/// The spec can be accessed via `/api/v1/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "media-catalog REST API",
        version = "0.1.0",
        description = "REST API for browsing the media catalog, reconciling it with disk and downloading podcasts",
        license(
            name = "MIT OR Apache-2.0"
        )
    ),
    servers(
        (url = "http://localhost:5000/api/v1", description = "Local development server")
    ),
    paths(
        // Catalog
        crate::api::routes::sync_catalog,
        crate::api::routes::list_entries,
        crate::api::routes::get_entry,
        crate::api::routes::refresh_entry,
        crate::api::routes::delete_entry,

        // Podcasts
        crate::api::routes::list_episodes,
        crate::api::routes::download_episodes,

        // Tasks
        crate::api::routes::task_progress,
        crate::api::routes::task_status,

        // Search
        crate::api::routes::list_search_tools,
        crate::api::routes::search_podcasts,

        // System
        crate::api::routes::health_check,
        crate::api::routes::openapi_spec,
    ),
    components(schemas(
        // Core types from types.rs
        crate::types::EntryId,
        crate::types::TaskId,
        crate::types::Category,
        crate::types::EntryKind,
        crate::types::CatalogEntry,
        crate::types::SyncReport,
        crate::types::CategorySyncReport,
        crate::types::RefreshOutcome,
        crate::types::DeleteOutcome,
        crate::types::FeedListing,
        crate::types::TaskState,
        crate::types::TaskStatus,

        // Feed and search types
        crate::feed::ShowInfo,
        crate::feed::EpisodeInfo,
        crate::search::SearchResult,

        // API request/response types from routes
        crate::api::routes::ListEntriesQuery,
        crate::api::routes::FeedQuery,
        crate::api::routes::DownloadEpisodesRequest,
        crate::api::routes::TaskAccepted,
        crate::api::routes::ProgressResponse,
        crate::api::routes::SearchRequest,

        // Error types from error.rs
        crate::error::ApiError,
        crate::error::ErrorDetail,
    )),
    tags(
        (name = "catalog", description = "Catalog - Sync with disk, browse, refresh and delete entries"),
        (name = "podcasts", description = "Podcasts - Inspect feeds and download episodes in the background"),
        (name = "tasks", description = "Tasks - Poll background download progress"),
        (name = "search", description = "Search - Find shows through registered search backends"),
        (name = "system", description = "System endpoints - Health checks, OpenAPI spec"),
    )
)]
pub struct ApiDoc;
