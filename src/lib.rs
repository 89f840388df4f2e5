//! # media-catalog
//!
//! Filesystem-backed media catalog for music, photos and podcasts.
//!
//! ## Design Philosophy
//!
//! media-catalog is designed to be:
//! - **Disk-first** - The filesystem is authoritative; the catalog mirrors it
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Library-first** - The HTTP server is a thin layer over [`MediaLibrary`]
//! - **Poll-friendly** - Long podcast downloads run in the background and report progress
//!
//! ## Quick Start
//!
//! ```no_run
//! use media_catalog::{Category, Config, MediaLibrary};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let library = MediaLibrary::new(Config::default()).await?;
//!
//!     // Mirror the category roots into the catalog
//!     let report = library.full_sync().await?;
//!     println!("added {} removed {}", report.added, report.removed);
//!
//!     // Browse top-level music entries
//!     for entry in library.list_children(Category::Music, None).await? {
//!         println!("{:?}", entry.display_name);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Configuration types
pub mod config;
/// Catalog persistence layer
pub mod db;
/// Error types
pub mod error;
/// Audio metadata and artwork extraction
pub mod extractor;
/// Podcast feed access
pub mod feed;
/// Library facade (decomposed into focused submodules)
pub mod library;
/// Podcast search backends
pub mod search;
/// Background tasks with progress reporting
pub mod tasks;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use db::Database;
pub use error::{
    ApiError, DatabaseError, Error, ErrorDetail, FilesystemError, Result, ToHttpStatus,
};
pub use library::{Collaborators, MediaLibrary};
pub use types::{
    CatalogEntry, Category, CategorySyncReport, DeleteOutcome, EntryId, EntryKind, FeedListing,
    RefreshOutcome, SyncReport, TaskId, TaskState, TaskStatus,
};

/// Future that completes when the process is asked to terminate.
///
/// Waits for Ctrl+C, and on Unix also for SIGTERM from a service manager.
/// If the SIGTERM handler cannot be installed only Ctrl+C is awaited.
///
/// Pass it to [`api::start_api_server`] for graceful shutdown.
///
/// # Example
///
/// ```no_run
/// use media_catalog::{Config, MediaLibrary, shutdown_signal};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = Arc::new(Config::default());
///     let library = Arc::new(MediaLibrary::new((*config).clone()).await?);
///
///     media_catalog::api::start_api_server(library.clone(), config, shutdown_signal()).await?;
///     library.shutdown().await;
///
///     Ok(())
/// }
/// ```
pub async fn shutdown_signal() {
    let reason = tokio::select! {
        _ = interrupt() => "interrupt",
        _ = terminate() => "terminate",
    };
    tracing::info!(signal = reason, "Stopping catalog service");
}

/// Resolves on Ctrl+C; never resolves if the listener cannot be installed
async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Ctrl+C listener failed");
        std::future::pending::<()>().await;
    }
}

/// Resolves on SIGTERM; never resolves where that signal is unavailable
#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "SIGTERM handler unavailable, stopping on Ctrl+C only");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
