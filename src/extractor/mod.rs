//! Per-file metadata and artwork extraction
//!
//! The reconciler and the podcast downloader only see the [`MetadataExtractor`]
//! trait. [`BasicExtractor`] is the default implementation: it derives audio
//! titles from file names and produces base64 JPEG thumbnails with `image`.

use async_trait::async_trait;
use std::path::Path;

use crate::error::Result;

mod basic;

pub use basic::{BasicExtractor, thumbnail_base64};

/// Descriptive metadata read from an audio file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioMetadata {
    /// Track title
    pub title: Option<String>,
    /// Performing artist
    pub artist: Option<String>,
    /// Album name
    pub album: Option<String>,
    /// Base64-encoded JPEG cover art
    pub artwork: Option<String>,
}

/// Trait for extracting catalog metadata from media files
///
/// Implementations must be cheap to share (`Arc<dyn MetadataExtractor>`) and
/// safe to call from many tasks at once. A failing call never aborts a sync:
/// the caller falls back to a name-only entry.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    /// Read title, artist, album and cover art from an audio file
    async fn extract_audio(&self, path: &Path) -> Result<AudioMetadata>;

    /// Produce a thumbnail for an image file
    ///
    /// Returns `Ok(None)` when the file exists but cannot be decoded.
    async fn extract_image(&self, path: &Path) -> Result<Option<String>>;

    /// Fetch a remote image and thumbnail it to at most `size` pixels per edge
    async fn artwork_from_url(&self, url: &str, size: u32) -> Result<Option<String>>;
}
