//! Default extractor backed by the `image` crate

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use std::path::Path;
use tokio::task::spawn_blocking;

use super::{AudioMetadata, MetadataExtractor};
use crate::config::Config;
use crate::error::{Error, FilesystemError, Result};
use crate::utils::{build_http_client, file_stem_name};

/// JPEG quality used for every stored thumbnail
const THUMBNAIL_QUALITY: u8 = 60;

/// Default metadata extractor
///
/// - audio: title from the file stem, no tag parsing
/// - images: thumbnail of at most `artwork_size` pixels per edge
/// - remote artwork: fetched over HTTP, then thumbnailed
pub struct BasicExtractor {
    http_client: reqwest::Client,
    artwork_size: u32,
}

impl BasicExtractor {
    /// Create an extractor using the library and download settings from `config`
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            http_client: build_http_client(&config.download)?,
            artwork_size: config.library.artwork_size,
        })
    }
}

#[async_trait]
impl MetadataExtractor for BasicExtractor {
    async fn extract_audio(&self, path: &Path) -> Result<AudioMetadata> {
        tokio::fs::metadata(path)
            .await
            .map_err(|e| FilesystemError::from_io(path, e))?;

        Ok(AudioMetadata {
            title: file_stem_name(path),
            ..Default::default()
        })
    }

    async fn extract_image(&self, path: &Path) -> Result<Option<String>> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| FilesystemError::from_io(path, e))?;
        encode_off_thread(bytes, self.artwork_size).await
    }

    async fn artwork_from_url(&self, url: &str, size: u32) -> Result<Option<String>> {
        let bytes = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        encode_off_thread(bytes.to_vec(), size).await
    }
}

async fn encode_off_thread(bytes: Vec<u8>, size: u32) -> Result<Option<String>> {
    spawn_blocking(move || thumbnail_base64(&bytes, size))
        .await
        .map_err(|e| Error::Other(format!("thumbnail task panicked: {}", e)))
}

/// Decode an image, shrink it to fit `size`×`size` and return it as base64 JPEG
///
/// Images already within bounds are re-encoded without resizing. Returns
/// `None` if the bytes are not a decodable image.
pub fn thumbnail_base64(bytes: &[u8], size: u32) -> Option<String> {
    let img = image::load_from_memory(bytes).ok()?;

    let img = if img.width() > size || img.height() > size {
        img.thumbnail(size, size)
    } else {
        img
    };

    let rgb = img.to_rgb8();
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, THUMBNAIL_QUALITY);
    encoder.encode_image(&rgb).ok()?;

    Some(STANDARD.encode(buffer))
}
