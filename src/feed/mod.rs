//! Podcast feed access
//!
//! [`FeedSource`] is the seam between the catalog and the network: the
//! downloader and the scoped refresh only ask it for show metadata and the
//! ordered episode list. [`RssFeedSource`] implements it over HTTP.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;

mod rss_source;

pub use rss_source::{ParsedFeed, RssFeedSource, parse_feed};

/// Title used for a show whose feed has none
pub const UNTITLED_SHOW: &str = "Untitled";

/// Show-level metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShowInfo {
    /// Show title
    pub title: String,
    /// Show description
    pub description: Option<String>,
    /// Show artwork URL
    pub image: Option<String>,
}

/// One episode as listed by a feed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EpisodeInfo {
    /// Episode title (the identity used to match catalog entries)
    pub title: String,
    /// Audio enclosure URL
    pub audio_url: Option<String>,
    /// Episode artwork URL
    pub image: Option<String>,
    /// Episode description
    pub description: Option<String>,
}

/// Trait for reading podcast feeds
///
/// The order returned by [`FeedSource::list_episodes`] is authoritative:
/// downloads proceed in that order.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch show metadata for a feed
    async fn resolve_show(&self, url: &str) -> Result<ShowInfo>;

    /// Fetch the episode list for a feed, in feed order
    async fn list_episodes(&self, url: &str) -> Result<Vec<EpisodeInfo>>;
}
