//! Radio France show search

use async_trait::async_trait;
use serde::Deserialize;

use super::{SearchResult, SearchTool};
use crate::error::Result;

pub(super) const NAME: &str = "Radio France";

const DEFAULT_BASE_URL: &str = "https://radio-france-rss.aerion.workers.dev";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Show {
    title: Option<String>,
    path: Option<String>,
    standfirst: Option<String>,
    img_url: Option<String>,
    rss_url: Option<String>,
}

impl From<Show> for SearchResult {
    fn from(show: Show) -> Self {
        SearchResult {
            title: show.title,
            page_url: show.path,
            description: show.standfirst,
            image: show.img_url,
            feed_url: show.rss_url,
        }
    }
}

/// Search backend for Radio France shows
pub struct RadioFranceSearch {
    http_client: reqwest::Client,
    base_url: String,
}

impl RadioFranceSearch {
    /// Create a backend using the public endpoint
    pub fn new(http_client: reqwest::Client) -> Self {
        Self::with_base_url(http_client, DEFAULT_BASE_URL)
    }

    /// Create a backend against a different endpoint
    pub fn with_base_url(http_client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SearchTool for RadioFranceSearch {
    fn name(&self) -> &str {
        NAME
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let shows: Vec<Show> = self
            .http_client
            .get(format!("{}/search/", self.base_url))
            .query(&[("query", keyword)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(shows.into_iter().map(SearchResult::from).collect())
    }
}
