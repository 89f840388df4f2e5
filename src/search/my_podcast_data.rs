//! My Podcast Data show search

use async_trait::async_trait;
use serde::Deserialize;

use super::{SearchResult, SearchTool};
use crate::error::Result;

pub(super) const NAME: &str = "My Podcast Data";

const DEFAULT_BASE_URL: &str = "https://api.mypodcastdata.com";

#[derive(Debug, Deserialize)]
struct Response {
    #[serde(default)]
    shows: Vec<Show>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Show {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    logo: Option<String>,
    rss_source: Option<String>,
}

impl From<Show> for SearchResult {
    fn from(show: Show) -> Self {
        SearchResult {
            title: show.title,
            page_url: show.link,
            description: show.description,
            image: show.logo,
            feed_url: show.rss_source.filter(|url| !url.is_empty()),
        }
    }
}

/// Search backend for the My Podcast Data directory
///
/// Shows listed without an RSS source come back with `feed_url: None`.
pub struct MyPodcastDataSearch {
    http_client: reqwest::Client,
    base_url: String,
}

impl MyPodcastDataSearch {
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
impl SearchTool for MyPodcastDataSearch {
    fn name(&self) -> &str {
        NAME
    }

    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>> {
        let url = format!(
            "{}/api/shows/searchbykeywords/{}",
            self.base_url,
            urlencoding::encode(keyword)
        );

        let response: Response = self
            .http_client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.shows.into_iter().map(SearchResult::from).collect())
    }
}
