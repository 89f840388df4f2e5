//! Podcast search backends
//!
//! Each backend implements [`SearchTool`]. The [`SearchRegistry`] maps a
//! user-visible tool name to a factory and is populated once at startup.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{Error, Result};

mod my_podcast_data;
mod radio_france;

pub use my_podcast_data::MyPodcastDataSearch;
pub use radio_france::RadioFranceSearch;

/// One show returned by a search backend
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchResult {
    /// Show title
    pub title: Option<String>,
    /// Web page of the show
    pub page_url: Option<String>,
    /// Show description
    pub description: Option<String>,
    /// Show artwork URL
    pub image: Option<String>,
    /// Feed URL to subscribe to
    pub feed_url: Option<String>,
}

/// Trait implemented by every podcast search backend
#[async_trait]
pub trait SearchTool: Send + Sync {
    /// User-visible name of the backend
    fn name(&self) -> &str;

    /// Search shows matching `keyword`
    async fn search(&self, keyword: &str) -> Result<Vec<SearchResult>>;
}

/// Factory producing a search tool instance
pub type SearchToolFactory = Box<dyn Fn() -> Box<dyn SearchTool> + Send + Sync>;

/// Registry of search backends keyed by name, in registration order
#[derive(Default)]
pub struct SearchRegistry {
    factories: Vec<(String, SearchToolFactory)>,
}

impl SearchRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in backends, sharing `http_client`
    pub fn with_defaults(http_client: reqwest::Client) -> Self {
        let mut registry = Self::new();

        let client = http_client.clone();
        registry.register(radio_france::NAME, move || {
            Box::new(RadioFranceSearch::new(client.clone()))
        });

        let client = http_client;
        registry.register(my_podcast_data::NAME, move || {
            Box::new(MyPodcastDataSearch::new(client.clone()))
        });

        registry
    }

    /// Register (or replace) a backend under `name`
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Box<dyn SearchTool> + Send + Sync + 'static,
    {
        let name = name.into();
        self.factories.retain(|(existing, _)| *existing != name);
        self.factories.push((name, Box::new(factory)));
    }

    /// Names of all registered backends
    pub fn names(&self) -> Vec<String> {
        self.factories.iter().map(|(name, _)| name.clone()).collect()
    }

    /// Instantiate the backend registered under `name`
    pub fn get(&self, name: &str) -> Result<Box<dyn SearchTool>> {
        self.factories
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, factory)| factory())
            .ok_or_else(|| Error::NotFound(format!("search tool '{}'", name)))
    }

    /// Run a search with the named backend
    pub async fn search(&self, tool: &str, keyword: &str) -> Result<Vec<SearchResult>> {
        let backend = self.get(tool)?;
        backend.search(keyword).await
    }
}

impl std::fmt::Debug for SearchRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
