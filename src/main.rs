//! media-catalogd: serves a [`MediaLibrary`] over HTTP.

use media_catalog::{Config, MediaLibrary, api, shutdown_signal};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "media_catalog=info,tower_http=info";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the environment and defaults still apply
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = Arc::new(Config::from_env()?);
    let library = Arc::new(MediaLibrary::new((*config).clone()).await?);

    api::start_api_server(library.clone(), config, shutdown_signal()).await?;
    library.shutdown().await;

    Ok(())
}
