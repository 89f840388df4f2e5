//! Application state for the API server

use crate::{Config, MediaLibrary};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// This struct is cloned for each request (cheap Arc clone) and provides
/// access to the library instance and configuration.
#[derive(Clone)]
pub struct AppState {
    /// The media library
    pub library: Arc<MediaLibrary>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(library: Arc<MediaLibrary>, config: Arc<Config>) -> Self {
        Self { library, config }
    }
}
