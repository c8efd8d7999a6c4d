// Application state shared across request handlers
// Contains the resource roots and the file service collaborator

use crate::config::{Config, ResourceConfig};
use crate::services::{FileService, LocalFileService, PdfRenderer};
use std::sync::Arc;

/// Shared application state
///
/// Cloned into every handler; holds no mutable data, so no locking is needed.
#[derive(Clone)]
pub struct AppState {
    /// Fixed roots that request directories resolve under
    pub resources: Arc<ResourceConfig>,
    /// File service the API delegates to
    pub files: Arc<dyn FileService>,
}

impl AppState {
    /// Create state from explicit roots and a file service
    pub fn new(resources: ResourceConfig, files: Arc<dyn FileService>) -> Self {
        Self {
            resources: Arc::new(resources),
            files,
        }
    }

    /// Create state backed by the local file system and poppler renderer
    pub fn from_config(config: &Config) -> Self {
        let renderer = PdfRenderer::new(&config.render);
        Self::new(
            config.resources.clone(),
            Arc::new(LocalFileService::new(renderer)),
        )
    }
}
