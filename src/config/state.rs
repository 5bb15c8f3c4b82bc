// Application state module
// Process-wide state built once at startup and shared by every connection

use std::sync::Arc;

use super::types::Config;
use crate::repository::BrandRepository;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Store handle opened at startup, held for the process lifetime
    pub brands: Arc<dyn BrandRepository>,
}

impl AppState {
    pub fn new(config: Config, brands: Arc<dyn BrandRepository>) -> Self {
        Self { config, brands }
    }
}
