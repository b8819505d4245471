//! Application state module
//!
//! Shared by every connection for the lifetime of the server

use super::types::Config;
use crate::store::PostStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: PostStore,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = PostStore::from_config(&config.storage);
        Self { config, store }
    }
}
