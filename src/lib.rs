pub mod config;
pub mod error;
pub mod extractors;
pub mod models;
pub mod params;
pub mod routes;
pub mod store;
pub mod validation;

use crate::config::AppConfig;
use crate::store::Store;
use axum::extract::FromRef;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub config: AppConfig,
}

impl AppState {
    /// State for `config`, seeding the store when `seed_data` is set.
    pub fn new(config: AppConfig) -> Self {
        let store = if config.seed_data {
            Store::seeded()
        } else {
            Store::new()
        };
        Self {
            store: Arc::new(store),
            config,
        }
    }
}

impl FromRef<AppState> for Arc<Store> {
    fn from_ref(state: &AppState) -> Self {
        state.store.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
