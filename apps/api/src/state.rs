//! Shared application state.

use std::sync::Arc;

use deliverus_db::Database;

use crate::auth::JwtManager;
use crate::config::ApiConfig;

/// Everything a handler needs, shared through `Arc<AppState>`.
///
/// `Database` wraps a thread-safe pool and the rest is read-only after
/// start-up, so no lock is needed.
#[derive(Debug)]
pub struct AppState {
    pub db: Database,
    pub config: ApiConfig,
    pub jwt: JwtManager,
}

impl AppState {
    pub fn new(db: Database, config: ApiConfig) -> Arc<Self> {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_lifetime_secs);
        Arc::new(AppState { db, config, jwt })
    }
}
