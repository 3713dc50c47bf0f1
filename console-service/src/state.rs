//! Shared application state.
//!
//! The console holds one user database pool for the whole process. Every
//! handler clone of the state points at the same `PoolManager`, so a connect
//! from one browser tab is seen by all others.

use std::sync::Arc;

use common::config::AppConfig;
use crate::pool_manager::PoolManager;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Service settings, read for response metadata and diagnostics.
    pub config: Arc<AppConfig>,
    /// Slot of the shared pool, empty until the first connect.
    pub pool_manager: Arc<PoolManager>,
}

impl AppState {
    /// Creates state with no open pool.
    pub fn new(config: AppConfig) -> Self {
        Self {
            pool_manager: Arc::new(PoolManager::new(config.clone())),
            config: Arc::new(config),
        }
    }
}
