//! Shared connection pool manager.
//!
//! Holds the single process-wide MySQL pool opened from user-supplied
//! credentials. The last connect or disconnect wins.

use common::config::AppConfig;
use common::errors::{AppError, AppResult};
use common::models::ConnectRequest;
use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::pool::PoolConnection;
use sqlx::{MySql, MySqlPool};
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// Connection pool statistics.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    /// Whether a pool is currently open.
    pub connected: bool,
    /// Open connections (in use + idle).
    pub size: u32,
    /// Idle connections.
    pub idle: u32,
    /// Maximum pool size configured.
    pub max_size: u32,
}

/// Owns the shared pool slot.
pub struct PoolManager {
    config: AppConfig,
    pool: RwLock<Option<MySqlPool>>,
}

impl PoolManager {
    /// Creates a manager with no open pool.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            pool: RwLock::new(None),
        }
    }

    /// Opens a pool for the given credentials and makes it the shared one.
    ///
    /// A connection is established before the swap, so a failed connect
    /// leaves any existing pool in place. The replaced pool is closed.
    pub async fn connect(&self, req: &ConnectRequest) -> AppResult<()> {
        let pool = MySqlPoolOptions::new()
            .max_connections(self.config.max_connections)
            .acquire_timeout(self.config.connect_timeout())
            .connect_with(Self::connect_options(req))
            .await
            .map_err(|e| AppError::DatabaseConnection(e.to_string()))?;

        let previous = self.pool.write().await.replace(pool);
        if let Some(previous) = previous {
            previous.close().await;
            tracing::info!("Previous pool closed");
        }

        tracing::info!(
            host = %req.host,
            port = req.port_or_default(),
            database = req.database().unwrap_or(""),
            "Connection pool opened"
        );
        Ok(())
    }

    /// Closes the shared pool. Returns whether one was open.
    pub async fn disconnect(&self) -> bool {
        let previous = self.pool.write().await.take();
        match previous {
            Some(pool) => {
                pool.close().await;
                tracing::info!("Connection pool closed");
                true
            }
            None => false,
        }
    }

    /// Clone of the shared pool.
    pub async fn pool(&self) -> AppResult<MySqlPool> {
        self.pool.read().await.clone().ok_or(AppError::NotConnected)
    }

    /// Acquires one connection from the shared pool.
    ///
    /// The connection returns to the pool when dropped.
    pub async fn acquire(&self) -> AppResult<PoolConnection<MySql>> {
        let pool = self.pool().await?;
        pool.acquire()
            .await
            .map_err(|e| AppError::DatabaseConnection(e.to_string()))
    }

    /// Whether a pool is open.
    pub async fn is_connected(&self) -> bool {
        self.pool.read().await.is_some()
    }

    /// Current pool statistics.
    pub async fn stats(&self) -> PoolStats {
        match self.pool.read().await.as_ref() {
            Some(pool) => PoolStats {
                connected: true,
                size: pool.size(),
                idle: pool.num_idle() as u32,
                max_size: self.config.max_connections,
            },
            None => PoolStats {
                connected: false,
                size: 0,
                idle: 0,
                max_size: self.config.max_connections,
            },
        }
    }

    fn connect_options(req: &ConnectRequest) -> MySqlConnectOptions {
        let options = MySqlConnectOptions::new()
            .host(&req.host)
            .port(req.port_or_default())
            .username(&req.user)
            .password(&req.password);

        match req.database() {
            Some(database) => options.database(database),
            None => options,
        }
    }
}
