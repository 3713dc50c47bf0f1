//! 连接管理服务模块

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use common::errors::AppResult;
use common::models::{ConnectRequest, ConnectionStatus, Record};
use common::response::MessageResponse;
use crate::pool_manager::{PoolManager, PoolStats};
use crate::rows::rows_to_records;

/// 连接服务 Trait
#[async_trait]
pub trait ConnectionServiceTrait: Send + Sync {
    /// 打开共享连接池
    async fn connect(&self, req: ConnectRequest) -> AppResult<ConnectionStatus>;

    /// 关闭共享连接池
    async fn disconnect(&self) -> AppResult<MessageResponse>;

    /// 探测连接池状态（不会失败）
    async fn diagnose(&self) -> ConnectionDiagnostics;
}

/// 共享连接池管理服务
pub struct ConnectionService {
    pool_manager: Arc<PoolManager>,
}

impl ConnectionService {
    /// 创建新的连接服务实例
    pub fn new(pool_manager: Arc<PoolManager>) -> Self {
        Self { pool_manager }
    }
}

#[async_trait]
impl ConnectionServiceTrait for ConnectionService {
    async fn connect(&self, req: ConnectRequest) -> AppResult<ConnectionStatus> {
        self.pool_manager.connect(&req).await?;

        Ok(ConnectionStatus {
            message: "Connected successfully".to_string(),
            port: req.port_or_default(),
            database: req.database().map(str::to_string),
            host: req.host,
        })
    }

    async fn disconnect(&self) -> AppResult<MessageResponse> {
        if !self.pool_manager.disconnect().await {
            tracing::debug!("Disconnect requested with no open pool");
        }
        Ok(MessageResponse::new("Disconnected successfully"))
    }

    async fn diagnose(&self) -> ConnectionDiagnostics {
        let mut diagnostics = ConnectionDiagnostics {
            has_pool: false,
            connection_test: CheckOutcome::default(),
            simple_query_test: QueryCheckOutcome::default(),
            pool: self.pool_manager.stats().await,
        };

        let Ok(pool) = self.pool_manager.pool().await else {
            return diagnostics;
        };
        diagnostics.has_pool = true;

        let mut conn = match pool.acquire().await {
            Ok(conn) => conn,
            Err(e) => {
                diagnostics.connection_test.error = Some(e.to_string());
                return diagnostics;
            }
        };
        diagnostics.connection_test.success = true;

        match sqlx::query("SELECT 1 AS test").fetch_all(&mut *conn).await {
            Ok(rows) => {
                diagnostics.simple_query_test.success = true;
                diagnostics.simple_query_test.result = Some(rows_to_records(&rows));
            }
            Err(e) => diagnostics.simple_query_test.error = Some(e.to_string()),
        }

        diagnostics
    }
}

/// 连接池诊断结果
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDiagnostics {
    /// 是否存在共享连接池
    pub has_pool: bool,
    /// 获取连接测试
    pub connection_test: CheckOutcome,
    /// `SELECT 1 AS test` 测试
    pub simple_query_test: QueryCheckOutcome,
    /// 连接池统计
    pub pool: PoolStats,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct CheckOutcome {
    pub success: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct QueryCheckOutcome {
    pub success: bool,
    pub error: Option<String>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub result: Option<Vec<Record>>,
}
