//! 控制台路由模块

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// 创建控制台路由
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::index))
        .route("/api/connect", post(handlers::connect))
        .route("/api/disconnect", post(handlers::disconnect))
        .route("/api/tables", get(handlers::list_tables))
        .route("/api/query", post(handlers::execute_query))
        .route("/api/crud", post(handlers::crud))
        .route("/api/queries", get(handlers::list_predefined))
        .route("/api/queries/run", post(handlers::run_predefined))
        .route("/api/health", get(handlers::health_check))
        .route("/api/debug", get(handlers::debug_info))
}
