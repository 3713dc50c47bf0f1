//! MySQL 数据库管理控制台服务
//!
//! 提供浏览器端数据库管理功能，包括：
//! - 共享连接池的打开与关闭
//! - 数据表浏览与原始 SQL 执行
//! - 通用增删改查与预定义查询

mod catalog;
mod handlers;
mod pool_manager;
mod routes;
mod rows;
mod service;
mod state;

#[cfg(test)]
mod live_mysql_tests;

use axum::{middleware, routing::get, Json, Router};
use common::config::{AppConfig, LogFormat};
use common::middleware::request_id_middleware;
use state::AppState;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use utoipa::OpenApi;

const SERVICE_NAME: &str = "console-service";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "数据库控制台 API",
        version = "0.1.0",
        description = "MySQL 数据库管理控制台服务"
    ),
    paths(
        handlers::connect,
        handlers::disconnect,
        handlers::list_tables,
        handlers::execute_query,
        handlers::crud,
        handlers::list_predefined,
        handlers::run_predefined,
        handlers::health_check,
        handlers::debug_info,
    ),
    components(schemas(
        common::models::ConnectRequest,
        common::models::ConnectionStatus,
        common::models::CrudRequest,
        common::models::CrudOutcome,
        common::models::CrudOperation,
        common::models::PredefinedQuery,
        common::models::QueryRequest,
        common::models::QueryResult,
        common::models::RunPredefinedRequest,
        common::models::TableSummary,
        common::response::MessageResponse,
        handlers::HealthResponse,
        handlers::DebugReport,
        pool_manager::PoolStats,
    )),
    tags(
        (name = "connection", description = "连接管理端点"),
        (name = "tables", description = "数据表浏览端点"),
        (name = "queries", description = "SQL 查询端点"),
        (name = "crud", description = "通用增删改查端点"),
        (name = "health", description = "健康检查端点")
    )
)]
struct ApiDoc;

fn main() -> anyhow::Result<()> {
    // .env 须在运行时启动前加载，此时进程仍是单线程
    dotenvy::dotenv().ok();

    // 加载配置
    let config = AppConfig::load_with_service(SERVICE_NAME);

    // 初始化日志追踪
    init_tracing(config.log_format);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(serve(config))
}

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let addr = config.bind_addr();
    info!(
        service = %config.service_name,
        address = %addr,
        environment = %config.environment,
        "启动服务"
    );

    let app = create_router(AppState::new(config));
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(routes::router())
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
