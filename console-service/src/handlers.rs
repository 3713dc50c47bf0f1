//! Handler模块

use std::time::Instant;

use axum::{
    extract::State,
    response::Html,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use validator::Validate;

use common::errors::AppError;
use common::middleware::RequestId;
use common::models::{
    ConnectRequest, ConnectionStatus, CrudOutcome, CrudRequest, PredefinedQuery, QueryRequest,
    QueryResult, RunPredefinedRequest, TableSummary,
};
use common::response::{ApiResponse, MessageResponse};
use crate::catalog;
use crate::service::{
    ConnectionDiagnostics, ConnectionService, ConnectionServiceTrait, CrudPlan, CrudService,
    QueryService, TableService,
};
use crate::state::AppState;

type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;

fn respond<T: Serialize>(
    state: &AppState,
    data: T,
    request_id: &RequestId,
    started: Instant,
) -> ApiResult<T> {
    Ok(Json(
        ApiResponse::ok_with_service(data, state.config.service_name.as_str())
            .with_request_id(request_id.as_str())
            .with_duration(started.elapsed().as_millis() as u64),
    ))
}

/// 打开共享数据库连接池
#[utoipa::path(
    post,
    path = "/api/connect",
    tag = "connection",
    request_body = ConnectRequest,
    responses(
        (status = 200, description = "连接成功", body = ApiResponse<ConnectionStatus>),
        (status = 400, description = "缺少主机或用户"),
        (status = 500, description = "连接失败")
    )
)]
pub async fn connect(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<ConnectRequest>,
) -> ApiResult<ConnectionStatus> {
    let started = Instant::now();
    req.validate()?;

    let service = ConnectionService::new(state.pool_manager.clone());
    let data = service.connect(req).await?;
    respond(&state, data, &request_id, started)
}

/// 关闭共享数据库连接池
#[utoipa::path(
    post,
    path = "/api/disconnect",
    tag = "connection",
    responses(
        (status = 200, description = "已断开（无连接时同样成功）", body = ApiResponse<MessageResponse>)
    )
)]
pub async fn disconnect(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<MessageResponse> {
    let started = Instant::now();
    let service = ConnectionService::new(state.pool_manager.clone());
    let data = service.disconnect().await?;
    respond(&state, data, &request_id, started)
}

/// 列出所有表及其字段与样本行
#[utoipa::path(
    get,
    path = "/api/tables",
    tag = "tables",
    responses(
        (status = 200, description = "表列表", body = ApiResponse<Vec<TableSummary>>),
        (status = 400, description = "尚未连接数据库"),
        (status = 500, description = "数据库错误")
    )
)]
pub async fn list_tables(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Vec<TableSummary>> {
    let started = Instant::now();
    let service = TableService::new(state.pool_manager.clone());
    let data = service.list().await?;
    respond(&state, data, &request_id, started)
}

/// 原样执行 SQL 语句
#[utoipa::path(
    post,
    path = "/api/query",
    tag = "queries",
    request_body = QueryRequest,
    responses(
        (status = 200, description = "查询结果", body = ApiResponse<QueryResult>),
        (status = 400, description = "查询为空或尚未连接"),
        (status = 500, description = "SQL 执行错误")
    )
)]
pub async fn execute_query(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<QueryRequest>,
) -> ApiResult<QueryResult> {
    let started = Instant::now();
    let service = QueryService::new(state.pool_manager.clone());
    let data = service.execute(&req.query).await?;
    respond(&state, data, &request_id, started)
}

/// 通用增删改查
///
/// 请求先做完整校验，再检查连接，因此参数错误在未连接时也会返回 400。
#[utoipa::path(
    post,
    path = "/api/crud",
    tag = "crud",
    request_body = CrudRequest,
    responses(
        (status = 200, description = "操作结果", body = ApiResponse<CrudOutcome>),
        (status = 400, description = "参数缺失、操作不支持或尚未连接"),
        (status = 500, description = "数据库错误")
    )
)]
pub async fn crud(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<CrudRequest>,
) -> ApiResult<CrudOutcome> {
    let started = Instant::now();
    let plan = CrudPlan::from_request(req)?;

    let service = CrudService::new(state.pool_manager.clone());
    let data = service.execute(plan).await?;
    respond(&state, data, &request_id, started)
}

/// 列出预定义查询菜单
#[utoipa::path(
    get,
    path = "/api/queries",
    tag = "queries",
    responses(
        (status = 200, description = "预定义查询", body = ApiResponse<Vec<PredefinedQuery>>)
    )
)]
pub async fn list_predefined(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<Vec<PredefinedQuery>> {
    respond(&state, catalog::list(), &request_id, Instant::now())
}

/// 按名称执行预定义查询
#[utoipa::path(
    post,
    path = "/api/queries/run",
    tag = "queries",
    request_body = RunPredefinedRequest,
    responses(
        (status = 200, description = "查询结果", body = ApiResponse<QueryResult>),
        (status = 404, description = "未知的查询名称")
    )
)]
pub async fn run_predefined(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(req): Json<RunPredefinedRequest>,
) -> ApiResult<QueryResult> {
    let started = Instant::now();
    let service = QueryService::new(state.pool_manager.clone());
    let data = service.execute_predefined(&req.name).await?;
    respond(&state, data, &request_id, started)
}

/// 健康检查端点
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "health",
    responses(
        (status = 200, description = "服务运行正常", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.service_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        connected: state.pool_manager.is_connected().await,
    })
}

/// 连接诊断信息
#[utoipa::path(
    get,
    path = "/api/debug",
    tag = "health",
    responses(
        (status = 200, description = "连接池诊断", body = ApiResponse<DebugReport>)
    )
)]
pub async fn debug_info(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
) -> ApiResult<DebugReport> {
    let started = Instant::now();
    let service = ConnectionService::new(state.pool_manager.clone());
    let report = DebugReport {
        server_time: Utc::now(),
        environment: state.config.environment.clone(),
        diagnostics: service.diagnose().await,
    };
    respond(&state, report, &request_id, started)
}

/// 控制台页面
pub async fn index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// 健康检查响应
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// 服务状态
    pub status: String,
    /// 服务名称
    pub service: String,
    /// 服务版本
    pub version: String,
    /// 当前时间戳
    pub timestamp: DateTime<Utc>,
    /// 是否已打开共享连接池
    pub connected: bool,
}

/// 诊断报告
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    /// 服务器时间
    pub server_time: DateTime<Utc>,
    /// 运行环境
    pub environment: String,
    #[serde(flatten)]
    pub diagnostics: ConnectionDiagnostics,
}
