//! 查询执行服务模块

use std::sync::Arc;
use std::time::Instant;

use futures::TryStreamExt;
use sqlx::mysql::MySqlRow;
use sqlx::Either;

use common::errors::{AppError, AppResult};
use common::models::QueryResult;
use common::utils::SqlText;
use crate::catalog;
use crate::pool_manager::PoolManager;
use crate::rows::{column_names, rows_to_records};
use super::query_failed;

/// SQL 查询执行服务
pub struct QueryService {
    pool_manager: Arc<PoolManager>,
}

impl QueryService {
    /// 创建新的查询服务实例
    pub fn new(pool_manager: Arc<PoolManager>) -> Self {
        Self { pool_manager }
    }

    /// 原样执行 SQL 语句
    ///
    /// 按结果形态返回：有行时按第一行推断列名；没有行但有受影响行数时
    /// 只报告受影响行数；两者都没有时返回空结果。多语句依次执行。
    pub async fn execute(&self, sql: &str) -> AppResult<QueryResult> {
        let sql = sql.trim();
        if sql.is_empty() {
            return Err(AppError::Validation("No query provided".to_string()));
        }

        let mut conn = self.pool_manager.acquire().await?;
        let start = Instant::now();
        tracing::debug!(sql = %sql, statement = ?SqlText::leading_keyword(sql), "Executing query");

        let mut rows = Vec::new();
        let mut affected = 0u64;
        let mut results = sqlx::raw_sql(sql).fetch_many(&mut *conn);
        while let Some(item) = results.try_next().await.map_err(query_failed)? {
            match item {
                Either::Left(done) => affected += done.rows_affected(),
                Either::Right(row) => rows.push(row),
            }
        }
        drop(results);

        let elapsed = start.elapsed().as_millis() as u64;
        let result = shape_result(&rows, affected, elapsed);
        tracing::debug!(
            rows = result.row_count,
            affected,
            columns = ?result.columns,
            elapsed_ms = elapsed,
            "Query finished"
        );
        Ok(result)
    }

    /// 按菜单名称执行预定义查询
    pub async fn execute_predefined(&self, name: &str) -> AppResult<QueryResult> {
        let sql = catalog::find(name)
            .ok_or_else(|| AppError::NotFound(format!("Unknown predefined query: {}", name)))?;

        tracing::info!(query = %name, "Running predefined query");
        self.execute(sql).await
    }
}

/// Rows win over affected counts; a statement that yields neither comes
/// back as an empty result with no columns.
fn shape_result(rows: &[MySqlRow], affected: u64, elapsed_ms: u64) -> QueryResult {
    if let Some(first) = rows.first() {
        QueryResult::from_rows(column_names(first), rows_to_records(rows), elapsed_ms)
    } else if affected > 0 {
        QueryResult::affected(affected, elapsed_ms)
    } else {
        QueryResult::from_rows(vec![], vec![], elapsed_ms)
    }
}
