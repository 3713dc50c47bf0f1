//! 数据表浏览服务模块

use std::sync::Arc;

use sqlx::Executor;

use common::errors::AppResult;
use common::models::TableSummary;
use common::utils::SqlText;
use crate::pool_manager::PoolManager;
use crate::rows::{row_to_record, rows_to_records, text_value};
use super::query_failed;

/// Rows fetched per table as a sample.
pub const SAMPLE_ROWS: usize = 5;

/// 数据表浏览服务
pub struct TableService {
    pool_manager: Arc<PoolManager>,
}

impl TableService {
    /// 创建新的数据表服务实例
    pub fn new(pool_manager: Arc<PoolManager>) -> Self {
        Self { pool_manager }
    }

    /// 列出所有表，附带字段名与样本行
    ///
    /// 每张表依次执行 `DESCRIBE` 与 `SELECT ... LIMIT 5`，共用同一连接。
    pub async fn list(&self) -> AppResult<Vec<TableSummary>> {
        let mut conn = self.pool_manager.acquire().await?;

        let table_rows = (&mut *conn)
            .fetch_all(sqlx::raw_sql("SHOW TABLES"))
            .await
            .map_err(query_failed)?;

        let names: Vec<String> = table_rows
            .iter()
            .filter_map(|row| row_to_record(row).values().next().and_then(text_value))
            .collect();
        tracing::debug!(count = names.len(), "Tables listed");

        let mut summaries = Vec::with_capacity(names.len());
        for name in names {
            let quoted = SqlText::quote_ident(&name);

            let describe = format!("DESCRIBE {}", quoted);
            let fields = (&mut *conn)
                .fetch_all(sqlx::raw_sql(&describe))
                .await
                .map_err(query_failed)?;
            let columns = fields
                .iter()
                .filter_map(|row| row_to_record(row).get("Field").and_then(text_value))
                .collect();

            let sample = format!("SELECT * FROM {} LIMIT {}", quoted, SAMPLE_ROWS);
            let rows = (&mut *conn)
                .fetch_all(sqlx::raw_sql(&sample))
                .await
                .map_err(query_failed)?;

            summaries.push(TableSummary {
                table_name: name,
                columns,
                rows: rows_to_records(&rows),
            });
        }

        Ok(summaries)
    }
}
