//! SQL query models.
//!
//! Contains models for raw and predefined query execution.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::crud::Record;

/// Request body for executing a raw SQL string.
#[derive(Debug, Deserialize, ToSchema)]
pub struct QueryRequest {
    /// SQL text, executed verbatim.
    #[serde(default, alias = "sql")]
    pub query: String,
}

/// Request body for running a catalog query by name.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RunPredefinedRequest {
    /// Menu label of the query.
    #[serde(default)]
    pub name: String,
}

/// A named canned query.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PredefinedQuery {
    /// Menu label.
    pub name: String,
    /// SQL text.
    pub sql: String,
}

/// Result of a SQL query execution.
#[derive(Debug, Serialize, ToSchema)]
pub struct QueryResult {
    /// Column names, taken from the first returned row.
    pub columns: Vec<String>,

    /// Rows keyed by column name.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Record>,

    /// Number of rows returned.
    pub row_count: usize,

    /// Number of rows affected (for statements that return no rows).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_rows: Option<u64>,

    /// Status message for statements that return no rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Query execution time in milliseconds.
    pub execution_time_ms: u64,
}

impl QueryResult {
    /// Creates a result for a row-returning statement.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Record>, execution_time_ms: u64) -> Self {
        Self {
            row_count: rows.len(),
            columns,
            rows,
            affected_rows: None,
            message: None,
            execution_time_ms,
        }
    }

    /// Creates a query result with affected rows count (for non-SELECT queries).
    pub fn affected(affected: u64, execution_time_ms: u64) -> Self {
        Self {
            columns: vec![],
            rows: vec![],
            row_count: 0,
            affected_rows: Some(affected),
            message: Some(format!(
                "Query executed successfully. {} rows affected.",
                affected
            )),
            execution_time_ms,
        }
    }
}
