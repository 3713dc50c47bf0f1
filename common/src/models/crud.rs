//! Generic CRUD models.
//!
//! A CRUD request names an operation and a table and carries column/value
//! maps; the response shape depends on the operation and is tagged by it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

/// A row keyed by column name, in column order.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Supported CRUD operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CrudOperation {
    Create,
    Read,
    Update,
    Delete,
}

impl FromStr for CrudOperation {
    type Err = AppError;

    /// Parses an operation name case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" => Ok(CrudOperation::Create),
            "read" => Ok(CrudOperation::Read),
            "update" => Ok(CrudOperation::Update),
            "delete" => Ok(CrudOperation::Delete),
            _ => Err(AppError::UnsupportedOperation(s.to_string())),
        }
    }
}

impl fmt::Display for CrudOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrudOperation::Create => write!(f, "create"),
            CrudOperation::Read => write!(f, "read"),
            CrudOperation::Update => write!(f, "update"),
            CrudOperation::Delete => write!(f, "delete"),
        }
    }
}

/// Request body for a generic CRUD call.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct CrudRequest {
    /// One of create, read, update, delete (case-insensitive).
    #[serde(default)]
    pub operation: Option<String>,
    /// Target table name.
    #[serde(default)]
    pub table: Option<String>,
    /// Column values for create/update.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub data: Option<Record>,
    /// Equality predicates, AND-joined.
    #[serde(default, rename = "where")]
    #[schema(value_type = Option<Object>)]
    pub filter: Option<Record>,
}

/// Operation-specific CRUD response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "operation", rename_all = "lowercase")]
pub enum CrudOutcome {
    #[serde(rename_all = "camelCase")]
    Create {
        message: String,
        table: String,
        affected_rows: u64,
        insert_id: u64,
        /// The re-selected new row, when it could be located.
        #[serde(skip_serializing_if = "Option::is_none")]
        #[schema(value_type = Option<Vec<Object>>)]
        record: Option<Vec<Record>>,
    },
    #[serde(rename_all = "camelCase")]
    Read {
        table: String,
        count: usize,
        #[schema(value_type = Vec<Object>)]
        records: Vec<Record>,
    },
    #[serde(rename_all = "camelCase")]
    Update {
        message: String,
        table: String,
        affected_rows: u64,
        /// Rows matching the where clause after the update.
        #[schema(value_type = Vec<Object>)]
        records: Vec<Record>,
    },
    #[serde(rename_all = "camelCase")]
    Delete {
        message: String,
        table: String,
        affected_rows: u64,
        /// Rows selected immediately before the delete ran.
        #[schema(value_type = Vec<Object>)]
        deleted_records: Vec<Record>,
    },
}
