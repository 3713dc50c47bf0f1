//! Table listing models.

use serde::Serialize;
use utoipa::ToSchema;

use super::crud::Record;

/// One table with its field names and a sample of rows.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TableSummary {
    /// Table name.
    pub table_name: String,
    /// Field names as reported by `DESCRIBE`.
    pub columns: Vec<String>,
    /// Sample rows.
    #[schema(value_type = Vec<Object>)]
    pub rows: Vec<Record>,
}
