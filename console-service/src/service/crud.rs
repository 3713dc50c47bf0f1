//! 通用增删改查服务模块
//!
//! Planning turns a [`CrudRequest`] into SQL text plus bound parameters and
//! rejects incomplete requests; execution runs the plan on one pooled
//! connection. Table and column names are quoted identifiers, values are
//! always parameters.

use std::sync::Arc;

use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnection, MySqlQueryResult};
use sqlx::query::Query;
use sqlx::MySql;

use common::errors::{AppError, AppResult};
use common::models::{CrudOperation, CrudOutcome, CrudRequest, Record};
use common::utils::SqlText;
use crate::pool_manager::PoolManager;
use crate::rows::rows_to_records;
use super::query_failed;

/// Row cap for an unfiltered read.
pub const READ_LIMIT: usize = 100;

/// SQL text and its positional parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

impl Statement {
    fn query(&self) -> Query<'_, MySql, MySqlArguments> {
        self.params.iter().fold(sqlx::query(&self.sql), bind_value)
    }
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else {
                query.bind(n.as_f64())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        other => query.bind(other.to_string()),
    }
}

/// Validated statements for one CRUD request.
#[derive(Debug, Clone, PartialEq)]
pub enum CrudPlan {
    Create {
        table: String,
        insert: Statement,
    },
    Read {
        table: String,
        select: Statement,
    },
    Update {
        table: String,
        update: Statement,
        reselect: Statement,
    },
    Delete {
        table: String,
        snapshot: Statement,
        delete: Statement,
    },
}

impl CrudPlan {
    /// Validates the request and builds its statements.
    pub fn from_request(req: CrudRequest) -> AppResult<Self> {
        let operation = req.operation.as_deref().map(str::trim).unwrap_or("");
        let table = req.table.as_deref().map(str::trim).unwrap_or("");
        if operation.is_empty() || table.is_empty() {
            return Err(AppError::Validation(
                "Missing required parameters: operation and table are required".to_string(),
            ));
        }

        let operation: CrudOperation = operation.parse()?;
        let table = table.to_string();
        let data = req.data.filter(|m| !m.is_empty());
        let filter = req.filter.filter(|m| !m.is_empty());

        let plan = match operation {
            CrudOperation::Create => {
                let data = data.ok_or_else(|| data_required(operation))?;
                CrudPlan::Create {
                    insert: insert_statement(&table, &data),
                    table,
                }
            }
            CrudOperation::Read => CrudPlan::Read {
                select: select_statement(&table, filter.as_ref()),
                table,
            },
            CrudOperation::Update => {
                let data = data.ok_or_else(|| data_required(operation))?;
                let filter = filter.ok_or_else(|| where_required(operation))?;
                CrudPlan::Update {
                    update: update_statement(&table, &data, &filter),
                    reselect: select_statement(&table, Some(&filter)),
                    table,
                }
            }
            CrudOperation::Delete => {
                let filter = filter.ok_or_else(|| where_required(operation))?;
                CrudPlan::Delete {
                    snapshot: select_statement(&table, Some(&filter)),
                    delete: delete_statement(&table, &filter),
                    table,
                }
            }
        };

        Ok(plan)
    }

    pub fn operation(&self) -> CrudOperation {
        match self {
            CrudPlan::Create { .. } => CrudOperation::Create,
            CrudPlan::Read { .. } => CrudOperation::Read,
            CrudPlan::Update { .. } => CrudOperation::Update,
            CrudPlan::Delete { .. } => CrudOperation::Delete,
        }
    }

    pub fn table(&self) -> &str {
        match self {
            CrudPlan::Create { table, .. }
            | CrudPlan::Read { table, .. }
            | CrudPlan::Update { table, .. }
            | CrudPlan::Delete { table, .. } => table,
        }
    }
}

fn data_required(operation: CrudOperation) -> AppError {
    AppError::Validation(format!("Data is required for {} operation", operation))
}

fn where_required(operation: CrudOperation) -> AppError {
    AppError::Validation(format!("Where clause is required for {} operation", operation))
}

fn insert_statement(table: &str, data: &Record) -> Statement {
    Statement {
        sql: format!(
            "INSERT INTO {} ({}) VALUES ({})",
            SqlText::quote_ident(table),
            SqlText::column_list(data.keys()),
            SqlText::placeholders(data.len())
        ),
        params: data.values().cloned().collect(),
    }
}

fn select_statement(table: &str, filter: Option<&Record>) -> Statement {
    match filter {
        None => Statement {
            sql: format!("SELECT * FROM {} LIMIT {}", SqlText::quote_ident(table), READ_LIMIT),
            params: vec![],
        },
        Some(filter) => Statement {
            sql: format!(
                "SELECT * FROM {} WHERE {}",
                SqlText::quote_ident(table),
                SqlText::conjunction(filter.keys())
            ),
            params: filter.values().cloned().collect(),
        },
    }
}

fn update_statement(table: &str, data: &Record, filter: &Record) -> Statement {
    Statement {
        sql: format!(
            "UPDATE {} SET {} WHERE {}",
            SqlText::quote_ident(table),
            SqlText::assignments(data.keys()),
            SqlText::conjunction(filter.keys())
        ),
        params: data.values().chain(filter.values()).cloned().collect(),
    }
}

fn delete_statement(table: &str, filter: &Record) -> Statement {
    Statement {
        sql: format!(
            "DELETE FROM {} WHERE {}",
            SqlText::quote_ident(table),
            SqlText::conjunction(filter.keys())
        ),
        params: filter.values().cloned().collect(),
    }
}

/// Locates a freshly inserted row by guessing its key column: `id` or
/// `<table>ID`.
fn inserted_row_statement(table: &str, insert_id: u64) -> Statement {
    Statement {
        sql: format!(
            "SELECT * FROM {} WHERE {} = ? OR {} = ?",
            SqlText::quote_ident(table),
            SqlText::quote_ident("id"),
            SqlText::quote_ident(&format!("{}ID", table))
        ),
        params: vec![Value::from(insert_id), Value::from(insert_id)],
    }
}

async fn fetch_records(
    conn: &mut MySqlConnection,
    statement: &Statement,
) -> Result<Vec<Record>, sqlx::Error> {
    tracing::debug!(sql = %statement.sql, params = statement.params.len(), "Fetching rows");
    let rows = statement.query().fetch_all(&mut *conn).await?;
    Ok(rows_to_records(&rows))
}

async fn execute(
    conn: &mut MySqlConnection,
    statement: &Statement,
) -> Result<MySqlQueryResult, sqlx::Error> {
    tracing::debug!(sql = %statement.sql, params = statement.params.len(), "Executing statement");
    statement.query().execute(&mut *conn).await
}

/// 通用增删改查服务
pub struct CrudService {
    pool_manager: Arc<PoolManager>,
}

impl CrudService {
    /// 创建新的增删改查服务实例
    pub fn new(pool_manager: Arc<PoolManager>) -> Self {
        Self { pool_manager }
    }

    /// 执行已校验的计划
    ///
    /// 整个操作使用同一个连接，语句依次执行，不包裹事务。
    pub async fn execute(&self, plan: CrudPlan) -> AppResult<CrudOutcome> {
        tracing::info!(operation = %plan.operation(), table = %plan.table(), "Executing CRUD operation");

        let mut conn = self.pool_manager.acquire().await?;
        let conn: &mut MySqlConnection = &mut conn;

        match plan {
            CrudPlan::Create { table, insert } => {
                let result = execute(conn, &insert).await.map_err(query_failed)?;
                let insert_id = result.last_insert_id();
                let affected_rows = result.rows_affected();

                if insert_id == 0 {
                    return Ok(CrudOutcome::Create {
                        message: "Record created successfully".to_string(),
                        table,
                        affected_rows,
                        insert_id,
                        record: None,
                    });
                }

                let lookup = inserted_row_statement(&table, insert_id);
                let record = match fetch_records(conn, &lookup).await {
                    Ok(rows) => Some(rows),
                    Err(e) => {
                        tracing::warn!(table = %table, insert_id, error = %e, "Inserted row could not be re-selected");
                        None
                    }
                };

                Ok(CrudOutcome::Create {
                    message: format!("Record created successfully with ID: {}", insert_id),
                    table,
                    affected_rows,
                    insert_id,
                    record,
                })
            }
            CrudPlan::Read { table, select } => {
                let records = fetch_records(conn, &select).await.map_err(query_failed)?;
                Ok(CrudOutcome::Read {
                    table,
                    count: records.len(),
                    records,
                })
            }
            CrudPlan::Update {
                table,
                update,
                reselect,
            } => {
                let result = execute(conn, &update).await.map_err(query_failed)?;
                let records = fetch_records(conn, &reselect).await.map_err(query_failed)?;
                Ok(CrudOutcome::Update {
                    message: format!("{} record(s) updated successfully", result.rows_affected()),
                    table,
                    affected_rows: result.rows_affected(),
                    records,
                })
            }
            CrudPlan::Delete {
                table,
                snapshot,
                delete,
            } => {
                let deleted_records = fetch_records(conn, &snapshot).await.map_err(query_failed)?;
                let result = execute(conn, &delete).await.map_err(query_failed)?;
                Ok(CrudOutcome::Delete {
                    message: format!("{} record(s) deleted successfully", result.rows_affected()),
                    table,
                    affected_rows: result.rows_affected(),
                    deleted_records,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: Value) -> CrudRequest {
        serde_json::from_value(value).unwrap()
    }

    fn plan(value: Value) -> AppResult<CrudPlan> {
        CrudPlan::from_request(request(value))
    }

    fn validation_message(result: AppResult<CrudPlan>) -> String {
        match result {
            Err(AppError::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_operation_or_table() {
        let expected = "Missing required parameters: operation and table are required";
        assert_eq!(validation_message(plan(json!({ "table": "Person" }))), expected);
        assert_eq!(validation_message(plan(json!({ "operation": "read" }))), expected);
        assert_eq!(
            validation_message(plan(json!({ "operation": " ", "table": "Person" }))),
            expected
        );
    }

    #[test]
    fn test_unsupported_operation() {
        let result = plan(json!({ "operation": "upsert", "table": "Person" }));
        assert!(matches!(result, Err(AppError::UnsupportedOperation(op)) if op == "upsert"));
    }

    #[test]
    fn test_create_requires_data() {
        assert_eq!(
            validation_message(plan(json!({ "operation": "create", "table": "Person" }))),
            "Data is required for create operation"
        );
        assert_eq!(
            validation_message(plan(json!({ "operation": "create", "table": "Person", "data": {} }))),
            "Data is required for create operation"
        );
    }

    #[test]
    fn test_update_requires_data_and_where() {
        assert_eq!(
            validation_message(plan(json!({
                "operation": "update", "table": "Person", "where": { "PersonID": 1 }
            }))),
            "Data is required for update operation"
        );
        assert_eq!(
            validation_message(plan(json!({
                "operation": "update", "table": "Person", "data": { "Email": "x@y.z" }
            }))),
            "Where clause is required for update operation"
        );
        assert_eq!(
            validation_message(plan(json!({
                "operation": "update", "table": "Person", "data": { "Email": "x@y.z" }, "where": {}
            }))),
            "Where clause is required for update operation"
        );
    }

    #[test]
    fn test_delete_requires_where() {
        assert_eq!(
            validation_message(plan(json!({ "operation": "delete", "table": "Person" }))),
            "Where clause is required for delete operation"
        );
    }

    #[test]
    fn test_create_plan() {
        let plan = plan(json!({
            "operation": "Create",
            "table": "Person",
            "data": { "FirstName": "Hellen", "LastName": "Cole", "Age": 31 }
        }))
        .unwrap();

        assert_eq!(plan.operation(), CrudOperation::Create);
        let CrudPlan::Create { table, insert } = plan else {
            panic!("expected create plan");
        };
        assert_eq!(table, "Person");
        assert_eq!(
            insert.sql,
            "INSERT INTO `Person` (`FirstName`, `LastName`, `Age`) VALUES (?, ?, ?)"
        );
        assert_eq!(insert.params, vec![json!("Hellen"), json!("Cole"), json!(31)]);
    }

    #[test]
    fn test_unfiltered_read_is_capped() {
        for body in [
            json!({ "operation": "read", "table": "Sale" }),
            json!({ "operation": "read", "table": "Sale", "where": {} }),
        ] {
            let CrudPlan::Read { select, .. } = plan(body).unwrap() else {
                panic!("expected read plan");
            };
            assert_eq!(select.sql, "SELECT * FROM `Sale` LIMIT 100");
            assert!(select.params.is_empty());
        }
    }

    #[test]
    fn test_filtered_read() {
        let CrudPlan::Read { select, .. } = plan(json!({
            "operation": "read",
            "table": "Sale",
            "where": { "SiteID": 3, "ProductID": 9 }
        }))
        .unwrap() else {
            panic!("expected read plan");
        };
        assert_eq!(select.sql, "SELECT * FROM `Sale` WHERE `SiteID` = ? AND `ProductID` = ?");
        assert_eq!(select.params, vec![json!(3), json!(9)]);
    }

    #[test]
    fn test_update_plan_binds_data_then_where() {
        let CrudPlan::Update { update, reselect, .. } = plan(json!({
            "operation": "update",
            "table": "Person",
            "data": { "Email": "hc@example.com", "Gender": "F" },
            "where": { "PersonID": 11 }
        }))
        .unwrap() else {
            panic!("expected update plan");
        };
        assert_eq!(
            update.sql,
            "UPDATE `Person` SET `Email` = ?, `Gender` = ? WHERE `PersonID` = ?"
        );
        assert_eq!(update.params, vec![json!("hc@example.com"), json!("F"), json!(11)]);
        assert_eq!(reselect.sql, "SELECT * FROM `Person` WHERE `PersonID` = ?");
        assert_eq!(reselect.params, vec![json!(11)]);
    }

    #[test]
    fn test_delete_snapshots_with_same_predicate() {
        let CrudPlan::Delete { snapshot, delete, .. } = plan(json!({
            "operation": "delete",
            "table": "Person",
            "where": { "PersonID": 11, "LastName": "Cole" }
        }))
        .unwrap() else {
            panic!("expected delete plan");
        };
        assert_eq!(
            snapshot.sql,
            "SELECT * FROM `Person` WHERE `PersonID` = ? AND `LastName` = ?"
        );
        assert_eq!(delete.sql, "DELETE FROM `Person` WHERE `PersonID` = ? AND `LastName` = ?");
        assert_eq!(snapshot.params, delete.params);
    }

    #[test]
    fn test_identifiers_are_quoted() {
        let CrudPlan::Read { select, .. } = plan(json!({
            "operation": "read",
            "table": "Person`; DROP TABLE Person; --",
            "where": { "a`b": 1 }
        }))
        .unwrap() else {
            panic!("expected read plan");
        };
        assert_eq!(
            select.sql,
            "SELECT * FROM `Person``; DROP TABLE Person; --` WHERE `a``b` = ?"
        );
    }

    #[test]
    fn test_inserted_row_lookup_guesses_key_names() {
        let statement = inserted_row_statement("Vendor", 42);
        assert_eq!(
            statement.sql,
            "SELECT * FROM `Vendor` WHERE `id` = ? OR `VendorID` = ?"
        );
        assert_eq!(statement.params, vec![json!(42), json!(42)]);
    }

    #[tokio::test]
    async fn test_execute_requires_connection() {
        let config = common::config::AppConfig::from_lookup("console-service", |_| None);
        let service = CrudService::new(Arc::new(PoolManager::new(config)));
        let plan = plan(json!({ "operation": "read", "table": "Person" })).unwrap();
        assert!(matches!(service.execute(plan).await, Err(AppError::NotConnected)));
    }
}
