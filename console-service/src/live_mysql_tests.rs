//! Tests against a real MySQL server.
//!
//! Skipped unless `CONSOLE_TEST_MYSQL_HOST` is set. `CONSOLE_TEST_MYSQL_PORT`,
//! `_USER`, `_PASSWORD` and `_DATABASE` fill in the rest; the database must
//! exist and allow CREATE/DROP TABLE. Each test works on its own scratch table.

use std::sync::Arc;

use serde_json::{json, Value};
use uuid::Uuid;

use common::config::AppConfig;
use common::models::{ConnectRequest, CrudOutcome, CrudRequest};
use crate::pool_manager::PoolManager;
use crate::service::{CrudPlan, CrudService, QueryService, TableService};

fn live_request() -> Option<ConnectRequest> {
    let host = std::env::var("CONSOLE_TEST_MYSQL_HOST").ok()?;
    let var = |key: &str, default: &str| {
        std::env::var(format!("CONSOLE_TEST_MYSQL_{}", key)).unwrap_or_else(|_| default.to_string())
    };
    let body = json!({
        "host": host,
        "port": var("PORT", "3306"),
        "user": var("USER", "root"),
        "password": var("PASSWORD", ""),
        "database": var("DATABASE", "test"),
    });
    Some(serde_json::from_value(body).unwrap())
}

struct Scratch {
    manager: Arc<PoolManager>,
    table: String,
}

impl Scratch {
    async fn open() -> Option<Self> {
        let Some(req) = live_request() else {
            eprintln!("CONSOLE_TEST_MYSQL_HOST not set, skipping live MySQL test");
            return None;
        };
        let manager = Arc::new(PoolManager::new(AppConfig::from_lookup("console-service", |_| None)));
        manager.connect(&req).await.unwrap();

        let table = format!("console_live_{}", &Uuid::new_v4().simple().to_string()[..12]);
        QueryService::new(manager.clone())
            .execute(&format!(
                "CREATE TABLE `{}` (\
                     id INT AUTO_INCREMENT PRIMARY KEY, \
                     name VARCHAR(64) NOT NULL, \
                     score DECIMAL(6,2) NULL, \
                     joined DATE NULL, \
                     shift TIME NULL)",
                table
            ))
            .await
            .unwrap();

        Some(Self { manager, table })
    }

    async fn crud(&self, body: Value) -> CrudOutcome {
        let mut req: CrudRequest = serde_json::from_value(body).unwrap();
        req.table = Some(self.table.clone());
        let plan = CrudPlan::from_request(req).unwrap();
        CrudService::new(self.manager.clone()).execute(plan).await.unwrap()
    }

    async fn close(self) {
        QueryService::new(self.manager.clone())
            .execute(&format!("DROP TABLE `{}`", self.table))
            .await
            .unwrap();
        self.manager.disconnect().await;
    }
}

#[tokio::test]
async fn live_crud_round() {
    let Some(scratch) = Scratch::open().await else {
        return;
    };

    let CrudOutcome::Create { insert_id, record, message, .. } = scratch
        .crud(json!({
            "operation": "create",
            "data": { "name": "Hellen Cole", "score": 88.5, "joined": "2011-01-15" }
        }))
        .await
    else {
        panic!("expected create outcome");
    };
    assert!(insert_id > 0);
    assert_eq!(message, format!("Record created successfully with ID: {}", insert_id));
    let record = record.expect("inserted row re-selected by id");
    assert_eq!(record.len(), 1);
    assert_eq!(record[0]["name"], "Hellen Cole");
    assert_eq!(record[0]["joined"], "2011-01-15");
    assert_eq!(record[0]["score"], "88.50");

    let CrudOutcome::Read { count, records, .. } = scratch
        .crud(json!({ "operation": "READ", "where": { "id": insert_id } }))
        .await
    else {
        panic!("expected read outcome");
    };
    assert_eq!(count, 1);
    assert_eq!(records[0]["id"], json!(insert_id));

    let CrudOutcome::Update { affected_rows, records, message, .. } = scratch
        .crud(json!({
            "operation": "update",
            "data": { "score": 91 },
            "where": { "id": insert_id }
        }))
        .await
    else {
        panic!("expected update outcome");
    };
    assert_eq!(affected_rows, 1);
    assert_eq!(message, "1 record(s) updated successfully");
    assert_eq!(records[0]["score"], "91.00");

    let CrudOutcome::Read { records: before, .. } = scratch
        .crud(json!({ "operation": "read", "where": { "id": insert_id } }))
        .await
    else {
        panic!("expected read outcome");
    };

    let CrudOutcome::Delete { affected_rows, deleted_records, .. } = scratch
        .crud(json!({ "operation": "delete", "where": { "id": insert_id } }))
        .await
    else {
        panic!("expected delete outcome");
    };
    assert_eq!(affected_rows, 1);
    assert_eq!(deleted_records, before);

    let CrudOutcome::Read { count, .. } = scratch
        .crud(json!({ "operation": "read", "where": { "id": insert_id } }))
        .await
    else {
        panic!("expected read outcome");
    };
    assert_eq!(count, 0);

    scratch.close().await;
}

#[tokio::test]
async fn live_unfiltered_read_is_capped() {
    let Some(scratch) = Scratch::open().await else {
        return;
    };

    let values: Vec<String> = (0..105).map(|i| format!("('row {}')", i)).collect();
    let inserted = QueryService::new(scratch.manager.clone())
        .execute(&format!("INSERT INTO `{}` (name) VALUES {}", scratch.table, values.join(", ")))
        .await
        .unwrap();
    assert_eq!(inserted.affected_rows, Some(105));

    let CrudOutcome::Read { count, records, .. } = scratch.crud(json!({ "operation": "read" })).await else {
        panic!("expected read outcome");
    };
    assert_eq!(count, 100);
    assert_eq!(records.len(), 100);

    scratch.close().await;
}

#[tokio::test]
async fn live_query_and_table_listing() {
    let Some(scratch) = Scratch::open().await else {
        return;
    };

    let query = QueryService::new(scratch.manager.clone());
    let result = query.execute("  SELECT 1 AS one, NULL AS nothing").await.unwrap();
    assert_eq!(result.columns, vec!["one", "nothing"]);
    assert_eq!(result.row_count, 1);
    assert_eq!(result.rows[0]["one"], json!(1));
    assert_eq!(result.rows[0]["nothing"], Value::Null);

    let tables = TableService::new(scratch.manager.clone()).list().await.unwrap();
    let summary = tables
        .iter()
        .find(|t| t.table_name == scratch.table)
        .expect("scratch table listed");
    assert_eq!(summary.columns, vec!["id", "name", "score", "joined", "shift"]);
    assert!(summary.rows.is_empty());

    scratch.close().await;
}

#[tokio::test]
async fn live_row_shape_decides_query_result() {
    let Some(scratch) = Scratch::open().await else {
        return;
    };
    let query = QueryService::new(scratch.manager.clone());

    let check = query
        .execute(&format!("CHECK TABLE `{}`", scratch.table))
        .await
        .unwrap();
    assert!(!check.columns.is_empty());
    assert!(check.columns.iter().any(|c| c == "Msg_text"));
    assert_eq!(check.affected_rows, None);

    let chained = query.execute("SET @console_n = 7; SELECT @console_n AS n").await.unwrap();
    assert_eq!(chained.columns, vec!["n"]);
    assert_eq!(chained.rows[0]["n"], json!(7));

    let versioned = query.execute("/*!40001 SELECT 1 AS one */").await.unwrap();
    assert_eq!(versioned.columns, vec!["one"]);

    let inserted = query
        .execute(&format!("INSERT INTO `{}` (name) VALUES ('a'), ('b')", scratch.table))
        .await
        .unwrap();
    assert!(inserted.columns.is_empty());
    assert_eq!(inserted.affected_rows, Some(2));

    let empty = query
        .execute(&format!("SELECT * FROM `{}` WHERE id < 0", scratch.table))
        .await
        .unwrap();
    assert!(empty.columns.is_empty());
    assert_eq!(empty.row_count, 0);
    assert_eq!(empty.message, None);

    scratch.close().await;
}

#[tokio::test]
async fn live_time_values_beyond_one_day() {
    let Some(scratch) = Scratch::open().await else {
        return;
    };

    for shift in ["838:59:59", "-01:00:00"] {
        scratch
            .crud(json!({ "operation": "create", "data": { "name": shift, "shift": shift } }))
            .await;
    }

    let CrudOutcome::Read { records, .. } = scratch.crud(json!({ "operation": "read" })).await else {
        panic!("expected read outcome");
    };
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["shift"], "838:59:59");
    let negative = records[1]["shift"].as_str().expect("negative TIME as text");
    assert!(negative.starts_with('-'), "got {}", negative);

    scratch.close().await;
}
