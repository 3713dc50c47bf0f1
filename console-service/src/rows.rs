//! MySQL row to JSON conversion.
//!
//! Cells are decoded by the column's reported type name so that numbers stay
//! numbers and temporal values come out as readable strings. Works for both
//! the binary (prepared) and the text (raw SQL) protocol.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use common::models::Record;
use serde_json::{Number, Value};
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::MySqlRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// Column names of a row, in order.
pub fn column_names(row: &MySqlRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Converts one row into a record keyed by column name.
pub fn row_to_record(row: &MySqlRow) -> Record {
    row.columns()
        .iter()
        .map(|column| {
            let value = cell_value(row, column.ordinal(), column.type_info().name());
            (column.name().to_string(), value)
        })
        .collect()
}

pub fn rows_to_records(rows: &[MySqlRow]) -> Vec<Record> {
    rows.iter().map(row_to_record).collect()
}

/// Text form of a scalar cell, used for catalog columns such as table names.
pub fn text_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn cell_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match row.try_get_raw(index) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    let decoded = match type_name {
        "BOOLEAN" => row.try_get::<bool, _>(index).ok().map(Value::Bool),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            row.try_get::<i64, _>(index).ok().map(Value::from)
        }
        t if t.ends_with("UNSIGNED") => row.try_get::<u64, _>(index).ok().map(Value::from),
        "YEAR" => row.try_get_unchecked::<u16, _>(index).ok().map(Value::from),
        "FLOAT" => row
            .try_get::<f32, _>(index)
            .ok()
            .and_then(|v| v.to_string().parse::<f64>().ok())
            .map(float_value),
        "DOUBLE" => row.try_get::<f64, _>(index).ok().map(float_value),
        // Kept as text so no precision is lost.
        "DECIMAL" => row
            .try_get_unchecked::<String, _>(index)
            .ok()
            .map(Value::String),
        "DATE" => Some(temporal(
            index,
            type_name,
            row.try_get::<NaiveDate, _>(index)
                .map(|d| d.format("%Y-%m-%d").to_string()),
        )),
        "DATETIME" => Some(temporal(
            index,
            type_name,
            row.try_get::<NaiveDateTime, _>(index).map(|d| d.to_string()),
        )),
        "TIMESTAMP" => Some(temporal(
            index,
            type_name,
            row.try_get::<DateTime<Utc>, _>(index).map(|d| d.to_rfc3339()),
        )),
        // TIME spans -838:59:59 to 838:59:59, wider than a time of day.
        "TIME" => Some(temporal(
            index,
            type_name,
            row.try_get::<MySqlTime, _>(index)
                .map(|t| t.to_string())
                .or_else(|_| row.try_get::<NaiveTime, _>(index).map(|t| t.to_string())),
        )),
        "JSON" => row.try_get::<Value, _>(index).ok(),
        _ => None,
    };

    decoded.unwrap_or_else(|| text_fallback(row, index))
}

/// Temporal cells never fall back to raw bytes: on the binary protocol those
/// are packed fields, not text. Zero dates land here too.
fn temporal(index: usize, type_name: &str, decoded: Result<String, sqlx::Error>) -> Value {
    match decoded {
        Ok(text) => Value::String(text),
        Err(e) => {
            tracing::debug!(column = index, type_name, error = %e, "Undecodable temporal cell returned as null");
            Value::Null
        }
    }
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

fn text_fallback(row: &MySqlRow, index: usize) -> Value {
    if let Ok(text) = row.try_get::<String, _>(index) {
        return Value::String(text);
    }
    match row.try_get_unchecked::<Vec<u8>, _>(index) {
        Ok(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            tracing::debug!(column = index, error = %e, "Undecodable cell returned as null");
            Value::Null
        }
    }
}
