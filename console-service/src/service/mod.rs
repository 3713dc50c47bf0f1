//! Service layer: one service per console feature, all sharing the pool
//! manager.

pub mod connection;
pub mod crud;
pub mod query;
pub mod tables;

pub use connection::{ConnectionDiagnostics, ConnectionService, ConnectionServiceTrait};
pub use crud::{CrudPlan, CrudService};
pub use query::QueryService;
pub use tables::TableService;

use common::errors::AppError;

/// Maps a driver error raised while running SQL.
pub(crate) fn query_failed(e: sqlx::Error) -> AppError {
    AppError::DatabaseQuery(e.to_string())
}
