//! Shared data models for the console service.

pub mod connection;
pub mod crud;
pub mod query;
pub mod table;

// Re-export commonly used types
pub use connection::{ConnectRequest, ConnectionStatus};
pub use crud::{CrudOperation, CrudOutcome, CrudRequest, Record};
pub use query::{PredefinedQuery, QueryRequest, QueryResult, RunPredefinedRequest};
pub use table::TableSummary;
