//! Utility functions and helpers.

pub mod sql_text;

// Re-export commonly used types
pub use sql_text::SqlText;
