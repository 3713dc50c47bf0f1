//! Shared building blocks for the database console.
//!
//! Configuration, the error type, the API response envelope, request-id
//! middleware, request/response models and SQL text helpers.

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;
