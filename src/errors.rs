//! Error types for the ClickHaus crate
//!
//! This module contains all error types that can be returned by ClickHaus operations.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClickHausError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Query error: {0}")]
    Query(#[from] query_object::QueryError),

    #[error("Health check failed: {0}")]
    HealthCheck(String),
}
