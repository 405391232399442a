//! Convenience re-exports for common ClickHaus usage
//!
//! This prelude module re-exports the most commonly used items from the ClickHaus ecosystem,
//! making it easier to import everything you need with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use clickhaus::prelude::*;
//!
//! let q = Q::new().not(Lookup::new().with("status", "void"));
//! assert_eq!(q.to_sql(), "(NOT (status = 'void'))");
//! ```

// Core ClickHaus components
pub use crate::core::ClickHaus;
pub use crate::errors::ClickHausError;

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, QueryConfig};

// Re-export commonly used query-object types for convenience
pub use query_object::prelude::*;

// Re-export query_object module for macro-generated code
pub use query_object;

// Re-export table derive for model creation
pub use table_derive::{TableMetadata, model};

// Common external dependencies
pub use anyhow;
pub use async_trait;
pub use tokio;
