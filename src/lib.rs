//! # ClickHaus
//!
//! An ORM layer for ClickHouse built around a composable filter compiler:
//! nested AND/OR/NOT condition trees, field-operator suffixes, dotted nested
//! paths, sort specifications and aggregate expressions compiled into SQL.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clickhaus::prelude::*;
//! use std::sync::Arc;
//!
//! #[model]
//! #[table(name = "sales", engine = "ReplacingMergeTree")]
//! pub struct Sale {
//!     pub id: u64,
//!     pub price: f64,
//!     pub status: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let source: Arc<dyn DataSource> = Arc::new(MemoryDataSource::new());
//!     let clickhaus = ClickHaus::new(source);
//!
//!     let sales = clickhaus
//!         .objects::<Sale>()
//!         .with_final()?
//!         .filter(Lookup::new().with("price__gt", 100))
//!         .exclude(Lookup::new().with("status", "inactive"))
//!         .sort(SortSpec::new().desc("price"))
//!         .limit(10);
//!
//!     println!("{}", sales.to_sql());
//!     for sale in sales.all().await? {
//!         println!("{} {}", sale.id, sale.price);
//!     }
//!
//!     Ok(())
//! }
//! ```

// Generated code refers to `::clickhaus::...`, also from inside this crate
extern crate self as clickhaus;

/// Conditional debug logging macro
/// This macro only compiles in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use crate::core::ClickHaus;
pub use crate::errors::ClickHausError;

// Member crates, addressed by macro-generated code
pub use config;
pub use query_object;
pub use table_derive;
