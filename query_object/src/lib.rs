//! Query Object - filter and expression compiler for ClickHaus
//!
//! This crate turns fluently built condition trees, sort specifications and
//! aggregate expressions into ClickHouse SQL, and drives execution through a
//! pluggable data source.

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
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

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod errors;
pub mod prelude;
pub mod query_builder;
pub mod traits;

pub use errors::QueryError;
pub use query_builder::{
    AggregationNode, ConditionNode, FilterInput, FilterValue, Lookup, Operator, QueryBuilder,
    SortOrder, SortSpec, SubQuery, Q,
};
pub use traits::*;
