//! Convenience re-exports for common query-object usage

// Table descriptors and the data-source seam
pub use crate::traits::{DataSource, MemoryDataSource, Row, RowStream, TableEngine, TableMetadata};

// Error types
pub use crate::errors::QueryError;

// Query building
pub use crate::query_builder::{
    AggregationNode, ConditionNode, FilterInput, FilterValue, GroupBy, Lookup, Operator,
    QueryBuilder, SortOrder, SortSpec, SubQuery, Q,
};

// Common external dependencies that are frequently used
pub use async_trait::async_trait;
pub use serde::{Deserialize, Serialize};
pub use uuid::Uuid;
