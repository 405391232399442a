//! Table descriptors
//!
//! The schema layer is external; the compiler only needs a table name and the
//! storage engine kind, which gates `FINAL`.

use crate::query_builder::QueryBuilder;
use std::fmt;

/// ClickHouse table engine kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TableEngine {
    MergeTree,
    ReplacingMergeTree,
    SummingMergeTree,
    AggregatingMergeTree,
    CollapsingMergeTree,
    VersionedCollapsingMergeTree,
    Log,
    Memory,
    Other(String),
}

impl TableEngine {
    /// Parse an engine name. `Replicated*` variants map onto their base
    /// engine; arguments such as `ReplacingMergeTree(version)` are ignored.
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        let base = trimmed.split('(').next().unwrap_or(trimmed).trim();
        let base = base.strip_prefix("Replicated").unwrap_or(base);

        match base {
            "MergeTree" => TableEngine::MergeTree,
            "ReplacingMergeTree" => TableEngine::ReplacingMergeTree,
            "SummingMergeTree" => TableEngine::SummingMergeTree,
            "AggregatingMergeTree" => TableEngine::AggregatingMergeTree,
            "CollapsingMergeTree" => TableEngine::CollapsingMergeTree,
            "VersionedCollapsingMergeTree" => TableEngine::VersionedCollapsingMergeTree,
            "Log" => TableEngine::Log,
            "Memory" => TableEngine::Memory,
            _ => TableEngine::Other(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            TableEngine::MergeTree => "MergeTree",
            TableEngine::ReplacingMergeTree => "ReplacingMergeTree",
            TableEngine::SummingMergeTree => "SummingMergeTree",
            TableEngine::AggregatingMergeTree => "AggregatingMergeTree",
            TableEngine::CollapsingMergeTree => "CollapsingMergeTree",
            TableEngine::VersionedCollapsingMergeTree => "VersionedCollapsingMergeTree",
            TableEngine::Log => "Log",
            TableEngine::Memory => "Memory",
            TableEngine::Other(name) => name,
        }
    }

    /// Only the replacing variant may be read with `FINAL`
    pub fn is_replacing(&self) -> bool {
        matches!(self, TableEngine::ReplacingMergeTree)
    }
}

impl fmt::Display for TableEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about a ClickHouse table.
///
/// Usually derived:
/// ```ignore
/// use clickhaus::prelude::*;
///
/// #[derive(Debug, Clone, Deserialize, TableMetadata)]
/// #[table(name = "sales", engine = "ReplacingMergeTree")]
/// pub struct Sale {
///     pub id: u64,
///     pub price: f64,
/// }
/// ```
pub trait TableMetadata: Send + Sync + 'static {
    /// The table name in the database
    fn table_name() -> &'static str;

    /// Storage engine of the table
    fn engine() -> TableEngine {
        TableEngine::MergeTree
    }

    /// Unbound statement builder over this table
    fn objects() -> QueryBuilder<Self>
    where
        Self: Sized,
    {
        QueryBuilder::new()
    }
}
