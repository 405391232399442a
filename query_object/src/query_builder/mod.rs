//! Filter and expression compiler
//!
//! Condition trees, sort specifications and aggregate expressions compiled
//! into ClickHouse SQL, plus the statement builder that assembles them.

pub mod aggregation;
pub mod builder;
pub mod condition;
pub mod execution;
pub mod grouping;
pub mod lookup;
pub mod operator;
pub mod ordering;
pub mod pagination;
pub mod q;
pub mod sql_generation;
pub mod value;


#[cfg(test)]
mod integration_tests;

pub use aggregation::{AggregationArg, AggregationNode, ArithmeticOp, SelectField};
pub use builder::QueryBuilder;
pub use condition::{ConditionGroup, ConditionLeaf, ConditionNode};
pub use grouping::GroupBy;
pub use lookup::{flatten_lookup, Lookup, LookupValue};
pub use operator::{resolve_field, Joiner, Operator, OPERATORS, SUFFIX_DELIMITER};
pub use ordering::{SortEntry, SortOrder, SortSpec};
pub use pagination::Pagination;
pub use q::{FilterInput, Q};
pub use sql_generation::SqlGenerator;
pub use value::{FilterValue, SubQuery};
