//! Statement builder
//!
//! Copy-on-write assembly of a full SELECT statement over one table. Every
//! mutator borrows the receiver and returns a new builder.

use crate::errors::QueryError;
use crate::query_builder::aggregation::{AggregationNode, SelectField};
use crate::query_builder::condition::ConditionNode;
use crate::query_builder::grouping::GroupBy;
use crate::query_builder::lookup::Lookup;
use crate::query_builder::operator::Operator;
use crate::query_builder::ordering::{SortOrder, SortSpec};
use crate::query_builder::pagination::Pagination;
use crate::query_builder::q::FilterInput;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::query_builder::value::SubQuery;
use crate::traits::{DataSource, RowStream, TableMetadata};
use config::QueryConfig;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// Query builder for one table
pub struct QueryBuilder<T: TableMetadata> {
    pub(crate) conditions: Vec<ConditionNode>,
    pub(crate) projection: Vec<SelectField>,
    pub(crate) order_by: Vec<(String, SortOrder)>,
    pub(crate) pagination: Pagination,
    pub(crate) is_final: bool,
    pub(crate) group_by: Option<GroupBy>,
    pub(crate) config: QueryConfig,
    pub(crate) source: Option<Arc<dyn DataSource>>,
    pub(crate) cursor: Option<RowStream>,
    _table: PhantomData<fn() -> T>,
}

impl<T: TableMetadata> QueryBuilder<T> {
    pub fn new() -> Self {
        Self {
            conditions: Vec::new(),
            projection: Vec::new(),
            order_by: Vec::new(),
            pagination: Pagination::new(),
            is_final: false,
            group_by: None,
            config: QueryConfig::default(),
            source: None,
            cursor: None,
            _table: PhantomData,
        }
    }

    /// Bind a data source used by the execution methods
    pub fn using(&self, source: Arc<dyn DataSource>) -> Self {
        let mut next = self.clone();
        next.source = Some(source);
        next
    }

    pub fn with_config(&self, config: QueryConfig) -> Self {
        let mut next = self.clone();
        next.config = config;
        next
    }

    /// Add one condition group. Lookup keys resolve their own operators;
    /// several elements are AND-ed inside the group.
    pub fn filter(&self, input: impl Into<FilterInput>) -> Self {
        let mut nodes = input.into().into_nodes();
        let mut next = self.clone();
        match nodes.len() {
            0 => {}
            1 => next.conditions.extend(nodes.pop()),
            _ => next.conditions.push(ConditionNode::all(nodes)),
        }
        next
    }

    /// Add one condition group where every key compares with `!=`
    ///
    /// The `!=` replaces any operator suffix, membership included:
    /// `status__in: ["a", "b"]` renders `status != ('a', 'b')`, a tuple
    /// comparison and not `NOT IN`. Use `Q::not` to negate a membership test.
    pub fn exclude(&self, lookup: impl Into<Lookup>) -> Self {
        let mut next = self.clone();
        next.conditions
            .extend(lookup.into().to_node_with(Operator::Ne));
        next
    }

    /// Replace the projection with plain columns
    pub fn project<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = self.clone();
        next.projection = fields.into_iter().map(SelectField::field).collect();
        next
    }

    /// Replace the projection with aliased aggregate expressions. The key is
    /// the alias unless the node carries its own.
    pub fn aggregate<I, K>(&self, aggregations: I) -> Self
    where
        I: IntoIterator<Item = (K, AggregationNode)>,
        K: Into<String>,
    {
        let mut next = self.clone();
        next.projection = aggregations
            .into_iter()
            .map(|(alias, node)| SelectField::aggregate(alias, node))
            .collect();
        next
    }

    /// Replace the ordering with a flattened sort specification
    pub fn sort(&self, spec: SortSpec) -> Self {
        let mut next = self.clone();
        next.order_by = spec.flatten();
        next
    }

    pub fn limit(&self, limit: u64) -> Self {
        let mut next = self.clone();
        next.pagination = self.pagination.clone().with_limit(limit);
        next
    }

    pub fn offset(&self, offset: u64) -> Self {
        let mut next = self.clone();
        next.pagination = self.pagination.clone().with_offset(offset);
        next
    }

    /// Read merged rows with `FINAL`. Only replacing-engine tables accept it.
    pub fn with_final(&self) -> Result<Self, QueryError> {
        let engine = T::engine();
        if !engine.is_replacing() {
            return Err(QueryError::FinalNotSupported {
                table: T::table_name().to_string(),
                engine: engine.to_string(),
            });
        }

        let mut next = self.clone();
        next.is_final = true;
        Ok(next)
    }

    /// Replace the GROUP BY columns, keeping any HAVING conditions
    pub fn group_by<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let having = self
            .group_by
            .as_ref()
            .map(|group| group.having.clone())
            .unwrap_or_default();

        let mut next = self.clone();
        next.group_by = Some(GroupBy {
            having,
            ..GroupBy::new(fields)
        });
        next
    }

    /// Add a HAVING condition group over aggregate aliases
    pub fn having(&self, lookup: impl Into<Lookup>) -> Self {
        let group = self.group_by.clone().unwrap_or_default();
        let mut next = self.clone();
        next.group_by = Some(group.having_lookup(&lookup.into()));
        next
    }

    pub fn table_name(&self) -> &'static str {
        T::table_name()
    }

    pub fn conditions(&self) -> &[ConditionNode] {
        &self.conditions
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// `WHERE ...`, or an empty string without conditions
    pub fn where_clause(&self) -> String {
        SqlGenerator::build_where_clause(&self.conditions, &self.config)
    }

    /// Compile the full statement
    pub fn to_sql(&self) -> String {
        let mut parts = vec![format!(
            "SELECT {} FROM {}",
            SqlGenerator::build_select_clause(&self.projection),
            T::table_name()
        )];

        if self.is_final {
            parts.push("FINAL".to_string());
        }

        let clauses = [
            self.where_clause(),
            SqlGenerator::build_group_by_clause(self.group_by.as_ref()),
            SqlGenerator::build_having_clause(self.group_by.as_ref(), &self.config),
            SqlGenerator::build_order_clause(&self.order_by),
            SqlGenerator::build_limit_clause(&self.pagination),
        ];
        parts.extend(clauses.into_iter().filter(|clause| !clause.is_empty()));

        parts.join(" ")
    }

    /// Compile into an operand usable with `__in` or `__has_any`
    pub fn as_subquery(&self) -> SubQuery {
        SubQuery::new(self.to_sql())
    }
}

impl<T: TableMetadata> Default for QueryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TableMetadata> Clone for QueryBuilder<T> {
    /// The open row stream is never shared; a clone starts unexecuted.
    fn clone(&self) -> Self {
        Self {
            conditions: self.conditions.clone(),
            projection: self.projection.clone(),
            order_by: self.order_by.clone(),
            pagination: self.pagination.clone(),
            is_final: self.is_final,
            group_by: self.group_by.clone(),
            config: self.config.clone(),
            source: self.source.clone(),
            cursor: None,
            _table: PhantomData,
        }
    }
}

impl<T: TableMetadata> fmt::Debug for QueryBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("table", &T::table_name())
            .field("conditions", &self.conditions)
            .field("projection", &self.projection)
            .field("order_by", &self.order_by)
            .field("pagination", &self.pagination)
            .field("is_final", &self.is_final)
            .field("group_by", &self.group_by)
            .field("bound", &self.source.is_some())
            .field("iterating", &self.cursor.is_some())
            .finish()
    }
}

impl<T: TableMetadata> From<QueryBuilder<T>> for SubQuery {
    fn from(builder: QueryBuilder<T>) -> Self {
        builder.as_subquery()
    }
}

impl<T: TableMetadata> From<&QueryBuilder<T>> for SubQuery {
    fn from(builder: &QueryBuilder<T>) -> Self {
        builder.as_subquery()
    }
}
