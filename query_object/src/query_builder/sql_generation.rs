//! SQL emitter
//!
//! Renders condition trees, projections, ordering and pagination into SQL
//! fragments. Values are inlined as literals.

use crate::query_builder::aggregation::SelectField;
use crate::query_builder::condition::{ConditionGroup, ConditionLeaf, ConditionNode};
use crate::query_builder::grouping::GroupBy;
use crate::query_builder::operator::{Joiner, Operator};
use crate::query_builder::ordering::SortOrder;
use crate::query_builder::pagination::Pagination;
use crate::query_builder::value::FilterValue;
use config::QueryConfig;

/// Literal used for `IN` with an empty list; `x IN (NULL)` never matches
pub const EMPTY_IN_SENTINEL: &str = "(NULL)";

pub struct SqlGenerator;

impl SqlGenerator {
    /// Build WHERE clause from statement-level conditions
    pub fn build_where_clause(conditions: &[ConditionNode], config: &QueryConfig) -> String {
        match Self::build_conjunction(conditions, config) {
            Some(body) => format!("WHERE {}", body),
            None => "".to_string(),
        }
    }

    /// AND-join statement-level conditions. A single condition is rendered
    /// on its own, several are parenthesized together.
    pub fn build_conjunction(conditions: &[ConditionNode], config: &QueryConfig) -> Option<String> {
        match conditions {
            [] => None,
            [single] => Some(Self::build_statement_condition(single, config)),
            many => {
                let parts = many
                    .iter()
                    .map(|condition| Self::build_statement_condition(condition, config))
                    .collect::<Vec<_>>()
                    .join(" AND ");
                Some(format!("({})", parts))
            }
        }
    }

    /// Every statement-level condition renders parenthesized, bare leaves included
    fn build_statement_condition(node: &ConditionNode, config: &QueryConfig) -> String {
        match node {
            ConditionNode::Leaf(leaf) => format!("({})", Self::build_leaf_sql(leaf, config)),
            group => Self::build_condition_sql(group, config),
        }
    }

    pub fn build_condition_sql(node: &ConditionNode, config: &QueryConfig) -> String {
        match node {
            ConditionNode::Leaf(leaf) => Self::build_leaf_sql(leaf, config),
            ConditionNode::Group(group) if group.negated => {
                format!("(NOT {})", Self::build_group_body(group, config))
            }
            ConditionNode::Group(group) => Self::build_group_body(group, config),
        }
    }

    fn build_group_body(group: &ConditionGroup, config: &QueryConfig) -> String {
        match group.members.as_slice() {
            [] => match group.joiner {
                Joiner::Or => "1 = 0".to_string(),
                _ => "1 = 1".to_string(),
            },
            [only] if only.is_group() => Self::build_condition_sql(only, config),
            members => {
                let separator = format!(" {} ", group.joiner.to_sql());
                let parts = members
                    .iter()
                    .map(|member| Self::build_condition_sql(member, config))
                    .collect::<Vec<_>>()
                    .join(&separator);
                format!("({})", parts)
            }
        }
    }

    pub fn build_leaf_sql(leaf: &ConditionLeaf, config: &QueryConfig) -> String {
        let path = &leaf.path;
        let escape = config.escape_strings;

        if leaf.value.is_null() {
            return format!("{} IS NULL", path);
        }

        match (&leaf.operator, &leaf.value) {
            (Operator::In, FilterValue::SubQuery(sub)) => format!("{} IN ({})", path, sub.sql()),
            (Operator::In, FilterValue::Array(items)) if items.is_empty() => {
                format!("{} IN {}", path, EMPTY_IN_SENTINEL)
            }
            (Operator::In, FilterValue::Array(items)) => {
                format!("{} IN ({})", path, FilterValue::join_elements(items, escape))
            }
            (Operator::In, scalar) => {
                format!("{} IN ({})", path, FilterValue::join_elements(std::slice::from_ref(scalar), escape))
            }
            (Operator::HasAny, FilterValue::SubQuery(sub)) => {
                format!("hasAny({}, ({}))", path, sub.sql())
            }
            (Operator::HasAny, value) => {
                format!("hasAny({}, {})", path, value.to_array_literal(escape))
            }
            (operator, value) => {
                format!("{} {} {}", path, operator.to_sql(), value.to_sql_literal(escape))
            }
        }
    }

    /// Build ORDER BY clause
    pub fn build_order_clause(order_by: &[(String, SortOrder)]) -> String {
        if order_by.is_empty() {
            return "".to_string();
        }

        let order_items: Vec<String> = order_by
            .iter()
            .map(|(field, order)| format!("{} {}", field, order.to_sql()))
            .collect();

        format!("ORDER BY {}", order_items.join(", "))
    }

    /// Build LIMIT/OFFSET clause
    pub fn build_limit_clause(pagination: &Pagination) -> String {
        pagination.to_sql()
    }

    /// Build SELECT projection from fields
    pub fn build_select_clause(fields: &[SelectField]) -> String {
        if fields.is_empty() {
            return "*".to_string();
        }

        fields
            .iter()
            .map(SelectField::to_sql)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Build GROUP BY clause
    pub fn build_group_by_clause(group_by: Option<&GroupBy>) -> String {
        match group_by {
            Some(group) if !group.fields.is_empty() => {
                format!("GROUP BY {}", group.fields.join(", "))
            }
            _ => "".to_string(),
        }
    }

    /// Build HAVING clause
    pub fn build_having_clause(group_by: Option<&GroupBy>, config: &QueryConfig) -> String {
        match group_by.filter(|group| group.has_having()) {
            Some(group) => Self::build_conjunction(&group.having, config)
                .map(|body| format!("HAVING {}", body))
                .unwrap_or_default(),
            None => "".to_string(),
        }
    }
}
