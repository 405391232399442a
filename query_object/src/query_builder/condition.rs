//! Condition tree
//!
//! Immutable tree of leaves and groups shared by the [`Q`](super::q::Q)
//! combinator and the statement builder.

use super::operator::{Joiner, Operator};
use super::value::FilterValue;

/// One `field operator value` comparison
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionLeaf {
    pub path: String,
    pub operator: Operator,
    pub value: FilterValue,
}

impl ConditionLeaf {
    /// Create a leaf, pre-processing the value for its operator
    pub fn new(path: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        let value = value.into();
        let value = match operator {
            Operator::Like => value.into_like_pattern(),
            op if op.is_membership() => value.into_list(),
            _ => value,
        };

        Self {
            path: path.into(),
            operator,
            value,
        }
    }
}

/// Members joined by one logical joiner, optionally negated
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionGroup {
    pub joiner: Joiner,
    pub negated: bool,
    pub members: Vec<ConditionNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionNode {
    Leaf(ConditionLeaf),
    Group(ConditionGroup),
}

impl ConditionNode {
    pub fn leaf(path: impl Into<String>, operator: Operator, value: impl Into<FilterValue>) -> Self {
        Self::Leaf(ConditionLeaf::new(path, operator, value))
    }

    /// AND group
    pub fn all(members: Vec<ConditionNode>) -> Self {
        Self::group(Joiner::And, members)
    }

    /// OR group
    pub fn any(members: Vec<ConditionNode>) -> Self {
        Self::group(Joiner::Or, members)
    }

    /// Negated AND group
    pub fn negate(members: Vec<ConditionNode>) -> Self {
        Self::Group(ConditionGroup {
            joiner: Joiner::And,
            negated: true,
            members,
        })
    }

    pub fn group(joiner: Joiner, members: Vec<ConditionNode>) -> Self {
        // A NOT joiner is expressed through the negated flag
        let (joiner, negated) = match joiner {
            Joiner::Not => (Joiner::And, true),
            other => (other, false),
        };

        Self::Group(ConditionGroup {
            joiner,
            negated,
            members,
        })
    }

    pub fn is_group(&self) -> bool {
        matches!(self, ConditionNode::Group(_))
    }
}

impl From<ConditionLeaf> for ConditionNode {
    fn from(leaf: ConditionLeaf) -> Self {
        ConditionNode::Leaf(leaf)
    }
}
