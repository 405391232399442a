//! Fluent AND / OR / NOT combinator

use super::condition::ConditionNode;
use super::lookup::Lookup;
use super::operator::Joiner;
use super::sql_generation::SqlGenerator;
use config::QueryConfig;

/// Anything a combinator call accepts
#[derive(Debug, Clone, PartialEq)]
pub enum FilterInput {
    Lookup(Lookup),
    Node(ConditionNode),
    Many(Vec<FilterInput>),
}

impl FilterInput {
    /// Convert every element into a node. Lookups become one AND group each,
    /// nested lists are spliced in place and empty elements are skipped.
    pub fn into_nodes(self) -> Vec<ConditionNode> {
        let mut nodes = Vec::new();
        self.collect_nodes(&mut nodes);
        nodes
    }

    fn collect_nodes(self, nodes: &mut Vec<ConditionNode>) {
        match self {
            FilterInput::Lookup(lookup) => nodes.extend(lookup.to_node()),
            FilterInput::Node(node) => nodes.push(node),
            FilterInput::Many(inputs) => {
                for input in inputs {
                    input.collect_nodes(nodes);
                }
            }
        }
    }
}

impl From<Lookup> for FilterInput {
    fn from(lookup: Lookup) -> Self {
        FilterInput::Lookup(lookup)
    }
}

impl From<ConditionNode> for FilterInput {
    fn from(node: ConditionNode) -> Self {
        FilterInput::Node(node)
    }
}

impl From<Q> for FilterInput {
    fn from(q: Q) -> Self {
        match q.root {
            Some(node) => FilterInput::Node(node),
            None => FilterInput::Many(Vec::new()),
        }
    }
}

impl From<&Q> for FilterInput {
    fn from(q: &Q) -> Self {
        FilterInput::from(q.clone())
    }
}

impl<T: Into<FilterInput>> From<Vec<T>> for FilterInput {
    fn from(inputs: Vec<T>) -> Self {
        FilterInput::Many(inputs.into_iter().map(Into::into).collect())
    }
}

/// Immutable condition tree builder.
///
/// Every call returns a new `Q`; the receiver is left untouched.
///
/// ```
/// use query_object::query_builder::{Lookup, Q};
///
/// let q = Q::new().or(vec![
///     Lookup::new().with("a", 1),
///     Lookup::new().with("b", 2),
/// ]);
/// assert_eq!(q.to_sql(), "((a = 1) OR (b = 2))");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Q {
    root: Option<ConditionNode>,
}

impl Q {
    pub fn new() -> Self {
        Self::default()
    }

    /// Conjunction of the given elements, AND-ed onto the current tree
    pub fn and(&self, input: impl Into<FilterInput>) -> Self {
        self.combine(Joiner::And, input.into())
    }

    /// Disjunction of the given elements, OR-ed onto the current tree
    pub fn or(&self, input: impl Into<FilterInput>) -> Self {
        self.combine(Joiner::Or, input.into())
    }

    /// Negated conjunction of the given elements, AND-ed onto the current tree
    pub fn not(&self, input: impl Into<FilterInput>) -> Self {
        self.combine(Joiner::Not, input.into())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn node(&self) -> Option<&ConditionNode> {
        self.root.as_ref()
    }

    pub fn into_node(self) -> Option<ConditionNode> {
        self.root
    }

    /// Compile with the default compiler settings
    pub fn to_sql(&self) -> String {
        self.to_sql_with(&QueryConfig::default())
    }

    /// Compile the tree; an empty `Q` compiles to an empty string
    pub fn to_sql_with(&self, config: &QueryConfig) -> String {
        self.root
            .as_ref()
            .map(|node| SqlGenerator::build_condition_sql(node, config))
            .unwrap_or_default()
    }

    fn combine(&self, joiner: Joiner, input: FilterInput) -> Self {
        let mut nodes = input.into_nodes();

        let call = match joiner {
            Joiner::Not if nodes.is_empty() => None,
            Joiner::Not => Some(ConditionNode::negate(nodes)),
            _ if nodes.len() > 1 => Some(ConditionNode::group(joiner, nodes)),
            _ => nodes.pop(),
        };

        let Some(call) = call else {
            crate::trace_log!("Q::{} called with no conditions", joiner.to_sql());
            return self.clone();
        };

        let chain = match joiner {
            Joiner::Or => Joiner::Or,
            _ => Joiner::And,
        };

        let root = match &self.root {
            Some(existing) => ConditionNode::group(chain, vec![existing.clone(), call]),
            None => call,
        };

        Self { root: Some(root) }
    }
}

impl From<ConditionNode> for Q {
    fn from(node: ConditionNode) -> Self {
        Self { root: Some(node) }
    }
}

impl From<Lookup> for Q {
    fn from(lookup: Lookup) -> Self {
        Self {
            root: lookup.to_node(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::value::SubQuery;

    fn a() -> Lookup {
        Lookup::new().with("a", 1)
    }

    fn b() -> Lookup {
        Lookup::new().with("b", 2)
    }

    #[test]
    fn test_or_of_two_lookups() {
        assert_eq!(Q::new().or(vec![a(), b()]).to_sql(), "((a = 1) OR (b = 2))");
    }

    #[test]
    fn test_and_of_two_lookups() {
        assert_eq!(Q::new().and(vec![a(), b()]).to_sql(), "((a = 1) AND (b = 2))");
    }

    #[test]
    fn test_single_lookup_is_its_own_group() {
        assert_eq!(Q::new().and(a()).to_sql(), "(a = 1)");
        assert_eq!(Q::new().or(a()).to_sql(), "(a = 1)");
    }

    #[test]
    fn test_multi_key_lookup_is_anded() {
        let q = Q::new().or(Lookup::new().with("a", 1).with("b__gt", 2));
        assert_eq!(q.to_sql(), "(a = 1 AND b > 2)");
    }

    #[test]
    fn test_not() {
        assert_eq!(Q::new().not(a()).to_sql(), "(NOT (a = 1))");
        assert_eq!(
            Q::new().not(vec![a(), b()]).to_sql(),
            "(NOT ((a = 1) AND (b = 2)))"
        );
    }

    #[test]
    fn test_double_negation_nests_literally() {
        let inner = Q::new().not(a());
        assert_eq!(Q::new().not(inner).to_sql(), "(NOT (NOT (a = 1)))");
    }

    #[test]
    fn test_subtree_elements_nest() {
        let inner = Q::new().and(vec![b(), Lookup::new().with("c", 3)]);
        let q = Q::new().or(vec![FilterInput::from(a()), FilterInput::from(inner)]);
        assert_eq!(q.to_sql(), "((a = 1) OR ((b = 2) AND (c = 3)))");
    }

    #[test]
    fn test_chaining_joins_with_call_joiner() {
        let q = Q::new().or(vec![a(), b()]).and(Lookup::new().with("c", 3));
        assert_eq!(q.to_sql(), "(((a = 1) OR (b = 2)) AND (c = 3))");

        let q = Q::new().and(a()).or(b());
        assert_eq!(q.to_sql(), "((a = 1) OR (b = 2))");

        let q = Q::new().and(a()).not(b());
        assert_eq!(q.to_sql(), "((a = 1) AND (NOT (b = 2)))");
    }

    #[test]
    fn test_receiver_is_untouched() {
        let base = Q::new().and(a());
        let extended = base.or(b());

        assert_eq!(base.to_sql(), "(a = 1)");
        assert_eq!(extended.to_sql(), "((a = 1) OR (b = 2))");
    }

    #[test]
    fn test_empty_inputs_are_ignored() {
        assert!(Q::new().and(Lookup::new()).is_empty());
        assert!(Q::new().not(Vec::<Lookup>::new()).is_empty());
        assert!(Q::new().or(Q::new()).is_empty());
        assert_eq!(Q::new().to_sql(), "");

        let q = Q::new().and(a()).or(Q::new());
        assert_eq!(q.to_sql(), "(a = 1)");
    }

    #[test]
    fn test_nested_lists_are_spliced() {
        let input = FilterInput::Many(vec![
            FilterInput::from(a()),
            FilterInput::from(vec![b()]),
        ]);
        assert_eq!(Q::new().or(input).to_sql(), "((a = 1) OR (b = 2))");
    }

    #[test]
    fn test_subquery_operand() {
        let q = Q::new().and(
            Lookup::new().with("user_id__in", SubQuery::new("SELECT id FROM users WHERE (vip = true)")),
        );
        assert_eq!(
            q.to_sql(),
            "(user_id IN (SELECT id FROM users WHERE (vip = true)))"
        );
    }

    #[test]
    fn test_compilation_is_deterministic() {
        let q = Q::new()
            .or(vec![a(), b()])
            .not(Lookup::new().nested("meta", Lookup::new().with("tag__in", vec!["x", "y"])));
        assert_eq!(q.to_sql(), q.to_sql());
        assert_eq!(q.clone().to_sql(), q.to_sql());
    }
}
