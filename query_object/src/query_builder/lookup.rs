//! Plain filter objects and the nested-path flattener

use super::condition::{ConditionLeaf, ConditionNode};
use super::operator::{resolve_field, Operator};
use super::value::FilterValue;
use crate::errors::QueryError;
use serde_json::Value;

/// Value stored under a lookup key
#[derive(Debug, Clone, PartialEq)]
pub enum LookupValue {
    Value(FilterValue),
    Nested(Lookup),
}

/// Ordered plain filter object, an implicit AND of its keys.
///
/// ```
/// use query_object::query_builder::Lookup;
///
/// let lookup = Lookup::new()
///     .with("price__gt", 100)
///     .nested("customer", Lookup::new().with("country", "NL"));
/// assert_eq!(lookup.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lookup {
    entries: Vec<(String, LookupValue)>,
}

impl Lookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value condition; the key may carry an operator suffix
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.entries
            .push((key.into(), LookupValue::Value(value.into())));
        self
    }

    /// Add a nested object whose keys are prefixed with `key.`
    pub fn nested(mut self, key: impl Into<String>, lookup: Lookup) -> Self {
        self.entries.push((key.into(), LookupValue::Nested(lookup)));
        self
    }

    pub fn entries(&self) -> &[(String, LookupValue)] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flatten into leaves; see [`flatten_lookup`]
    pub fn to_leaves(&self) -> Vec<ConditionLeaf> {
        flatten_lookup(None, self, None)
    }

    /// Flatten into one AND group, or `None` when no leaves are produced
    pub fn to_node(&self) -> Option<ConditionNode> {
        Self::leaves_to_node(self.to_leaves())
    }

    /// Same as [`Lookup::to_node`] with every leaf forced to `operator`
    pub fn to_node_with(&self, operator: Operator) -> Option<ConditionNode> {
        Self::leaves_to_node(flatten_lookup(None, self, Some(operator)))
    }

    fn leaves_to_node(leaves: Vec<ConditionLeaf>) -> Option<ConditionNode> {
        if leaves.is_empty() {
            return None;
        }
        Some(ConditionNode::all(
            leaves.into_iter().map(ConditionNode::Leaf).collect(),
        ))
    }
}

impl<K, V> FromIterator<(K, V)> for Lookup
where
    K: Into<String>,
    V: Into<FilterValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Lookup::new(), |lookup, (key, value)| lookup.with(key, value))
    }
}

impl TryFrom<Value> for Lookup {
    type Error = QueryError;

    /// Convert a JSON object, descending into nested objects
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => {
                let mut lookup = Lookup::new();
                for (key, value) in map {
                    lookup = match value {
                        Value::Object(_) => lookup.nested(key, Lookup::try_from(value)?),
                        other => lookup.with(key, other),
                    };
                }
                Ok(lookup)
            }
            other => Err(QueryError::InvalidFilter(format!(
                "filter must be a JSON object, got {}",
                other
            ))),
        }
    }
}

/// Walk a lookup depth-first, producing one leaf per scalar key.
///
/// Nested lookups extend the prefix with their resolved base name; arrays and
/// sub-queries are always leaf values. `override_operator` replaces whatever
/// operator the key suffix selected.
pub fn flatten_lookup(
    prefix: Option<&str>,
    lookup: &Lookup,
    override_operator: Option<Operator>,
) -> Vec<ConditionLeaf> {
    let mut leaves = Vec::with_capacity(lookup.len());

    for (key, value) in lookup.entries() {
        let (base, operator) = resolve_field(key);
        let path = match prefix {
            Some(prefix) => format!("{}.{}", prefix, base),
            None => base,
        };

        match value {
            LookupValue::Nested(nested) => {
                leaves.extend(flatten_lookup(Some(&path), nested, override_operator));
            }
            LookupValue::Value(value) => {
                let operator = match override_operator {
                    Some(forced) => {
                        if forced != operator && operator != Operator::Eq {
                            tracing::warn!(
                                "Operator suffix on '{}' ignored, using {}",
                                key,
                                forced.to_sql()
                            );
                        }
                        forced
                    }
                    None => operator,
                };
                leaves.push(ConditionLeaf::new(path, operator, value.clone()));
            }
        }
    }

    leaves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::value::SubQuery;
    use serde_json::json;

    #[test]
    fn test_flatten_flat_lookup() {
        let leaves = Lookup::new()
            .with("price__gt", 100)
            .with("status", "active")
            .to_leaves();

        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].path, "price");
        assert_eq!(leaves[0].operator, Operator::Gt);
        assert_eq!(leaves[1].path, "status");
        assert_eq!(leaves[1].operator, Operator::Eq);
    }

    #[test]
    fn test_flatten_nested_lookup() {
        let lookup = Lookup::new().nested("a", Lookup::new().nested("b", Lookup::new().with("c", 1)));
        let leaves = lookup.to_leaves();

        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].path, "a.b.c");
        assert_eq!(leaves[0].value, FilterValue::Int(1));
    }

    #[test]
    fn test_nested_prefix_uses_resolved_base_name() {
        let lookup = Lookup::new().nested("meta__gt", Lookup::new().with("size__lte", 3));
        let leaves = lookup.to_leaves();

        assert_eq!(leaves[0].path, "meta.size");
        assert_eq!(leaves[0].operator, Operator::Lte);
    }

    #[test]
    fn test_flatten_preserves_order_across_depths() {
        let lookup = Lookup::try_from(json!({
            "z": 1,
            "m": {"y": 2, "b": {"x": 3}},
            "a": 4
        }))
        .unwrap();

        let paths: Vec<String> = lookup.to_leaves().into_iter().map(|l| l.path).collect();
        assert_eq!(paths, vec!["z", "m.y", "m.b.x", "a"]);
    }

    #[test]
    fn test_arrays_and_subqueries_are_not_descended() {
        let lookup = Lookup::new()
            .with("id__in", vec![1, 2, 3])
            .with("owner__in", SubQuery::new("SELECT id FROM users"));
        let leaves = lookup.to_leaves();

        assert_eq!(leaves.len(), 2);
        assert!(matches!(leaves[0].value, FilterValue::Array(_)));
        assert!(matches!(leaves[1].value, FilterValue::SubQuery(_)));
    }

    #[test]
    fn test_override_operator() {
        let leaves = flatten_lookup(
            None,
            &Lookup::new().with("status", "inactive").with("price__gt", 5),
            Some(Operator::Ne),
        );

        assert!(leaves.iter().all(|leaf| leaf.operator == Operator::Ne));
        assert_eq!(leaves[1].path, "price");
    }

    #[test]
    fn test_empty_lookup_has_no_node() {
        assert!(Lookup::new().to_node().is_none());
        assert!(Lookup::new().nested("a", Lookup::new()).to_node().is_none());
    }

    #[test]
    fn test_try_from_rejects_non_objects() {
        let err = Lookup::try_from(json!([1, 2])).unwrap_err();
        assert!(matches!(err, QueryError::InvalidFilter(_)));
    }

    #[test]
    fn test_from_iterator() {
        let lookup: Lookup = vec![("a", 1), ("b__ne", 2)].into_iter().collect();
        assert_eq!(lookup.len(), 2);
    }
}
