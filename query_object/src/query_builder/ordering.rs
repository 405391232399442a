//! Sort directions and nested sort specifications

use crate::errors::QueryError;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn to_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }

    /// `1` is ascending, `-1` descending
    pub fn from_direction(direction: i64) -> Result<Self, QueryError> {
        match direction {
            1 => Ok(SortOrder::Asc),
            -1 => Ok(SortOrder::Desc),
            other => Err(QueryError::InvalidSort(format!(
                "direction must be 1 or -1, got {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SortEntry {
    Direction(SortOrder),
    Nested(SortSpec),
}

/// Ordered, possibly nested mapping from field name to direction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortSpec {
    entries: Vec<(String, SortEntry)>,
}

impl SortSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn asc(self, field: impl Into<String>) -> Self {
        self.by(field, SortOrder::Asc)
    }

    pub fn desc(self, field: impl Into<String>) -> Self {
        self.by(field, SortOrder::Desc)
    }

    pub fn by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.entries
            .push((field.into(), SortEntry::Direction(order)));
        self
    }

    pub fn nested(mut self, field: impl Into<String>, spec: SortSpec) -> Self {
        self.entries.push((field.into(), SortEntry::Nested(spec)));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dotted `(path, order)` pairs in key order, depth first
    pub fn flatten(&self) -> Vec<(String, SortOrder)> {
        let mut pairs = Vec::new();
        self.flatten_into(None, &mut pairs);
        pairs
    }

    fn flatten_into(&self, prefix: Option<&str>, pairs: &mut Vec<(String, SortOrder)>) {
        for (field, entry) in &self.entries {
            let path = match prefix {
                Some(prefix) => format!("{}.{}", prefix, field),
                None => field.clone(),
            };
            match entry {
                SortEntry::Direction(order) => pairs.push((path, *order)),
                SortEntry::Nested(spec) => spec.flatten_into(Some(&path), pairs),
            }
        }
    }
}

impl TryFrom<Value> for SortSpec {
    type Error = QueryError;

    /// Accepts `1` / `-1`, `"asc"` / `"desc"` and nested objects
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(QueryError::InvalidSort(format!(
                "sort specification must be a JSON object, got {}",
                value
            )));
        };

        let mut spec = SortSpec::new();
        for (field, entry) in map {
            spec = match entry {
                Value::Object(_) => spec.nested(field, SortSpec::try_from(entry)?),
                Value::Number(n) => {
                    let direction = n.as_i64().ok_or_else(|| {
                        QueryError::InvalidSort(format!("direction for '{}' must be an integer", field))
                    })?;
                    spec.by(field, SortOrder::from_direction(direction)?)
                }
                Value::String(s) => match s.to_ascii_lowercase().as_str() {
                    "asc" => spec.asc(field),
                    "desc" => spec.desc(field),
                    _ => {
                        return Err(QueryError::InvalidSort(format!(
                            "unknown direction '{}' for '{}'",
                            s, field
                        )))
                    }
                },
                other => {
                    return Err(QueryError::InvalidSort(format!(
                        "unsupported direction {} for '{}'",
                        other, field
                    )))
                }
            };
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_order_sql_conversion() {
        assert_eq!(SortOrder::Asc.to_sql(), "ASC");
        assert_eq!(SortOrder::Desc.to_sql(), "DESC");
    }

    #[test]
    fn test_from_direction() {
        assert_eq!(SortOrder::from_direction(1).unwrap(), SortOrder::Asc);
        assert_eq!(SortOrder::from_direction(-1).unwrap(), SortOrder::Desc);
        assert!(matches!(
            SortOrder::from_direction(0),
            Err(QueryError::InvalidSort(_))
        ));
    }

    #[test]
    fn test_flatten_nested_spec() {
        let spec = SortSpec::new()
            .nested("a", SortSpec::new().desc("b"))
            .asc("c");

        assert_eq!(
            spec.flatten(),
            vec![
                ("a.b".to_string(), SortOrder::Desc),
                ("c".to_string(), SortOrder::Asc)
            ]
        );
    }

    #[test]
    fn test_flatten_keeps_key_order_from_json() {
        let spec = SortSpec::try_from(json!({"z": 1, "a": {"y": -1, "b": {"x": "asc"}}, "m": "DESC"})).unwrap();
        let paths: Vec<String> = spec.flatten().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec!["z", "a.y", "a.b.x", "m"]);
    }

    #[test]
    fn test_sort_keys_are_not_suffix_resolved() {
        let spec = SortSpec::new().asc("price__gt");
        assert_eq!(spec.flatten()[0].0, "price__gt");
    }

    #[test]
    fn test_invalid_json_specs() {
        assert!(SortSpec::try_from(json!([1])).is_err());
        assert!(SortSpec::try_from(json!({"a": 2})).is_err());
        assert!(SortSpec::try_from(json!({"a": "sideways"})).is_err());
        assert!(SortSpec::try_from(json!({"a": true})).is_err());
    }
}
