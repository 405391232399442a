//! Filter values and their SQL literal rendering

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};
use serde_json::Value;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A compiled statement used as the operand of `IN`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubQuery {
    sql: String,
}

impl SubQuery {
    pub fn new(sql: impl Into<String>) -> Self {
        Self { sql: sql.into() }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Right-hand side of a condition
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Uuid(Uuid),
    Array(Vec<FilterValue>),
    SubQuery(SubQuery),
}

impl FilterValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Wrap the value in `%` wildcards for a LIKE comparison
    pub fn into_like_pattern(self) -> Self {
        match self {
            FilterValue::Null => FilterValue::Null,
            FilterValue::String(s) => FilterValue::String(format!("%{}%", s)),
            other => FilterValue::String(format!("%{}%", other.raw_text())),
        }
    }

    /// Normalize the value into a list operand. Arrays, sub-queries and null
    /// pass through, any scalar becomes a one-element array.
    pub fn into_list(self) -> Self {
        match self {
            FilterValue::Array(_) | FilterValue::SubQuery(_) | FilterValue::Null => self,
            scalar => FilterValue::Array(vec![scalar]),
        }
    }

    /// Unquoted textual form, used when building LIKE patterns
    fn raw_text(&self) -> String {
        match self {
            FilterValue::Null => "NULL".to_string(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Int(i) => i.to_string(),
            FilterValue::UInt(u) => u.to_string(),
            FilterValue::Float(f) => format_float(*f),
            FilterValue::String(s) => s.clone(),
            FilterValue::Date(d) => d.format(DATE_FORMAT).to_string(),
            FilterValue::DateTime(dt) => dt.format(DATETIME_FORMAT).to_string(),
            FilterValue::Uuid(u) => u.to_string(),
            FilterValue::Array(items) => items
                .iter()
                .map(FilterValue::raw_text)
                .collect::<Vec<_>>()
                .join(","),
            FilterValue::SubQuery(sub) => sub.sql().to_string(),
        }
    }

    /// Render as a SQL literal. Arrays render as a parenthesized list.
    pub fn to_sql_literal(&self, escape: bool) -> String {
        match self {
            FilterValue::Array(items) => format!("({})", Self::join_elements(items, escape)),
            FilterValue::SubQuery(sub) => format!("({})", sub.sql()),
            scalar => scalar.to_element_literal(escape),
        }
    }

    /// Render as a ClickHouse array literal, `[a, b]`
    pub fn to_array_literal(&self, escape: bool) -> String {
        match self {
            FilterValue::Array(items) => format!("[{}]", Self::join_elements(items, escape)),
            scalar => format!("[{}]", scalar.to_element_literal(escape)),
        }
    }

    /// Comma-joined element literals, without brackets
    pub(crate) fn join_elements(items: &[FilterValue], escape: bool) -> String {
        items
            .iter()
            .map(|item| item.to_element_literal(escape))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Literal of a value nested inside a list
    fn to_element_literal(&self, escape: bool) -> String {
        match self {
            FilterValue::Null => "NULL".to_string(),
            FilterValue::Bool(b) => b.to_string(),
            FilterValue::Int(i) => i.to_string(),
            FilterValue::UInt(u) => u.to_string(),
            FilterValue::Float(f) => format_float(*f),
            FilterValue::String(s) => quote(s, escape),
            FilterValue::Date(d) => quote(&d.format(DATE_FORMAT).to_string(), false),
            FilterValue::DateTime(dt) => quote(&dt.format(DATETIME_FORMAT).to_string(), false),
            FilterValue::Uuid(u) => quote(&u.to_string(), false),
            FilterValue::Array(_) => self.to_array_literal(escape),
            FilterValue::SubQuery(sub) => format!("({})", sub.sql()),
        }
    }
}

/// Single-quote a string, optionally escaping backslashes and quotes
pub fn quote(value: &str, escape: bool) -> String {
    if escape {
        format!("'{}'", escape_string(value))
    } else {
        format!("'{}'", value)
    }
}

/// Escape a string body for a single-quoted ClickHouse literal
pub fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn format_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value.is_sign_negative() {
            "-inf".to_string()
        } else {
            "inf".to_string()
        }
    } else {
        value.to_string()
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for FilterValue {
            fn from(value: $t) -> Self {
                FilterValue::Int(value as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for FilterValue {
            fn from(value: $t) -> Self {
                FilterValue::UInt(value as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64);
impl_from_unsigned!(u8, u16, u32, u64);

impl From<f32> for FilterValue {
    fn from(value: f32) -> Self {
        FilterValue::Float(value as f64)
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        FilterValue::Float(value)
    }
}

impl From<bool> for FilterValue {
    fn from(value: bool) -> Self {
        FilterValue::Bool(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::String(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::String(value)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(value: NaiveDate) -> Self {
        FilterValue::Date(value)
    }
}

impl From<NaiveDateTime> for FilterValue {
    fn from(value: NaiveDateTime) -> Self {
        FilterValue::DateTime(value)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for FilterValue {
    fn from(value: DateTime<Tz>) -> Self {
        FilterValue::DateTime(value.naive_utc())
    }
}

impl From<Uuid> for FilterValue {
    fn from(value: Uuid) -> Self {
        FilterValue::Uuid(value)
    }
}

impl From<SubQuery> for FilterValue {
    fn from(value: SubQuery) -> Self {
        FilterValue::SubQuery(value)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(values: Vec<T>) -> Self {
        FilterValue::Array(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FilterValue::Null,
            Value::Bool(b) => FilterValue::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    FilterValue::Int(i)
                } else if let Some(u) = n.as_u64() {
                    FilterValue::UInt(u)
                } else {
                    FilterValue::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => FilterValue::String(s),
            Value::Array(items) => {
                FilterValue::Array(items.into_iter().map(FilterValue::from).collect())
            }
            // Objects only reach here as array elements; keep them as JSON text
            Value::Object(map) => FilterValue::String(Value::Object(map).to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_literals() {
        assert_eq!(FilterValue::from(100).to_sql_literal(true), "100");
        assert_eq!(FilterValue::from(2.5).to_sql_literal(true), "2.5");
        assert_eq!(FilterValue::from(true).to_sql_literal(true), "true");
        assert_eq!(FilterValue::from("inactive").to_sql_literal(true), "'inactive'");
        assert_eq!(FilterValue::Null.to_sql_literal(true), "NULL");
    }

    #[test]
    fn test_whole_float_renders_without_fraction() {
        assert_eq!(FilterValue::from(100.0).to_sql_literal(true), "100");
    }

    #[test]
    fn test_non_finite_floats() {
        assert_eq!(FilterValue::from(f64::NAN).to_sql_literal(true), "nan");
        assert_eq!(FilterValue::from(f64::INFINITY).to_sql_literal(true), "inf");
        assert_eq!(FilterValue::from(f64::NEG_INFINITY).to_sql_literal(true), "-inf");
    }

    #[test]
    fn test_temporal_and_uuid_literals() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        assert_eq!(FilterValue::from(date).to_sql_literal(true), "'2024-01-31'");

        let datetime = date.and_hms_opt(8, 30, 0).unwrap();
        assert_eq!(
            FilterValue::from(datetime).to_sql_literal(true),
            "'2024-01-31 08:30:00'"
        );

        let id = Uuid::nil();
        assert_eq!(
            FilterValue::from(id).to_sql_literal(true),
            "'00000000-0000-0000-0000-000000000000'"
        );
    }

    #[test]
    fn test_array_literals() {
        let mixed = FilterValue::from(vec![json!("a"), json!(2)]);
        assert_eq!(mixed.to_sql_literal(true), "('a', 2)");
        assert_eq!(mixed.to_array_literal(true), "['a', 2]");

        let nested = FilterValue::Array(vec![FilterValue::from(vec![1, 2])]);
        assert_eq!(nested.to_sql_literal(true), "([1, 2])");
    }

    #[test]
    fn test_escaping_quotes_and_backslashes() {
        let value = FilterValue::from("O'Brien \\ co");
        assert_eq!(value.to_sql_literal(true), "'O\\'Brien \\\\ co'");
        assert_eq!(value.to_sql_literal(false), "'O'Brien \\ co'");
    }

    #[test]
    fn test_escaping_preserves_plain_strings() {
        let value = FilterValue::from("plain text 测试");
        assert_eq!(value.to_sql_literal(true), value.to_sql_literal(false));
    }

    #[test]
    fn test_like_pattern() {
        assert_eq!(
            FilterValue::from("shoe").into_like_pattern(),
            FilterValue::String("%shoe%".to_string())
        );
        assert_eq!(
            FilterValue::from(42).into_like_pattern(),
            FilterValue::String("%42%".to_string())
        );
        assert_eq!(FilterValue::Null.into_like_pattern(), FilterValue::Null);
    }

    #[test]
    fn test_into_list() {
        assert_eq!(
            FilterValue::from("a").into_list(),
            FilterValue::Array(vec![FilterValue::from("a")])
        );
        let array = FilterValue::from(vec![1, 2]);
        assert_eq!(array.clone().into_list(), array);
        let sub = FilterValue::from(SubQuery::new("SELECT id FROM users"));
        assert_eq!(sub.clone().into_list(), sub);
    }

    #[test]
    fn test_from_json() {
        assert_eq!(FilterValue::from(json!(null)), FilterValue::Null);
        assert_eq!(FilterValue::from(json!(-3)), FilterValue::Int(-3));
        assert_eq!(FilterValue::from(json!(u64::MAX)), FilterValue::UInt(u64::MAX));
        assert_eq!(FilterValue::from(json!(1.5)), FilterValue::Float(1.5));
        assert_eq!(
            FilterValue::from(json!(["x"])),
            FilterValue::Array(vec![FilterValue::String("x".to_string())])
        );
    }

    #[test]
    fn test_from_option() {
        assert_eq!(FilterValue::from(None::<i32>), FilterValue::Null);
        assert_eq!(FilterValue::from(Some(7)), FilterValue::Int(7));
    }
}
