//! Operator table
//!
//! Maps filter key suffixes (`price__gt`) onto SQL comparison tokens and
//! resolves suffixed keys into their base path and operator.

/// Delimiter between a field name and its operator suffix
pub const SUFFIX_DELIMITER: &str = "__";

/// Comparison and membership operators understood by the compiler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,      // =
    Ne,      // !=
    Gt,      // >
    Lt,      // <
    Gte,     // >=
    Lte,     // <=
    Like,    // LIKE, selected by `__icontains`
    In,      // IN
    HasAny,  // hasAny(field, [...])
}

/// Every operator, in suffix table order
pub const OPERATORS: [Operator; 9] = [
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Lt,
    Operator::Gte,
    Operator::Lte,
    Operator::Like,
    Operator::In,
    Operator::HasAny,
];

impl Operator {
    /// SQL token for this operator
    pub fn to_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Gte => ">=",
            Operator::Lte => "<=",
            Operator::Like => "LIKE",
            Operator::In => "IN",
            Operator::HasAny => "hasAny",
        }
    }

    /// Key suffix selecting this operator. Equality is the unsuffixed key.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Operator::Eq => None,
            Operator::Ne => Some("ne"),
            Operator::Gt => Some("gt"),
            Operator::Lt => Some("lt"),
            Operator::Gte => Some("gte"),
            Operator::Lte => Some("lte"),
            Operator::Like => Some("icontains"),
            Operator::In => Some("in"),
            Operator::HasAny => Some("has_any"),
        }
    }

    /// Reverse lookup of [`Operator::suffix`]
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        OPERATORS
            .iter()
            .copied()
            .find(|op| op.suffix() == Some(suffix))
    }

    /// Whether values for this operator are normalized to a list
    pub fn is_membership(&self) -> bool {
        matches!(self, Operator::In | Operator::HasAny)
    }
}

/// Logical joiners used between conditions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Joiner {
    And,
    Or,
    Not,
}

impl Joiner {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
            Joiner::Not => "NOT",
        }
    }
}

/// Split a filter key into its base path and operator.
///
/// The key is split on the first `__`. A missing suffix means equality, and an
/// unknown suffix also falls back to equality rather than failing.
pub fn resolve_field(key: &str) -> (String, Operator) {
    match key.split_once(SUFFIX_DELIMITER) {
        Some((base, suffix)) => {
            let operator = Operator::from_suffix(suffix).unwrap_or(Operator::Eq);
            (base.to_string(), operator)
        }
        None => (key.to_string(), Operator::Eq),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_tokens() {
        assert_eq!(Operator::Eq.to_sql(), "=");
        assert_eq!(Operator::Ne.to_sql(), "!=");
        assert_eq!(Operator::Gte.to_sql(), ">=");
        assert_eq!(Operator::Like.to_sql(), "LIKE");
        assert_eq!(Operator::HasAny.to_sql(), "hasAny");
    }

    #[test]
    fn test_suffix_table_is_bidirectional() {
        for op in OPERATORS {
            match op.suffix() {
                Some(suffix) => assert_eq!(Operator::from_suffix(suffix), Some(op)),
                None => assert_eq!(op, Operator::Eq),
            }
        }
    }

    #[test]
    fn test_resolve_plain_key() {
        assert_eq!(resolve_field("price"), ("price".to_string(), Operator::Eq));
    }

    #[test]
    fn test_resolve_suffixed_keys() {
        assert_eq!(resolve_field("price__gt"), ("price".to_string(), Operator::Gt));
        assert_eq!(
            resolve_field("name__icontains"),
            ("name".to_string(), Operator::Like)
        );
        assert_eq!(resolve_field("tags__has_any"), ("tags".to_string(), Operator::HasAny));
    }

    #[test]
    fn test_unknown_suffix_falls_back_to_eq() {
        assert_eq!(resolve_field("price__between"), ("price".to_string(), Operator::Eq));
        assert_eq!(resolve_field("price__"), ("price".to_string(), Operator::Eq));
    }

    #[test]
    fn test_resolve_splits_on_first_delimiter() {
        // "gt__x" is not a known suffix
        assert_eq!(resolve_field("a__gt__x"), ("a".to_string(), Operator::Eq));
    }

    #[test]
    fn test_joiner_tokens() {
        assert_eq!(Joiner::And.to_sql(), "AND");
        assert_eq!(Joiner::Or.to_sql(), "OR");
        assert_eq!(Joiner::Not.to_sql(), "NOT");
    }
}
