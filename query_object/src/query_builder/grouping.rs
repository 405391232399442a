use super::condition::ConditionNode;
use super::lookup::Lookup;

/// Represents a GROUP BY clause with optional HAVING conditions
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupBy {
    /// Fields to group by
    pub fields: Vec<String>,
    /// HAVING conditions, AND-joined like statement filters
    pub having: Vec<ConditionNode>,
}

impl GroupBy {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            having: Vec::new(),
        }
    }

    /// Add a HAVING condition node
    pub fn having(mut self, condition: ConditionNode) -> Self {
        self.having.push(condition);
        self
    }

    /// Add HAVING conditions from a lookup over aggregate aliases
    pub fn having_lookup(self, lookup: &Lookup) -> Self {
        match lookup.to_node() {
            Some(node) => self.having(node),
            None => self,
        }
    }

    pub fn has_having(&self) -> bool {
        !self.having.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::operator::Operator;

    #[test]
    fn test_group_by_new() {
        let group_by = GroupBy::new(["category", "status"]);

        assert_eq!(group_by.fields, vec!["category", "status"]);
        assert!(!group_by.has_having());
    }

    #[test]
    fn test_group_by_having_chain() {
        let group_by = GroupBy::new(["category"])
            .having(ConditionNode::leaf("total", Operator::Gt, 5))
            .having_lookup(&Lookup::new().with("avg_price__lt", 100));

        assert!(group_by.has_having());
        assert_eq!(group_by.having.len(), 2);
    }

    #[test]
    fn test_empty_lookup_adds_nothing() {
        let group_by = GroupBy::new(["category"]).having_lookup(&Lookup::new());
        assert!(!group_by.has_having());
    }
}
