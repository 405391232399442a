use std::ops::{Add, Div, Mul, Sub};

/// Binary arithmetic between aggregation expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    pub fn to_sql(&self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }
}

/// Argument of an aggregate function call
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationArg {
    /// Literal field reference, emitted as written
    Field(String),
    /// Nested expression
    Node(Box<AggregationNode>),
}

impl From<&str> for AggregationArg {
    fn from(field: &str) -> Self {
        AggregationArg::Field(field.to_string())
    }
}

impl From<String> for AggregationArg {
    fn from(field: String) -> Self {
        AggregationArg::Field(field)
    }
}

impl From<AggregationNode> for AggregationArg {
    fn from(node: AggregationNode) -> Self {
        AggregationArg::Node(Box::new(node))
    }
}

/// Aggregate expression tree: function calls combined with arithmetic
#[derive(Debug, Clone, PartialEq)]
pub enum AggregationNode {
    Function {
        name: String,
        argument: AggregationArg,
        alias: Option<String>,
    },
    BinaryOp {
        left: Box<AggregationNode>,
        op: ArithmeticOp,
        right: Box<AggregationNode>,
        alias: Option<String>,
    },
}

impl AggregationNode {
    /// Call any function by name. ClickHouse function names are case
    /// sensitive, so the name is emitted exactly as given.
    pub fn function(name: impl Into<String>, argument: impl Into<AggregationArg>) -> Self {
        AggregationNode::Function {
            name: name.into(),
            argument: argument.into(),
            alias: None,
        }
    }

    /// COUNT(*)
    pub fn count() -> Self {
        Self::function("COUNT", "*")
    }

    pub fn count_field(argument: impl Into<AggregationArg>) -> Self {
        Self::function("COUNT", argument)
    }

    pub fn sum(argument: impl Into<AggregationArg>) -> Self {
        Self::function("SUM", argument)
    }

    pub fn avg(argument: impl Into<AggregationArg>) -> Self {
        Self::function("AVG", argument)
    }

    pub fn min(argument: impl Into<AggregationArg>) -> Self {
        Self::function("MIN", argument)
    }

    pub fn max(argument: impl Into<AggregationArg>) -> Self {
        Self::function("MAX", argument)
    }

    /// Approximate distinct count
    pub fn uniq(argument: impl Into<AggregationArg>) -> Self {
        Self::function("uniq", argument)
    }

    pub fn binary(left: AggregationNode, op: ArithmeticOp, right: AggregationNode) -> Self {
        AggregationNode::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
            alias: None,
        }
    }

    pub fn with_alias(self, alias: impl Into<String>) -> Self {
        let alias = Some(alias.into());
        match self {
            AggregationNode::Function { name, argument, .. } => AggregationNode::Function {
                name,
                argument,
                alias,
            },
            AggregationNode::BinaryOp { left, op, right, .. } => AggregationNode::BinaryOp {
                left,
                op,
                right,
                alias,
            },
        }
    }

    pub fn alias(&self) -> Option<&str> {
        match self {
            AggregationNode::Function { alias, .. } | AggregationNode::BinaryOp { alias, .. } => {
                alias.as_deref()
            }
        }
    }

    /// Expression SQL without any alias. Binary nodes are always parenthesized.
    pub fn expression_sql(&self) -> String {
        match self {
            AggregationNode::Function { name, argument, .. } => {
                let argument = match argument {
                    AggregationArg::Field(field) => field.clone(),
                    AggregationArg::Node(node) => node.expression_sql(),
                };
                format!("{}({})", name, argument)
            }
            AggregationNode::BinaryOp { left, op, right, .. } => format!(
                "({} {} {})",
                left.expression_sql(),
                op.to_sql(),
                right.expression_sql()
            ),
        }
    }

    /// Expression SQL with this node's own alias, if any
    pub fn compile(&self) -> String {
        self.compile_as(None)
    }

    /// Expression SQL aliased by the node's own alias, else `fallback`
    pub fn compile_as(&self, fallback: Option<&str>) -> String {
        match self.alias().or(fallback) {
            Some(alias) => format!("{} as {}", self.expression_sql(), alias),
            None => self.expression_sql(),
        }
    }
}

macro_rules! impl_arithmetic {
    ($($trait:ident, $method:ident, $op:expr);*) => {
        $(impl $trait for AggregationNode {
            type Output = AggregationNode;

            fn $method(self, rhs: AggregationNode) -> AggregationNode {
                AggregationNode::binary(self, $op, rhs)
            }
        })*
    };
}

impl_arithmetic!(
    Add, add, ArithmeticOp::Add;
    Sub, sub, ArithmeticOp::Sub;
    Mul, mul, ArithmeticOp::Mul;
    Div, div, ArithmeticOp::Div
);

/// Represents a field selection in a SELECT clause
#[derive(Debug, Clone, PartialEq)]
pub enum SelectField {
    /// Select all fields: SELECT *
    All,
    /// Select specific field: SELECT field_name
    Field(String),
    /// Aggregate expression, aliased by its own alias or the given one
    Aggregate {
        node: AggregationNode,
        alias: Option<String>,
    },
}

impl SelectField {
    pub fn field(field: impl Into<String>) -> Self {
        SelectField::Field(field.into())
    }

    pub fn aggregate(alias: impl Into<String>, node: AggregationNode) -> Self {
        SelectField::Aggregate {
            node,
            alias: Some(alias.into()),
        }
    }

    pub fn to_sql(&self) -> String {
        match self {
            SelectField::All => "*".to_string(),
            SelectField::Field(name) => name.clone(),
            SelectField::Aggregate { node, alias } => node.compile_as(alias.as_deref()),
        }
    }
}
