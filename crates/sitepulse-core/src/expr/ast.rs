//! AST for extraction expressions

use crate::types::Value;

/// A parsed extraction expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value (number, string, bool, null)
    Literal(Value),
    /// Path rooted at a context variable, e.g. `content.record.key`
    Path { root: String, segments: Vec<Segment> },
    /// Unary operation
    Unary { op: UnaryOp, operand: Box<Expr> },
    /// Binary operation
    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },
    /// Call to a registered function, e.g. `round(x)`
    Call { function: String, args: Vec<Expr> },
}

/// One step of a path expression
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Object key access: `.key` or `["key"]`
    Key(String),
    /// Array index access: `[0]`
    Index(usize),
    /// Array projection: `[*]` maps the remaining path over every element
    Wildcard,
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
}

/// Binary operators, in ascending precedence groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Whether this operator yields a boolean
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Gt | BinaryOp::Lt | BinaryOp::Ge | BinaryOp::Le
        )
    }
}
