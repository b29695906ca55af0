// ABOUTME: Node — a reference to one of the three things an expression can hold as an argument

use crate::expression::Expression;
use crate::scalar::Scalar;
use crate::variable::Variable;
use std::sync::Arc;

/// A reference an [`crate::expression::Expression`] holds to one of its
/// arguments. Constants are plain values (no identity to preserve);
/// variables and sub-expressions are shared, reference-counted handles into
/// the environment's owning tables/pools, so multiple expressions can point
/// at the same variable or sub-expression and observe each other's
/// mutations.
#[derive(Clone)]
pub enum Node {
    Const(Scalar),
    Var(Arc<Variable>),
    Expr(Arc<Expression>),
}

impl Node {
    /// Evaluates this node, re-walking any bound variable or sub-expression.
    /// Constants evaluate to themselves with no locking.
    pub fn eval(&self) -> Scalar {
        match self {
            Node::Const(s) => *s,
            Node::Var(v) => v.eval(),
            Node::Expr(e) => e.eval(),
        }
    }

    /// Reference identity, per Testable Property 6: two `Node`s refer to the
    /// same underlying object if they're both constants with equal values,
    /// or both point at the same `Arc` target.
    pub fn same_reference(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Const(a), Node::Const(b)) => a.scalar_eq(b),
            (Node::Var(a), Node::Var(b)) => Arc::ptr_eq(a, b),
            (Node::Expr(a), Node::Expr(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Const(s)
    }
}

impl From<Arc<Variable>> for Node {
    fn from(v: Arc<Variable>) -> Self {
        Node::Var(v)
    }
}

impl From<Arc<Expression>> for Node {
    fn from(e: Arc<Expression>) -> Self {
        Node::Expr(e)
    }
}
