// ABOUTME: Variable — a named, mutable scalar slot, optionally bound to a re-evaluated expression

use crate::expression::Expression;
use crate::scalar::Scalar;
use parking_lot::Mutex;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct VariableState {
    name: String,
    scalar: Scalar,
    bound: Option<Arc<Expression>>,
}

/// A named scalar slot. Plain variables just hold a value; a variable bound
/// by `(set x (+ y 1))` instead holds a reference to the `(+ y 1)`
/// expression and re-evaluates it on every read, writing the result back
/// into its own scalar so a plain read without re-evaluation (not exposed
/// publicly, but used internally) still sees the last computed value.
pub struct Variable {
    state: Mutex<VariableState>,
}

impl Variable {
    pub fn new(name: impl Into<String>, value: Scalar) -> Self {
        Variable {
            state: Mutex::new(VariableState {
                name: name.into(),
                scalar: value,
                bound: None,
            }),
        }
    }

    pub fn name(&self) -> String {
        self.state.lock().name.clone()
    }

    /// Updates name and scalar atomically, and clears any bound expression —
    /// this is a plain re-seat of the variable, not a rebind.
    pub fn set(&self, name: impl Into<String>, value: Scalar) {
        let mut s = self.state.lock();
        s.name = name.into();
        s.scalar = value;
        s.bound = None;
    }

    /// Updates just the scalar, leaving the name and any binding untouched.
    pub fn set_value(&self, value: Scalar) {
        self.state.lock().scalar = value;
    }

    /// Binds this variable to an expression. Every subsequent `eval()` call
    /// re-evaluates the expression and writes the result into this
    /// variable's scalar.
    pub fn bind(&self, expr: Arc<Expression>) {
        let mut s = self.state.lock();
        s.bound = Some(expr);
    }

    pub fn is_bound(&self) -> bool {
        self.state.lock().bound.is_some()
    }

    /// The variable's current scalar without re-evaluating a binding —
    /// used by introspection, not by normal evaluation.
    pub fn peek(&self) -> Scalar {
        self.state.lock().scalar
    }

    /// Evaluates the variable: if bound, re-evaluates the bound expression
    /// and writes the result into the scalar slot; otherwise returns the
    /// scalar as-is. The bound expression is evaluated without holding this
    /// variable's lock, so a lock ordering of variable-then-children is
    /// never inverted into children-then-variable.
    pub fn eval(&self) -> Scalar {
        let bound = { self.state.lock().bound.clone() };
        match bound {
            Some(expr) => {
                let result = expr.eval();
                self.state.lock().scalar = result;
                result
            }
            None => self.state.lock().scalar,
        }
    }
}

/// Two variables are equal iff their names match and their scalars are
/// equal — a bound expression's live value, not its identity, is what's
/// compared.
impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.peek() == other.peek()
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.peek().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtins::arithmetic::AddFn;

    #[test]
    fn equality_compares_name_and_scalar() {
        let a = Variable::new("x", Scalar::Int(5));
        let b = Variable::new("x", Scalar::Int(5));
        let c = Variable::new("x", Scalar::Int(6));
        let d = Variable::new("y", Scalar::Int(5));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn plain_variable_holds_its_value() {
        let v = Variable::new("x", Scalar::Int(5));
        assert_eq!(v.eval(), Scalar::Int(5));
        assert_eq!(v.name(), "x");
    }

    #[test]
    fn set_clears_any_binding() {
        let v = Variable::new("x", Scalar::Int(5));
        let expr = Arc::new(Expression::new(
            Some(Arc::new(AddFn)),
            vec![crate::node::Node::Const(Scalar::Int(1))],
        ));
        v.bind(expr);
        assert!(v.is_bound());
        v.set("x", Scalar::Int(9));
        assert!(!v.is_bound());
        assert_eq!(v.eval(), Scalar::Int(9));
    }

    #[test]
    fn bound_variable_re_evaluates_on_each_read() {
        let counter = Arc::new(Variable::new("n", Scalar::Int(1)));
        let expr = Arc::new(Expression::new(
            Some(Arc::new(AddFn)),
            vec![
                crate::node::Node::Var(counter.clone()),
                crate::node::Node::Const(Scalar::Int(1)),
            ],
        ));
        let v = Variable::new("x", Scalar::Undefined);
        v.bind(expr);
        assert_eq!(v.eval(), Scalar::Int(2));
        counter.set_value(Scalar::Int(10));
        assert_eq!(v.eval(), Scalar::Int(11));
    }
}
