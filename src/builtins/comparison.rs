// ABOUTME: ==, !=, <, >, <=, >= — pairwise chains over valid arguments

use super::valid_values;
use crate::function::Function;
use crate::node::Node;
use crate::scalar::Scalar;
use std::cmp::Ordering;
use std::sync::Arc;

/// Walks a strict ordering chain: each successive value must satisfy
/// `relation` against the running pivot, and becomes the next pivot.
fn ordering_chain(values: &[Scalar], relation: fn(Ordering) -> bool) -> bool {
    values.windows(2).all(|pair| {
        matches!(pair[0].scalar_cmp(&pair[1]), Some(o) if relation(o))
    })
}

pub struct EqFn;
pub struct NeFn;
pub struct LtFn;
pub struct GtFn;
pub struct LeFn;
pub struct GeFn;

impl Function for EqFn {
    fn name(&self) -> &str {
        "=="
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.len() < 2 {
            return Scalar::Undefined;
        }
        Scalar::Bool(values[1..].iter().all(|v| values[0].scalar_eq(v)))
    }
}

impl Function for NeFn {
    fn name(&self) -> &str {
        "!="
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.len() < 2 {
            return Scalar::Undefined;
        }
        Scalar::Bool(values[1..].iter().all(|v| !values[0].scalar_eq(v)))
    }
}

impl Function for LtFn {
    fn name(&self) -> &str {
        "<"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.len() < 2 {
            return Scalar::Undefined;
        }
        Scalar::Bool(ordering_chain(&values, |o| o == Ordering::Less))
    }
}

impl Function for GtFn {
    fn name(&self) -> &str {
        ">"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.len() < 2 {
            return Scalar::Undefined;
        }
        Scalar::Bool(ordering_chain(&values, |o| o == Ordering::Greater))
    }
}

impl Function for LeFn {
    fn name(&self) -> &str {
        "<="
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.len() < 2 {
            return Scalar::Undefined;
        }
        Scalar::Bool(ordering_chain(&values, |o| o != Ordering::Greater))
    }
}

impl Function for GeFn {
    fn name(&self) -> &str {
        ">="
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.len() < 2 {
            return Scalar::Undefined;
        }
        Scalar::Bool(ordering_chain(&values, |o| o != Ordering::Less))
    }
}

pub fn all() -> Vec<Arc<dyn Function>> {
    vec![
        Arc::new(EqFn),
        Arc::new(NeFn),
        Arc::new(LtFn),
        Arc::new(GtFn),
        Arc::new(LeFn),
        Arc::new(GeFn),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i32]) -> Vec<Node> {
        values.iter().map(|v| Node::Const(Scalar::Int(*v))).collect()
    }

    #[test]
    fn eq_requires_all_equal_to_first() {
        assert_eq!(EqFn.evaluate(&ints(&[2, 2, 2])), Scalar::Bool(true));
        assert_eq!(EqFn.evaluate(&ints(&[2, 2, 3])), Scalar::Bool(false));
    }

    #[test]
    fn ne_requires_no_later_equal_to_first() {
        assert_eq!(NeFn.evaluate(&ints(&[2, 3, 4])), Scalar::Bool(true));
        assert_eq!(NeFn.evaluate(&ints(&[2, 3, 2])), Scalar::Bool(false));
    }

    #[test]
    fn lt_is_a_strict_chain() {
        assert_eq!(LtFn.evaluate(&ints(&[1, 2, 3])), Scalar::Bool(true));
        assert_eq!(LtFn.evaluate(&ints(&[1, 3, 2])), Scalar::Bool(false));
    }

    #[test]
    fn fewer_than_two_valid_args_is_undefined() {
        assert!(LtFn.evaluate(&ints(&[1])).is_undefined());
        assert!(EqFn.evaluate(&[]).is_undefined());
    }

    #[test]
    fn cross_type_comparison_coerces_rhs_into_lhs_type() {
        let args = vec![Node::Const(Scalar::Int(5)), Node::Const(Scalar::Double(5.0))];
        assert_eq!(EqFn.evaluate(&args), Scalar::Bool(true));
    }
}
