// ABOUTME: max/min — fold over valid arguments, taking the scalar extremum

use super::valid_values;
use crate::function::Function;
use crate::node::Node;
use crate::scalar::Scalar;
use std::cmp::Ordering;
use std::sync::Arc;

pub struct MaxFn;
pub struct MinFn;

impl Function for MaxFn {
    fn name(&self) -> &str {
        "max"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        values
            .into_iter()
            .reduce(|a, b| if matches!(a.scalar_cmp(&b), Some(Ordering::Less)) { b } else { a })
            .unwrap_or(Scalar::Undefined)
    }
}

impl Function for MinFn {
    fn name(&self) -> &str {
        "min"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        values
            .into_iter()
            .reduce(|a, b| if matches!(a.scalar_cmp(&b), Some(Ordering::Greater)) { b } else { a })
            .unwrap_or(Scalar::Undefined)
    }
}

pub fn all() -> Vec<Arc<dyn Function>> {
    vec![Arc::new(MaxFn), Arc::new(MinFn)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_skips_undefined_and_takes_extremum() {
        let args = vec![
            Node::Const(Scalar::Int(3)),
            Node::Const(Scalar::Undefined),
            Node::Const(Scalar::Int(9)),
            Node::Const(Scalar::Int(1)),
        ];
        assert_eq!(MaxFn.evaluate(&args), Scalar::Int(9));
    }

    #[test]
    fn min_of_all_undefined_is_undefined() {
        let args = vec![Node::Const(Scalar::Undefined), Node::Const(Scalar::Undefined)];
        assert!(MinFn.evaluate(&args).is_undefined());
    }

    #[test]
    fn empty_args_is_undefined() {
        assert!(MaxFn.evaluate(&[]).is_undefined());
        assert!(MinFn.evaluate(&[]).is_undefined());
    }
}
