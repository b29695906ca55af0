// ABOUTME: +, -, *, / — destination-typed fold over valid arguments

use super::valid_values;
use crate::function::Function;
use crate::node::Node;
use crate::scalar::Scalar;
use std::sync::Arc;

fn fold(values: Vec<Scalar>, op: fn(&mut Scalar, Scalar)) -> Scalar {
    let mut iter = values.into_iter();
    match iter.next() {
        Some(seed) => {
            let mut acc = seed;
            for v in iter {
                op(&mut acc, v);
            }
            acc
        }
        None => Scalar::Undefined,
    }
}

pub struct AddFn;
pub struct SubFn;
pub struct MulFn;
pub struct DivFn;

impl Function for AddFn {
    fn name(&self) -> &str {
        "+"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        fold(valid_values(args), Scalar::compound_add)
    }
}

impl Function for SubFn {
    fn name(&self) -> &str {
        "-"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        // Unary minus is keyed on the raw argument count, not on how many
        // of them evaluate to something defined.
        if args.len() == 1 {
            let mut negated = Scalar::Undefined;
            negated.compound_sub(args[0].eval());
            return negated;
        }
        fold(valid_values(args), Scalar::compound_sub)
    }
}

impl Function for MulFn {
    fn name(&self) -> &str {
        "*"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        fold(valid_values(args), Scalar::compound_mul)
    }
}

impl Function for DivFn {
    fn name(&self) -> &str {
        "/"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        fold(valid_values(args), Scalar::compound_div)
    }
}

pub fn all() -> Vec<Arc<dyn Function>> {
    vec![Arc::new(AddFn), Arc::new(SubFn), Arc::new(MulFn), Arc::new(DivFn)]
}
