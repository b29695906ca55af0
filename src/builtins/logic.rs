// ABOUTME: and, or, not — short-circuit boolean operators over valid arguments

use super::valid_values;
use crate::function::Function;
use crate::node::Node;
use crate::scalar::Scalar;
use std::sync::Arc;

pub struct AndFn;
pub struct OrFn;
pub struct NotFn;

impl Function for AndFn {
    fn name(&self) -> &str {
        "and"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.is_empty() {
            return Scalar::Undefined;
        }
        Scalar::Bool(values.iter().all(|v| v.eval_as_bool()))
    }
}

impl Function for OrFn {
    fn name(&self) -> &str {
        "or"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        let values = valid_values(args);
        if values.is_empty() {
            return Scalar::Undefined;
        }
        Scalar::Bool(values.iter().any(|v| v.eval_as_bool()))
    }
}

impl Function for NotFn {
    fn name(&self) -> &str {
        "not"
    }

    fn evaluate(&self, args: &[Node]) -> Scalar {
        match valid_values(args).first() {
            Some(v) => Scalar::Bool(!v.eval_as_bool()),
            None => Scalar::Undefined,
        }
    }
}

pub fn all() -> Vec<Arc<dyn Function>> {
    vec![Arc::new(AndFn), Arc::new(OrFn), Arc::new(NotFn)]
}
