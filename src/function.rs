// ABOUTME: Function — the trait every built-in operator implements, plus the default table

use crate::node::Node;
use crate::scalar::Scalar;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered operator. Evaluation-time anomalies (division by zero,
/// all-`Undefined` fold arguments) are never errors: `evaluate` returns a
/// bare [`Scalar`], with `Undefined` standing in for "no meaningful result".
pub trait Function: Send + Sync {
    fn name(&self) -> &str;
    fn evaluate(&self, args: &[Node]) -> Scalar;
}

/// Builds the fixed table of built-in operators: `max`, `min`, `+`, `-`,
/// `*`, `/`, `==`, `!=`, `<`, `>`, `<=`, `>=`, `and`, `or`, `not`.
pub fn default_function_table() -> HashMap<String, Arc<dyn Function>> {
    let mut table: HashMap<String, Arc<dyn Function>> = HashMap::new();
    for f in crate::builtins::extremum::all() {
        table.insert(f.name().to_string(), f);
    }
    for f in crate::builtins::arithmetic::all() {
        table.insert(f.name().to_string(), f);
    }
    for f in crate::builtins::comparison::all() {
        table.insert(f.name().to_string(), f);
    }
    for f in crate::builtins::logic::all() {
        table.insert(f.name().to_string(), f);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_every_built_in_operator() {
        let table = default_function_table();
        for name in [
            "max", "min", "+", "-", "*", "/", "==", "!=", "<", ">", "<=", ">=", "and", "or", "not",
        ] {
            assert!(table.contains_key(name), "missing operator {name}");
        }
        assert_eq!(table.len(), 15);
    }
}
