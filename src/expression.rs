// ABOUTME: Expression — a function reference plus an ordered, mutable argument list

use crate::function::Function;
use crate::node::Node;
use crate::scalar::Scalar;
use parking_lot::Mutex;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

struct ExpressionState {
    name: Option<String>,
    function: Option<Arc<dyn Function>>,
    args: Vec<Node>,
    cache: Scalar,
}

/// A function applied to an ordered list of argument nodes. The cached
/// scalar is a one-deep cache: it reflects the most recent `eval()` call and
/// is unconditionally refreshed by the next one, never reused across calls.
pub struct Expression {
    state: Mutex<ExpressionState>,
}

impl Expression {
    pub fn new(function: Option<Arc<dyn Function>>, args: Vec<Node>) -> Self {
        Expression {
            state: Mutex::new(ExpressionState {
                name: None,
                function,
                args,
                cache: Scalar::Undefined,
            }),
        }
    }

    pub fn named(name: impl Into<String>, function: Option<Arc<dyn Function>>, args: Vec<Node>) -> Self {
        Expression {
            state: Mutex::new(ExpressionState {
                name: Some(name.into()),
                function,
                args,
                cache: Scalar::Undefined,
            }),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.state.lock().name.clone()
    }

    pub fn set_function(&self, function: Arc<dyn Function>) {
        self.state.lock().function = Some(function);
    }

    pub fn set_args(&self, args: Vec<Node>) {
        self.state.lock().args = args;
    }

    pub fn append_arg(&self, arg: Node) {
        self.state.lock().args.push(arg);
    }

    pub fn append_args(&self, args: impl IntoIterator<Item = Node>) {
        self.state.lock().args.extend(args);
    }

    /// Removes the first argument that refers to the same node as `target`
    /// (see [`Node::same_reference`]). Returns whether anything was removed.
    pub fn remove_arg(&self, target: &Node) -> bool {
        let mut s = self.state.lock();
        if let Some(pos) = s.args.iter().position(|a| a.same_reference(target)) {
            s.args.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn clear_args(&self) {
        self.state.lock().args.clear();
    }

    pub fn arg_count(&self) -> usize {
        self.state.lock().args.len()
    }

    /// The scalar produced by the most recent `eval()` call, without
    /// triggering a new evaluation.
    pub fn cached(&self) -> Scalar {
        self.state.lock().cache
    }

    /// Evaluates this expression: snapshots its function and argument list,
    /// invokes the function (which evaluates its own arguments, continuing
    /// the root-to-leaves lock order), then stores the result as the new
    /// cache. An expression with no function registered evaluates to
    /// `Undefined`.
    pub fn eval(&self) -> Scalar {
        let (function, args) = {
            let s = self.state.lock();
            (s.function.clone(), s.args.clone())
        };
        let result = match function {
            Some(f) => f.evaluate(&args),
            None => Scalar::Undefined,
        };
        self.state.lock().cache = result;
        result
    }
}

/// Equality mirrors `Variable`'s: the debug name plus the current cached
/// scalar, not function/argument identity — two expressions that haven't
/// diverged in name or last-evaluated value compare equal.
impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name() && self.cached() == other.cached()
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
        self.cached().hash(state);
    }
}
