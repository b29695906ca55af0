// ABOUTME: Environment — owns source, tables, and pools; compiles and evaluates the root tree

use crate::error::LkitError;
use crate::expression::Expression;
use crate::function::{default_function_table, Function};
use crate::node::Node;
use crate::parser::{self, Form};
use crate::scalar::Scalar;
use crate::timestamp;
use crate::variable::Variable;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// The parser-owned container: source text, function table, variable table,
/// constant pool, sub-expression pool, and the compiled root. Each piece gets
/// its own lock rather than one shared lock, matching the "minimise
/// contention" concurrency model — a host reading `get_variable` never
/// blocks on a concurrent `set_source`.
pub struct Environment {
    source: RwLock<String>,
    functions: RwLock<HashMap<String, Arc<dyn Function>>>,
    variables: RwLock<HashMap<String, Arc<Variable>>>,
    constants: RwLock<Vec<Scalar>>,
    subexpressions: RwLock<Vec<Arc<Expression>>>,
    root: RwLock<Option<Node>>,
}

impl Environment {
    /// An empty environment: no source, no functions, no variables. Call
    /// [`Environment::reset`] to install the default operator and constant
    /// set, the way a host normally starts up.
    pub fn new() -> Self {
        Environment {
            source: RwLock::new(String::new()),
            functions: RwLock::new(HashMap::new()),
            variables: RwLock::new(HashMap::new()),
            constants: RwLock::new(Vec::new()),
            subexpressions: RwLock::new(Vec::new()),
            root: RwLock::new(None),
        }
    }

    pub fn set_source(&self, text: impl Into<String>) {
        *self.source.write() = text.into();
        *self.root.write() = None;
    }

    pub fn get_source(&self) -> String {
        self.source.read().clone()
    }

    /// Registers `name = value`. Re-adding an existing name updates that
    /// variable's value in place rather than replacing the `Arc`, so any
    /// compiled expression already holding it observes the new value on its
    /// next evaluation (Testable Property 6).
    pub fn add_variable(&self, name: impl Into<String>, value: Scalar) {
        let name = name.into();
        self.get_or_create_variable(&name).set(name, value);
    }

    /// Registers a pre-built variable handle directly, under its own name.
    pub fn add_variable_handle(&self, variable: Arc<Variable>) {
        let name = variable.name();
        self.variables.write().insert(name, variable);
    }

    pub fn get_variable(&self, name: &str) -> Option<Scalar> {
        self.variables.read().get(name).map(|v| v.eval())
    }

    pub fn remove_variable(&self, name: &str) -> bool {
        self.variables.write().remove(name).is_some()
    }

    pub fn clear_variables(&self) {
        self.variables.write().clear();
    }

    /// Installs `e` and `pi`, the two default variables from a fresh
    /// environment.
    pub fn use_default_variables(&self) {
        self.add_variable("e", Scalar::Double(2.71828183));
        self.add_variable("pi", Scalar::Double(3.14159265));
    }

    pub fn add_function(&self, name: impl Into<String>, function: Arc<dyn Function>) {
        self.functions.write().insert(name.into(), function);
    }

    pub fn remove_function(&self, name: &str) -> bool {
        self.functions.write().remove(name).is_some()
    }

    pub fn clear_functions(&self) {
        self.functions.write().clear();
    }

    /// Installs the fifteen built-in operators.
    pub fn use_default_functions(&self) {
        self.functions.write().extend(default_function_table());
    }

    /// Empties source, tables, pools, and the compiled root.
    pub fn clear(&self) {
        *self.source.write() = String::new();
        self.functions.write().clear();
        self.variables.write().clear();
        self.constants.write().clear();
        self.subexpressions.write().clear();
        *self.root.write() = None;
    }

    /// `clear` followed by installing the default functions and variables.
    pub fn reset(&self) -> bool {
        self.clear();
        self.use_default_functions();
        self.use_default_variables();
        true
    }

    /// Evaluates the compiled root, compiling first if `set_source` has
    /// invalidated it. Idempotent: repeated calls with unchanged source and
    /// tables produce equal scalars (Testable Property 3).
    pub fn evaluate(&self) -> Result<Scalar, LkitError> {
        self.compile()?;
        let root = self.root.read().clone().expect("compile installs a root");
        Ok(root.eval())
    }

    fn compile(&self) -> Result<(), LkitError> {
        if self.root.read().is_some() {
            return Ok(());
        }
        let source = self.source.read().clone();
        let forms = parser::parse_program(&source)?;
        let (last, earlier) = forms
            .split_last()
            .expect("parse_program never returns an empty form list");
        for form in earlier {
            self.compile_form(form)?.eval();
        }
        let root = self.compile_form(last)?;
        *self.root.write() = Some(root);
        Ok(())
    }

    fn compile_form(&self, form: &Form) -> Result<Node, LkitError> {
        match form {
            Form::Int(n) => {
                let s = Scalar::Int(*n);
                self.constants.write().push(s);
                Ok(Node::Const(s))
            }
            Form::Double(d) => {
                let s = Scalar::Double(*d);
                self.constants.write().push(s);
                Ok(Node::Const(s))
            }
            Form::Bool(b) => {
                let s = Scalar::Bool(*b);
                self.constants.write().push(s);
                Ok(Node::Const(s))
            }
            Form::Timestamp(text) => {
                let micros = timestamp::parse(text)?;
                let s = Scalar::Timestamp(micros);
                self.constants.write().push(s);
                Ok(Node::Const(s))
            }
            Form::Ident(name) => Ok(Node::Var(self.get_or_create_variable(name))),
            Form::List(items) => self.compile_list(items),
        }
    }

    fn compile_list(&self, items: &[Form]) -> Result<Node, LkitError> {
        let head = items
            .first()
            .ok_or_else(|| LkitError::Syntax("empty expression".into()))?;

        let Form::Ident(head_name) = head else {
            return Err(LkitError::Syntax(
                "expression appearing where a function name is expected".into(),
            ));
        };

        if head_name == "set" {
            return self.compile_set(&items[1..]);
        }

        let function = self
            .functions
            .read()
            .get(head_name)
            .cloned()
            .ok_or_else(|| LkitError::Lookup(head_name.clone()))?;

        let mut args = Vec::with_capacity(items.len() - 1);
        for item in &items[1..] {
            let node = self.compile_form(item)?;
            if let Node::Expr(ref e) = node {
                self.subexpressions.write().push(e.clone());
            }
            args.push(node);
        }

        let expr = Arc::new(Expression::named(head_name.clone(), Some(function), args));
        self.subexpressions.write().push(expr.clone());
        Ok(Node::Expr(expr))
    }

    fn compile_set(&self, rest: &[Form]) -> Result<Node, LkitError> {
        let name = match rest.first() {
            Some(Form::Ident(n)) => n.clone(),
            Some(_) => return Err(LkitError::Syntax("set requires an identifier name".into())),
            None => return Err(LkitError::Syntax("set requires a variable name".into())),
        };
        if rest.len() > 2 {
            return Err(LkitError::Syntax(
                "set takes a name and at most one value".into(),
            ));
        }

        let var = self.get_or_create_variable(&name);
        match rest.get(1) {
            Some(value_form) => {
                let value_node = self.compile_form(value_form)?;
                match value_node {
                    Node::Expr(expr) => var.bind(expr),
                    Node::Const(s) => var.set(name, s),
                    Node::Var(other) => var.set(name, other.eval()),
                }
            }
            None => var.set(name, Scalar::Undefined),
        }
        Ok(Node::Var(var))
    }

    /// Returns the existing variable under `name`, or creates a fresh,
    /// `Undefined`-valued placeholder and registers it.
    fn get_or_create_variable(&self, name: &str) -> Arc<Variable> {
        if let Some(v) = self.variables.read().get(name) {
            return v.clone();
        }
        let mut vars = self.variables.write();
        if let Some(v) = vars.get(name) {
            return v.clone();
        }
        let var = Arc::new(Variable::new(name, Scalar::Undefined));
        vars.insert(name.to_string(), var.clone());
        var
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}

impl PartialEq for Environment {
    /// Equal if sources match and the constant pool and variable/function
    /// tables are equal element-wise. Function equality is by registered
    /// name only — `Arc<dyn Function>` trait objects carry no comparable
    /// state beyond identity.
    fn eq(&self, other: &Self) -> bool {
        if *self.source.read() != *other.source.read() {
            return false;
        }
        if *self.constants.read() != *other.constants.read() {
            return false;
        }
        let mut lhs_vars: Vec<(String, Scalar)> = self
            .variables
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.peek()))
            .collect();
        let mut rhs_vars: Vec<(String, Scalar)> = other
            .variables
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.peek()))
            .collect();
        lhs_vars.sort_by(|a, b| a.0.cmp(&b.0));
        rhs_vars.sort_by(|a, b| a.0.cmp(&b.0));
        if lhs_vars != rhs_vars {
            return false;
        }
        let mut lhs_fns: Vec<String> = self.functions.read().keys().cloned().collect();
        let mut rhs_fns: Vec<String> = other.functions.read().keys().cloned().collect();
        lhs_fns.sort();
        rhs_fns.sort();
        lhs_fns == rhs_fns
    }
}
