// File: src/interpreter/environment.rs
//
// Scoping environment for variable and function management in the NLang interpreter.
// Implements a stack of scopes where inner scopes shadow outer scopes.

use super::native_functions::NativeFunction;
use super::value::Value;
use crate::ast::FunctionDef;
use std::collections::HashMap;
use std::rc::Rc;

/// Anything that can be invoked with the bare `name(args)` form
#[derive(Debug, Clone)]
pub enum Callable {
    User(Rc<FunctionDef>),
    Native(NativeFunction),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::User(def) => def.params.len(),
            Callable::Native(native) => native.arity(),
        }
    }
}

#[derive(Debug, Default)]
struct Scope {
    variables: HashMap<String, Value>,
    functions: HashMap<String, Callable>,
}

/// Variable and function storage
///
/// The Environment maintains a stack of scopes. Blocks, loops and calls push
/// a scope on top of whatever is current, so a function body sees the scopes
/// of its call site. Lookups search from the innermost scope outward.
///
/// # Examples
///
/// ```ignore
/// let mut env = Environment::new();
/// env.define("x", Value::Number(10.0));   // Global scope
///
/// env.push_scope();                       // Enter a block
/// env.define("x", Value::Number(20.0));   // Shadows outer x
/// assert_eq!(env.get("x"), Some(Value::Number(20.0)));
///
/// env.pop_scope();                        // Leave the block
/// assert_eq!(env.get("x"), Some(Value::Number(10.0)));
/// ```
#[derive(Debug)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    /// Create a new environment with a single global scope holding the built-ins
    pub fn new() -> Self {
        let mut env = Environment { scopes: vec![Scope::default()] };
        for native in NativeFunction::ALL {
            env.define_function(native.name(), Callable::Native(native));
        }
        env
    }

    /// Push a new scope onto the stack (e.g., entering a block or a call)
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope; the global scope is never removed
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Get a variable, searching from inner to outer scopes
    pub fn get(&self, name: &str) -> Option<Value> {
        self.scopes.iter().rev().find_map(|scope| scope.variables.get(name).cloned())
    }

    /// Define or overwrite a variable in the current (innermost) scope
    pub fn define(&mut self, name: impl Into<String>, value: Value) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.variables.insert(name.into(), value);
        }
    }

    /// Overwrite an existing variable in the nearest scope that holds it.
    /// Returns false when no scope does.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(slot) = scope.variables.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        false
    }

    pub fn define_function(&mut self, name: impl Into<String>, callable: Callable) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.functions.insert(name.into(), callable);
        }
    }

    pub fn function(&self, name: &str) -> Option<Callable> {
        self.scopes.iter().rev().find_map(|scope| scope.functions.get(name).cloned())
    }

    /// Every visible variable name, used for "did you mean" hints
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.scopes.iter().flat_map(|scope| scope.variables.keys().cloned()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Global variables in name order, for the REPL's :vars listing
    pub fn globals(&self) -> Vec<(String, Value)> {
        let mut vars: Vec<(String, Value)> = self
            .scopes
            .first()
            .map(|scope| scope.variables.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        vars.sort_by(|a, b| a.0.cmp(&b.0));
        vars
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
