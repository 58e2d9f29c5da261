// File: src/interpreter/mod.rs
//
// Tree-walking interpreter for the NLang scripting language.
// Executes NLang programs by traversing the Abstract Syntax Tree (AST).
//
// The interpreter keeps a stack of scopes (see environment.rs) holding
// variables and functions, evaluates expressions to produce values, and
// executes statements to perform actions. It supports:
// - Variable declaration, shadowing and assignment
// - Function calls scoped to the call site
// - Numeric range loops and for-in iteration over arrays and strings
// - Shared mutable arrays and objects
// - print and assert statements
//
// Every failure is an NlangError attributed to a source token. Nothing is
// recovered locally: the first error aborts the current input unit.

mod control_flow;
mod environment;
mod native_functions;
mod value;

pub use environment::{Callable, Environment};
pub use native_functions::NativeFunction;
pub use value::Value;

use control_flow::ControlFlow;

use crate::ast::{Expr, FunctionDef, Stmt};
use crate::errors::{find_closest_match, ErrorKind, NlangError};
use crate::lexer::{Token, TokenKind};
use indexmap::IndexMap;
use std::io::Write;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

type EvalResult<T> = Result<T, NlangError>;

/// Upper bound on the length an index assignment may grow an array to
const MAX_ARRAY_LEN: usize = 1 << 24;

/// Main interpreter that executes NLang programs
pub struct Interpreter {
    pub env: Environment,
    output: Option<Arc<Mutex<Vec<u8>>>>,
    call_depth: usize,
}

impl Interpreter {
    /// Creates a new interpreter whose global scope holds only the built-ins
    pub fn new() -> Self {
        Interpreter { env: Environment::new(), output: None, call_depth: 0 }
    }

    /// Sets the output sink for print statements (used for testing)
    pub fn set_output(&mut self, output: Arc<Mutex<Vec<u8>>>) {
        self.output = Some(output);
    }

    fn write_output(&self, text: &str) {
        if let Some(out) = &self.output {
            if let Ok(mut buffer) = out.lock() {
                let _ = buffer.write_all(text.as_bytes());
            }
        } else {
            print!("{}", text);
            let _ = std::io::stdout().flush();
        }
    }

    /// Executes one input unit in the global scope.
    ///
    /// A `return` at top level ends the unit early. Scopes pushed while
    /// running are always popped again, so the interpreter stays usable
    /// after an error.
    pub fn execute(&mut self, program: &[Stmt]) -> EvalResult<()> {
        for stmt in program {
            if let ControlFlow::Return(_) = self.execute_stmt(stmt)? {
                log::debug!("top-level return ends the input unit");
                break;
            }
        }
        Ok(())
    }

    /// Runs `f` inside a fresh scope that is popped on every exit path
    fn in_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> EvalResult<T>) -> EvalResult<T> {
        self.env.push_scope();
        let result = f(self);
        self.env.pop_scope();
        result
    }

    /// Runs statements in the current scope, stopping at the first return
    fn execute_block(&mut self, stmts: &[Stmt]) -> EvalResult<ControlFlow> {
        for stmt in stmts {
            if let ControlFlow::Return(value) = self.execute_stmt(stmt)? {
                return Ok(ControlFlow::Return(value));
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn execute_stmt(&mut self, stmt: &Stmt) -> EvalResult<ControlFlow> {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;
            }
            Stmt::VarDeclaration { name, value } => {
                let value = self.evaluate(value)?;
                self.env.define(name.lexeme.as_str(), value);
            }
            Stmt::Assignment { name, value } => {
                if self.env.get(&name.lexeme).is_none() {
                    return Err(self.undefined_variable(name));
                }
                let value = self.evaluate(value)?;
                self.env.assign(&name.lexeme, value);
            }
            Stmt::IndexSet { object, index, value, token } => {
                self.set_index(object, index, value, token)?;
            }
            Stmt::Block(stmts) => return self.in_scope(|interp| interp.execute_block(stmts)),
            Stmt::If { condition, then_branch, .. } => {
                if self.condition(condition, "If condition must be a boolean")? {
                    return self.in_scope(|interp| interp.execute_block(then_branch));
                }
            }
            Stmt::ForRange { start, end, inclusive, index_var, body } => {
                let start = self.range_bound(start)?;
                let end = self.range_bound(end)?;
                let range: Box<dyn Iterator<Item = i64>> =
                    if *inclusive { Box::new(start..=end) } else { Box::new(start..end) };
                return self.in_scope(|interp| {
                    for i in range {
                        interp.env.define(index_var.lexeme.as_str(), Value::Number(i as f64));
                        if let ControlFlow::Return(value) = interp.execute_block(body)? {
                            return Ok(ControlFlow::Return(value));
                        }
                    }
                    Ok(ControlFlow::Normal)
                });
            }
            Stmt::ForIn { var, index_var, iterable, body } => {
                return self.execute_for_in(var, index_var, iterable, body);
            }
            Stmt::FunctionDef(def) => {
                self.env.define_function(def.name.lexeme.as_str(), Callable::User(Rc::clone(def)));
            }
            Stmt::Return { value, .. } => {
                let value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                return Ok(ControlFlow::Return(value));
            }
            Stmt::Print { args, .. } => {
                let mut text = String::new();
                for arg in args {
                    match self.evaluate(arg)? {
                        object @ Value::Object(_) => {
                            text.push_str(&object.display_at(0));
                            text.push('\n');
                        }
                        other => text.push_str(&other.to_string()),
                    }
                }
                text.push('\n');
                self.write_output(&text);
            }
            Stmt::Assert { condition, message, token } => {
                if !self.condition(condition, "Assert condition must be a boolean")? {
                    let message = match message {
                        Some(expr) => self.evaluate(expr)?.to_string(),
                        None => "Assertion failed".to_string(),
                    };
                    return Err(NlangError::at_token(ErrorKind::Assertion, message, token));
                }
            }
        }
        Ok(ControlFlow::Normal)
    }

    fn execute_for_in(&mut self, var: &Token, index_var: &Token, iterable: &Expr, body: &[Stmt]) -> EvalResult<ControlFlow> {
        let items = match self.evaluate(iterable)? {
            Value::Array(items) => items,
            Value::Str(text) => Rc::new(std::cell::RefCell::new(
                text.chars().map(|c| Value::Str(c.to_string())).collect(),
            )),
            _ => {
                let token = iterable.token();
                return Err(NlangError::type_error(format!("variable {} is not iterable.", token.lexeme), token));
            }
        };

        self.in_scope(|interp| {
            let mut i = 0;
            // The length is re-read on every pass so appends made by the body are visited
            loop {
                let item = match items.borrow().get(i) {
                    Some(item) => item.clone(),
                    None => break,
                };
                interp.env.define(var.lexeme.as_str(), item);
                interp.env.define(index_var.lexeme.as_str(), Value::Number(i as f64));
                if let ControlFlow::Return(value) = interp.execute_block(body)? {
                    return Ok(ControlFlow::Return(value));
                }
                i += 1;
            }
            Ok(ControlFlow::Normal)
        })
    }

    fn condition(&mut self, expr: &Expr, message: &str) -> EvalResult<bool> {
        match self.evaluate(expr)? {
            Value::Bool(b) => Ok(b),
            _ => Err(NlangError::type_error(message, expr.token())),
        }
    }

    fn range_bound(&mut self, expr: &Expr) -> EvalResult<i64> {
        match self.evaluate(expr)? {
            Value::Number(n) => Ok(n.trunc() as i64),
            other => Err(NlangError::type_error(
                format!("Range bound must be a number, got {}", other.type_name()),
                expr.token(),
            )),
        }
    }

    fn undefined_variable(&self, token: &Token) -> NlangError {
        let err = NlangError::undefined_variable(token);
        match find_closest_match(&token.lexeme, &self.env.names()) {
            Some(candidate) => err.with_help(format!("did you mean '{}'?", candidate)),
            None => err,
        }
    }

    /// Evaluates an expression and returns its value
    pub fn evaluate(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Number { value, .. } => Ok(Value::Number(*value)),
            Expr::Str { value, .. } => Ok(Value::Str(value.clone())),
            Expr::Bool { value, .. } => Ok(Value::Bool(*value)),
            Expr::Variable(token) => self.env.get(&token.lexeme).ok_or_else(|| self.undefined_variable(token)),
            Expr::Unary { op, operand } => {
                let value = self.evaluate(operand)?;
                match (op.kind, value) {
                    (TokenKind::Minus, Value::Number(n)) => Ok(Value::Number(-n)),
                    (TokenKind::Bang, Value::Bool(b)) => Ok(Value::Bool(!b)),
                    (TokenKind::Minus, other) => Err(NlangError::type_error(
                        format!("Operand of '-' must be a number, got {}", other.type_name()),
                        op,
                    )),
                    (_, other) => Err(NlangError::type_error(
                        format!("Operand of '!' must be a boolean, got {}", other.type_name()),
                        op,
                    )),
                }
            }
            Expr::Binary { left, op, right } => self.eval_binary(left, op, right),
            Expr::ArrayLiteral { elements, .. } => {
                let values = elements.iter().map(|e| self.evaluate(e)).collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::array(values))
            }
            Expr::ObjectLiteral { entries, .. } => {
                let mut fields = IndexMap::new();
                for (key, value) in entries {
                    let key = self.evaluate(key)?.to_key();
                    let value = self.evaluate(value)?;
                    fields.insert(key, value);
                }
                Ok(Value::object(fields))
            }
            Expr::IndexAccess { object, index, token } => {
                let parent = self.evaluate(object)?;
                let index = self.evaluate(index)?;
                self.get_index(&parent, &index, object, token)
            }
            Expr::FieldAccess { object, field } => {
                let parent = self.evaluate(object)?;
                match &parent {
                    Value::Object(fields) => object_field(&fields.borrow(), &field.lexeme, field),
                    Value::Array(_) | Value::Str(_) if matches!(field.lexeme.as_str(), "first" | "last" | "reverse") => {
                        native_functions::call_method(&parent, field, &[])
                    }
                    other => Err(NlangError::at_token(
                        ErrorKind::Unsupported,
                        format!("Can not access field '{}' on {}", field.lexeme, other.type_name()),
                        field,
                    )),
                }
            }
            Expr::Call { callee: None, name, args } => self.call_function(name, args),
            Expr::Call { callee: Some(receiver), name, args } => self.call_method(receiver, name, args),
        }
    }

    fn eval_binary(&mut self, left: &Expr, op: &Token, right: &Expr) -> EvalResult<Value> {
        if matches!(op.kind, TokenKind::And | TokenKind::Or) {
            let lhs = self.logical_operand(left, op)?;
            // Short-circuit: the right side is only evaluated when it decides the result
            if (op.kind == TokenKind::And && !lhs) || (op.kind == TokenKind::Or && lhs) {
                return Ok(Value::Bool(lhs));
            }
            return Ok(Value::Bool(self.logical_operand(right, op)?));
        }

        let lhs = self.evaluate(left)?;
        let rhs = self.evaluate(right)?;
        match op.kind {
            TokenKind::EqualEqual => return Ok(Value::Bool(lhs == rhs)),
            TokenKind::BangEqual => return Ok(Value::Bool(lhs != rhs)),
            _ => {}
        }

        let (a, b) = match (&lhs, &rhs) {
            (Value::Number(a), Value::Number(b)) => (*a, *b),
            _ => {
                return Err(NlangError::type_error(
                    format!(
                        "Operands of '{}' must be numbers, got {} and {}",
                        op.lexeme,
                        lhs.type_name(),
                        rhs.type_name()
                    ),
                    op,
                ))
            }
        };
        let result = match op.kind {
            TokenKind::Plus => Value::Number(a + b),
            TokenKind::Minus => Value::Number(a - b),
            TokenKind::Star => Value::Number(a * b),
            TokenKind::Slash => Value::Number(a / b),
            TokenKind::Greater => Value::Bool(a > b),
            TokenKind::Less => Value::Bool(a < b),
            _ => return Err(NlangError::syntax(format!("Unknown operator: {}", op.lexeme), op)),
        };
        Ok(result)
    }

    fn logical_operand(&mut self, expr: &Expr, op: &Token) -> EvalResult<bool> {
        match self.evaluate(expr)? {
            Value::Bool(b) => Ok(b),
            other => Err(NlangError::type_error(
                format!("Operands of '{}' must be booleans, got {}", op.lexeme, other.type_name()),
                op,
            )),
        }
    }

    fn get_index(&self, parent: &Value, index: &Value, object: &Expr, token: &Token) -> EvalResult<Value> {
        match parent {
            Value::Object(fields) => object_field(&fields.borrow(), &index.to_key(), token),
            Value::Array(items) => {
                let items = items.borrow();
                let slot = element_slot(index, token)?;
                items.get(slot).cloned().ok_or_else(|| out_of_bounds(index, items.len(), token))
            }
            Value::Str(text) => {
                let slot = element_slot(index, token)?;
                text.chars()
                    .nth(slot)
                    .map(|c| Value::Str(c.to_string()))
                    .ok_or_else(|| out_of_bounds(index, text.chars().count(), token))
            }
            _ => Err(NlangError::type_error("Parent is not iterable", object.token())),
        }
    }

    fn set_index(&mut self, object: &Expr, index: &Expr, value: &Expr, token: &Token) -> EvalResult<()> {
        let target = self.evaluate(object)?;
        let key = self.evaluate(index)?;
        let value = self.evaluate(value)?;

        match (&target, &key) {
            (Value::Object(fields), _) => {
                fields.borrow_mut().insert(key.to_key(), value);
            }
            (Value::Array(items), Value::Number(_)) => {
                let slot = element_slot(&key, index.token())?;
                let mut items = items.borrow_mut();
                // Writing past the end pads the gap with null
                if slot >= items.len() {
                    let new_len = slot
                        .checked_add(1)
                        .filter(|len| *len <= MAX_ARRAY_LEN)
                        .ok_or_else(|| out_of_bounds(&key, items.len(), index.token()))?;
                    items.resize(new_len, Value::Null);
                }
                items[slot] = value;
            }
            (Value::Array(_), other) => {
                return Err(NlangError::type_error(
                    format!("Array index must be a number, got {}", other.type_name()),
                    index.token(),
                ));
            }
            (other, _) => {
                return Err(NlangError::type_error(
                    format!("Can not set an index on {}", other.type_name()),
                    token,
                ));
            }
        }
        Ok(())
    }

    fn call_function(&mut self, name: &Token, args: &[Expr]) -> EvalResult<Value> {
        let callable = self.env.function(&name.lexeme).ok_or_else(|| NlangError::undefined_function(name))?;
        let arg_values = args.iter().map(|a| self.evaluate(a)).collect::<EvalResult<Vec<_>>>()?;
        if arg_values.len() != callable.arity() {
            return Err(NlangError::arity_mismatch(name));
        }

        match callable {
            Callable::Native(native) => native_functions::call_native(native, &arg_values, name),
            Callable::User(def) => self.call_user_function(&def, arg_values),
        }
    }

    /// Binds parameters in a scope pushed on top of the caller's scopes and runs the body
    fn call_user_function(&mut self, def: &FunctionDef, args: Vec<Value>) -> EvalResult<Value> {
        self.call_depth += 1;
        log::trace!("call {} (depth {})", def.name.lexeme, self.call_depth);

        let result = self.in_scope(|interp| {
            for (param, arg) in def.params.iter().zip(args) {
                interp.env.define(param.as_str(), arg);
            }
            match interp.execute_block(&def.body)? {
                ControlFlow::Return(value) => Ok(value),
                ControlFlow::Normal => Ok(Value::Null),
            }
        });

        self.call_depth -= 1;
        result
    }

    fn call_method(&mut self, receiver_expr: &Expr, name: &Token, args: &[Expr]) -> EvalResult<Value> {
        let receiver = self.evaluate(receiver_expr)?;

        match &receiver {
            Value::Object(fields) if args.is_empty() => {
                return object_field(&fields.borrow(), &name.lexeme, name);
            }
            Value::Array(_) | Value::Str(_) => {}
            _ => {
                return Err(NlangError::at_token(
                    ErrorKind::Unsupported,
                    format!("Can not make array operation '{}'", name.lexeme),
                    receiver_expr.token(),
                ));
            }
        }

        let arg_values = args.iter().map(|a| self.evaluate(a)).collect::<EvalResult<Vec<_>>>()?;
        let result = native_functions::call_method(&receiver, name, &arg_values)?;

        if let (Value::Str(_), Expr::Variable(var)) = (&receiver, receiver_expr) {
            if native_functions::strings::rebinds_receiver(&name.lexeme) {
                self.env.assign(&var.lexeme, result.clone());
            }
        }
        Ok(result)
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn object_field(fields: &IndexMap<String, Value>, key: &str, token: &Token) -> EvalResult<Value> {
    fields
        .get(key)
        .cloned()
        .ok_or_else(|| NlangError::at_token(ErrorKind::Key, format!("Key doesn't exist: {}", key), token))
}

/// Converts an index value into a non-negative integer slot
fn element_slot(index: &Value, token: &Token) -> EvalResult<usize> {
    match index {
        Value::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Ok(*n as usize),
        Value::Number(_) => Err(NlangError::at_token(
            ErrorKind::Index,
            format!("Index out of bounds: {} is not a valid index", index),
            token,
        )),
        other => Err(NlangError::type_error(
            format!("Index must be a number, got {}", other.type_name()),
            token,
        )),
    }
}

fn out_of_bounds(index: &Value, len: usize, token: &Token) -> NlangError {
    NlangError::at_token(ErrorKind::Index, format!("Index out of bounds: {} for length {}", index, len), token)
}
