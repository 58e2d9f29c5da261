// File: src/interpreter/native_functions/mod.rs
//
// Built-in functions and per-value methods.
//
// Bare built-ins (`time`, `len`) are registered in the global scope as
// `Callable::Native` and dispatched through `call_native`. Dotted calls on
// arrays and strings are routed to the category module for the receiver type.

pub mod collections;
pub mod strings;
pub mod system;

use super::value::Value;
use crate::errors::{ErrorKind, NlangError};
use crate::lexer::Token;

/// Functions available through the bare call form without a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeFunction {
    Time,
    Len,
}

impl NativeFunction {
    pub const ALL: [NativeFunction; 2] = [NativeFunction::Time, NativeFunction::Len];

    pub fn name(self) -> &'static str {
        match self {
            NativeFunction::Time => "time",
            NativeFunction::Len => "len",
        }
    }

    pub fn arity(self) -> usize {
        match self {
            NativeFunction::Time => 0,
            NativeFunction::Len => 1,
        }
    }
}

/// Invoke a built-in; the caller has already checked the argument count
pub fn call_native(native: NativeFunction, args: &[Value], token: &Token) -> Result<Value, NlangError> {
    match native {
        NativeFunction::Time => Ok(system::time()),
        NativeFunction::Len => collections::len(args.first().unwrap_or(&Value::Null), token),
    }
}

/// Dispatch `receiver.name(args)` for arrays and strings
pub fn call_method(receiver: &Value, name: &Token, args: &[Value]) -> Result<Value, NlangError> {
    let handled = match receiver {
        Value::Array(items) => collections::handle(items, name, args),
        Value::Str(text) => strings::handle(text, name, args),
        _ => None,
    };
    handled.unwrap_or_else(|| {
        Err(NlangError::at_token(
            ErrorKind::Unsupported,
            format!("Can not make array operation '{}'", name.lexeme),
            name,
        ))
    })
}

pub(crate) fn empty_container(token: &Token) -> NlangError {
    NlangError::at_token(ErrorKind::Index, "empty container", token)
}
