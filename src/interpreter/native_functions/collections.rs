// File: src/interpreter/native_functions/collections.rs
//
// Array methods and the polymorphic len built-in

use super::empty_container;
use crate::errors::{ErrorKind, NlangError};
use crate::interpreter::value::{ArrayRef, Value};
use crate::lexer::Token;

pub fn len(value: &Value, token: &Token) -> Result<Value, NlangError> {
    match value {
        Value::Str(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::Array(items) => Ok(Value::Number(items.borrow().len() as f64)),
        other => Err(NlangError::at_token(
            ErrorKind::Unsupported,
            format!("Can not call len() on {}", other.type_name()),
            token,
        )),
    }
}

/// Array methods. `add` and `remove` mutate the shared container in place.
pub fn handle(items: &ArrayRef, name: &Token, args: &[Value]) -> Option<Result<Value, NlangError>> {
    let result = match name.lexeme.as_str() {
        "add" => {
            items.borrow_mut().extend(args.iter().cloned());
            Ok(Value::Null)
        }
        "remove" => {
            for arg in args {
                let found = items.borrow().iter().position(|v| v == arg);
                if let Some(pos) = found {
                    items.borrow_mut().remove(pos);
                }
            }
            Ok(Value::Null)
        }
        "reverse" => {
            let reversed: Vec<Value> = items.borrow().iter().rev().cloned().collect();
            Ok(Value::array(reversed))
        }
        "first" => items.borrow().first().cloned().ok_or_else(|| empty_container(name)),
        "last" => items.borrow().last().cloned().ok_or_else(|| empty_container(name)),
        _ => return None,
    };
    Some(result)
}
