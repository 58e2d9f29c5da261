// File: src/interpreter/native_functions/strings.rs
//
// String methods. Strings are immutable values, so add/remove return the
// new text and the interpreter rebinds it when the receiver is a variable.

use super::empty_container;
use crate::errors::NlangError;
use crate::interpreter::value::Value;
use crate::lexer::Token;

/// Methods whose result replaces a string receiver held in a variable
pub fn rebinds_receiver(method: &str) -> bool {
    matches!(method, "add" | "remove")
}

pub fn handle(text: &str, name: &Token, args: &[Value]) -> Option<Result<Value, NlangError>> {
    let result = match name.lexeme.as_str() {
        "add" => {
            let mut out = text.to_string();
            for arg in args {
                out.push_str(&arg.to_string());
            }
            Ok(Value::Str(out))
        }
        "remove" => {
            let mut out = text.to_string();
            for arg in args {
                let needle = arg.to_string();
                if needle.is_empty() {
                    continue;
                }
                if let Some(pos) = out.find(&needle) {
                    out.replace_range(pos..pos + needle.len(), "");
                }
            }
            Ok(Value::Str(out))
        }
        "reverse" => Ok(Value::Str(text.chars().rev().collect())),
        "first" => text.chars().next().map(|c| Value::Str(c.to_string())).ok_or_else(|| empty_container(name)),
        "last" => text.chars().last().map(|c| Value::Str(c.to_string())).ok_or_else(|| empty_container(name)),
        _ => return None,
    };
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn call(text: &str, name: &str, args: &[Value]) -> Result<Value, NlangError> {
        let token = Token::new(TokenKind::Identifier, name, 1, 0, name.len());
        handle(text, &token, args).expect("known method")
    }

    #[test]
    fn test_add_appends_display_text() {
        let out = call("n", "add", &[Value::Str("lang".into()), Value::Number(2.0)]).unwrap();
        assert_eq!(out, Value::Str("nlang2".into()));
    }

    #[test]
    fn test_remove_first_occurrence() {
        assert_eq!(call("123", "remove", &[Value::Str("2".into())]).unwrap(), Value::Str("13".into()));
        assert_eq!(call("abab", "remove", &[Value::Str("ab".into())]).unwrap(), Value::Str("ab".into()));
    }

    #[test]
    fn test_reverse_first_last() {
        assert_eq!(call("abc", "reverse", &[]).unwrap(), Value::Str("cba".into()));
        assert_eq!(call("abc", "first", &[]).unwrap(), Value::Str("a".into()));
        assert_eq!(call("abc", "last", &[]).unwrap(), Value::Str("c".into()));
        assert_eq!(call("", "first", &[]).unwrap_err().message, "empty container");
    }

    #[test]
    fn test_rebinding_methods() {
        assert!(rebinds_receiver("add"));
        assert!(rebinds_receiver("remove"));
        assert!(!rebinds_receiver("reverse"));
    }
}
