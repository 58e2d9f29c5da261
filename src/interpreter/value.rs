// File: src/interpreter/value.rs
//
// Runtime value types for the NLang scripting language.
// Arrays and objects are shared containers: cloning a Value clones the
// handle, so every variable bound to it sees the same mutations.

use indexmap::IndexMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type ObjectRef = Rc<RefCell<IndexMap<String, Value>>>;

/// Runtime value
#[derive(Debug, Clone)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
    Array(ArrayRef),
    Object(ObjectRef),
    Null,
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn object(fields: IndexMap<String, Value>) -> Value {
        Value::Object(Rc::new(RefCell::new(fields)))
    }

    /// Name used in type error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Null => "null",
        }
    }

    /// Object keys are the display text of whatever value was used as key
    pub fn to_key(&self) -> String {
        self.to_string()
    }

    /// Renders the value as if nested `depth` levels inside objects
    pub fn display_at(&self, depth: usize) -> String {
        match self {
            Value::Object(fields) => format_object(&fields.borrow(), depth),
            other => other.to_string(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn format_object(fields: &IndexMap<String, Value>, depth: usize) -> String {
    match fields.first() {
        None => "{}".to_string(),
        Some((key, value)) if fields.len() == 1 => format!("{{ {} : {} }}", key, value.display_at(depth)),
        Some(_) => {
            let mut out = String::from("{\n");
            for (key, value) in fields {
                out.push_str(&"\t".repeat(depth + 1));
                out.push_str(&format!("{} : {},\n", key, value.display_at(depth + 1)));
            }
            out.push_str(&"\t".repeat(depth));
            out.push('}');
            out
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", format_number(*n)),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Array(elements) => {
                let parts: Vec<String> = elements.borrow().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
            Value::Object(fields) => write!(f, "{}", format_object(&fields.borrow(), 0)),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Deep structural equality; values of different types are never equal
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            _ => false,
        }
    }
}
