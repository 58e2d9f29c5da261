// File: src/interpreter/native_functions/system.rs
//
// System-related native functions

use crate::interpreter::value::Value;
use chrono::Utc;

/// Wall-clock time in milliseconds since the Unix epoch
pub fn time() -> Value {
    Value::Number(Utc::now().timestamp_millis() as f64)
}
