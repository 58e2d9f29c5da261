// File: src/interpreter/control_flow.rs
//
// Control flow signal for early returns.
//
// Statement execution yields a ControlFlow so that a `return` deep inside
// nested blocks and loops travels outward to the enclosing call without
// using errors or unwinding.

use super::value::Value;

/// Outcome of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ControlFlow {
    /// Normal execution, continue to next statement
    Normal,
    /// Return statement encountered, unwind to the enclosing call
    Return(Value),
}
