// File: src/lib.rs
//
// Library interface for the NLang interpreter.
// Exposes modules for integration testing and the input-unit runner shared
// by the file runner and the REPL.

pub mod ast;
pub mod diagnostics;
pub mod errors;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod repl;

use diagnostics::Diagnostics;
use errors::NlangError;
use interpreter::Interpreter;
use std::io::{self, Write};
use thiserror::Error;

/// Failures surfaced by the command-line front end
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Error reading file: {0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Script(#[from] NlangError),
}

/// Lexes, parses and executes one input unit against `interpreter`
pub fn run_source(interpreter: &mut Interpreter, source: &str) -> Result<(), NlangError> {
    let tokens = lexer::tokenize(source.trim_end())?;
    log::trace!("lexed {} tokens", tokens.len());
    let program = parser::Parser::new(tokens).parse()?;
    interpreter.execute(&program)
}

/// Runs one input unit and reports a failure to `err_sink`.
///
/// Returns false when the unit was aborted by an error.
pub fn process_input(interpreter: &mut Interpreter, source: &str, err_sink: &mut dyn Write) -> bool {
    process_input_with(interpreter, source, err_sink, false)
}

pub(crate) fn process_input_with(
    interpreter: &mut Interpreter,
    source: &str,
    err_sink: &mut dyn Write,
    color: bool,
) -> bool {
    match run_source(interpreter, source) {
        Ok(()) => true,
        Err(err) => {
            log::debug!("input unit aborted: {}", err.kind);
            let diagnostics = Diagnostics::new(source).with_color(color);
            if let Err(io_err) = diagnostics.report(&err, err_sink) {
                log::warn!("failed to write diagnostics: {}", io_err);
            }
            false
        }
    }
}
