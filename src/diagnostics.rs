// File: src/diagnostics.rs
//
// Source-context rendering for NLang errors.
//
// A Diagnostics value owns the lines of one input unit and turns an
// NlangError into the text written to the error stream: the lines around
// the error, a caret under the offending column, then the error header.

use crate::errors::NlangError;
use colored::Colorize;
use std::io::{self, Write};

pub struct Diagnostics {
    lines: Vec<String>,
    color: bool,
}

impl Diagnostics {
    pub fn new(source: &str) -> Self {
        Diagnostics { lines: source.lines().map(str::to_string).collect(), color: false }
    }

    /// Highlight the header and caret for terminal output
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn line(&self, number: usize) -> Option<&str> {
        number.checked_sub(1).and_then(|i| self.lines.get(i)).map(String::as_str)
    }

    pub fn render(&self, err: &NlangError) -> String {
        let mut out = String::new();
        let location = &err.location;

        if location.is_known() {
            if let Some(current) = self.line(location.line) {
                if let Some(previous) = self.line(location.line - 1) {
                    out.push_str(previous);
                    out.push('\n');
                }
                out.push_str(current);
                out.push('\n');

                let caret = if self.color { "^".red().bold().to_string() } else { "^".to_string() };
                out.push_str(&" ".repeat(location.caret.saturating_sub(1)));
                out.push_str(&caret);
                out.push('\n');

                if let Some(next) = self.line(location.line + 1) {
                    out.push_str(next);
                    out.push('\n');
                }
            }
        }

        let header = if self.color { "Error".red().bold().to_string() } else { "Error".to_string() };
        out.push_str(&format!("{}: {}\n", header, err));

        if let Some(help) = &err.help {
            let help = format!("help: {}", help);
            if self.color {
                out.push_str(&format!("{}\n", help.bright_yellow()));
            } else {
                out.push_str(&help);
                out.push('\n');
            }
        }
        out
    }

    pub fn report(&self, err: &NlangError, sink: &mut dyn Write) -> io::Result<()> {
        sink.write_all(self.render(err).as_bytes())?;
        sink.flush()
    }
}
