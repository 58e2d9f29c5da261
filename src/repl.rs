// File: src/repl.rs
//
// Interactive REPL (Read-Eval-Print Loop) for the NLang scripting language.
// Provides an interactive shell for executing NLang code with features like:
// - Multi-line input while braces, brackets or parentheses are unclosed
// - Command history with up/down arrow navigation
// - Special commands (:help, :quit, :vars, :reset)
// - Persistent state across inputs
//
// Each complete input is one input unit: an error aborts the rest of that
// input and the session continues with the next one.

use crate::interpreter::Interpreter;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, IsTerminal};

/// REPL session that maintains interpreter state and handles user interaction
pub struct Repl {
    interpreter: Interpreter,
    editor: DefaultEditor,
}

impl Repl {
    /// Creates a new REPL session with a fresh interpreter
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let editor = DefaultEditor::new()?;
        Ok(Repl { interpreter: Interpreter::new(), editor })
    }

    fn show_banner(&self) {
        println!("{}", "NLang Type 'exit' to quit.".bright_cyan());
        println!("  {} Use {} for commands", "Tip:".bright_magenta(), ":help".bright_yellow());
    }

    /// Starts the REPL loop
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.show_banner();

        let mut buffer = String::new();

        loop {
            let prompt = if buffer.is_empty() { "> " } else { "... " };

            match self.editor.readline(prompt) {
                Ok(line) => {
                    let _ = self.editor.add_history_entry(line.as_str());
                    let trimmed = line.trim();

                    if buffer.is_empty() {
                        if trimmed.eq_ignore_ascii_case("exit") {
                            break;
                        }
                        if trimmed.is_empty() {
                            continue;
                        }
                        if trimmed.starts_with(':') {
                            if self.handle_command(trimmed) {
                                continue;
                            } else {
                                break; // :quit was called
                            }
                        }
                    }

                    buffer.push_str(&line);
                    buffer.push('\n');

                    if is_input_complete(&buffer) {
                        self.eval_input(&buffer);
                        buffer.clear();
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "^C (type exit or :quit to leave)".bright_yellow());
                    buffer.clear();
                }
                Err(ReadlineError::Eof) => {
                    break;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }

    /// Handles special REPL commands starting with ':'
    /// Returns true to continue REPL, false to quit
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":help" | ":h" => {
                self.show_help();
                true
            }
            ":quit" | ":q" => false,
            ":vars" | ":v" => {
                self.show_variables();
                true
            }
            ":reset" | ":r" => {
                self.interpreter = Interpreter::new();
                println!("{}", "Environment reset".bright_green());
                true
            }
            _ => {
                println!(
                    "{} Unknown command: {}. Type {} for available commands.",
                    "Error:".bright_red(),
                    cmd.bright_yellow(),
                    ":help".bright_yellow()
                );
                true
            }
        }
    }

    fn show_help(&self) {
        println!();
        println!("{}", "REPL Commands:".bright_cyan().bold());
        println!("  {}{}  Display this help message", ":help".bright_yellow(), " or :h ".dimmed());
        println!("  {}{}  Exit the REPL (or type exit)", ":quit".bright_yellow(), " or :q ".dimmed());
        println!("  {}{}  Show global variables", ":vars".bright_yellow(), " or :v ".dimmed());
        println!("  {}{}  Reset the environment", ":reset".bright_yellow(), " or :r".dimmed());
        println!();
        println!("{}", "Multi-line Input:".bright_cyan().bold());
        println!("  Leave braces, brackets, or parentheses unclosed to continue");
        println!("  on the next line. Close them to execute the input.");
        println!();
        println!("{}", "Examples:".bright_cyan().bold());
        println!("  {}", "> make x = 42;".dimmed());
        println!("  {}", "> func greet(name) {".dimmed());
        println!("  {}", "...     print(\"Hello, \", name);".dimmed());
        println!("  {}", "... }".dimmed());
        println!("  {}", "> greet(\"World\");".dimmed());
        println!();
    }

    fn show_variables(&self) {
        let vars = self.interpreter.env.globals();
        if vars.is_empty() {
            println!("  {}", "(no variables defined)".dimmed());
            return;
        }
        for (name, value) in vars {
            println!("  {} = {}", name.bright_yellow(), value);
        }
    }

    fn eval_input(&mut self, input: &str) {
        let stderr = io::stderr();
        let color = stderr.is_terminal();
        crate::process_input_with(&mut self.interpreter, input, &mut stderr.lock(), color);
    }
}

/// Checks if the input is syntactically complete
/// Returns true if all brackets/braces/parentheses are balanced
fn is_input_complete(input: &str) -> bool {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => in_string = !in_string,
            '/' if !in_string && chars.peek() == Some(&'/') => {
                // Comment runs to the end of the line
                for c in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
            }
            '{' | '[' | '(' if !in_string => depth += 1,
            '}' | ']' | ')' if !in_string => depth -= 1,
            _ => {}
        }
    }

    // A string left open may span lines, so wait for its closing quote
    !in_string && depth <= 0
}
