// File: src/main.rs
//
// Main entry point for the NLang interpreter.
// With a file argument the whole file runs as one program; without one the
// interactive REPL starts.

use clap::Parser as ClapParser;
use colored::Colorize;
use nlang::diagnostics::Diagnostics;
use nlang::interpreter::Interpreter;
use nlang::repl::Repl;
use nlang::RunError;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(
    name = "nlang",
    about = "NLang: a small dynamically-typed scripting language",
    version = env!("CARGO_PKG_VERSION"),
    long_about = None
)]
struct Cli {
    /// Path to an NLang source file; starts the REPL when omitted
    file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn run_file(path: &Path) -> Result<(), RunError> {
    let source = fs::read_to_string(path)?;
    log::debug!("running {} ({} bytes)", path.display(), source.len());

    let mut interpreter = Interpreter::new();
    if let Err(err) = nlang::run_source(&mut interpreter, &source) {
        let stderr = io::stderr();
        Diagnostics::new(&source).with_color(stderr.is_terminal()).report(&err, &mut stderr.lock())?;
        return Err(err.into());
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.file {
        Some(path) => match run_file(&path) {
            Ok(()) => ExitCode::SUCCESS,
            // Already reported with source context
            Err(RunError::Script(_)) => ExitCode::FAILURE,
            Err(err) => {
                eprintln!("{}", err.to_string().bright_red());
                ExitCode::FAILURE
            }
        },
        None => match Repl::new() {
            Ok(mut repl) => match repl.run() {
                Ok(()) => ExitCode::SUCCESS,
                Err(err) => {
                    eprintln!("{} {}", "Error:".bright_red(), err);
                    ExitCode::FAILURE
                }
            },
            Err(err) => {
                eprintln!("{} failed to start the REPL: {}", "Error:".bright_red(), err);
                ExitCode::FAILURE
            }
        },
    }
}
