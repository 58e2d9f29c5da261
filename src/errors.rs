// File: src/errors.rs
//
// Error types for the NLang interpreter.
// Every failure (lexical, syntax or runtime) is an NlangError carrying the
// position it is attributed to. Rendering the surrounding source is the job
// of the diagnostics module.

use crate::lexer::Token;
use std::fmt;

/// Position an error is attributed to.
///
/// `column` is the 1-based column printed in the message, `caret` is the
/// 1-based column the `^` marker is drawn under.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub caret: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, caret: usize) -> Self {
        Self { line, column, caret }
    }

    /// Location of a token: reported at its first column, caret under its last character.
    pub fn of_token(token: &Token) -> Self {
        Self { line: token.line, column: token.column_start + 1, caret: token.column_end }
    }

    pub fn is_known(&self) -> bool {
        self.line > 0
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Categories of failure. Only used programmatically; the message text is
/// what users see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Scope,
    Type,
    Arity,
    Key,
    Index,
    Assertion,
    Unsupported,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::Lexical => write!(f, "Lexical Error"),
            ErrorKind::Syntax => write!(f, "Syntax Error"),
            ErrorKind::Scope => write!(f, "Scope Error"),
            ErrorKind::Type => write!(f, "Type Error"),
            ErrorKind::Arity => write!(f, "Arity Error"),
            ErrorKind::Key => write!(f, "Key Error"),
            ErrorKind::Index => write!(f, "Index Error"),
            ErrorKind::Assertion => write!(f, "Assertion Error"),
            ErrorKind::Unsupported => write!(f, "Unsupported Operation"),
        }
    }
}

/// A terminal failure with the position it is attributed to
#[derive(Debug, Clone, PartialEq)]
pub struct NlangError {
    pub kind: ErrorKind,
    pub message: String,
    pub location: SourceLocation,
    pub help: Option<String>,
}

impl NlangError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, location: SourceLocation) -> Self {
        Self { kind, message: message.into(), location, help: None }
    }

    /// Error attributed to a token
    pub fn at_token(kind: ErrorKind, message: impl Into<String>, token: &Token) -> Self {
        Self::new(kind, message, SourceLocation::of_token(token))
    }

    /// Error attributed to a raw position, used by the lexer before a token exists
    pub fn at_position(kind: ErrorKind, message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::new(kind, message, SourceLocation::new(line, column, column))
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn syntax(message: impl Into<String>, token: &Token) -> Self {
        Self::at_token(ErrorKind::Syntax, message, token)
    }

    pub fn type_error(message: impl Into<String>, token: &Token) -> Self {
        Self::at_token(ErrorKind::Type, message, token)
    }

    pub fn undefined_variable(token: &Token) -> Self {
        Self::at_token(ErrorKind::Scope, format!("Undefined variable: {}", token.lexeme), token)
    }

    pub fn undefined_function(token: &Token) -> Self {
        Self::at_token(ErrorKind::Scope, format!("Undefined function: {}", token.lexeme), token)
    }

    pub fn arity_mismatch(token: &Token) -> Self {
        Self::at_token(
            ErrorKind::Arity,
            format!("Argument count mismatch in function call: {}", token.lexeme),
            token,
        )
    }
}

impl fmt::Display for NlangError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} at line {}", self.message, self.location)
    }
}

impl std::error::Error for NlangError {}

/// Computes the Levenshtein distance between two strings
/// Used for "did you mean" suggestions
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s1_chars: Vec<char> = s1.chars().collect();
    let s2_chars: Vec<char> = s2.chars().collect();
    let (len1, len2) = (s1_chars.len(), s2_chars.len());

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    let mut previous: Vec<usize> = (0..=len2).collect();
    let mut current = vec![0; len2 + 1];

    for i in 1..=len1 {
        current[0] = i;
        for j in 1..=len2 {
            let cost = if s1_chars[i - 1] == s2_chars[j - 1] { 0 } else { 1 };
            current[j] = (previous[j] + 1).min(current[j - 1] + 1).min(previous[j - 1] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[len2]
}

/// Find the closest candidate within an edit distance of 2.
/// The distance must also be shorter than the target, so `b` never suggests `a`.
pub fn find_closest_match<'a>(target: &str, candidates: &'a [String]) -> Option<&'a str> {
    let mut best_match = None;
    let mut best_distance = usize::MAX;
    let target_len = target.chars().count();

    for candidate in candidates {
        let distance = levenshtein_distance(target, candidate);
        if distance <= 2 && distance < target_len && distance < best_distance {
            best_distance = distance;
            best_match = Some(candidate.as_str());
        }
    }

    best_match
}
