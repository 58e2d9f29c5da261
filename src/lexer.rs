// File: src/lexer.rs
//
// Lexical analyzer (tokenizer) for the NLang scripting language.
// Converts source code text into a stream of tokens for parsing.
//
// Supports:
// - Keywords: make, print, if, else, for, while, func, return, in, out, assert, true, false, and, or
// - Identifiers and unsigned decimal numbers
// - Double-quoted string literals (no escape processing)
// - Operators: + - * / < > = == ! != .. .
// - Punctuation: ( ) { } [ ] , ; :
// - Comments starting with // until end of line
//
// Columns are counted per line: `column_start` is the offset the token starts
// after, `column_end` the 1-based position of its last character.

use crate::errors::{ErrorKind, NlangError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Dot,
    DotDot,
    Colon,
    Semicolon,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Greater,
    Less,
    EqualEqual,
    BangEqual,
    Bang,
    Number,
    String,
    Identifier,
    Make,
    Print,
    If,
    Else,
    For,
    While,
    Func,
    Return,
    In,
    Out,
    Assert,
    True,
    False,
    And,
    Or,
    Eof,
}

impl TokenKind {
    fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "make" => TokenKind::Make,
            "print" => TokenKind::Print,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "func" => TokenKind::Func,
            "return" => TokenKind::Return,
            "in" => TokenKind::In,
            "out" => TokenKind::Out,
            "assert" => TokenKind::Assert,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source text of the token; for strings, the contents without quotes
    pub lexeme: String,
    pub line: usize,
    pub column_start: usize,
    pub column_end: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        line: usize,
        column_start: usize,
        column_end: usize,
    ) -> Self {
        Token { kind, lexeme: lexeme.into(), line, column_start, column_end }
    }

    /// Token that does not come from source, e.g. the implicit loop index `i`
    pub fn synthetic(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Token::new(kind, lexeme, 0, 0, 0)
    }
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    tokens: Vec<Token>,
    line: usize,
    column: usize,
}

/// Tokenizes NLang source code into a vector of tokens ending with `Eof`.
///
/// Fails on the first unexpected character or unterminated string literal.
pub fn tokenize(source: &str) -> Result<Vec<Token>, NlangError> {
    let mut lexer = Lexer { chars: source.chars().peekable(), tokens: Vec::new(), line: 1, column: 0 };

    while let Some(&c) = lexer.chars.peek() {
        let start = lexer.column;
        lexer.bump();
        match c {
            ' ' | '\t' | '\r' => {}
            '\n' => lexer.newline(),
            '(' => lexer.push(TokenKind::LParen, "(", start),
            ')' => lexer.push(TokenKind::RParen, ")", start),
            '{' => lexer.push(TokenKind::LBrace, "{", start),
            '}' => lexer.push(TokenKind::RBrace, "}", start),
            '[' => lexer.push(TokenKind::LBracket, "[", start),
            ']' => lexer.push(TokenKind::RBracket, "]", start),
            ',' => lexer.push(TokenKind::Comma, ",", start),
            ';' => lexer.push(TokenKind::Semicolon, ";", start),
            ':' => lexer.push(TokenKind::Colon, ":", start),
            '+' => lexer.push(TokenKind::Plus, "+", start),
            '-' => lexer.push(TokenKind::Minus, "-", start),
            '*' => lexer.push(TokenKind::Star, "*", start),
            '>' => lexer.push(TokenKind::Greater, ">", start),
            '<' => lexer.push(TokenKind::Less, "<", start),
            '/' => {
                if lexer.chars.peek() == Some(&'/') {
                    while let Some(&ch) = lexer.chars.peek() {
                        if ch == '\n' {
                            break;
                        }
                        lexer.bump();
                    }
                } else {
                    lexer.push(TokenKind::Slash, "/", start);
                }
            }
            '=' => {
                if lexer.eat('=') {
                    lexer.push(TokenKind::EqualEqual, "==", start);
                } else {
                    lexer.push(TokenKind::Assign, "=", start);
                }
            }
            '!' => {
                if lexer.eat('=') {
                    lexer.push(TokenKind::BangEqual, "!=", start);
                } else {
                    lexer.push(TokenKind::Bang, "!", start);
                }
            }
            '.' => {
                if lexer.eat('.') {
                    lexer.push(TokenKind::DotDot, "..", start);
                } else {
                    lexer.push(TokenKind::Dot, ".", start);
                }
            }
            '"' => lexer.string(start)?,
            '0'..='9' => lexer.number(c, start),
            'a'..='z' | 'A'..='Z' | '_' => lexer.identifier(c, start),
            _ => {
                return Err(NlangError::at_position(
                    ErrorKind::Lexical,
                    format!("Unexpected character: {}", c),
                    lexer.line,
                    lexer.column,
                ));
            }
        }
    }

    let (line, column) = (lexer.line, lexer.column);
    lexer.tokens.push(Token::new(TokenKind::Eof, "", line, column, column));
    Ok(lexer.tokens)
}

impl Lexer<'_> {
    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next();
        if ch.is_some() {
            self.column += 1;
        }
        ch
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn newline(&mut self) {
        self.line += 1;
        self.column = 0;
    }

    fn push(&mut self, kind: TokenKind, lexeme: impl Into<String>, start: usize) {
        let token = Token::new(kind, lexeme, self.line, start, self.column);
        self.tokens.push(token);
    }

    fn string(&mut self, start: usize) -> Result<(), NlangError> {
        let line = self.line;
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => break,
                Some('\n') => {
                    text.push('\n');
                    self.newline();
                }
                Some(ch) => text.push(ch),
                None => {
                    return Err(NlangError::at_position(
                        ErrorKind::Lexical,
                        "Unterminated string.",
                        self.line,
                        self.column,
                    ));
                }
            }
        }
        self.tokens.push(Token::new(TokenKind::String, text, line, start, self.column));
        Ok(())
    }

    fn number(&mut self, first: char, start: usize) {
        let mut text = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.bump();
            } else {
                break;
            }
        }

        // A '.' belongs to the number only when a digit follows, so `1..3` stays a range
        let mut lookahead = self.chars.clone();
        if lookahead.next() == Some('.') && lookahead.next().is_some_and(|ch| ch.is_ascii_digit()) {
            self.bump();
            text.push('.');
            while let Some(&ch) = self.chars.peek() {
                if ch.is_ascii_digit() {
                    text.push(ch);
                    self.bump();
                } else {
                    break;
                }
            }
        }

        self.push(TokenKind::Number, text, start);
    }

    fn identifier(&mut self, first: char, start: usize) {
        let mut ident = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.bump();
            } else {
                break;
            }
        }
        let kind = TokenKind::keyword(&ident).unwrap_or(TokenKind::Identifier);
        self.push(kind, ident, start);
    }
}
