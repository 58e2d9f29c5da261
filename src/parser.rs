// File: src/parser.rs
//
// Recursive descent parser for the NLang scripting language.
// Transforms a sequence of tokens into an Abstract Syntax Tree (AST).
//
// Statements are dispatched on their leading keyword:
// - Function definitions (func)
// - Variable declarations (make)
// - Control flow (if, numeric range for, for-in)
// - print, return, assert and bare blocks
// - Expression statements: calls and assignments
//
// Expressions use one method per precedence level, lowest first:
// and/or, equality, comparison, additive, multiplicative, unary, postfix chain, primary.
//
// When an expected token is missing the error is attributed to the token
// before it, so the caret lands at the end of the last complete construct.

use crate::ast::{Expr, FunctionDef, Stmt};
use crate::errors::NlangError;
use crate::lexer::{Token, TokenKind};
use std::rc::Rc;

type ParseResult<T> = Result<T, NlangError>;

/// Parser maintains position in token stream and provides methods to parse statements and expressions
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a new parser from a vector of tokens
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (line, column) = tokens.last().map(|t| (t.line, t.column_end)).unwrap_or((1, 0));
            tokens.push(Token::new(TokenKind::Eof, "", line, column, column));
        }
        Parser { tokens, pos: 0 }
    }

    /// Parse the entire token stream into a vector of statements
    pub fn parse(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.is_at_end() {
            // Skip semicolons between statements
            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }
            stmts.push(self.parse_stmt()?);
        }
        log::debug!("parsed {} top-level statements", stmts.len());
        Ok(stmts)
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1).min(self.tokens.len() - 1)]
    }

    /// Consume and return the current token, then advance to the next
    fn advance(&mut self) -> Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous().clone()
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn check_next(&self, kind: TokenKind) -> bool {
        self.tokens.get(self.pos + 1).is_some_and(|t| t.kind == kind)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn match_any(&mut self, kinds: &[TokenKind]) -> Option<Token> {
        if kinds.iter().any(|&k| self.check(k)) {
            Some(self.advance())
        } else {
            None
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> ParseResult<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(NlangError::syntax(message, self.previous()))
        }
    }

    fn unexpected(&self) -> NlangError {
        NlangError::syntax(format!("Unexpected token: {}", self.peek().lexeme), self.peek())
    }

    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::Func => self.parse_func(),
            TokenKind::Make => self.parse_var_declaration(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Print => self.parse_print(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Assert => self.parse_assert(),
            TokenKind::LBrace => Ok(Stmt::Block(self.parse_block()?)),
            _ => self.parse_expression_stmt(),
        }
    }

    fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.consume(TokenKind::LBrace, "Expecting '{'")?;
        let mut stmts = Vec::new();
        while !self.is_at_end() && !self.check(TokenKind::RBrace) {
            if self.match_kind(TokenKind::Semicolon) {
                continue;
            }
            stmts.push(self.parse_stmt()?);
        }
        self.consume(TokenKind::RBrace, "Expecting '}'")?;
        Ok(stmts)
    }

    fn parse_func(&mut self) -> ParseResult<Stmt> {
        self.advance(); // func
        let name = self.consume(TokenKind::Identifier, "function should have a name")?;
        self.consume(TokenKind::LParen, "Expecting '(' after function name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let param = self.consume(TokenKind::Identifier, "error while reading func parameter")?;
                params.push(param.lexeme);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "Expecting ')' after function parameters")?;
        let body = self.parse_block()?;

        log::trace!("parsed function '{}' with {} parameter(s)", name.lexeme, params.len());
        Ok(Stmt::FunctionDef(Rc::new(FunctionDef { name, params, body })))
    }

    fn parse_var_declaration(&mut self) -> ParseResult<Stmt> {
        self.advance(); // make
        let name = self.consume(TokenKind::Identifier, "Expected variable name.")?;
        self.consume(TokenKind::Assign, "Expected '=' after variable name.")?;
        let value = self.parse_expr()?;
        self.consume(TokenKind::Semicolon, "Expected ';'")?;
        Ok(Stmt::VarDeclaration { name, value })
    }

    fn parse_if(&mut self) -> ParseResult<Stmt> {
        let token = self.advance();
        self.consume(TokenKind::LParen, "Expecting '(' after if")?;
        let condition = self.parse_expr()?;
        self.consume(TokenKind::RParen, "Expecting ')'")?;
        let then_branch = self.parse_block()?;
        Ok(Stmt::If { condition, then_branch, token })
    }

    /// Optional `: name` suffix naming the loop index, `i` when absent
    fn parse_index_suffix(&mut self, default: Token) -> ParseResult<Token> {
        if self.match_kind(TokenKind::Colon) {
            self.consume(TokenKind::Identifier, "index variable should be identifier")
        } else {
            Ok(default)
        }
    }

    fn parse_for(&mut self) -> ParseResult<Stmt> {
        self.advance(); // for
        let start = self.parse_expr()?;

        if self.match_kind(TokenKind::DotDot) {
            let inclusive = self.match_kind(TokenKind::Assign);
            let end = self.parse_expr()?;
            let index_var = self.parse_index_suffix(Token::synthetic(TokenKind::Identifier, "i"))?;
            let body = self.parse_block()?;
            return Ok(Stmt::ForRange { start, end, inclusive, index_var, body });
        }

        let var = match start {
            Expr::Variable(token) if self.check(TokenKind::In) || self.check(TokenKind::Comma) => token,
            _ => return Err(self.unexpected()),
        };

        let mut index_var = Token::synthetic(TokenKind::Identifier, "i");
        if self.match_kind(TokenKind::Comma) {
            index_var = self.consume(TokenKind::Identifier, "index variable should be identifier")?;
        }
        self.consume(TokenKind::In, "Expecting 'in' after loop variable")?;
        let iterable = self.parse_expr()?;
        let index_var = self.parse_index_suffix(index_var)?;
        let body = self.parse_block()?;
        Ok(Stmt::ForIn { var, index_var, iterable, body })
    }

    fn parse_print(&mut self) -> ParseResult<Stmt> {
        let token = self.advance();
        self.consume(TokenKind::LParen, "Expected '(' after print statement")?;
        let mut args = vec![self.parse_expr()?];
        while self.match_kind(TokenKind::Comma) {
            args.push(self.parse_expr()?);
        }
        self.consume(TokenKind::RParen, "Expected ')' after print statement")?;
        self.consume(TokenKind::Semicolon, "Expected ';' after print statement")?;
        Ok(Stmt::Print { args, token })
    }

    fn parse_return(&mut self) -> ParseResult<Stmt> {
        let token = self.advance();
        let value = if self.check(TokenKind::Semicolon) { None } else { Some(self.parse_expr()?) };
        self.consume(TokenKind::Semicolon, "Expect ';' after return value.")?;
        Ok(Stmt::Return { value, token })
    }

    fn parse_assert(&mut self) -> ParseResult<Stmt> {
        let token = self.advance();
        let condition = self.parse_expr()?;
        let message = if self.match_kind(TokenKind::Comma) { Some(self.parse_expr()?) } else { None };
        self.consume(TokenKind::Semicolon, "Expecting ';' after assert statement")?;
        Ok(Stmt::Assert { condition, message, token })
    }

    fn parse_expression_stmt(&mut self) -> ParseResult<Stmt> {
        let first = self.peek().clone();
        let target = self.parse_expr()?;

        let stmt = if matches!(target, Expr::Call { .. }) {
            Stmt::Expression(target)
        } else {
            self.consume(TokenKind::Assign, "This is not statement = expected")?;
            let value = self.parse_expr()?;
            match target {
                Expr::IndexAccess { object, index, .. } => {
                    Stmt::IndexSet { object: *object, index: *index, value, token: first }
                }
                Expr::Variable(name) => Stmt::Assignment { name, value },
                other => return Err(NlangError::syntax("can only assign to the variable", other.token())),
            }
        };

        self.consume(TokenKind::Semicolon, "; after expression")?;
        Ok(stmt)
    }

    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_logical()
    }

    fn parse_logical(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_equality()?;
        while let Some(op) = self.match_any(&[TokenKind::And, TokenKind::Or]) {
            let right = self.parse_equality()?;
            left = Expr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_comparison()?;
        while let Some(op) = self.match_any(&[TokenKind::EqualEqual, TokenKind::BangEqual]) {
            let right = self.parse_comparison()?;
            left = Expr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_additive()?;
        while let Some(op) = self.match_any(&[TokenKind::Greater, TokenKind::Less]) {
            let right = self.parse_additive()?;
            left = Expr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_multiplicative()?;
        while let Some(op) = self.match_any(&[TokenKind::Plus, TokenKind::Minus]) {
            let right = self.parse_multiplicative()?;
            left = Expr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_any(&[TokenKind::Star, TokenKind::Slash]) {
            let right = self.parse_unary()?;
            left = Expr::Binary { left: Box::new(left), op, right: Box::new(right) };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        if let Some(op) = self.match_any(&[TokenKind::Minus, TokenKind::Bang]) {
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary { op, operand: Box::new(operand) });
        }
        self.parse_postfix()
    }

    /// Greedily applies `.name`, `.name(args)` and `[index]` to a primary
    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.match_kind(TokenKind::Dot) {
                let name = self.consume(TokenKind::Identifier, "Expected field name after '.'")?;
                if self.match_kind(TokenKind::LParen) {
                    let args = self.parse_args()?;
                    expr = Expr::Call { callee: Some(Box::new(expr)), name, args };
                } else {
                    expr = Expr::FieldAccess { object: Box::new(expr), field: name };
                }
            } else if self.match_kind(TokenKind::LBracket) {
                let index = self.parse_expr()?;
                let token = self.previous().clone();
                self.consume(TokenKind::RBracket, "Expected ']'")?;
                expr = Expr::IndexAccess { object: Box::new(expr), index: Box::new(index), token };
            } else {
                break;
            }
        }
        Ok(expr)
    }

    /// Arguments after an already consumed `(`
    fn parse_args(&mut self) -> ParseResult<Vec<Expr>> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expr()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen, "Expect ')' after arguments.")?;
        Ok(args)
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Number => {
                self.advance();
                let value = token
                    .lexeme
                    .parse::<f64>()
                    .map_err(|_| NlangError::syntax(format!("Invalid number: {}", token.lexeme), &token))?;
                Ok(Expr::Number { value, token })
            }
            TokenKind::String => {
                self.advance();
                Ok(Expr::Str { value: token.lexeme.clone(), token })
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(Expr::Bool { value: token.kind == TokenKind::True, token })
            }
            TokenKind::Identifier => {
                self.advance();
                if self.match_kind(TokenKind::LParen) {
                    let args = self.parse_args()?;
                    Ok(Expr::Call { callee: None, name: token, args })
                } else {
                    Ok(Expr::Variable(token))
                }
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.consume(TokenKind::RParen, "Expected ')' after expression.")?;
                Ok(expr)
            }
            TokenKind::LBracket => {
                self.advance();
                self.parse_array(token)
            }
            TokenKind::LBrace => {
                self.advance();
                self.parse_object(token)
            }
            _ => Err(self.unexpected()),
        }
    }

    fn parse_array(&mut self, token: Token) -> ParseResult<Expr> {
        let mut elements = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expr()?);
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RBracket, "Expecting ] for array")?;
        Ok(Expr::ArrayLiteral { elements, token })
    }

    fn parse_object(&mut self, token: Token) -> ParseResult<Expr> {
        let mut entries = Vec::new();
        if !self.check(TokenKind::RBrace) {
            loop {
                // A bare identifier key names the field rather than a variable
                let key = if self.check(TokenKind::Identifier) && self.check_next(TokenKind::Colon) {
                    let key_token = self.advance();
                    Expr::Str { value: key_token.lexeme.clone(), token: key_token }
                } else {
                    self.parse_expr()?
                };
                self.consume(TokenKind::Colon, "Expecting ':' between key value pairs")?;
                let value = self.parse_expr()?;
                entries.push((key, value));
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RBrace, "Expecting '}' for object definition")?;
        Ok(Expr::ObjectLiteral { entries, token })
    }
}
