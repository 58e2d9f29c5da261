// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the NLang scripting language.
//
// Expressions (Expr) produce values, statements (Stmt) perform actions and
// control flow. Every node keeps a source token so runtime errors can be
// attributed to a line and column.

use crate::lexer::Token;
use std::rc::Rc;

/// Represents an expression in NLang - something that evaluates to a value
#[derive(Debug, Clone)]
pub enum Expr {
    Number {
        value: f64,
        token: Token,
    },
    Str {
        value: String,
        token: Token,
    },
    Bool {
        value: bool,
        token: Token,
    },
    Variable(Token),
    Unary {
        op: Token,
        operand: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        op: Token,
        right: Box<Expr>,
    },
    ArrayLiteral {
        elements: Vec<Expr>,
        token: Token,
    },
    /// Ordered key/value expressions; keys are coerced to strings at runtime
    ObjectLiteral {
        entries: Vec<(Expr, Expr)>,
        token: Token,
    },
    IndexAccess {
        object: Box<Expr>,
        index: Box<Expr>,
        token: Token,
    },
    FieldAccess {
        object: Box<Expr>,
        field: Token,
    },
    /// `name(args)` when `callee` is None, `callee.name(args)` otherwise
    Call {
        callee: Option<Box<Expr>>,
        name: Token,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// The token errors raised while evaluating this node are attributed to
    pub fn token(&self) -> &Token {
        match self {
            Expr::Number { token, .. }
            | Expr::Str { token, .. }
            | Expr::Bool { token, .. }
            | Expr::ArrayLiteral { token, .. }
            | Expr::ObjectLiteral { token, .. }
            | Expr::IndexAccess { token, .. } => token,
            Expr::Variable(token) => token,
            Expr::Unary { op, .. } | Expr::Binary { op, .. } => op,
            Expr::FieldAccess { field, .. } => field,
            Expr::Call { name, .. } => name,
        }
    }
}

/// A user-defined function, shared between the AST and every scope that registers it
#[derive(Debug)]
pub struct FunctionDef {
    pub name: Token,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

/// Represents a statement in NLang - an action or control flow construct
#[derive(Debug, Clone)]
pub enum Stmt {
    Expression(Expr),
    VarDeclaration {
        name: Token,
        value: Expr,
    },
    Assignment {
        name: Token,
        value: Expr,
    },
    IndexSet {
        object: Expr,
        index: Expr,
        value: Expr,
        token: Token,
    },
    Block(Vec<Stmt>),
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        token: Token,
    },
    ForRange {
        start: Expr,
        end: Expr,
        inclusive: bool,
        index_var: Token,
        body: Vec<Stmt>,
    },
    ForIn {
        var: Token,
        index_var: Token,
        iterable: Expr,
        body: Vec<Stmt>,
    },
    FunctionDef(Rc<FunctionDef>),
    Return {
        value: Option<Expr>,
        token: Token,
    },
    Print {
        args: Vec<Expr>,
        token: Token,
    },
    Assert {
        condition: Expr,
        message: Option<Expr>,
        token: Token,
    },
}
