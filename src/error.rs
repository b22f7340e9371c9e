//! Typed errors for every fallible boundary in the pipeline, derived with
//! `thiserror` rather than hand-rolled `Display` impls.

use thiserror::Error;

use crate::symbol::{NonTerminalKind, TerminalKind};

#[derive(Debug, Error)]
pub enum LexError {
    #[error("unrecognised input at line {line}, column {column}: {lexeme:?}")]
    NoMatch {
        lexeme: String,
        line: usize,
        column: usize,
    },
    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("syntax error at line {line}, column {column}: unexpected {found}")]
pub struct SyntaxError {
    pub line: usize,
    pub column: usize,
    pub found: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SemanticError {
    #[error("line {line}: undefined variable `{name}`")]
    UndefinedVariable { name: String, line: usize },
    #[error("line {line}: duplicate declaration of `{name}` in current scope")]
    DuplicateDeclaration { name: String, line: usize },
    #[error("line {line}: incompatible operand types `{lhs}` and `{rhs}` for `{op}`")]
    TypeMismatch {
        op: String,
        lhs: String,
        rhs: String,
        line: usize,
    },
    #[error("line {line}: `break` outside an enclosing loop")]
    BreakOutsideLoop { line: usize },
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error(
        "GOTO conflict in state {state}: non-terminal {non_terminal} already targets a \
         different state"
    )]
    GotoConflict {
        state: u32,
        non_terminal: NonTerminalKind,
    },
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("parser invariant violated: {0}")]
    Invariant(String),
    #[error("no GOTO entry for state {state} and non-terminal {non_terminal}")]
    MissingGoto {
        state: u32,
        non_terminal: NonTerminalKind,
    },
    #[error("parse failed: reached end of input while recovering from a syntax error")]
    UnrecoverableSyntaxError,
}

/// A non-fatal conflict resolved by the documented policy (closure/goto §4.3),
/// retained for the debug report rather than surfaced as an `Err`.
#[derive(Debug, Clone)]
pub struct ConflictReport {
    pub state: u32,
    pub terminal: TerminalKind,
    pub description: String,
}
