//! Grammar symbols for the block-language grammar.
//!
//! Unlike the bootstrap generator this crate descends from, the grammar here is
//! fixed in code rather than authored in a `.alap` source file, so `Symbol` is a
//! closed enum over the terminals and non-terminals of `grammar.rs` instead of a
//! user-extensible symbol table.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TerminalKind {
    Id,
    Num,
    Real,
    True,
    False,
    Basic,
    If,
    Else,
    While,
    Do,
    Break,
    OrOr,
    AndAnd,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Bang,
    Assign,
    Semi,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    /// Never appears on a production right-hand side; a token that maps here
    /// always misses ACTION and triggers panic-mode recovery.
    Error,
    /// Table-row key standing in for `Symbol::EndOfInput` (`$`) -- kept distinct
    /// from `Symbol::EndOfInput` itself so FIRST-set/item code never has to treat
    /// end-of-input as an ordinary terminal.
    EndOfInput,
}

impl fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NonTerminalKind {
    SPrime,
    Program,
    Block,
    Decls,
    Decl,
    Type,
    Stmts,
    Stmt,
    MatchedStmt,
    UnmatchedStmt,
    Loc,
    Bool,
    Join,
    Equality,
    Rel,
    Expr,
    Term,
    Unary,
    Factor,
}

impl fmt::Display for NonTerminalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Terminal(TerminalKind),
    NonTerminal(NonTerminalKind),
    /// Reserved; legal only inside production right-hand sides to denote an
    /// epsilon production. Never a legal lookahead, never in a terminal's FIRST set.
    Epsilon,
    EndOfInput,
}

impl Symbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Symbol::Terminal(_) | Symbol::EndOfInput)
    }

    pub fn as_terminal(&self) -> Option<TerminalKind> {
        match self {
            Symbol::Terminal(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_non_terminal(&self) -> Option<NonTerminalKind> {
        match self {
            Symbol::NonTerminal(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Terminal(t) => write!(f, "{}", t),
            Symbol::NonTerminal(n) => write!(f, "{}", n),
            Symbol::Epsilon => write!(f, "\u{3b5}"),
            Symbol::EndOfInput => write!(f, "$"),
        }
    }
}
