//! Token shape consumed by the parser driver, and the token-to-terminal mapping.
//!
//! The scanner that produces these (see `lexer.rs`) sits outside the table-driven
//! driver as its own layer. Position is a plain `line`/`column` pair since this
//! crate has no multi-stream token injection to account for.

use std::fmt;

use crate::symbol::{Symbol, TerminalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenKind {
    Eof,
    Error,
    Identifier,
    Integer,
    Float,
    Type,
    Reserved,
    Operator,
    Delimiter,
    String,
    Char,
}

/// A lexeme tagged with its coarse kind, its exact text, and source position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?}) at {}:{}", self.kind, self.lexeme, self.line, self.column)
    }
}

const BASIC_TYPES: &[&str] = &[
    "int", "long", "float", "double", "boolean", "char", "byte", "short",
];

/// Centralised lexer-to-grammar mapping: a lexer change should only ever need
/// to touch this function.
pub fn token_to_terminal(token: &Token) -> Symbol {
    use TokenKind::*;
    let terminal = match token.kind {
        Eof => return Symbol::EndOfInput,
        Error => TerminalKind::Error,
        Identifier => TerminalKind::Id,
        Integer => TerminalKind::Num,
        Float => TerminalKind::Real,
        Type => {
            if BASIC_TYPES.contains(&token.lexeme.as_str()) {
                TerminalKind::Basic
            } else {
                TerminalKind::Error
            }
        }
        Reserved => match token.lexeme.as_str() {
            "if" => TerminalKind::If,
            "else" => TerminalKind::Else,
            "while" => TerminalKind::While,
            "do" => TerminalKind::Do,
            "break" => TerminalKind::Break,
            "true" => TerminalKind::True,
            "false" => TerminalKind::False,
            _ => TerminalKind::Error,
        },
        Operator => match token.lexeme.as_str() {
            "=" => TerminalKind::Assign,
            "||" => TerminalKind::OrOr,
            "&&" => TerminalKind::AndAnd,
            "==" => TerminalKind::EqEq,
            "!=" => TerminalKind::NotEq,
            "<" => TerminalKind::Lt,
            "<=" => TerminalKind::Le,
            ">" => TerminalKind::Gt,
            ">=" => TerminalKind::Ge,
            "+" => TerminalKind::Plus,
            "-" => TerminalKind::Minus,
            "*" => TerminalKind::Star,
            "/" => TerminalKind::Slash,
            "!" => TerminalKind::Bang,
            _ => TerminalKind::Error,
        },
        Delimiter => match token.lexeme.as_str() {
            "{" => TerminalKind::LBrace,
            "}" => TerminalKind::RBrace,
            ";" => TerminalKind::Semi,
            "[" => TerminalKind::LBracket,
            "]" => TerminalKind::RBracket,
            "(" => TerminalKind::LParen,
            ")" => TerminalKind::RParen,
            _ => TerminalKind::Error,
        },
        String | Char => TerminalKind::Error,
    };
    Symbol::Terminal(terminal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_basic_type() {
        let t = Token::new(TokenKind::Type, "int", 1, 1);
        assert_eq!(token_to_terminal(&t), Symbol::Terminal(TerminalKind::Basic));
    }

    #[test]
    fn maps_unknown_type_to_error() {
        let t = Token::new(TokenKind::Type, "widget", 1, 1);
        assert_eq!(token_to_terminal(&t), Symbol::Terminal(TerminalKind::Error));
    }

    #[test]
    fn maps_eof() {
        let t = Token::new(TokenKind::Eof, "", 9, 1);
        assert_eq!(token_to_terminal(&t), Symbol::EndOfInput);
    }

    #[test]
    fn maps_string_literal_to_error() {
        let t = Token::new(TokenKind::String, "\"hi\"", 1, 1);
        assert_eq!(token_to_terminal(&t), Symbol::Terminal(TerminalKind::Error));
    }
}
