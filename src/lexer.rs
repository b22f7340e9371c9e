//! A minimal scanner that turns source text into a token stream so the CLI can
//! drive the pipeline end to end: longest-match over a regex table, the same
//! idiom a hand-written lexer for a small language typically uses, without a
//! generic handle type or separate skip-matcher plumbing.

use lazy_static::lazy_static;
use regex::Regex;

use crate::token::{Token, TokenKind};

struct Lexeme {
    kind: TokenKind,
    regex: Regex,
}

lazy_static! {
    static ref SKIP: Regex = Regex::new(r"\A(?:[ \t\r\n]+|//[^\n]*)").unwrap();
    static ref LEXEMES: Vec<Lexeme> = vec![
        Lexeme { kind: TokenKind::Float, regex: Regex::new(r"\A[0-9]+\.[0-9]+").unwrap() },
        Lexeme { kind: TokenKind::Integer, regex: Regex::new(r"\A[0-9]+").unwrap() },
        Lexeme {
            kind: TokenKind::Type,
            regex: Regex::new(r"\A(int|long|float|double|boolean|char|byte|short)\b").unwrap(),
        },
        Lexeme {
            kind: TokenKind::Reserved,
            regex: Regex::new(r"\A(if|else|while|do|break|true|false)\b").unwrap(),
        },
        Lexeme { kind: TokenKind::Identifier, regex: Regex::new(r"\A[A-Za-z_][A-Za-z0-9_]*").unwrap() },
        Lexeme { kind: TokenKind::String, regex: Regex::new("\\A\"(?:[^\"\\\\]|\\\\.)*\"").unwrap() },
        Lexeme { kind: TokenKind::Char, regex: Regex::new(r"\A'(?:[^'\\]|\\.)'").unwrap() },
        Lexeme {
            kind: TokenKind::Operator,
            regex: Regex::new(r"\A(\|\||&&|==|!=|<=|>=|[=<>+\-*/!])").unwrap(),
        },
        Lexeme { kind: TokenKind::Delimiter, regex: Regex::new(r"\A[{};\[\]()]").unwrap() },
    ];
}

/// Scans `text` into a token stream terminated by one `Eof` token. Longest match
/// wins, ties broken by declaration order; anything matching none of the above
/// becomes a single-byte `Error` token so the driver's panic-mode recovery has
/// something to skip.
pub fn scan(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut line = 1usize;
    let mut column = 1usize;
    let mut rest = text;

    while !rest.is_empty() {
        if let Some(m) = SKIP.find(rest) {
            advance_position(&mut line, &mut column, &rest[..m.end()]);
            rest = &rest[m.end()..];
            continue;
        }
        let mut best: Option<(&Lexeme, usize)> = None;
        for lexeme in LEXEMES.iter() {
            if let Some(m) = lexeme.regex.find(rest) {
                if best.map(|(_, len)| m.end() > len).unwrap_or(true) {
                    best = Some((lexeme, m.end()));
                }
            }
        }
        match best {
            Some((lexeme, len)) => {
                let text_matched = &rest[..len];
                tokens.push(Token::new(lexeme.kind, text_matched, line, column));
                advance_position(&mut line, &mut column, text_matched);
                rest = &rest[len..];
            }
            None => {
                let mut chars = rest.char_indices();
                let (_, ch) = chars.next().unwrap();
                let len = ch.len_utf8();
                tokens.push(Token::new(TokenKind::Error, &rest[..len], line, column));
                advance_position(&mut line, &mut column, &rest[..len]);
                rest = &rest[len..];
            }
        }
    }
    tokens.push(Token::new(TokenKind::Eof, "", line, column));
    tokens
}

fn advance_position(line: &mut usize, column: &mut usize, text: &str) {
    for ch in text.chars() {
        if ch == '\n' {
            *line += 1;
            *column = 1;
        } else {
            *column += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scans_simple_assignment() {
        let tokens = scan("{ int x; x = 3 + 4; }");
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Delimiter,
                TokenKind::Type,
                TokenKind::Identifier,
                TokenKind::Delimiter,
                TokenKind::Identifier,
                TokenKind::Operator,
                TokenKind::Integer,
                TokenKind::Operator,
                TokenKind::Integer,
                TokenKind::Delimiter,
                TokenKind::Delimiter,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_line_numbers_across_newlines() {
        let tokens = scan("int x;\nx = 1;");
        let x_second = &tokens[4];
        assert_eq!(x_second.line, 2);
    }

    #[test]
    fn unrecognised_byte_becomes_an_error_token() {
        let tokens = scan("x = @;");
        assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    }
}
