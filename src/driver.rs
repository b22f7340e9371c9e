//! The table-driven shift/reduce parser driver: a generic `ParseStack`/`Parser`
//! shape specialised to this one fixed grammar, with no `T`/`N`/`A` type
//! parameters, a closed `StackEntry` tagged union instead of an injected
//! attribute type, and panic-mode recovery driven by the synchronisation tokens
//! `;`/`}`.

use crate::ast::{BinaryOp, Block, Decl, Expr, Loc, Pos, Program, ShortCircuitOp, Stmt, Type, UnaryOp};
use crate::error::{DriverError, SyntaxError};
use crate::grammar::{productions, Production};
use crate::lr1::tables::{Action, ParseTables};
use crate::symbol::{Symbol, TerminalKind};
use crate::token::{token_to_terminal, Token};

#[derive(Debug)]
enum StackEntry {
    Tok(Token),
    Decls(Vec<Decl>),
    Decl(Decl),
    Type(Type),
    Stmts(Vec<Stmt>),
    Stmt(Stmt),
    Loc(Loc),
    Expr(Expr),
    Block(Block),
    Program(Program),
}

struct ParseStack {
    states: Vec<u32>,
    entries: Vec<StackEntry>,
}

impl ParseStack {
    fn new() -> Self {
        ParseStack {
            states: vec![0],
            entries: vec![],
        }
    }

    fn current_state(&self) -> u32 {
        *self.states.last().expect("state stack is never empty")
    }

    fn pop_n(&mut self, n: usize) -> Vec<StackEntry> {
        let len = self.states.len();
        self.states.truncate(len - n);
        let len = self.entries.len();
        self.entries.split_off(len - n)
    }

    fn push(&mut self, state: u32, entry: StackEntry) {
        self.states.push(state);
        self.entries.push(entry);
    }
}

pub struct ParseOutcome {
    pub program: Option<Program>,
    pub errors: Vec<SyntaxError>,
}

pub struct Parser {
    productions: Vec<Production>,
    tables: ParseTables,
}

impl Parser {
    pub fn new(tables: ParseTables) -> Self {
        Parser {
            productions: productions(),
            tables,
        }
    }

    pub fn parse(&self, tokens: &[Token]) -> Result<ParseOutcome, DriverError> {
        let mut stack = ParseStack::new();
        let mut errors = Vec::new();
        let mut cursor = 0usize;

        loop {
            let token = &tokens[cursor];
            let symbol = token_to_terminal(token);
            let terminal = match symbol {
                Symbol::EndOfInput => TerminalKind::EndOfInput,
                Symbol::Terminal(t) => t,
                _ => unreachable!("a token never maps to a non-terminal or epsilon"),
            };

            let action = self.tables.action[stack.current_state() as usize]
                .get(&terminal)
                .copied();

            match action {
                Some(Action::Accept) => {
                    let popped = stack.pop_n(1);
                    return match popped.into_iter().next() {
                        Some(StackEntry::Program(p)) => Ok(ParseOutcome {
                            program: Some(p),
                            errors,
                        }),
                        _ => Err(DriverError::Invariant(
                            "accept reached with non-Program on top of stack".into(),
                        )),
                    };
                }
                Some(Action::Shift(next_state)) => {
                    stack.push(next_state, StackEntry::Tok(token.clone()));
                    cursor += 1;
                }
                Some(Action::Reduce(production_id)) => {
                    let production = &self.productions[production_id as usize];
                    let rhs_len = if production.is_epsilon() { 0 } else { production.rhs.len() };
                    let rhs = stack.pop_n(rhs_len);
                    let entry = build_ast(production_id, rhs)?;
                    let goto = self
                        .tables
                        .goto
                        .get(stack.current_state() as usize)
                        .and_then(|row| row.get(&production.lhs))
                        .copied()
                        .ok_or(DriverError::MissingGoto {
                            state: stack.current_state(),
                            non_terminal: production.lhs,
                        })?;
                    stack.push(goto, entry);
                }
                None => {
                    errors.push(SyntaxError {
                        line: token.line,
                        column: token.column,
                        found: token.lexeme.clone(),
                    });
                    cursor = self.recover(tokens, cursor, &stack)?;
                }
            }
        }
    }

    /// Panic-mode recovery: advance the cursor until either ACTION is defined for
    /// the current parser state and the new token, or the new token is a
    /// synchronisation point (`;` or `}`), in which case it is also consumed.
    fn recover(&self, tokens: &[Token], mut cursor: usize, stack: &ParseStack) -> Result<usize, DriverError> {
        loop {
            cursor += 1;
            if cursor >= tokens.len() {
                return Err(DriverError::UnrecoverableSyntaxError);
            }
            let token = &tokens[cursor];
            let terminal = match token_to_terminal(token) {
                Symbol::EndOfInput => TerminalKind::EndOfInput,
                Symbol::Terminal(t) => t,
                _ => unreachable!(),
            };
            if self.tables.action[stack.current_state() as usize].contains_key(&terminal) {
                return Ok(cursor);
            }
            if terminal == TerminalKind::Semi || terminal == TerminalKind::RBrace {
                return Ok(cursor + 1);
            }
            if terminal == TerminalKind::EndOfInput {
                return Err(DriverError::UnrecoverableSyntaxError);
            }
        }
    }
}

fn build_ast(production_id: u32, mut rhs: Vec<StackEntry>) -> Result<StackEntry, DriverError> {
    macro_rules! bad {
        () => {
            return Err(DriverError::Invariant(format!(
                "malformed stack entries reducing production {}",
                production_id
            )))
        };
    }
    macro_rules! pop {
        ($variant:ident) => {
            match rhs.pop() {
                Some(StackEntry::$variant(v)) => v,
                _ => bad!(),
            }
        };
    }
    // rhs is in original left-to-right order; pop from the back to consume
    // right-to-left, matching the order they were pushed.
    Ok(match production_id {
        1 => {
            let block = pop!(Block);
            StackEntry::Program(Program { block })
        }
        2 => {
            let _rbrace = pop!(Tok);
            let stmts = pop!(Stmts);
            let decls = pop!(Decls);
            let lbrace = pop!(Tok);
            StackEntry::Block(Block {
                decls,
                stmts,
                pos: pos_of(&lbrace),
            })
        }
        3 => {
            let decl = pop!(Decl);
            let mut decls = pop!(Decls);
            decls.push(decl);
            StackEntry::Decls(decls)
        }
        4 => StackEntry::Decls(vec![]),
        5 => {
            let _semi = pop!(Tok);
            let id = pop!(Tok);
            let type_ = pop!(Type);
            StackEntry::Decl(Decl {
                type_,
                name: id.lexeme.clone(),
                pos: pos_of(&id),
            })
        }
        6 => {
            let basic = pop!(Tok);
            StackEntry::Type(Type::Basic(basic.lexeme.clone()))
        }
        7 => {
            let _rbracket = pop!(Tok);
            let num = pop!(Tok);
            let _lbracket = pop!(Tok);
            let elem = pop!(Type);
            let n: usize = num.lexeme.parse().map_err(|_| {
                DriverError::Invariant(format!("non-numeric array size `{}`", num.lexeme))
            })?;
            StackEntry::Type(Type::Array(Box::new(elem), n))
        }
        8 => {
            let stmt = pop!(Stmt);
            let mut stmts = pop!(Stmts);
            stmts.push(stmt);
            StackEntry::Stmts(stmts)
        }
        9 => StackEntry::Stmts(vec![]),
        10 | 11 => StackEntry::Stmt(pop!(Stmt)),
        12 | 19 => {
            let else_branch = pop!(Stmt);
            let _else_tok = pop!(Tok);
            let then_branch = pop!(Stmt);
            let _rparen = pop!(Tok);
            let cond = pop!(Expr);
            let _lparen = pop!(Tok);
            let if_tok = pop!(Tok);
            StackEntry::Stmt(Stmt::If {
                pos: pos_of(&if_tok),
                cond,
                then_branch: Box::new(then_branch),
                else_branch: Some(Box::new(else_branch)),
            })
        }
        13 | 20 => {
            let body = pop!(Stmt);
            let _rparen = pop!(Tok);
            let cond = pop!(Expr);
            let _lparen = pop!(Tok);
            let while_tok = pop!(Tok);
            StackEntry::Stmt(Stmt::While {
                pos: pos_of(&while_tok),
                cond,
                body: Box::new(body),
            })
        }
        14 => {
            let _semi = pop!(Tok);
            let _rparen = pop!(Tok);
            let cond = pop!(Expr);
            let _lparen = pop!(Tok);
            let _while_tok = pop!(Tok);
            let body = pop!(Stmt);
            let do_tok = pop!(Tok);
            StackEntry::Stmt(Stmt::DoWhile {
                pos: pos_of(&do_tok),
                body: Box::new(body),
                cond,
            })
        }
        15 => {
            let _semi = pop!(Tok);
            let break_tok = pop!(Tok);
            StackEntry::Stmt(Stmt::Break(pos_of(&break_tok)))
        }
        16 => {
            let _semi = pop!(Tok);
            let expr = pop!(Expr);
            let _assign = pop!(Tok);
            let loc = pop!(Loc);
            let pos = loc.pos();
            StackEntry::Stmt(Stmt::Assign { loc, expr, pos })
        }
        17 => StackEntry::Stmt(Stmt::Block(pop!(Block))),
        18 => {
            let then_branch = pop!(Stmt);
            let _rparen = pop!(Tok);
            let cond = pop!(Expr);
            let _lparen = pop!(Tok);
            let if_tok = pop!(Tok);
            StackEntry::Stmt(Stmt::If {
                pos: pos_of(&if_tok),
                cond,
                then_branch: Box::new(then_branch),
                else_branch: None,
            })
        }
        21 => {
            let id = pop!(Tok);
            StackEntry::Loc(Loc::Id {
                name: id.lexeme.clone(),
                pos: pos_of(&id),
            })
        }
        22 => {
            let _rbracket = pop!(Tok);
            let index = pop!(Expr);
            let _lbracket = pop!(Tok);
            let base = pop!(Loc);
            let pos = base.pos();
            StackEntry::Loc(Loc::Index {
                base: Box::new(base),
                index: Box::new(index),
                pos,
            })
        }
        23 => short_circuit(rhs, ShortCircuitOp::Or),
        24 | 26 | 29 | 34 | 37 | 40 | 43 => StackEntry::Expr(pop!(Expr)),
        25 => short_circuit(rhs, ShortCircuitOp::And),
        27 => binary(rhs, BinaryOp::Eq),
        28 => binary(rhs, BinaryOp::NotEq),
        30 => binary(rhs, BinaryOp::Lt),
        31 => binary(rhs, BinaryOp::Le),
        32 => binary(rhs, BinaryOp::Gt),
        33 => binary(rhs, BinaryOp::Ge),
        35 => binary(rhs, BinaryOp::Add),
        36 => binary(rhs, BinaryOp::Sub),
        38 => binary(rhs, BinaryOp::Mul),
        39 => binary(rhs, BinaryOp::Div),
        41 => {
            let operand = pop!(Expr);
            let bang = pop!(Tok);
            StackEntry::Expr(Expr::Unary {
                op: UnaryOp::Not,
                pos: pos_of(&bang),
                operand: Box::new(operand),
            })
        }
        42 => {
            let operand = pop!(Expr);
            let minus = pop!(Tok);
            StackEntry::Expr(Expr::Unary {
                op: UnaryOp::Neg,
                pos: pos_of(&minus),
                operand: Box::new(operand),
            })
        }
        44 => {
            let _rparen = pop!(Tok);
            let inner = pop!(Expr);
            let _lparen = pop!(Tok);
            StackEntry::Expr(Expr::Paren(Box::new(inner)))
        }
        45 => StackEntry::Expr(Expr::Loc(pop!(Loc))),
        46 => {
            let num = pop!(Tok);
            let v: i64 = num.lexeme.parse().unwrap_or(0);
            StackEntry::Expr(Expr::IntLiteral(v, pos_of(&num)))
        }
        47 => {
            let real = pop!(Tok);
            let v: f64 = real.lexeme.parse().unwrap_or(0.0);
            StackEntry::Expr(Expr::FloatLiteral(v, pos_of(&real)))
        }
        48 => {
            let tok = pop!(Tok);
            StackEntry::Expr(Expr::BoolLiteral(true, pos_of(&tok)))
        }
        49 => {
            let tok = pop!(Tok);
            StackEntry::Expr(Expr::BoolLiteral(false, pos_of(&tok)))
        }
        other => bad_production(other)?,
    })
}

fn bad_production(id: u32) -> Result<StackEntry, DriverError> {
    Err(DriverError::Invariant(format!("unknown production id {}", id)))
}

fn binary(mut rhs: Vec<StackEntry>, op: BinaryOp) -> StackEntry {
    let r = pop_expr(&mut rhs);
    let _op_tok = rhs.pop();
    let l = pop_expr(&mut rhs);
    let pos = l.pos();
    StackEntry::Expr(Expr::Binary {
        op,
        lhs: Box::new(l),
        rhs: Box::new(r),
        pos,
    })
}

fn short_circuit(mut rhs: Vec<StackEntry>, op: ShortCircuitOp) -> StackEntry {
    let r = pop_expr(&mut rhs);
    let _op_tok = rhs.pop();
    let l = pop_expr(&mut rhs);
    let pos = l.pos();
    StackEntry::Expr(Expr::ShortCircuit {
        op,
        lhs: Box::new(l),
        rhs: Box::new(r),
        pos,
    })
}

fn pop_expr(rhs: &mut Vec<StackEntry>) -> Expr {
    match rhs.pop() {
        Some(StackEntry::Expr(e)) => e,
        _ => panic!("malformed expression reduction"),
    }
}

fn pos_of(token: &Token) -> Pos {
    Pos {
        line: token.line,
        column: token.column,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lr1::tables;
    use crate::token::TokenKind;

    fn tok(kind: TokenKind, lexeme: &str, line: usize, col: usize) -> Token {
        Token::new(kind, lexeme, line, col)
    }

    fn eof(line: usize) -> Token {
        tok(TokenKind::Eof, "", line, 1)
    }

    /// `{ int x ; x = 3 + 4 ; }` -- scenario (1) from the end-to-end test set,
    /// tokenised by hand (no scanner dependency).
    fn scenario_assignment() -> Vec<Token> {
        vec![
            tok(TokenKind::Delimiter, "{", 1, 1),
            tok(TokenKind::Type, "int", 1, 3),
            tok(TokenKind::Identifier, "x", 1, 7),
            tok(TokenKind::Delimiter, ";", 1, 8),
            tok(TokenKind::Identifier, "x", 1, 10),
            tok(TokenKind::Operator, "=", 1, 12),
            tok(TokenKind::Integer, "3", 1, 14),
            tok(TokenKind::Operator, "+", 1, 16),
            tok(TokenKind::Integer, "4", 1, 18),
            tok(TokenKind::Delimiter, ";", 1, 19),
            tok(TokenKind::Delimiter, "}", 1, 21),
            eof(1),
        ]
    }

    #[test]
    fn accepts_a_simple_assignment_program() {
        let prods = productions();
        let (tables, _) = tables::build(&prods).unwrap();
        let parser = Parser::new(tables);
        let outcome = parser.parse(&scenario_assignment()).unwrap();
        assert!(outcome.errors.is_empty());
        let program = outcome.program.expect("must accept");
        assert_eq!(program.block.decls.len(), 1);
        assert_eq!(program.block.stmts.len(), 1);
    }

    #[test]
    fn dangling_else_binds_to_inner_if() {
        let prods = productions();
        let (tables, _) = tables::build(&prods).unwrap();
        let parser = Parser::new(tables);
        let tokens = vec![
            tok(TokenKind::Delimiter, "{", 1, 1),
            tok(TokenKind::Type, "int", 1, 1),
            tok(TokenKind::Identifier, "a", 1, 1),
            tok(TokenKind::Delimiter, ";", 1, 1),
            tok(TokenKind::Reserved, "if", 1, 1),
            tok(TokenKind::Delimiter, "(", 1, 1),
            tok(TokenKind::Identifier, "a", 1, 1),
            tok(TokenKind::Delimiter, ")", 1, 1),
            tok(TokenKind::Reserved, "if", 1, 1),
            tok(TokenKind::Delimiter, "(", 1, 1),
            tok(TokenKind::Identifier, "a", 1, 1),
            tok(TokenKind::Delimiter, ")", 1, 1),
            tok(TokenKind::Identifier, "a", 1, 1),
            tok(TokenKind::Operator, "=", 1, 1),
            tok(TokenKind::Integer, "1", 1, 1),
            tok(TokenKind::Delimiter, ";", 1, 1),
            tok(TokenKind::Reserved, "else", 1, 1),
            tok(TokenKind::Identifier, "a", 1, 1),
            tok(TokenKind::Operator, "=", 1, 1),
            tok(TokenKind::Integer, "2", 1, 1),
            tok(TokenKind::Delimiter, ";", 1, 1),
            tok(TokenKind::Delimiter, "}", 1, 1),
            eof(1),
        ];
        let outcome = parser.parse(&tokens).unwrap();
        assert!(outcome.errors.is_empty());
        let program = outcome.program.expect("must accept");
        match &program.block.stmts[0] {
            Stmt::If { else_branch, then_branch, .. } => {
                assert!(else_branch.is_none(), "outer if has no else");
                match then_branch.as_ref() {
                    Stmt::If { else_branch: Some(_), .. } => {}
                    other => panic!("expected inner if/else, got {:?}", other),
                }
            }
            other => panic!("expected outer if, got {:?}", other),
        }
    }
}
