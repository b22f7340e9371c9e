//! The fixed grammar: ~50 productions over the block-language's terminals and
//! non-terminals, with the dangling-else ambiguity resolved by splitting statements
//! into matched/unmatched variants, and the classic textbook
//! `bool`/`join`/`equality`/`rel`/`expr`/`term`/`unary`/`factor` cascade for
//! expression precedence.

use crate::symbol::{NonTerminalKind::*, Symbol, Symbol::*, TerminalKind::*};

#[derive(Debug, Clone)]
pub struct Production {
    pub id: u32,
    pub lhs: crate::symbol::NonTerminalKind,
    pub rhs: Vec<Symbol>,
}

impl Production {
    pub fn is_epsilon(&self) -> bool {
        self.rhs.is_empty() || matches!(self.rhs.as_slice(), [Epsilon])
    }
}

macro_rules! prod {
    ($id:expr, $lhs:ident -> $($sym:expr),* $(,)?) => {
        Production { id: $id, lhs: $lhs, rhs: vec![$($sym),*] }
    };
}

/// Builds the production vector. `productions[0]` is always the augmentation rule
/// `S' -> program`.
pub fn productions() -> Vec<Production> {
    vec![
        prod!(0, SPrime -> NonTerminal(Program)),
        prod!(1, Program -> NonTerminal(Block)),
        prod!(2, Block -> Terminal(LBrace), NonTerminal(Decls), NonTerminal(Stmts), Terminal(RBrace)),
        prod!(3, Decls -> NonTerminal(Decls), NonTerminal(Decl)),
        prod!(4, Decls -> Epsilon),
        prod!(5, Decl -> NonTerminal(Type), Terminal(Id), Terminal(Semi)),
        prod!(6, Type -> Terminal(Basic)),
        prod!(7, Type -> NonTerminal(Type), Terminal(LBracket), Terminal(Num), Terminal(RBracket)),
        prod!(8, Stmts -> NonTerminal(Stmts), NonTerminal(Stmt)),
        prod!(9, Stmts -> Epsilon),
        prod!(10, Stmt -> NonTerminal(MatchedStmt)),
        prod!(11, Stmt -> NonTerminal(UnmatchedStmt)),
        // matched statements
        prod!(12, MatchedStmt -> Terminal(If), Terminal(LParen), NonTerminal(Bool), Terminal(RParen), NonTerminal(MatchedStmt), Terminal(Else), NonTerminal(MatchedStmt)),
        prod!(13, MatchedStmt -> Terminal(While), Terminal(LParen), NonTerminal(Bool), Terminal(RParen), NonTerminal(MatchedStmt)),
        prod!(14, MatchedStmt -> Terminal(Do), NonTerminal(MatchedStmt), Terminal(While), Terminal(LParen), NonTerminal(Bool), Terminal(RParen), Terminal(Semi)),
        prod!(15, MatchedStmt -> Terminal(Break), Terminal(Semi)),
        prod!(16, MatchedStmt -> NonTerminal(Loc), Terminal(Assign), NonTerminal(Bool), Terminal(Semi)),
        prod!(17, MatchedStmt -> NonTerminal(Block)),
        // unmatched statements
        prod!(18, UnmatchedStmt -> Terminal(If), Terminal(LParen), NonTerminal(Bool), Terminal(RParen), NonTerminal(Stmt)),
        prod!(19, UnmatchedStmt -> Terminal(If), Terminal(LParen), NonTerminal(Bool), Terminal(RParen), NonTerminal(MatchedStmt), Terminal(Else), NonTerminal(UnmatchedStmt)),
        prod!(20, UnmatchedStmt -> Terminal(While), Terminal(LParen), NonTerminal(Bool), Terminal(RParen), NonTerminal(UnmatchedStmt)),
        // locations
        prod!(21, Loc -> Terminal(Id)),
        prod!(22, Loc -> NonTerminal(Loc), Terminal(LBracket), NonTerminal(Bool), Terminal(RBracket)),
        // expression cascade
        prod!(23, Bool -> NonTerminal(Bool), Terminal(OrOr), NonTerminal(Join)),
        prod!(24, Bool -> NonTerminal(Join)),
        prod!(25, Join -> NonTerminal(Join), Terminal(AndAnd), NonTerminal(Equality)),
        prod!(26, Join -> NonTerminal(Equality)),
        prod!(27, Equality -> NonTerminal(Equality), Terminal(EqEq), NonTerminal(Rel)),
        prod!(28, Equality -> NonTerminal(Equality), Terminal(NotEq), NonTerminal(Rel)),
        prod!(29, Equality -> NonTerminal(Rel)),
        prod!(30, Rel -> NonTerminal(Expr), Terminal(Lt), NonTerminal(Expr)),
        prod!(31, Rel -> NonTerminal(Expr), Terminal(Le), NonTerminal(Expr)),
        prod!(32, Rel -> NonTerminal(Expr), Terminal(Gt), NonTerminal(Expr)),
        prod!(33, Rel -> NonTerminal(Expr), Terminal(Ge), NonTerminal(Expr)),
        prod!(34, Rel -> NonTerminal(Expr)),
        prod!(35, Expr -> NonTerminal(Expr), Terminal(Plus), NonTerminal(Term)),
        prod!(36, Expr -> NonTerminal(Expr), Terminal(Minus), NonTerminal(Term)),
        prod!(37, Expr -> NonTerminal(Term)),
        prod!(38, Term -> NonTerminal(Term), Terminal(Star), NonTerminal(Unary)),
        prod!(39, Term -> NonTerminal(Term), Terminal(Slash), NonTerminal(Unary)),
        prod!(40, Term -> NonTerminal(Unary)),
        prod!(41, Unary -> Terminal(Bang), NonTerminal(Unary)),
        prod!(42, Unary -> Terminal(Minus), NonTerminal(Unary)),
        prod!(43, Unary -> NonTerminal(Factor)),
        prod!(44, Factor -> Terminal(LParen), NonTerminal(Bool), Terminal(RParen)),
        prod!(45, Factor -> NonTerminal(Loc)),
        prod!(46, Factor -> Terminal(Num)),
        prod!(47, Factor -> Terminal(Real)),
        prod!(48, Factor -> Terminal(True)),
        prod!(49, Factor -> Terminal(False)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_zero_is_augmentation() {
        let prods = productions();
        assert_eq!(prods[0].lhs, SPrime);
        assert_eq!(prods[0].rhs, vec![NonTerminal(Program)]);
    }

    #[test]
    fn ids_are_dense_and_stable() {
        let prods = productions();
        for (i, p) in prods.iter().enumerate() {
            assert_eq!(p.id as usize, i);
        }
    }

    #[test]
    fn decls_epsilon_detected() {
        let prods = productions();
        assert!(prods[4].is_epsilon());
        assert!(!prods[3].is_epsilon());
    }
}
