//! FIRST-set fixpoint computation.

use std::collections::{BTreeSet, HashMap};

use crate::grammar::Production;
use crate::symbol::{NonTerminalKind, Symbol};

#[derive(Debug, Default)]
pub struct FirstSets {
    sets: HashMap<NonTerminalKind, BTreeSet<Symbol>>,
    cache: HashMap<(Vec<Symbol>, Symbol), BTreeSet<Symbol>>,
}

impl FirstSets {
    /// Computes FIRST(A) for every non-terminal in `productions` by Kleene
    /// iteration to fixpoint: sets only grow, so termination is guaranteed by the
    /// finite number of terminals.
    pub fn build(productions: &[Production]) -> Self {
        let mut sets: HashMap<NonTerminalKind, BTreeSet<Symbol>> = HashMap::new();
        for p in productions {
            sets.entry(p.lhs).or_default();
        }
        loop {
            let mut changed = false;
            for p in productions {
                let addition = first_of_sequence(&p.rhs, &sets);
                let entry = sets.entry(p.lhs).or_default();
                for sym in addition {
                    if entry.insert(sym) {
                        changed = true;
                    }
                }
            }
            if !changed {
                break;
            }
        }
        FirstSets {
            sets,
            cache: HashMap::new(),
        }
    }

    pub fn of_non_terminal(&self, nt: NonTerminalKind) -> &BTreeSet<Symbol> {
        static EMPTY: std::sync::OnceLock<BTreeSet<Symbol>> = std::sync::OnceLock::new();
        self.sets
            .get(&nt)
            .unwrap_or_else(|| EMPTY.get_or_init(BTreeSet::new))
    }

    pub fn of_symbol(&self, sym: Symbol) -> BTreeSet<Symbol> {
        match sym {
            Symbol::Terminal(_) | Symbol::EndOfInput => {
                let mut s = BTreeSet::new();
                s.insert(sym);
                s
            }
            Symbol::NonTerminal(nt) => self.of_non_terminal(nt).clone(),
            Symbol::Epsilon => BTreeSet::new(),
        }
    }

    /// FIRST(βa): FIRST of the remaining right-hand-side tail `beta` followed by
    /// lookahead `lookahead`. Memoised since closure() calls this for every item.
    pub fn of_tail(&mut self, beta: &[Symbol], lookahead: Symbol) -> BTreeSet<Symbol> {
        let key = (beta.to_vec(), lookahead);
        if let Some(cached) = self.cache.get(&key) {
            return cached.clone();
        }
        let result = self.compute_of_tail(beta, lookahead);
        self.cache.insert(key, result.clone());
        result
    }

    fn compute_of_tail(&self, beta: &[Symbol], lookahead: Symbol) -> BTreeSet<Symbol> {
        let mut result = BTreeSet::new();
        let mut all_nullable = true;
        for &sym in beta {
            let first = self.of_symbol(sym);
            for &s in first.iter() {
                if s != Symbol::Epsilon {
                    result.insert(s);
                }
            }
            if !first.contains(&Symbol::Epsilon) {
                all_nullable = false;
                break;
            }
        }
        if all_nullable {
            result.insert(lookahead);
        }
        result
    }
}

fn first_of_sequence(
    rhs: &[Symbol],
    sets: &HashMap<NonTerminalKind, BTreeSet<Symbol>>,
) -> BTreeSet<Symbol> {
    if rhs.is_empty() || matches!(rhs, [Symbol::Epsilon]) {
        let mut s = BTreeSet::new();
        s.insert(Symbol::Epsilon);
        return s;
    }
    let mut result = BTreeSet::new();
    let mut all_nullable = true;
    for &sym in rhs {
        let first = match sym {
            Symbol::Terminal(_) | Symbol::EndOfInput => {
                let mut s = BTreeSet::new();
                s.insert(sym);
                s
            }
            Symbol::NonTerminal(nt) => sets.get(&nt).cloned().unwrap_or_default(),
            Symbol::Epsilon => BTreeSet::new(),
        };
        for &s in first.iter() {
            if s != Symbol::Epsilon {
                result.insert(s);
            }
        }
        if !first.contains(&Symbol::Epsilon) {
            all_nullable = false;
            break;
        }
    }
    if all_nullable {
        result.insert(Symbol::Epsilon);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::productions;
    use crate::symbol::{NonTerminalKind::*, TerminalKind::*};

    #[test]
    fn first_of_expr_is_arithmetic_prefixes() {
        let prods = productions();
        let first = FirstSets::build(&prods);
        let f = first.of_non_terminal(Expr);
        assert!(f.contains(&Symbol::Terminal(Id)));
        assert!(f.contains(&Symbol::Terminal(Num)));
        assert!(f.contains(&Symbol::Terminal(LParen)));
        assert!(f.contains(&Symbol::Terminal(Minus)));
        assert!(!f.contains(&Symbol::Terminal(If)));
    }

    #[test]
    fn first_of_decls_contains_epsilon_via_basic() {
        let prods = productions();
        let first = FirstSets::build(&prods);
        // Decls can derive epsilon; FIRST(Decls) itself never stores epsilon in our
        // representation -- first_of_sequence of an empty production yields {eps},
        // but that's folded into FIRST(Stmts)'s computations, not FIRST(Decls).
        let f = first.of_non_terminal(Decl);
        assert!(f.contains(&Symbol::Terminal(Basic)));
    }

    #[test]
    fn of_tail_includes_lookahead_when_all_nullable() {
        let prods = productions();
        let mut first = FirstSets::build(&prods);
        let result = first.of_tail(&[], Symbol::EndOfInput);
        assert!(result.contains(&Symbol::EndOfInput));
    }
}
