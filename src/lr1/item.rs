//! LR(1) items and item sets, kept as a `BTreeSet` of `(production, dot,
//! lookahead)` triples for deterministic closure/goto construction.

use std::collections::BTreeSet;

use crate::first::FirstSets;
use crate::grammar::Production;
use crate::symbol::Symbol;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production_id: u32,
    pub dot: usize,
    pub lookahead: Symbol,
}

impl Item {
    pub fn new(production_id: u32, dot: usize, lookahead: Symbol) -> Self {
        Item {
            production_id,
            dot,
            lookahead,
        }
    }

    /// The symbol immediately after the dot, or `None` when the dot is final.
    pub fn next_symbol(&self, productions: &[Production]) -> Option<Symbol> {
        let p = &productions[self.production_id as usize];
        if p.is_epsilon() {
            return None;
        }
        p.rhs.get(self.dot).copied()
    }

    pub fn rest_after_next(&self, productions: &[Production]) -> Vec<Symbol> {
        let p = &productions[self.production_id as usize];
        if self.dot + 1 >= p.rhs.len() {
            vec![]
        } else {
            p.rhs[self.dot + 1..].to_vec()
        }
    }

    /// True when the dot has passed the last rhs symbol, or the production is an
    /// epsilon production (dot sits at 0 with no symbols to its left).
    pub fn is_complete(&self, productions: &[Production]) -> bool {
        let p = &productions[self.production_id as usize];
        if p.is_epsilon() {
            true
        } else {
            self.dot >= p.rhs.len()
        }
    }

    pub fn shifted(&self) -> Item {
        Item::new(self.production_id, self.dot + 1, self.lookahead)
    }
}

pub type ItemSet = BTreeSet<Item>;

/// Expands `seed` by closure: for every item with the dot before a non-terminal B,
/// add every B-production at dot 0 with lookahead FIRST(rest-of-rhs, current-lookahead).
pub fn closure(seed: ItemSet, productions: &[Production], first: &mut FirstSets) -> ItemSet {
    let mut items: ItemSet = seed;
    loop {
        let mut additions = Vec::new();
        for item in items.iter() {
            let Some(Symbol::NonTerminal(b)) = item.next_symbol(productions) else {
                continue;
            };
            let beta = item.rest_after_next(productions);
            let lookaheads = first.of_tail(&beta, item.lookahead);
            for p in productions.iter().filter(|p| p.lhs == b) {
                for &la in lookaheads.iter() {
                    let new_item = Item::new(p.id, 0, la);
                    if !items.contains(&new_item) {
                        additions.push(new_item);
                    }
                }
            }
        }
        if additions.is_empty() {
            break;
        }
        for item in additions {
            items.insert(item);
        }
    }
    items
}

/// `goto(I, X)`: the closure of the kernel obtained by shifting every item in `I`
/// whose next symbol is `X`.
pub fn goto(items: &ItemSet, x: Symbol, productions: &[Production], first: &mut FirstSets) -> ItemSet {
    let kernel: ItemSet = items
        .iter()
        .filter(|item| item.next_symbol(productions) == Some(x))
        .map(Item::shifted)
        .collect();
    closure(kernel, productions, first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::productions;
    use crate::symbol::{NonTerminalKind::*, TerminalKind::*};

    #[test]
    fn closure_of_initial_item_includes_program_and_block() {
        let prods = productions();
        let mut first = FirstSets::build(&prods);
        let mut seed = ItemSet::new();
        seed.insert(Item::new(0, 0, Symbol::EndOfInput));
        let closed = closure(seed, &prods, &mut first);
        assert!(closed
            .iter()
            .any(|i| prods[i.production_id as usize].lhs == Program));
        assert!(closed
            .iter()
            .any(|i| prods[i.production_id as usize].lhs == Block));
    }

    #[test]
    fn goto_on_lbrace_reaches_decls_and_stmts_items() {
        let prods = productions();
        let mut first = FirstSets::build(&prods);
        let mut seed = ItemSet::new();
        seed.insert(Item::new(0, 0, Symbol::EndOfInput));
        let i0 = closure(seed, &prods, &mut first);
        let i1 = goto(&i0, Symbol::Terminal(LBrace), &prods, &mut first);
        assert!(i1
            .iter()
            .any(|i| prods[i.production_id as usize].lhs == Decls));
    }
}
