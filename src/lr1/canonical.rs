//! Canonical LR(1) collection construction: seed with the closure of the
//! augmented start item, then repeatedly goto on every grammar symbol, merging
//! newly-produced item sets into existing states by item-set equality (§4.3).

use std::collections::HashMap;

use crate::first::FirstSets;
use crate::grammar::Production;
use crate::lr1::item::{closure, goto, Item, ItemSet};
use crate::lr1::state::State;
use crate::symbol::Symbol;

/// All terminals and non-terminals that legally appear on a production rhs --
/// iterated for each state's goto computation. Epsilon is excluded: it is never
/// a grammar symbol a state transitions on.
fn all_symbols(productions: &[Production]) -> Vec<Symbol> {
    let mut terminals = std::collections::BTreeSet::new();
    let mut non_terminals = std::collections::BTreeSet::new();
    for p in productions {
        non_terminals.insert(p.lhs);
        for &s in &p.rhs {
            match s {
                Symbol::Terminal(t) => {
                    terminals.insert(t);
                }
                Symbol::NonTerminal(n) => {
                    non_terminals.insert(n);
                }
                Symbol::Epsilon | Symbol::EndOfInput => {}
            }
        }
    }
    let mut out: Vec<Symbol> = terminals.into_iter().map(Symbol::Terminal).collect();
    out.extend(non_terminals.into_iter().map(Symbol::NonTerminal));
    out
}

pub struct Collection {
    pub states: Vec<State>,
}

/// Builds the canonical collection. State 0 is the closure of
/// `[S' -> . program, $]`.
pub fn build(productions: &[Production], first: &mut FirstSets) -> Collection {
    let mut seed = ItemSet::new();
    seed.insert(Item::new(0, 0, Symbol::EndOfInput));
    let initial = closure(seed, productions, first);

    let symbols = all_symbols(productions);

    let mut states = vec![State::new(0, initial.clone())];
    let mut index_of: HashMap<ItemSet, u32> = HashMap::new();
    index_of.insert(initial, 0);

    let mut worklist: Vec<u32> = vec![0];
    while let Some(state_id) = worklist.pop() {
        let items = states[state_id as usize].items.clone();
        for &x in &symbols {
            let target_items = goto(&items, x, productions, first);
            if target_items.is_empty() {
                continue;
            }
            let target_id = if let Some(&existing) = index_of.get(&target_items) {
                existing
            } else {
                let new_id = states.len() as u32;
                index_of.insert(target_items.clone(), new_id);
                states.push(State::new(new_id, target_items));
                worklist.push(new_id);
                new_id
            };
            match x {
                Symbol::Terminal(t) => {
                    states[state_id as usize].shift.insert(t, target_id);
                }
                Symbol::NonTerminal(n) => {
                    states[state_id as usize].goto.insert(n, target_id);
                }
                Symbol::Epsilon | Symbol::EndOfInput => unreachable!(),
            }
        }
    }

    Collection { states }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::productions;
    use crate::symbol::TerminalKind;

    #[test]
    fn no_two_states_share_identical_item_contents() {
        let prods = productions();
        let mut first = FirstSets::build(&prods);
        let collection = build(&prods, &mut first);
        for i in 0..collection.states.len() {
            for j in (i + 1)..collection.states.len() {
                assert_ne!(collection.states[i].items, collection.states[j].items);
            }
        }
    }

    #[test]
    fn state_zero_has_a_shift_on_lbrace() {
        let prods = productions();
        let mut first = FirstSets::build(&prods);
        let collection = build(&prods, &mut first);
        assert!(collection.states[0]
            .shift
            .contains_key(&TerminalKind::LBrace));
    }

    #[test]
    fn collection_is_finite_and_nonempty() {
        let prods = productions();
        let mut first = FirstSets::build(&prods);
        let collection = build(&prods, &mut first);
        assert!(!collection.states.is_empty());
        assert!(collection.states.len() < 1000);
    }
}
