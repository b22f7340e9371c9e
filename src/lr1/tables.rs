//! ACTION/GOTO table synthesis and conflict resolution.
//!
//! Conflicts are resolved by keeping the shift on a shift/reduce conflict and the
//! lower production id on a reduce/reduce conflict, logging every decision; this
//! grammar carries no precedence declarations, so there is no precedence table to
//! consult first.

use std::collections::BTreeMap;

use crate::error::{ConflictReport, GeneratorError};
use crate::first::FirstSets;
use crate::grammar::Production;
use crate::lr1::canonical::{self, Collection};
use crate::lr1::item::Item;
use crate::symbol::{NonTerminalKind, Symbol, TerminalKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(u32),
    Reduce(u32),
    Accept,
}

#[derive(Debug)]
pub struct ParseTables {
    pub action: Vec<BTreeMap<TerminalKind, Action>>,
    /// Missing when the lexer-level `T_ERROR` terminal is the lookahead; the
    /// driver always treats this entry as absent.
    pub goto: Vec<BTreeMap<NonTerminalKind, u32>>,
    pub conflicts: Vec<ConflictReport>,
}

impl ParseTables {
    pub fn state_count(&self) -> usize {
        self.action.len()
    }

    pub fn describe(&self) -> String {
        let mut out = format!(
            "states: {}, conflicts: {}\n",
            self.state_count(),
            self.conflicts.len()
        );
        for c in &self.conflicts {
            out.push_str(&format!(
                "  state {} on {}: {}\n",
                c.state, c.terminal, c.description
            ));
        }
        out
    }
}

pub fn build(productions: &[Production]) -> Result<(ParseTables, Collection), GeneratorError> {
    let mut first = FirstSets::build(productions);
    let collection = canonical::build(productions, &mut first);

    let mut action: Vec<BTreeMap<TerminalKind, Action>> =
        vec![BTreeMap::new(); collection.states.len()];
    let mut goto: Vec<BTreeMap<NonTerminalKind, u32>> =
        vec![BTreeMap::new(); collection.states.len()];
    let mut conflicts = Vec::new();

    for state in &collection.states {
        for (&t, &target) in &state.shift {
            action[state.id as usize].insert(t, Action::Shift(target));
        }
        for (&nt, &target) in &state.goto {
            let slot = goto[state.id as usize].entry(nt).or_insert(target);
            if *slot != target {
                return Err(GeneratorError::GotoConflict {
                    state: state.id,
                    non_terminal: nt,
                });
            }
        }
        for item in reducible_items(state, productions) {
            if item.production_id == 0 && item.lookahead == Symbol::EndOfInput {
                action[state.id as usize].insert(terminal_or_end(item.lookahead), Action::Accept);
                continue;
            }
            let Symbol::Terminal(lookahead) = item.lookahead else {
                continue;
            };
            resolve_and_insert(
                &mut action[state.id as usize],
                state.id,
                lookahead,
                item.production_id,
                productions,
                &mut conflicts,
            );
        }
    }

    Ok((
        ParseTables {
            action,
            goto,
            conflicts,
        },
        collection,
    ))
}

fn terminal_or_end(sym: Symbol) -> TerminalKind {
    match sym {
        Symbol::Terminal(t) => t,
        Symbol::EndOfInput => TerminalKind::EndOfInput,
        _ => TerminalKind::Error,
    }
}

fn reducible_items<'a>(state: &'a crate::lr1::state::State, productions: &[Production]) -> Vec<&'a Item> {
    state
        .items
        .iter()
        .filter(|item| item.is_complete(productions))
        .collect()
}

fn resolve_and_insert(
    row: &mut BTreeMap<TerminalKind, Action>,
    state_id: u32,
    lookahead: TerminalKind,
    production_id: u32,
    _productions: &[Production],
    conflicts: &mut Vec<ConflictReport>,
) {
    match row.get(&lookahead).copied() {
        None => {
            row.insert(lookahead, Action::Reduce(production_id));
        }
        Some(Action::Shift(_)) => {
            conflicts.push(ConflictReport {
                state: state_id,
                terminal: lookahead,
                description: format!(
                    "shift/reduce conflict with reduce by production {} -- keeping shift",
                    production_id
                ),
            });
            // keep the existing shift
        }
        Some(Action::Reduce(existing)) => {
            if production_id < existing {
                conflicts.push(ConflictReport {
                    state: state_id,
                    terminal: lookahead,
                    description: format!(
                        "reduce/reduce conflict between productions {} and {} -- keeping {}",
                        existing, production_id, production_id
                    ),
                });
                row.insert(lookahead, Action::Reduce(production_id));
            } else if production_id != existing {
                conflicts.push(ConflictReport {
                    state: state_id,
                    terminal: lookahead,
                    description: format!(
                        "reduce/reduce conflict between productions {} and {} -- keeping {}",
                        existing, production_id, existing
                    ),
                });
            }
        }
        Some(Action::Accept) => {
            // Augmentation reduce colliding with Accept never happens for a
            // well-formed grammar; leave Accept in place.
        }
    }
}
