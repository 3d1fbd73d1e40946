//! ACTION/GOTO table materialization.
//!
//! The tables are dense 2-D arrays keyed by `(state, symbol id)` so the
//! driver's inner loop is a single indexed lookup per step. All conflict
//! resolution happens here, at construction time; the driver never
//! disambiguates anything.

use tracing::debug;

use subcc_util::Idx;

use crate::error::TableError;
use crate::first::FirstSets;
use crate::grammar::{Assoc, Grammar, ProdId, SymbolId};
use crate::lalr::{canonical_collection, merge_lalr, Automaton, StateId};

/// A parse action for a `(state, terminal)` pair.
///
/// `Error` doubles as the absence sentinel of the dense table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Push the state and advance the read head.
    Shift(StateId),
    /// Reduce by the production, emit its record, and take a GOTO.
    Reduce(ProdId),
    /// Parse complete.
    Accept,
    /// No entry: syntax error.
    Error,
}

/// Immutable LALR(1) ACTION/GOTO tables.
///
/// Constructed once from the grammar and thereafter read-only, so a host
/// may share them across threads for parallel parses.
#[derive(Debug)]
pub struct ParseTables {
    n_terminals: usize,
    n_nonterminals: usize,
    n_states: usize,
    action: Vec<Action>,
    goto_: Vec<Option<StateId>>,
}

/// Scratch cells during materialization. `None` is "no proposal yet";
/// `Some(Action::Error)` is a nonassoc conflict resolved to an error
/// entry, which later proposals must not revive.
struct TableBuilder<'g> {
    grammar: &'g Grammar,
    else_sym: Option<SymbolId>,
    n_terminals: usize,
    cells: Vec<Option<Action>>,
}

impl<'g> TableBuilder<'g> {
    fn new(grammar: &'g Grammar, n_states: usize) -> Self {
        let n_terminals = grammar.terminal_count();
        Self {
            grammar,
            else_sym: grammar.symbol("ELSE"),
            n_terminals,
            cells: vec![None; n_states * n_terminals],
        }
    }

    fn cell(&mut self, state: StateId, terminal: SymbolId) -> &mut Option<Action> {
        &mut self.cells[state.index() * self.n_terminals + terminal.index()]
    }

    /// Proposes an action for a cell, resolving any conflict with the
    /// entry already there.
    fn propose(
        &mut self,
        state: StateId,
        terminal: SymbolId,
        action: Action,
    ) -> Result<(), TableError> {
        let existing = *self.cell(state, terminal);
        let resolved = match (existing, action) {
            (None, new) => new,
            (Some(old), new) if old == new => old,
            // A resolved error entry is final.
            (Some(Action::Error), _) => Action::Error,
            (Some(Action::Shift(target)), Action::Reduce(prod))
            | (Some(Action::Reduce(prod)), Action::Shift(target)) => {
                self.resolve_shift_reduce(state, terminal, target, prod)?
            }
            (Some(Action::Reduce(_)), Action::Reduce(_)) => {
                return Err(TableError::ReduceReduce {
                    state: state.0,
                    lookahead: self.grammar.name(terminal).to_string(),
                });
            }
            // Accept never conflicts on a well-formed augmented grammar,
            // and the transition function has one shift target per
            // symbol, so anything left keeps the existing entry.
            (Some(old), _) => old,
        };
        *self.cell(state, terminal) = Some(resolved);
        Ok(())
    }

    /// Resolves a shift/reduce conflict between shifting `terminal` and
    /// reducing by `prod`.
    ///
    /// With both precedences present the higher level wins (shift for
    /// the terminal, reduce for the production); on a tie the terminal's
    /// associativity decides — left reduces, right shifts, nonassoc
    /// leaves an error entry. With either precedence missing the
    /// conflict is only tolerated on `ELSE`, where shifting binds the
    /// else to the innermost if.
    fn resolve_shift_reduce(
        &self,
        state: StateId,
        terminal: SymbolId,
        shift_target: StateId,
        prod: ProdId,
    ) -> Result<Action, TableError> {
        let terminal_prec = self.grammar.terminal_prec(terminal);
        let production_prec = self.grammar.production_prec(prod);

        let (tp, pp) = match (terminal_prec, production_prec) {
            (Some(tp), Some(pp)) => (tp, pp),
            _ => {
                if Some(terminal) == self.else_sym {
                    return Ok(Action::Shift(shift_target));
                }
                return Err(TableError::UnresolvedShiftReduce {
                    state: state.0,
                    terminal: self.grammar.name(terminal).to_string(),
                });
            }
        };

        let action = if tp.level > pp.level {
            Action::Shift(shift_target)
        } else if tp.level < pp.level {
            Action::Reduce(prod)
        } else {
            match tp.assoc {
                Assoc::Left => Action::Reduce(prod),
                Assoc::Right => Action::Shift(shift_target),
                Assoc::NonAssoc => Action::Error,
            }
        };
        Ok(action)
    }

    fn finish(self) -> Vec<Action> {
        self.cells
            .into_iter()
            .map(|cell| cell.unwrap_or(Action::Error))
            .collect()
    }
}

impl ParseTables {
    /// Runs the full pipeline: FIRST sets, canonical LR(1) collection,
    /// LALR(1) merge, and table materialization with precedence-directed
    /// conflict resolution.
    pub fn build(grammar: &Grammar) -> Result<ParseTables, TableError> {
        let first = FirstSets::compute(grammar);
        let canonical = canonical_collection(grammar, &first);
        debug!(states = canonical.states.len(), "canonical LR(1) collection built");
        let lalr = merge_lalr(&canonical);
        debug!(states = lalr.states.len(), "LALR(1) merge complete");
        Self::from_automaton(grammar, &lalr)
    }

    /// Materializes the tables from a merged automaton.
    fn from_automaton(grammar: &Grammar, automaton: &Automaton) -> Result<ParseTables, TableError> {
        let n_terminals = grammar.terminal_count();
        let n_nonterminals = grammar.nonterminal_count();
        let n_states = automaton.states.len();

        let mut builder = TableBuilder::new(grammar, n_states);
        let mut goto_: Vec<Option<StateId>> = vec![None; n_states * n_nonterminals];

        for (state_id, state) in automaton.states.iter_enumerated() {
            for item in state.items() {
                let production = grammar.production(item.prod);
                match production.rhs.get(item.dot as usize) {
                    Some(&sym) => {
                        let Some(&target) = automaton.transitions.get(&(state_id, sym)) else {
                            continue;
                        };
                        if grammar.is_terminal(sym) {
                            builder.propose(state_id, sym, Action::Shift(target))?;
                        } else {
                            goto_[state_id.index() * n_nonterminals
                                + grammar.nonterminal_index(sym)] = Some(target);
                        }
                    }
                    None => {
                        if production.lhs == grammar.augmented_start()
                            && item.lookahead == grammar.eof()
                        {
                            *builder.cell(state_id, item.lookahead) = Some(Action::Accept);
                        } else {
                            builder.propose(state_id, item.lookahead, Action::Reduce(item.prod))?;
                        }
                    }
                }
            }
        }

        debug!(
            states = n_states,
            terminals = n_terminals,
            nonterminals = n_nonterminals,
            "ACTION/GOTO tables materialized"
        );
        Ok(ParseTables {
            n_terminals,
            n_nonterminals,
            n_states,
            action: builder.finish(),
            goto_,
        })
    }

    /// The action for `(state, terminal)`; `Action::Error` if absent.
    pub fn action(&self, state: StateId, terminal: SymbolId) -> Action {
        self.action[state.index() * self.n_terminals + terminal.index()]
    }

    /// The GOTO target for `(state, nonterminal)`, if present.
    pub fn goto(&self, grammar: &Grammar, state: StateId, nonterminal: SymbolId) -> Option<StateId> {
        self.goto_[state.index() * self.n_nonterminals + grammar.nonterminal_index(nonterminal)]
    }

    /// Number of automaton states.
    pub fn state_count(&self) -> usize {
        self.n_states
    }

    /// Sorted names of the terminals with a defined action in `state`.
    /// This is the "expected" set cited by syntax errors.
    pub fn expected_terminals(&self, grammar: &Grammar, state: StateId) -> Vec<String> {
        let mut expected: Vec<String> = grammar
            .terminals()
            .filter(|&t| self.action(state, t) != Action::Error)
            .map(|t| grammar.name(t).to_string())
            .collect();
        expected.sort();
        expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    #[test]
    fn test_subc_tables_build_without_conflicts() {
        let grammar = Grammar::subc();
        let tables = ParseTables::build(&grammar).unwrap();
        assert!(tables.state_count() > 0);
    }

    #[test]
    fn test_state_zero_expects_external_definitions() {
        let grammar = Grammar::subc();
        let tables = ParseTables::build(&grammar).unwrap();
        let expected = tables.expected_terminals(&grammar, StateId(0));
        // An empty program is valid, so `$` is acceptable alongside the
        // starters of ext_def.
        for name in ["$", "TYPE", "VOID", "STRUCT"] {
            assert!(expected.contains(&name.to_string()), "missing {name}");
        }
        assert!(!expected.contains(&"ELSE".to_string()));
    }

    #[test]
    fn test_accept_on_eof_after_program() {
        let grammar = Grammar::subc();
        let tables = ParseTables::build(&grammar).unwrap();
        // GOTO(0, program) leads to the accepting state.
        let program = grammar.symbol("program").unwrap();
        let accept_state = tables.goto(&grammar, StateId(0), program).unwrap();
        assert_eq!(tables.action(accept_state, grammar.eof()), Action::Accept);
    }

    #[test]
    fn test_expected_terminals_are_sorted() {
        let grammar = Grammar::subc();
        let tables = ParseTables::build(&grammar).unwrap();
        for state in 0..tables.state_count() {
            let expected = tables.expected_terminals(&grammar, StateId(state as u32));
            let mut sorted = expected.clone();
            sorted.sort();
            assert_eq!(expected, sorted);
        }
    }

    #[test]
    fn test_missing_precedence_without_else_is_fatal() {
        // e -> e e | a is ambiguous; the state after `e e` both shifts
        // `a` and reduces on lookahead `a`, with no precedence anywhere.
        let grammar = Grammar::new(
            &["a"],
            &[],
            "e",
            &[("e", &["e", "e"], None), ("e", &["a"], None)],
        )
        .unwrap();
        let err = ParseTables::build(&grammar).unwrap_err();
        assert!(matches!(err, TableError::UnresolvedShiftReduce { .. }));
    }

    #[test]
    fn test_reduce_reduce_is_fatal() {
        // Two nonterminals deriving the same terminal string; on `$`
        // both reductions apply.
        let grammar = Grammar::new(
            &["a"],
            &[],
            "s",
            &[
                ("s", &["x"], None),
                ("s", &["y"], None),
                ("x", &["a"], None),
                ("y", &["a"], None),
            ],
        )
        .unwrap();
        let err = ParseTables::build(&grammar).unwrap_err();
        assert!(matches!(err, TableError::ReduceReduce { .. }));
    }

    #[test]
    fn test_nonassoc_tie_leaves_error_entry() {
        // e -> e ~ e | a with `~` declared nonassoc: after `e ~ e` the
        // second `~` must find no action while `$` still reduces.
        let grammar = Grammar::new(
            &["a", "~"],
            &[("~", 1, Assoc::NonAssoc)],
            "e",
            &[("e", &["e", "~", "e"], None), ("e", &["a"], None)],
        )
        .unwrap();
        let tables = ParseTables::build(&grammar).unwrap();
        let tilde = grammar.symbol("~").unwrap();
        let e = grammar.symbol("e").unwrap();
        let s1 = tables.goto(&grammar, StateId(0), e).unwrap();
        let s2 = match tables.action(s1, tilde) {
            Action::Shift(s) => s,
            other => panic!("expected shift on ~, got {other:?}"),
        };
        let s3 = tables.goto(&grammar, s2, e).unwrap();
        assert_eq!(tables.action(s3, tilde), Action::Error);
        assert!(matches!(
            tables.action(s3, grammar.eof()),
            Action::Reduce(_)
        ));
    }
}
