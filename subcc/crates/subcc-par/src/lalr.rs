//! Canonical LR(1) collection and LALR(1) merge.
//!
//! States are sets of LR(1) items. The canonical collection identifies
//! states by their full item set (content hash over the sorted packed
//! triples); the LALR merge then partitions the canonical states by
//! *core* — the item set with lookaheads dropped — and unions the
//! lookaheads of each partition.

use indexmap::{IndexMap, IndexSet};
use subcc_util::{define_idx, FxHashMap, FxHashSet, IndexVec};

use crate::first::FirstSets;
use crate::grammar::{Grammar, ProdId, SymbolId};

define_idx!(
    /// Automaton state index. State 0 is the start state.
    StateId
);

/// An LR(1) item: a production, a dot position, and a lookahead
/// terminal. Plain value semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    /// The production.
    pub prod: ProdId,
    /// Dot position in `0..=rhs.len()`.
    pub dot: u16,
    /// Lookahead terminal.
    pub lookahead: SymbolId,
}

impl Item {
    /// The item's core: production and dot, lookahead dropped.
    pub fn core(self) -> (ProdId, u16) {
        (self.prod, self.dot)
    }
}

/// An unordered set of LR(1) items, stored as a sorted, deduplicated
/// array so equal sets hash and compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ItemSet {
    items: Vec<Item>,
}

impl ItemSet {
    fn from_items(mut items: Vec<Item>) -> ItemSet {
        items.sort_unstable();
        items.dedup();
        ItemSet { items }
    }

    /// The items, in sorted order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The state's core: sorted `(production, dot)` pairs with
    /// duplicates dropped.
    pub fn core(&self) -> Vec<(ProdId, u16)> {
        let mut core: Vec<_> = self.items.iter().map(|item| item.core()).collect();
        core.dedup();
        core
    }
}

/// The LR automaton: states plus the transition function.
pub struct Automaton {
    /// The states; index order is discovery order.
    pub states: IndexVec<StateId, ItemSet>,
    /// `(state, symbol) -> state` transitions for both terminals and
    /// nonterminals.
    pub transitions: FxHashMap<(StateId, SymbolId), StateId>,
}

/// The closure of an item set.
///
/// For every item `A -> α • B β, a` with nonterminal `B`, adds
/// `B -> • γ, b` for each production of `B` and each
/// `b ∈ FIRST(β a)`.
pub fn closure(grammar: &Grammar, first: &FirstSets, seed: Vec<Item>) -> ItemSet {
    let mut set: FxHashSet<Item> = seed.iter().copied().collect();
    let mut queue: Vec<Item> = seed;

    while let Some(item) = queue.pop() {
        let production = grammar.production(item.prod);
        let Some(&next) = production.rhs.get(item.dot as usize) else {
            continue;
        };
        if grammar.is_terminal(next) {
            continue;
        }
        let beta = &production.rhs[item.dot as usize + 1..];
        let lookaheads = first.first_with_lookahead(grammar, beta, item.lookahead);
        for &prod in grammar.productions_for(next) {
            for &lookahead in &lookaheads {
                let new_item = Item {
                    prod,
                    dot: 0,
                    lookahead,
                };
                if set.insert(new_item) {
                    queue.push(new_item);
                }
            }
        }
    }

    ItemSet::from_items(set.into_iter().collect())
}

/// GOTO(I, X): the closure of the items of `I` with the dot advanced
/// past `X`. `None` if no item has `X` after its dot.
pub fn goto(grammar: &Grammar, first: &FirstSets, set: &ItemSet, sym: SymbolId) -> Option<ItemSet> {
    let shifted: Vec<Item> = set
        .items()
        .iter()
        .filter(|item| {
            grammar.production(item.prod).rhs.get(item.dot as usize) == Some(&sym)
        })
        .map(|item| Item {
            prod: item.prod,
            dot: item.dot + 1,
            lookahead: item.lookahead,
        })
        .collect();
    if shifted.is_empty() {
        return None;
    }
    Some(closure(grammar, first, shifted))
}

/// Builds the canonical LR(1) collection breadth-first from the closure
/// of `{ start' -> • start, $ }`.
pub fn canonical_collection(grammar: &Grammar, first: &FirstSets) -> Automaton {
    let start_item = Item {
        prod: ProdId(0),
        dot: 0,
        lookahead: grammar.eof(),
    };
    let start_state = closure(grammar, first, vec![start_item]);

    let mut states: IndexSet<ItemSet> = IndexSet::new();
    states.insert(start_state);
    let mut transitions: FxHashMap<(StateId, SymbolId), StateId> = FxHashMap::default();

    let mut cursor = 0;
    while cursor < states.len() {
        let state_id = StateId(cursor as u32);
        let state = states
            .get_index(cursor)
            .expect("cursor is bounded by states.len()")
            .clone();
        cursor += 1;

        // Symbols with an item dot before them, in symbol-id order for
        // deterministic state numbering.
        let mut symbols: Vec<SymbolId> = state
            .items()
            .iter()
            .filter_map(|item| {
                grammar
                    .production(item.prod)
                    .rhs
                    .get(item.dot as usize)
                    .copied()
            })
            .collect();
        symbols.sort_unstable();
        symbols.dedup();

        for sym in symbols {
            let Some(target) = goto(grammar, first, &state, sym) else {
                continue;
            };
            let (target_index, _) = states.insert_full(target);
            transitions.insert((state_id, sym), StateId(target_index as u32));
        }
    }

    Automaton {
        states: states.into_iter().collect(),
        transitions,
    }
}

/// Merges a canonical LR(1) automaton into its LALR(1) quotient.
///
/// States with identical cores collapse into one state whose items are
/// the union of the class members' items (identical cores, unioned
/// lookaheads). Transitions are rewritten through the old-to-new map;
/// by construction same-core states transition to same-core states, so
/// the rewrite is well defined.
pub fn merge_lalr(automaton: &Automaton) -> Automaton {
    let mut merged: IndexMap<Vec<(ProdId, u16)>, Vec<Item>> = IndexMap::new();
    let mut old_to_new: IndexVec<StateId, StateId> = IndexVec::new();

    for state in automaton.states.iter() {
        let core = state.core();
        let entry = merged.entry(core);
        let new_id = StateId(entry.index() as u32);
        entry.or_default().extend_from_slice(state.items());
        old_to_new.push(new_id);
    }

    let states: IndexVec<StateId, ItemSet> = merged
        .into_values()
        .map(ItemSet::from_items)
        .collect();

    let mut transitions: FxHashMap<(StateId, SymbolId), StateId> = FxHashMap::default();
    for (&(from, sym), &to) in &automaton.transitions {
        transitions.insert((old_to_new[from], sym), old_to_new[to]);
    }

    Automaton {
        states,
        transitions,
    }
}
