//! FIRST sets.
//!
//! Standard fixed-point computation over the productions. Nullability is
//! tracked as a separate set rather than an epsilon pseudo-terminal in
//! the FIRST sets themselves.

use subcc_util::{FxHashMap, FxHashSet};

use crate::grammar::{Grammar, SymbolId};

/// FIRST sets for every nonterminal of a grammar, plus nullability.
pub struct FirstSets {
    first: FxHashMap<SymbolId, FxHashSet<SymbolId>>,
    nullable: FxHashSet<SymbolId>,
}

impl FirstSets {
    /// Computes the FIRST sets of `grammar` by fixed point.
    ///
    /// For each production `A -> X1 X2 … Xn`, `FIRST(X1)` (minus epsilon)
    /// flows into `FIRST(A)`; if `X1` is nullable the flow continues
    /// with `X2`, and so on. `A` is nullable when some production's rhs
    /// is entirely nullable.
    pub fn compute(grammar: &Grammar) -> FirstSets {
        let mut first: FxHashMap<SymbolId, FxHashSet<SymbolId>> = FxHashMap::default();
        let mut nullable: FxHashSet<SymbolId> = FxHashSet::default();
        for production in grammar.productions() {
            first.entry(production.lhs).or_default();
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in grammar.productions() {
                let mut nullable_prefix = true;
                let mut additions: Vec<SymbolId> = Vec::new();
                for &sym in &production.rhs {
                    if grammar.is_terminal(sym) {
                        additions.push(sym);
                        nullable_prefix = false;
                        break;
                    }
                    if let Some(set) = first.get(&sym) {
                        additions.extend(set.iter().copied());
                    }
                    if !nullable.contains(&sym) {
                        nullable_prefix = false;
                        break;
                    }
                }

                let lhs_set = first.entry(production.lhs).or_default();
                for sym in additions {
                    changed |= lhs_set.insert(sym);
                }
                if nullable_prefix {
                    changed |= nullable.insert(production.lhs);
                }
            }
        }

        FirstSets { first, nullable }
    }

    /// The FIRST set of a single symbol. For a terminal this is the
    /// terminal itself.
    pub fn first_of(&self, grammar: &Grammar, sym: SymbolId) -> FxHashSet<SymbolId> {
        if grammar.is_terminal(sym) {
            let mut set = FxHashSet::default();
            set.insert(sym);
            set
        } else {
            self.first.get(&sym).cloned().unwrap_or_default()
        }
    }

    /// True if `sym` derives the empty string.
    pub fn is_nullable(&self, sym: SymbolId) -> bool {
        self.nullable.contains(&sym)
    }

    /// FIRST of a symbol sequence, and whether the whole sequence is
    /// nullable.
    pub fn first_of_sequence(
        &self,
        grammar: &Grammar,
        seq: &[SymbolId],
    ) -> (FxHashSet<SymbolId>, bool) {
        let mut result = FxHashSet::default();
        for &sym in seq {
            if grammar.is_terminal(sym) {
                result.insert(sym);
                return (result, false);
            }
            if let Some(set) = self.first.get(&sym) {
                result.extend(set.iter().copied());
            }
            if !self.nullable.contains(&sym) {
                return (result, false);
            }
        }
        (result, true)
    }

    /// FIRST of `seq` followed by the single terminal `lookahead`:
    /// the lookahead set for closure items.
    pub fn first_with_lookahead(
        &self,
        grammar: &Grammar,
        seq: &[SymbolId],
        lookahead: SymbolId,
    ) -> FxHashSet<SymbolId> {
        let (mut set, nullable) = self.first_of_sequence(grammar, seq);
        if nullable {
            set.insert(lookahead);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;

    fn subc_first() -> (Grammar, FirstSets) {
        let grammar = Grammar::subc();
        let first = FirstSets::compute(&grammar);
        (grammar, first)
    }

    fn names(grammar: &Grammar, set: &FxHashSet<SymbolId>) -> Vec<String> {
        let mut v: Vec<String> = set.iter().map(|&s| grammar.name(s).to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_first_of_type_specifier() {
        let (grammar, first) = subc_first();
        let sym = grammar.symbol("type_specifier").unwrap();
        assert_eq!(
            names(&grammar, &first.first_of(&grammar, sym)),
            vec!["STRUCT", "TYPE", "VOID"]
        );
        assert!(!first.is_nullable(sym));
    }

    #[test]
    fn test_nullable_nonterminals() {
        let (grammar, first) = subc_first();
        for name in ["ext_def_list", "def_list", "stmt_list", "pointers", "expr_e"] {
            assert!(
                first.is_nullable(grammar.symbol(name).unwrap()),
                "{name} should be nullable"
            );
        }
        for name in ["program'", "ext_def", "stmt", "expr", "binary", "unary"] {
            assert!(
                !first.is_nullable(grammar.symbol(name).unwrap()),
                "{name} should not be nullable"
            );
        }
    }

    #[test]
    fn test_program_is_nullable_via_empty_ext_def_list() {
        let (grammar, first) = subc_first();
        assert!(first.is_nullable(grammar.symbol("program").unwrap()));
        assert!(first.is_nullable(grammar.augmented_start()));
    }

    #[test]
    fn test_first_soundness_per_production() {
        // FIRST(rhs) is always a subset of FIRST(lhs), and the lhs is
        // nullable whenever the rhs is.
        let (grammar, first) = subc_first();
        for production in grammar.productions() {
            let lhs_first = first.first_of(&grammar, production.lhs);
            let (rhs_first, rhs_nullable) = first.first_of_sequence(&grammar, &production.rhs);
            for sym in &rhs_first {
                assert!(
                    lhs_first.contains(sym),
                    "FIRST({}) is missing {} from production {:?}",
                    grammar.name(production.lhs),
                    grammar.name(*sym),
                    production.id,
                );
            }
            if rhs_nullable {
                assert!(first.is_nullable(production.lhs));
            }
        }
    }

    #[test]
    fn test_nullable_iff_some_nullable_rhs() {
        let (grammar, first) = subc_first();
        for production in grammar.productions() {
            let lhs = production.lhs;
            if first.is_nullable(lhs) {
                let nullable_somehow = grammar.productions_for(lhs).iter().any(|&p| {
                    first
                        .first_of_sequence(&grammar, &grammar.production(p).rhs)
                        .1
                });
                assert!(nullable_somehow, "{}", grammar.name(lhs));
            }
        }
    }

    #[test]
    fn test_first_with_lookahead() {
        let (grammar, first) = subc_first();
        let expr_e = grammar.symbol("expr_e").unwrap();
        let semi = grammar.symbol("';'").unwrap();
        let set = first.first_with_lookahead(&grammar, &[expr_e], semi);
        // expr_e is nullable, so the lookahead flows through.
        assert!(set.contains(&semi));
        assert!(set.contains(&grammar.symbol("ID").unwrap()));
        assert!(set.contains(&grammar.symbol("INTEGER_CONST").unwrap()));
    }
}
