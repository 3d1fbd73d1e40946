//! Grammar model and the fixed subC grammar.
//!
//! Symbols are interned names split into two disjoint blocks: terminals
//! (the token alphabet plus the `$` end-of-input sentinel) occupy the low
//! ids, nonterminals the rest. That layout lets the ACTION table be a
//! dense array indexed directly by `(state, terminal id)`.
//!
//! # Operator precedence (low to high)
//!
//! | Level | Terminals | Assoc |
//! |-------|-----------|-------|
//! | 1 | `,` | left |
//! | 2 | `=` | right |
//! | 3 | `\|\|` | left |
//! | 4 | `&&` | left |
//! | 5 | `==` `!=` | left |
//! | 6 | `<` `<=` `>` `>=` | left |
//! | 7 | `+` `-` | left |
//! | 8 | `*` `/` `%` | left |
//! | 9 | `!` `&` (and all prefix-unary productions) | right |
//! | 10 | `++` `--` `[` `(` `.` `->` | left |
//!
//! The `binary` nonterminal is deliberately ambiguous; this table is the
//! single source of truth that disambiguates it during table
//! construction. The prefix-unary productions carry an explicit override
//! down to level 9 because their operator terminals (`-`, `*`, `++`,
//! `--`) otherwise inherit their binary or postfix level.

use subcc_util::{define_idx, FxHashMap, FxHashSet, Idx, IndexVec, Interner};

use crate::error::GrammarError;

define_idx!(
    /// Interned grammar symbol (terminal or nonterminal).
    SymbolId
);

define_idx!(
    /// Dense production index; production 0 is the augmented start
    /// production.
    ProdId
);

/// Operator associativity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Assoc {
    /// Ties reduce.
    Left,
    /// Ties shift.
    Right,
    /// Ties are an error entry.
    NonAssoc,
}

/// A precedence entry: level (higher binds tighter) and associativity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prec {
    /// Precedence level; higher binds tighter.
    pub level: u8,
    /// Tie-breaking associativity.
    pub assoc: Assoc,
}

/// A grammar production `lhs -> rhs`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Production {
    /// Dense index of this production.
    pub id: ProdId,
    /// Left-hand side nonterminal.
    pub lhs: SymbolId,
    /// Right-hand side symbols; empty for an epsilon production.
    pub rhs: Vec<SymbolId>,
    /// Explicit precedence override terminal, if any.
    pub prec_symbol: Option<SymbolId>,
}

/// An immutable context-free grammar with operator precedence.
///
/// Built once (see [`Grammar::subc`]) and shared read-only by the table
/// generator and the parse driver.
#[derive(Debug)]
pub struct Grammar {
    symbols: Interner<SymbolId>,
    terminal_count: usize,
    productions: IndexVec<ProdId, Production>,
    by_lhs: FxHashMap<SymbolId, Vec<ProdId>>,
    precedence: FxHashMap<SymbolId, Prec>,
    prod_prec: IndexVec<ProdId, Option<Prec>>,
    start: SymbolId,
    augmented_start: SymbolId,
    eof: SymbolId,
}

impl Grammar {
    /// Assembles a grammar from its raw tables.
    ///
    /// Terminals are interned first (followed by `$`), then the
    /// augmented start symbol and the production left-hand sides. Every
    /// right-hand-side symbol must be a declared terminal or the lhs of
    /// some production. The augmented production `start' -> start` is
    /// added as production 0.
    pub fn new(
        terminals: &[&str],
        precedence: &[(&str, u8, Assoc)],
        start: &str,
        productions: &[(&str, &[&str], Option<&str>)],
    ) -> Result<Grammar, GrammarError> {
        let mut symbols: Interner<SymbolId> = Interner::new();
        for name in terminals {
            symbols.intern(name);
        }
        let eof = symbols.intern("$");
        let terminal_count = symbols.len();

        let augmented_start = symbols.intern(&format!("{start}'"));
        for (lhs, _, _) in productions {
            symbols.intern(lhs);
        }

        let start_sym = symbols.get(start).ok_or_else(|| GrammarError::UndeclaredSymbol {
            lhs: format!("{start}'"),
            symbol: start.to_string(),
        })?;

        let mut prec_table = FxHashMap::default();
        for &(name, level, assoc) in precedence {
            let sym = symbols
                .get(name)
                .filter(|s| s.index() < terminal_count)
                .ok_or_else(|| GrammarError::UnknownPrecTerminal(name.to_string()))?;
            prec_table.insert(sym, Prec { level, assoc });
        }

        let mut prods: IndexVec<ProdId, Production> = IndexVec::with_capacity(productions.len() + 1);
        let mut by_lhs: FxHashMap<SymbolId, Vec<ProdId>> = FxHashMap::default();

        let push = |prods: &mut IndexVec<ProdId, Production>,
                        by_lhs: &mut FxHashMap<SymbolId, Vec<ProdId>>,
                        lhs: SymbolId,
                        rhs: Vec<SymbolId>,
                        prec_symbol: Option<SymbolId>| {
            let id = ProdId::from_usize(prods.len());
            prods.push(Production {
                id,
                lhs,
                rhs,
                prec_symbol,
            });
            by_lhs.entry(lhs).or_default().push(id);
        };

        push(
            &mut prods,
            &mut by_lhs,
            augmented_start,
            vec![start_sym],
            None,
        );

        for (lhs_name, rhs_names, prec_name) in productions {
            let lhs = symbols.get(lhs_name).expect("lhs was interned above");
            let rhs = rhs_names
                .iter()
                .map(|name| {
                    symbols.get(name).ok_or_else(|| GrammarError::UndeclaredSymbol {
                        lhs: lhs_name.to_string(),
                        symbol: name.to_string(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let prec_symbol = match prec_name {
                Some(name) => Some(symbols.get(name).ok_or_else(|| {
                    GrammarError::UndeclaredSymbol {
                        lhs: lhs_name.to_string(),
                        symbol: name.to_string(),
                    }
                })?),
                None => None,
            };
            push(&mut prods, &mut by_lhs, lhs, rhs, prec_symbol);
        }

        let mut grammar = Grammar {
            symbols,
            terminal_count,
            productions: prods,
            by_lhs,
            precedence: prec_table,
            prod_prec: IndexVec::new(),
            start: start_sym,
            augmented_start,
            eof,
        };
        grammar.prod_prec = grammar.compute_production_precedence();
        Ok(grammar)
    }

    /// Precomputes each production's effective precedence: the explicit
    /// override if present, else the rightmost precedence-bearing
    /// terminal of its rhs, else none.
    fn compute_production_precedence(&self) -> IndexVec<ProdId, Option<Prec>> {
        self.productions
            .iter()
            .map(|production| {
                let symbol = production.prec_symbol.or_else(|| {
                    production
                        .rhs
                        .iter()
                        .rev()
                        .copied()
                        .find(|&s| self.is_terminal(s) && self.precedence.contains_key(&s))
                });
                symbol.and_then(|s| self.precedence.get(&s).copied())
            })
            .collect()
    }

    /// Returns the id for `name`, if declared.
    pub fn symbol(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name)
    }

    /// Returns the name of `sym`.
    pub fn name(&self, sym: SymbolId) -> &str {
        self.symbols.resolve(sym)
    }

    /// True if `sym` is a terminal (including `$`).
    pub fn is_terminal(&self, sym: SymbolId) -> bool {
        sym.index() < self.terminal_count
    }

    /// Number of terminals, `$` included.
    pub fn terminal_count(&self) -> usize {
        self.terminal_count
    }

    /// Number of nonterminals, the augmented start included.
    pub fn nonterminal_count(&self) -> usize {
        self.symbols.len() - self.terminal_count
    }

    /// Dense index of a nonterminal within the nonterminal block.
    pub fn nonterminal_index(&self, sym: SymbolId) -> usize {
        debug_assert!(!self.is_terminal(sym));
        sym.index() - self.terminal_count
    }

    /// All terminal ids.
    pub fn terminals(&self) -> impl Iterator<Item = SymbolId> {
        (0..self.terminal_count).map(SymbolId::from_usize)
    }

    /// The production with index `id`.
    pub fn production(&self, id: ProdId) -> &Production {
        &self.productions[id]
    }

    /// All productions in index order.
    pub fn productions(&self) -> impl Iterator<Item = &Production> + '_ {
        self.productions.iter()
    }

    /// Number of productions, the augmented one included.
    pub fn production_count(&self) -> usize {
        self.productions.len()
    }

    /// Productions whose lhs is `sym`.
    pub fn productions_for(&self, sym: SymbolId) -> &[ProdId] {
        self.by_lhs.get(&sym).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The grammar's start symbol (not the augmented one).
    pub fn start(&self) -> SymbolId {
        self.start
    }

    /// The augmented start symbol `start'`.
    pub fn augmented_start(&self) -> SymbolId {
        self.augmented_start
    }

    /// The `$` end-of-input terminal.
    pub fn eof(&self) -> SymbolId {
        self.eof
    }

    /// The precedence of a terminal, if it has one.
    pub fn terminal_prec(&self, sym: SymbolId) -> Option<Prec> {
        self.precedence.get(&sym).copied()
    }

    /// The effective precedence of a production, if it has one.
    pub fn production_prec(&self, id: ProdId) -> Option<Prec> {
        self.prod_prec[id]
    }

    /// Checks closure well-formedness: every nonterminal is reachable
    /// from the start symbol and derives some terminal string.
    ///
    /// (That every rhs symbol is declared is already enforced by
    /// [`Grammar::new`].)
    pub fn validate(&self) -> Result<(), GrammarError> {
        // Reachability from the augmented start.
        let mut reachable: FxHashSet<SymbolId> = FxHashSet::default();
        let mut queue = vec![self.augmented_start];
        reachable.insert(self.augmented_start);
        while let Some(sym) = queue.pop() {
            for &prod in self.productions_for(sym) {
                for &rhs_sym in &self.productions[prod].rhs {
                    if !self.is_terminal(rhs_sym) && reachable.insert(rhs_sym) {
                        queue.push(rhs_sym);
                    }
                }
            }
        }

        // Productivity by fixed point.
        let mut productive: FxHashSet<SymbolId> = FxHashSet::default();
        let mut changed = true;
        while changed {
            changed = false;
            for production in self.productions.iter() {
                if productive.contains(&production.lhs) {
                    continue;
                }
                let all_productive = production
                    .rhs
                    .iter()
                    .all(|&s| self.is_terminal(s) || productive.contains(&s));
                if all_productive {
                    productive.insert(production.lhs);
                    changed = true;
                }
            }
        }

        for (sym, name) in self.symbols.iter() {
            if self.is_terminal(sym) {
                continue;
            }
            if !reachable.contains(&sym) {
                return Err(GrammarError::Unreachable(name.to_string()));
            }
            if !productive.contains(&sym) {
                return Err(GrammarError::Unproductive(name.to_string()));
            }
        }
        Ok(())
    }

    /// Builds the fixed subC grammar.
    pub fn subc() -> Grammar {
        Grammar::new(SUBC_TERMINALS, SUBC_PRECEDENCE, "program", SUBC_PRODUCTIONS)
            .expect("the subC grammar tables are well-formed")
    }
}

/// The subC terminal alphabet, `$` excluded (it is appended by
/// [`Grammar::new`]).
static SUBC_TERMINALS: &[&str] = &[
    "TYPE",
    "VOID",
    "STRUCT",
    "RETURN",
    "IF",
    "ELSE",
    "WHILE",
    "FOR",
    "BREAK",
    "CONTINUE",
    "SYM_NULL",
    "ID",
    "INTEGER_CONST",
    "CHAR_CONST",
    "STRING",
    "RELOP",
    "EQUOP",
    "LOGICAL_AND",
    "LOGICAL_OR",
    "INCOP",
    "DECOP",
    "STRUCTOP",
    "'('",
    "')'",
    "'['",
    "']'",
    "'{'",
    "'}'",
    "','",
    "';'",
    "'.'",
    "'+'",
    "'-'",
    "'*'",
    "'/'",
    "'%'",
    "'='",
    "'!'",
    "'&'",
];

/// Terminal precedence, low level binds loose.
static SUBC_PRECEDENCE: &[(&str, u8, Assoc)] = &[
    ("','", 1, Assoc::Left),
    ("'='", 2, Assoc::Right),
    ("LOGICAL_OR", 3, Assoc::Left),
    ("LOGICAL_AND", 4, Assoc::Left),
    ("EQUOP", 5, Assoc::Left),
    ("RELOP", 6, Assoc::Left),
    ("'+'", 7, Assoc::Left),
    ("'-'", 7, Assoc::Left),
    ("'*'", 8, Assoc::Left),
    ("'/'", 8, Assoc::Left),
    ("'%'", 8, Assoc::Left),
    ("'!'", 9, Assoc::Right),
    ("'&'", 9, Assoc::Right),
    ("INCOP", 10, Assoc::Left),
    ("DECOP", 10, Assoc::Left),
    ("'['", 10, Assoc::Left),
    ("'('", 10, Assoc::Left),
    ("'.'", 10, Assoc::Left),
    ("STRUCTOP", 10, Assoc::Left),
];

/// The subC productions: `(lhs, rhs, explicit precedence terminal)`.
///
/// The prefix-unary forms override down to the unary level via `'!'`;
/// `binary -> unary` overrides to the `'='` level so an assignment
/// left-hand side resolves toward shifting the `=`.
static SUBC_PRODUCTIONS: &[(&str, &[&str], Option<&str>)] = &[
    ("program", &["ext_def_list"], None),
    ("ext_def_list", &["ext_def_list", "ext_def"], None),
    ("ext_def_list", &[], None),
    ("ext_def", &["type_specifier", "pointers", "ID", "';'"], None),
    (
        "ext_def",
        &["type_specifier", "pointers", "ID", "'['", "INTEGER_CONST", "']'", "';'"],
        None,
    ),
    ("ext_def", &["struct_specifier", "';'"], None),
    ("ext_def", &["func_decl", "compound_stmt"], None),
    ("type_specifier", &["TYPE"], None),
    ("type_specifier", &["VOID"], None),
    ("type_specifier", &["struct_specifier"], None),
    (
        "struct_specifier",
        &["STRUCT", "ID", "'{'", "def_list", "'}'"],
        None,
    ),
    ("struct_specifier", &["STRUCT", "ID"], None),
    (
        "func_decl",
        &["type_specifier", "pointers", "ID", "'('", "')'"],
        None,
    ),
    (
        "func_decl",
        &["type_specifier", "pointers", "ID", "'('", "VOID", "')'"],
        None,
    ),
    (
        "func_decl",
        &["type_specifier", "pointers", "ID", "'('", "param_list", "')'"],
        None,
    ),
    ("pointers", &["'*'"], None),
    ("pointers", &[], None),
    ("param_list", &["param_decl"], None),
    ("param_list", &["param_list", "','", "param_decl"], None),
    ("param_decl", &["type_specifier", "pointers", "ID"], None),
    (
        "param_decl",
        &["type_specifier", "pointers", "ID", "'['", "INTEGER_CONST", "']'"],
        None,
    ),
    ("def_list", &["def_list", "def"], None),
    ("def_list", &[], None),
    ("def", &["type_specifier", "pointers", "ID", "';'"], None),
    (
        "def",
        &["type_specifier", "pointers", "ID", "'['", "INTEGER_CONST", "']'", "';'"],
        None,
    ),
    ("compound_stmt", &["'{'", "def_list", "stmt_list", "'}'"], None),
    ("stmt_list", &["stmt_list", "stmt"], None),
    ("stmt_list", &[], None),
    ("stmt", &["expr", "';'"], None),
    ("stmt", &["compound_stmt"], None),
    ("stmt", &["RETURN", "';'"], None),
    ("stmt", &["RETURN", "expr", "';'"], None),
    ("stmt", &["';'"], None),
    ("stmt", &["IF", "'('", "expr", "')'", "stmt"], None),
    (
        "stmt",
        &["IF", "'('", "expr", "')'", "stmt", "ELSE", "stmt"],
        None,
    ),
    ("stmt", &["WHILE", "'('", "expr", "')'", "stmt"], None),
    (
        "stmt",
        &["FOR", "'('", "expr_e", "';'", "expr_e", "';'", "expr_e", "')'", "stmt"],
        None,
    ),
    ("stmt", &["BREAK", "';'"], None),
    ("stmt", &["CONTINUE", "';'"], None),
    ("expr_e", &["expr"], None),
    ("expr_e", &[], None),
    ("expr", &["unary", "'='", "expr"], None),
    ("expr", &["binary"], None),
    ("binary", &["binary", "RELOP", "binary"], None),
    ("binary", &["binary", "EQUOP", "binary"], None),
    ("binary", &["binary", "'+'", "binary"], None),
    ("binary", &["binary", "'-'", "binary"], None),
    ("binary", &["binary", "'*'", "binary"], None),
    ("binary", &["binary", "'/'", "binary"], None),
    ("binary", &["binary", "'%'", "binary"], None),
    ("binary", &["unary"], Some("'='")),
    ("binary", &["binary", "LOGICAL_AND", "binary"], None),
    ("binary", &["binary", "LOGICAL_OR", "binary"], None),
    ("unary", &["'('", "expr", "')'"], None),
    ("unary", &["INTEGER_CONST"], None),
    ("unary", &["CHAR_CONST"], None),
    ("unary", &["STRING"], None),
    ("unary", &["ID"], None),
    ("unary", &["'-'", "unary"], Some("'!'")),
    ("unary", &["'!'", "unary"], Some("'!'")),
    ("unary", &["unary", "INCOP"], None),
    ("unary", &["unary", "DECOP"], None),
    ("unary", &["INCOP", "unary"], Some("'!'")),
    ("unary", &["DECOP", "unary"], Some("'!'")),
    ("unary", &["'&'", "unary"], Some("'!'")),
    ("unary", &["'*'", "unary"], Some("'!'")),
    ("unary", &["unary", "'['", "expr", "']'"], None),
    ("unary", &["unary", "'.'", "ID"], None),
    ("unary", &["unary", "STRUCTOP", "ID"], None),
    ("unary", &["unary", "'('", "args", "')'"], None),
    ("unary", &["unary", "'('", "')'"], None),
    ("unary", &["SYM_NULL"], None),
    ("args", &["expr"], None),
    ("args", &["args", "','", "expr"], None),
];
