//! subcc-par - Grammar, LALR(1) table generator, and parse driver.
//!
//! This crate is the core of the subC front-end. It owns:
//!
//! - the fixed subC grammar with its operator precedence table
//!   ([`Grammar::subc`]),
//! - the off-line table construction: FIRST sets ([`FirstSets`]),
//!   the canonical LR(1) collection and its LALR(1) merge-by-core
//!   ([`lalr`]), and ACTION/GOTO materialization with
//!   precedence-directed conflict resolution ([`ParseTables`]),
//! - the on-line shift/reduce driver ([`Parser`]) emitting
//!   [`Reduction`] records, and
//! - the trace formatter ([`format_reduction`], [`write_trace`]).
//!
//! Tables are built once at startup and immutable afterwards; a single
//! parse is a deterministic walk over them. There is no AST and no
//! error recovery: the first absent table entry stops the parse.
//!
//! ```
//! use subcc_lex::tokenize;
//! use subcc_par::{format_reduction, Grammar, Parser, ParseTables};
//!
//! let grammar = Grammar::subc();
//! let tables = ParseTables::build(&grammar).expect("subC is LALR(1)");
//! let parser = Parser::new(&grammar, &tables);
//!
//! let tokens = tokenize("").unwrap();
//! let reductions = parser.parse(&tokens).unwrap();
//! let trace: Vec<_> = reductions
//!     .iter()
//!     .map(|&r| format_reduction(&grammar, r))
//!     .collect();
//! assert_eq!(trace, ["ext_def_list->epsilon", "program->ext_def_list"]);
//! ```

mod driver;
mod error;
mod first;
mod grammar;
pub mod lalr;
mod table;
mod trace;

pub use driver::{Parser, Reduction};
pub use error::{GrammarError, ParseError, TableError};
pub use first::FirstSets;
pub use grammar::{Assoc, Grammar, Prec, ProdId, Production, SymbolId};
pub use table::{Action, ParseTables};
pub use trace::{format_reduction, write_trace};
