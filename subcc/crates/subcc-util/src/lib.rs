//! subcc-util - Foundation types for the subC front-end.
//!
//! This crate provides the small, dependency-light building blocks shared
//! by the lexer, the table generator, and the driver:
//!
//! - [`Idx`] / [`IndexVec`] / [`define_idx!`]: typed index spaces, so a
//!   production index can never be used where a state index is expected.
//! - [`Interner`]: dense string interning, used to map grammar symbol
//!   names to small integer ids that index the parse tables directly.
//! - [`Loc`]: 1-based line/column source locations carried by tokens and
//!   diagnostics.

mod index_vec;
mod intern;
mod loc;

pub use index_vec::{Idx, IndexVec};
pub use intern::Interner;
pub use loc::Loc;

// Re-export commonly used hash types
pub use rustc_hash::FxHashMap;
pub use rustc_hash::FxHashSet;
