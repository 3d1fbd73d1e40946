//! String interning.
//!
//! The grammar refers to symbols by name (`"expr"`, `"';'"`, `"TYPE"`),
//! but the parse tables are dense arrays indexed by small integers. The
//! [`Interner`] assigns each distinct name a dense typed id in first-come
//! order, so a caller that interns all terminals before any nonterminal
//! gets the terminal block at the low ids.

use rustc_hash::FxHashMap;

use crate::Idx;

/// Maps strings to dense typed ids and back.
///
/// Ids are handed out in interning order starting from zero. Interning
/// the same string again returns the existing id.
///
/// # Example
///
/// ```
/// use subcc_util::{define_idx, Interner};
///
/// define_idx!(SymbolId);
///
/// let mut interner: Interner<SymbolId> = Interner::new();
/// let a = interner.intern("expr");
/// let b = interner.intern("expr");
/// assert_eq!(a, b);
/// assert_eq!(interner.resolve(a), "expr");
/// ```
#[derive(Clone, Debug, Default)]
pub struct Interner<I> {
    names: Vec<String>,
    ids: FxHashMap<String, I>,
}

impl<I: Idx> Interner<I> {
    /// Creates an empty interner.
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            ids: FxHashMap::default(),
        }
    }

    /// Interns `name`, returning its id.
    pub fn intern(&mut self, name: &str) -> I {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = I::from_usize(self.names.len());
        self.names.push(name.to_owned());
        self.ids.insert(name.to_owned(), id);
        id
    }

    /// Looks up a previously interned name.
    pub fn get(&self, name: &str) -> Option<I> {
        self.ids.get(name).copied()
    }

    /// Returns the name for `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this interner.
    pub fn resolve(&self, id: I) -> &str {
        &self.names[id.index()]
    }

    /// Returns the number of distinct interned names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns true if nothing has been interned.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over `(id, name)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (I, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, n)| (I::from_usize(i), n.as_str()))
    }
}
