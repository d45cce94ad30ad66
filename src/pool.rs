//! String interning for token attributes
//!
//! Content, lemmas, tags, labels and feature values repeat heavily across a
//! document, so each distinct string is stored once and words carry a
//! [`Sym`]. The pool is filled while a document is converted and then frozen
//! behind an `Arc` that every tree of the document shares.

use rustc_hash::FxHashMap;
use std::sync::Arc;

pub const STRING_POOL_CAPACITY: usize = 512;

/// Handle to an interned string
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Sym(u32);

impl Sym {
    #[inline]
    fn slot(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
pub struct StringPool {
    map: FxHashMap<Arc<str>, Sym>,
    slab: Vec<Arc<str>>, // index = Sym
}

impl StringPool {
    pub fn new() -> Self {
        Self::with_capacity(STRING_POOL_CAPACITY)
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            map: FxHashMap::with_capacity_and_hasher(cap, Default::default()),
            slab: Vec::with_capacity(cap),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slab.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slab.is_empty()
    }

    pub fn get_or_intern(&mut self, s: &str) -> Sym {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }
        let sym = Sym(self.slab.len() as u32);
        let owned: Arc<str> = Arc::from(s);
        self.map.insert(Arc::clone(&owned), sym);
        self.slab.push(owned);
        sym
    }

    /// Look up a string without interning it
    #[inline]
    pub fn get(&self, s: &str) -> Option<Sym> {
        self.map.get(s).copied()
    }

    /// Resolve a symbol produced by this pool
    #[inline]
    pub fn resolve(&self, sym: Sym) -> &str {
        &self.slab[sym.slot()]
    }
}
