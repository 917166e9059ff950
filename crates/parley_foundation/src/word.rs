//! Word interning for pattern literals.
//!
//! Every literal word that appears in a rule path is interned to a compact
//! id, so trie branch keys compare and hash as integers instead of strings.
//! Queries resolve words read-only: a word never seen by any insertion has
//! no literal branch anywhere in the graph.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interned word identifier.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordId(pub(crate) u32);

impl WordId {
    /// Returns the raw index of this word.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WordId({})", self.0)
    }
}

/// Interner for literal pattern words.
///
/// Maps strings to unique ids and back. Not thread-safe on its own; the
/// owning graph serializes writers behind its own lock.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WordTable {
    /// Word storage, indexed by `WordId`.
    words: Vec<Arc<str>>,
    /// Map from word to its id.
    word_map: HashMap<Arc<str>, WordId>,
}

impl WordTable {
    /// Creates a new empty word table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns a word, returning its [`WordId`].
    ///
    /// # Panics
    ///
    /// Panics if the number of interned words exceeds `u32::MAX`.
    pub fn intern(&mut self, word: &str) -> WordId {
        if let Some(&id) = self.word_map.get(word) {
            return id;
        }

        let index = u32::try_from(self.words.len()).expect("too many interned words");
        let arc: Arc<str> = word.into();
        self.words.push(arc.clone());

        let id = WordId(index);
        self.word_map.insert(arc, id);
        id
    }

    /// Looks up a word without interning it.
    ///
    /// Returns `None` for words no insertion has ever seen.
    #[must_use]
    pub fn lookup(&self, word: &str) -> Option<WordId> {
        self.word_map.get(word).copied()
    }

    /// Gets the string for a word id.
    #[must_use]
    pub fn resolve(&self, id: WordId) -> Option<&str> {
        self.words.get(id.0 as usize).map(AsRef::as_ref)
    }

    /// Returns the number of interned words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no words have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
