//! Trie branch keys.
//!
//! A node's children are keyed by a closed, `Copy` variant: an interned
//! literal word, one of the two wildcards, or one of the three segment
//! markers. Insertion interns words; matching resolves them read-only, so a
//! query word no rule ever used simply has no literal branch anywhere.

use parley_foundation::{Token, WordId, WordTable};

/// Key from a node to one child.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) enum Branch {
    /// A literal word.
    Word(WordId),
    /// The `*` wildcard.
    Star,
    /// The `_` wildcard.
    Underscore,
    /// The `<that>` segment marker.
    That,
    /// The `<topic>` segment marker.
    Topic,
    /// The `<botid>` segment marker.
    Bot,
}

impl Branch {
    /// Converts a path token to a branch key, interning literal words.
    pub(crate) fn intern(token: &Token, words: &mut WordTable) -> Self {
        match token {
            Token::Word(w) => Self::Word(words.intern(w)),
            Token::Star => Self::Star,
            Token::Underscore => Self::Underscore,
            Token::That => Self::That,
            Token::Topic => Self::Topic,
            Token::Bot => Self::Bot,
        }
    }

    /// Converts a query token to a branch key without interning.
    ///
    /// Returns `None` for a literal word no insertion has seen; such a word
    /// cannot match any literal branch (wildcards remain available).
    pub(crate) fn lookup(token: &Token, words: &WordTable) -> Option<Self> {
        match token {
            Token::Word(w) => words.lookup(w).map(Self::Word),
            Token::Star => Some(Self::Star),
            Token::Underscore => Some(Self::Underscore),
            Token::That => Some(Self::That),
            Token::Topic => Some(Self::Topic),
            Token::Bot => Some(Self::Bot),
        }
    }
}
