//! Parley - Conversational rule-matching engine
//!
//! This crate re-exports all layers of the Parley system for convenient
//! access. For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: parley_graph      — Trie, matcher, rule lifecycle
//! Layer 1: parley_markup     — Markup tree, fragment parser, merge logic
//! Layer 0: parley_foundation — Core types (Token, WordTable, Error)
//! ```

pub use parley_foundation as foundation;
pub use parley_graph as graph;
pub use parley_markup as markup;
