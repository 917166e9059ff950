//! Pattern trie, wildcard-precedence matcher, and rule lifecycle for
//! Parley.
//!
//! This crate provides:
//! - [`RuleGraph`] - The trie: insertion, merge policies, pruning removal,
//!   provenance-based unloading, counters
//! - [`Match`] - A successful match: template, provenance, and per-segment
//!   wildcard captures
//! - [`NodeId`] / [`StoredRule`] - Generational node handles and attached
//!   templates
//! - [`SharedRuleGraph`] - Many concurrent readers over an occasionally
//!   mutated graph

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod arena;
mod branch;
mod graph;
mod matcher;
mod shared;

pub use arena::{NodeId, StoredRule};
pub use graph::{GraphStats, RuleGraph};
pub use matcher::Match;
pub use shared::SharedRuleGraph;
