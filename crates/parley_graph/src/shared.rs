//! Shared access to one graph from many threads.
//!
//! Matching is a pure read; loading and unloading are the only writers and
//! are far less frequent. The wrapper serializes writers behind a write
//! lock while readers share read locks that never block one another. A
//! match result clones the template handle out of the lock, so it stays
//! valid (and unchanged) however the graph is mutated afterwards.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use parley_foundation::{GraphSettings, Result};

use crate::arena::NodeId;
use crate::graph::{GraphStats, RuleGraph};
use crate::matcher::Match;

/// A clonable, thread-safe handle to one rule graph.
#[derive(Clone)]
pub struct SharedRuleGraph {
    inner: Arc<RwLock<RuleGraph>>,
}

impl SharedRuleGraph {
    /// Creates an empty shared graph with the given settings.
    #[must_use]
    pub fn new(settings: GraphSettings) -> Self {
        Self::from_graph(RuleGraph::new(settings))
    }

    /// Wraps an already-populated graph.
    #[must_use]
    pub fn from_graph(graph: RuleGraph) -> Self {
        Self {
            inner: Arc::new(RwLock::new(graph)),
        }
    }

    /// Adds a rule. Takes the write lock.
    ///
    /// # Errors
    /// See [`RuleGraph::add_rule`].
    pub fn add_rule(
        &self,
        pattern: &str,
        that: &str,
        topic: &str,
        template: &str,
        bot_id: &str,
        source: &str,
    ) -> Result<NodeId> {
        self.write()
            .add_rule(pattern, that, topic, template, bot_id, source)
    }

    /// Matches pre-split query words. Takes a read lock.
    ///
    /// # Errors
    /// See [`RuleGraph::match_words`].
    pub fn match_words(
        &self,
        input_words: &[&str],
        that_words: &[&str],
        topic_words: &[&str],
        bot_id: &str,
        timeout: Duration,
    ) -> Result<Match> {
        self.read()
            .match_words(input_words, that_words, topic_words, bot_id, timeout)
    }

    /// String-convenience match using the configured timeout. Takes a read
    /// lock.
    ///
    /// # Errors
    /// See [`RuleGraph::match_input`].
    pub fn match_input(&self, input: &str, that: &str, topic: &str, bot_id: &str) -> Result<Match> {
        self.read().match_input(input, that, topic, bot_id)
    }

    /// Removes every rule a source contributed. Takes the write lock.
    ///
    /// # Errors
    /// See [`RuleGraph::unload`].
    pub fn unload(&self, source: &str) -> Result<usize> {
        self.write().unload(source)
    }

    /// Returns the current rule counts. Takes a read lock.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        self.read().stats()
    }

    /// Acquires the read lock directly for compound read operations.
    pub fn read(&self) -> RwLockReadGuard<'_, RuleGraph> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Acquires the write lock directly for compound mutations.
    pub fn write(&self) -> RwLockWriteGuard<'_, RuleGraph> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
