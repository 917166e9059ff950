//! Error types for the Parley engine.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the Parley crates.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for Parley operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Creates a no-match error for the given input.
    #[must_use]
    pub fn no_match(input: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoMatch {
            input: input.into(),
        })
    }

    /// Creates a node-not-found error.
    #[must_use]
    pub fn node_not_found(node: NodeRef) -> Self {
        Self::new(ErrorKind::NodeNotFound(node))
    }

    /// Creates a stale-node error.
    #[must_use]
    pub fn stale_node(node: NodeRef) -> Self {
        Self::new(ErrorKind::StaleNode(node))
    }

    /// Creates a markup error.
    #[must_use]
    pub fn markup(message: impl Into<String>, position: usize) -> Self {
        Self::new(ErrorKind::Markup {
            message: message.into(),
            position,
        })
    }

    /// Creates an internal invariant-violation error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }

    /// Returns true if this is a no-match outcome.
    ///
    /// No-match is the one expected, non-fatal error: callers are expected
    /// to fall back to a catch-all rule when they see it.
    #[must_use]
    pub fn is_no_match(&self) -> bool {
        matches!(self.kind, ErrorKind::NoMatch { .. })
    }
}

/// A plain (index, generation) pair identifying a graph node in errors.
///
/// Mirrors the graph's node id without depending on the graph crate.
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct NodeRef {
    /// Index into node storage.
    pub index: u64,
    /// Generation counter at the time the reference was taken.
    pub generation: u32,
}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRef({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}v{}", self.index, self.generation)
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// No registered rule satisfied the query before its deadline.
    ///
    /// A search that ran out of time reports the same outcome as one that
    /// exhausted every branch; the two are indistinguishable here.
    #[error("no rule matched input: {input}")]
    NoMatch {
        /// The input text (or joined input words) that failed to match.
        input: String,
    },

    /// A node reference pointed at a slot that was never allocated or is
    /// currently free.
    #[error("node not found: {0}")]
    NodeNotFound(NodeRef),

    /// A node reference outlived the node it named (generation mismatch).
    #[error("stale node reference: {0}")]
    StaleNode(NodeRef),

    /// Template markup failed to parse as a well-formed fragment.
    #[error("malformed markup at offset {position}: {message}")]
    Markup {
        /// Description of the parse failure.
        message: String,
        /// Byte offset of the failure in the fragment source.
        position: usize,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}
