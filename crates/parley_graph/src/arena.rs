//! Node storage with generational indices.
//!
//! Trie nodes live in an arena and refer to each other by plain
//! `(index, generation)` ids: children are owned through the arena, parent
//! links are pure lookups, and no ownership cycle exists. The generation
//! counter increments when a slot is reused after pruning, so a handle held
//! across an unload is detected stale instead of dangling.

// Allow u64 to usize casts - we target 64-bit systems
#![allow(clippy::cast_possible_truncation)]

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parley_foundation::{Error, NodeRef, Result};

use crate::branch::Branch;

/// Node identifier with generational index for stale reference detection.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct NodeId {
    /// Index into node storage.
    pub index: u64,
    /// Generation counter for stale reference detection.
    pub generation: u32,
}

impl NodeId {
    /// Creates a new node id with the given index and generation.
    #[must_use]
    pub const fn new(index: u64, generation: u32) -> Self {
        Self { index, generation }
    }

    /// The crate-external form of this id, used in errors.
    #[must_use]
    pub const fn as_ref_info(self) -> NodeRef {
        NodeRef {
            index: self.index,
            generation: self.generation,
        }
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

/// Template and provenance attached to a path-terminal node.
#[derive(Clone, Debug)]
pub struct StoredRule {
    /// The response template markup.
    ///
    /// Replaced wholesale on merge, never edited in place, so a clone taken
    /// by a match result is immune to later merges.
    pub template: Arc<str>,
    /// Every source that contributed to this template, in load order.
    pub sources: Vec<Arc<str>>,
}

impl StoredRule {
    /// Creates a rule with a single contributing source.
    #[must_use]
    pub fn new(template: impl Into<Arc<str>>, source: Arc<str>) -> Self {
        Self {
            template: template.into(),
            sources: vec![source],
        }
    }
}

/// One trie vertex.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    /// The branch key this node hangs under in its parent's child map.
    /// `None` only for the root.
    pub branch: Option<Branch>,
    /// Parent link, a pure lookup. `None` only for the root.
    pub parent: Option<NodeId>,
    /// Child map; key sets are small.
    pub children: HashMap<Branch, NodeId>,
    /// Attached template and provenance; present exactly on nodes that
    /// terminate a complete inserted path.
    pub rule: Option<StoredRule>,
    /// Set once at the node completing the bot-id token of a full path.
    pub boundary: bool,
    /// Minimum remaining tokens required to reach any template at or below
    /// this node. Filled on insertion; the matcher prunes branches whose
    /// remaining input is shorter.
    pub height: usize,
}

impl Node {
    /// Creates a fresh unlinked node.
    pub(crate) fn new(parent: Option<NodeId>, branch: Option<Branch>) -> Self {
        Self {
            branch,
            parent,
            children: HashMap::new(),
            rule: None,
            boundary: false,
            height: usize::MAX,
        }
    }
}

/// Manages node slots and generation tracking.
///
/// Slots are allocated from a free list when available, otherwise new
/// indices are allocated. When a node is pruned, its index joins the free
/// list and its generation increments. Even generations are free, odd
/// generations are alive.
#[derive(Clone, Debug, Default)]
pub(crate) struct NodeArena {
    /// Generation counter for each slot index.
    generations: Vec<u32>,
    /// Node payload per slot; `None` while the slot is free.
    nodes: Vec<Option<Node>>,
    /// Free list of indices available for reuse.
    free_list: Vec<u64>,
    /// Count of live nodes.
    live_count: usize,
}

impl NodeArena {
    /// Creates a new empty arena.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Allocates a slot for the node, returning its id.
    pub(crate) fn spawn(&mut self, node: Node) -> NodeId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            // Increment generation (was even/free, now odd/alive)
            self.generations[idx] += 1;
            self.nodes[idx] = Some(node);
            NodeId::new(index, self.generations[idx])
        } else {
            let index = self.generations.len() as u64;
            // New slots start at generation 1 (odd = alive)
            self.generations.push(1);
            self.nodes.push(Some(node));
            NodeId::new(index, 1)
        }
    }

    /// Frees a node's slot and returns its payload.
    ///
    /// # Errors
    /// Returns an error if the id is stale or was never allocated.
    pub(crate) fn destroy(&mut self, id: NodeId) -> Result<Node> {
        self.validate(id)?;

        let idx = id.index as usize;
        // Increment generation (was odd/alive, now even/free)
        self.generations[idx] += 1;
        self.free_list.push(id.index);
        self.live_count -= 1;

        self.nodes[idx]
            .take()
            .ok_or_else(|| Error::internal(format!("live slot {} had no node payload", id.index)))
    }

    /// Checks whether an id names a live node.
    pub(crate) fn exists(&self, id: NodeId) -> bool {
        let idx = id.index as usize;
        if idx >= self.generations.len() {
            return false;
        }
        self.generations[idx] == id.generation && id.generation % 2 == 1
    }

    /// Validates that an id names a live node.
    ///
    /// # Errors
    /// Returns `NodeNotFound` for never-allocated or freed slots, and
    /// `StaleNode` for a generation mismatch.
    pub(crate) fn validate(&self, id: NodeId) -> Result<()> {
        let idx = id.index as usize;

        if idx >= self.generations.len() {
            return Err(Error::node_not_found(id.as_ref_info()));
        }

        let current = self.generations[idx];
        if current != id.generation {
            return Err(Error::stale_node(id.as_ref_info()));
        }
        if current % 2 == 0 {
            return Err(Error::node_not_found(id.as_ref_info()));
        }

        Ok(())
    }

    /// Gets a node by id.
    pub(crate) fn get(&self, id: NodeId) -> Result<&Node> {
        self.validate(id)?;
        self.nodes[id.index as usize]
            .as_ref()
            .ok_or_else(|| Error::internal(format!("live slot {} had no node payload", id.index)))
    }

    /// Gets a node mutably by id.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.validate(id)?;
        self.nodes[id.index as usize]
            .as_mut()
            .ok_or_else(|| Error::internal(format!("live slot {} had no node payload", id.index)))
    }

    /// Returns the number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.live_count
    }
}
