//! The rule graph.
//!
//! Rules live in a trie addressed by their full path (pattern words,
//! `<that>`, that words, `<topic>`, topic words, `<botid>`, bot id).
//! Insertion grows the path, attaches the template to the terminal node,
//! and resolves duplicate paths through the configured merge policy.
//! Removal prunes the detached node and every ancestor left with nothing
//! to say. The per-source node index makes unloading a source a single
//! call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use parley_foundation::{Error, GraphSettings, MergePolicy, Result, Token, WordTable, rule_path};
use parley_markup::TemplateCombiner;

use crate::arena::{Node, NodeArena, NodeId, StoredRule};
use crate::branch::Branch;

/// Process-wide rule counts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphStats {
    /// Number of template-bearing nodes currently reachable from root.
    pub total_rules: usize,
    /// Number of path-identical rules encountered during loading,
    /// regardless of merge policy.
    pub duplicate_rules: usize,
}

/// The pattern-matching rule graph.
pub struct RuleGraph {
    settings: GraphSettings,
    combiner: TemplateCombiner,
    words: WordTable,
    arena: NodeArena,
    root: NodeId,
    total_rules: usize,
    duplicate_rules: usize,
    /// Which terminal nodes each source contributed, for bulk unloading.
    sources: HashMap<Arc<str>, HashSet<NodeId>>,
}

impl Default for RuleGraph {
    fn default() -> Self {
        Self::new(GraphSettings::default())
    }
}

impl RuleGraph {
    /// Creates an empty graph with the given settings.
    #[must_use]
    pub fn new(settings: GraphSettings) -> Self {
        let combiner = TemplateCombiner::new(
            settings.markup_namespace.clone(),
            settings.merge_append_separator.clone(),
        );
        let mut arena = NodeArena::new();
        let root = arena.spawn(Node::new(None, None));

        Self {
            settings,
            combiner,
            words: WordTable::new(),
            arena,
            root,
            total_rules: 0,
            duplicate_rules: 0,
            sources: HashMap::new(),
        }
    }

    /// Returns the settings this graph was constructed with.
    #[must_use]
    pub fn settings(&self) -> &GraphSettings {
        &self.settings
    }

    /// Returns the current rule counts.
    #[must_use]
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            total_rules: self.total_rules,
            duplicate_rules: self.duplicate_rules,
        }
    }

    /// Returns the number of live trie nodes, root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns the template and provenance attached to a node.
    ///
    /// # Errors
    /// Returns an error for a stale or unknown id, or for a node that
    /// carries no template (an internal branch handle is caller misuse).
    pub fn rule(&self, id: NodeId) -> Result<&StoredRule> {
        self.arena
            .get(id)?
            .rule
            .as_ref()
            .ok_or_else(|| Error::internal(format!("{id:?} carries no template")))
    }

    /// Adds a rule, growing the trie as needed.
    ///
    /// Returns the terminal node of the rule's path. A path already carrying
    /// a template is resolved through the configured merge policy; the
    /// duplicate counter increments either way.
    ///
    /// # Errors
    /// Only internal invariant violations surface as errors; ordinary
    /// insertion cannot fail.
    pub fn add_rule(
        &mut self,
        pattern: &str,
        that: &str,
        topic: &str,
        template: &str,
        bot_id: &str,
        source: &str,
    ) -> Result<NodeId> {
        let interval = self.settings.load_notify_interval;
        if self.total_rules > 0 && interval > 0 && self.total_rules % interval == 0 {
            info!(total = self.total_rules, "rules loaded so far");
        }

        let path = rule_path(pattern, that, topic, bot_id);
        let terminal = self.extend_path(&path)?;
        let source_key: Arc<str> = Arc::from(source);

        let existing = self
            .arena
            .get(terminal)?
            .rule
            .as_ref()
            .map(|rule| (rule.template.clone(), rule.sources.clone()));

        match existing {
            None => {
                self.arena.get_mut(terminal)?.rule =
                    Some(StoredRule::new(template, source_key.clone()));
                self.sources.entry(source_key).or_default().insert(terminal);
                self.total_rules += 1;
            }
            Some((stored_template, stored_sources)) => {
                self.duplicate_rules += 1;
                self.resolve_duplicate(
                    terminal,
                    &stored_template,
                    &stored_sources,
                    template,
                    &source_key,
                    (pattern, that, topic),
                )?;
            }
        }

        Ok(terminal)
    }

    /// Removes a rule node and prunes newly childless ancestors.
    ///
    /// Returns the number of templates removed. Ancestors are pruned
    /// bottom-up, stopping at the first one that still has other children
    /// or a template of its own, or at root.
    ///
    /// # Errors
    /// Returns an error for a stale or unknown id.
    pub fn remove(&mut self, id: NodeId) -> Result<usize> {
        self.arena.validate(id)?;
        if id == self.root {
            return Err(Error::internal("the root node cannot be removed"));
        }

        let (parent, branch) = {
            let node = self.arena.get(id)?;
            (node.parent, node.branch)
        };
        if let (Some(parent_id), Some(branch)) = (parent, branch) {
            self.arena.get_mut(parent_id)?.children.remove(&branch);
        }
        let removed_rules = self.destroy_subtree(id)?;

        let mut cursor = parent;
        while let Some(parent_id) = cursor {
            if parent_id == self.root {
                break;
            }
            let (prunable, grandparent, parent_branch) = {
                let node = self.arena.get(parent_id)?;
                (
                    node.children.is_empty() && node.rule.is_none(),
                    node.parent,
                    node.branch,
                )
            };
            if !prunable {
                break;
            }
            if let (Some(grandparent_id), Some(branch)) = (grandparent, parent_branch) {
                self.arena.get_mut(grandparent_id)?.children.remove(&branch);
            }
            self.arena.destroy(parent_id)?;
            cursor = grandparent;
        }

        self.total_rules = self
            .total_rules
            .checked_sub(removed_rules)
            .ok_or_else(|| Error::internal("rule counter underflow during removal"))?;

        Ok(removed_rules)
    }

    /// Removes every rule a source contributed.
    ///
    /// A node merged from several sources is removed when the first of them
    /// unloads. Unloading a source this graph has never seen is a no-op.
    /// Returns the number of rules actually removed.
    ///
    /// # Errors
    /// Only internal invariant violations surface as errors.
    pub fn unload(&mut self, source: &str) -> Result<usize> {
        let Some(nodes) = self.sources.remove(source) else {
            return Ok(0);
        };

        let mut removed = 0;
        for id in nodes {
            // A co-owning source may already have taken the node down.
            if !self.arena.exists(id) {
                continue;
            }
            removed += self.remove(id)?;
        }
        Ok(removed)
    }

    pub(crate) fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub(crate) fn words(&self) -> &WordTable {
        &self.words
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    /// Walks a path from root, creating missing children, and returns the
    /// terminal node with its boundary flag set and heights filled.
    fn extend_path(&mut self, path: &[Token]) -> Result<NodeId> {
        let mut current = self.root;
        for token in path {
            let branch = Branch::intern(token, &mut self.words);
            let existing = self.arena.get(current)?.children.get(&branch).copied();
            current = match existing {
                Some(child) => child,
                None => {
                    let child = self.arena.spawn(Node::new(Some(current), Some(branch)));
                    self.arena.get_mut(current)?.children.insert(branch, child);
                    child
                }
            };
        }

        self.arena.get_mut(current)?.boundary = true;
        self.fill_height(current)?;
        Ok(current)
    }

    /// Lowers heights along the ancestor chain of a new terminal so the
    /// matcher's reachability prune stays conservative.
    fn fill_height(&mut self, terminal: NodeId) -> Result<()> {
        let mut cursor = Some(terminal);
        let mut height = 0usize;
        while let Some(id) = cursor {
            let node = self.arena.get_mut(id)?;
            if node.height > height {
                node.height = height;
            }
            cursor = node.parent;
            height += 1;
        }
        Ok(())
    }

    /// Applies the configured merge policy to a duplicate path.
    fn resolve_duplicate(
        &mut self,
        terminal: NodeId,
        stored_template: &Arc<str>,
        stored_sources: &[Arc<str>],
        new_template: &str,
        new_source: &Arc<str>,
        (pattern, that, topic): (&str, &str, &str),
    ) -> Result<()> {
        let policy = self.settings.merge_policy;
        if self.settings.note_each_merge {
            let verb = match policy {
                MergePolicy::Skip => "skipping",
                MergePolicy::Overwrite => "overwriting",
                MergePolicy::Append => "appending to",
                MergePolicy::Combine => "combining with",
            };
            warn!(
                path = %format!("{pattern}:{that}:{topic}"),
                new_source = %new_source,
                existing_sources = ?stored_sources,
                "{verb} path-identical rule"
            );
        }

        match policy {
            MergePolicy::Skip => {}
            MergePolicy::Overwrite => {
                // The node changes hands: previous owners no longer get to
                // unload it.
                for old in stored_sources {
                    if let Some(set) = self.sources.get_mut(old) {
                        set.remove(&terminal);
                        if set.is_empty() {
                            self.sources.remove(old);
                        }
                    }
                }
                self.arena.get_mut(terminal)?.rule =
                    Some(StoredRule::new(new_template, new_source.clone()));
                self.sources
                    .entry(new_source.clone())
                    .or_default()
                    .insert(terminal);
            }
            MergePolicy::Append => {
                let merged = self.combiner.append(stored_template, new_template);
                self.attach_merged(terminal, merged, new_source)?;
            }
            MergePolicy::Combine => {
                let merged = self.combiner.combine(stored_template, new_template);
                self.attach_merged(terminal, merged, new_source)?;
            }
        }
        Ok(())
    }

    /// Stores a merged template and records the new contributing source.
    fn attach_merged(&mut self, terminal: NodeId, merged: String, source: &Arc<str>) -> Result<()> {
        let node = self.arena.get_mut(terminal)?;
        let rule = node
            .rule
            .as_mut()
            .ok_or_else(|| Error::internal("merge target lost its template"))?;
        rule.template = Arc::from(merged);
        if !rule.sources.iter().any(|s| Arc::ptr_eq(s, source) || **s == **source) {
            rule.sources.push(source.clone());
        }
        self.sources
            .entry(source.clone())
            .or_default()
            .insert(terminal);
        Ok(())
    }

    /// Frees a detached subtree, purging destroyed rule nodes from the
    /// source index. Returns the number of templates destroyed.
    fn destroy_subtree(&mut self, id: NodeId) -> Result<usize> {
        let mut removed_rules = 0;
        let mut stack = vec![id];
        while let Some(node_id) = stack.pop() {
            let node = self.arena.destroy(node_id)?;
            stack.extend(node.children.values().copied());
            if let Some(rule) = node.rule {
                removed_rules += 1;
                for source in rule.sources {
                    if let Some(set) = self.sources.get_mut(&source) {
                        set.remove(&node_id);
                        if set.is_empty() {
                            self.sources.remove(&source);
                        }
                    }
                }
            }
        }
        Ok(removed_rules)
    }
}
