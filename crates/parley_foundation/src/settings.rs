//! Engine settings.
//!
//! Settings are owned by the embedding host and handed to the graph at
//! construction; the engine itself carries no ambient configuration.

use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Resolution strategy for two rules sharing an identical path.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MergePolicy {
    /// Keep the existing template and provenance unchanged.
    Skip,
    /// Replace the template and provenance with the new rule's.
    Overwrite,
    /// Concatenate the new template after the existing one, separated by
    /// the configured separator.
    Append,
    /// Merge both templates under a random-choice container so either has
    /// an equal chance of being selected at response time.
    #[default]
    Combine,
}

/// Settings consumed by the rule graph.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GraphSettings {
    /// How to resolve two rules with an identical path.
    pub merge_policy: MergePolicy,
    /// Literal text inserted between templates under the `Append` policy.
    pub merge_append_separator: String,
    /// Whether to log a warning for every duplicate-path merge.
    pub note_each_merge: bool,
    /// Wall-clock budget for a single match query.
    pub response_timeout: Duration,
    /// Log an informational rule count every this many loaded rules.
    pub load_notify_interval: usize,
    /// Markup namespace applied to containers synthesized by the combine
    /// policy.
    pub markup_namespace: String,
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            merge_policy: MergePolicy::Combine,
            merge_append_separator: " ".to_string(),
            note_each_merge: false,
            response_timeout: Duration::from_millis(1000),
            load_notify_interval: 5000,
            markup_namespace: "http://alicebot.org/2001/AIML-1.0.1".to_string(),
        }
    }
}

impl GraphSettings {
    /// Creates settings with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the merge policy.
    #[must_use]
    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    /// Sets the append-policy separator.
    #[must_use]
    pub fn with_append_separator(mut self, separator: impl Into<String>) -> Self {
        self.merge_append_separator = separator.into();
        self
    }

    /// Enables or disables per-merge logging.
    #[must_use]
    pub fn with_merge_notes(mut self, note_each_merge: bool) -> Self {
        self.note_each_merge = note_each_merge;
        self
    }

    /// Sets the per-query response timeout.
    #[must_use]
    pub fn with_response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Sets the load-progress notification interval.
    #[must_use]
    pub fn with_load_notify_interval(mut self, interval: usize) -> Self {
        self.load_notify_interval = interval;
        self
    }

    /// Sets the markup namespace for synthesized containers.
    #[must_use]
    pub fn with_markup_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.markup_namespace = namespace.into();
        self
    }
}
