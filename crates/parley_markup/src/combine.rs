//! Template merge algorithms.
//!
//! Two rules can land on the same path. The `combine` policy merges their
//! templates under a random-choice container so either response has an equal
//! chance of being selected; the `append` policy concatenates them. Both
//! operate on parsed fragments, and both must never lose the previously
//! stored template: if either side fails to parse, the existing template is
//! returned unchanged.

use tracing::warn;

use crate::node::{Element, Fragment, MarkupNode};

/// Tag name of the random-choice container.
pub const RANDOM_TAG: &str = "random";

/// Tag name of one choice branch inside the container.
pub const CHOICE_TAG: &str = "li";

/// Marker attribute identifying containers this module created.
///
/// Distinguishes a synthesized container from a `random` element an author
/// wrote by hand, so repeated merges extend the flat choice list instead of
/// nesting containers.
pub const SYNTHETIC_ATTRIBUTE: &str = "synthetic";

/// Merges templates for path-identical rules.
#[derive(Clone, Debug)]
pub struct TemplateCombiner {
    /// Namespace stamped onto freshly synthesized containers. Empty means
    /// none.
    namespace: String,
    /// Separator text inserted between templates by [`append`](Self::append).
    append_separator: String,
}

impl TemplateCombiner {
    /// Creates a combiner.
    #[must_use]
    pub fn new(namespace: impl Into<String>, append_separator: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            append_separator: append_separator.into(),
        }
    }

    /// Combines two templates under a random-choice container.
    ///
    /// The first template is the one already stored, and may itself be the
    /// result of a previous combine; in that case its synthesized container
    /// gains one more choice branch, keeping the alternatives flat. A parse
    /// failure on either side logs a warning and returns the existing
    /// template unchanged.
    #[must_use]
    pub fn combine(&self, existing: &str, new: &str) -> String {
        let (mut existing_fragment, new_fragment) = match self.parse_pair(existing, new, "combine")
        {
            Some(pair) => pair,
            None => return existing.to_string(),
        };

        // A previous combine leaves its marker on the leading container.
        if let Some(MarkupNode::Element(first)) = existing_fragment.nodes.first_mut() {
            if first.name == RANDOM_TAG && first.has_attribute(SYNTHETIC_ATTRIBUTE) {
                first.push_child(MarkupNode::Element(choice_branch(new_fragment.nodes)));
                return existing_fragment.render();
            }
        }

        let mut container = Element::new(RANDOM_TAG);
        if !self.namespace.is_empty() {
            container.set_attribute("xmlns", self.namespace.clone());
        }
        container.set_attribute(SYNTHETIC_ATTRIBUTE, "yes");
        container.push_child(MarkupNode::Element(choice_branch(existing_fragment.nodes)));
        container.push_child(MarkupNode::Element(choice_branch(new_fragment.nodes)));

        Fragment {
            nodes: vec![MarkupNode::Element(container)],
        }
        .render()
    }

    /// Appends the new template's content to the existing template's.
    ///
    /// The configured separator is inserted between them as a text node when
    /// it is non-empty. A parse failure on either side logs a warning and
    /// returns the existing template unchanged.
    #[must_use]
    pub fn append(&self, existing: &str, new: &str) -> String {
        let (mut existing_fragment, new_fragment) = match self.parse_pair(existing, new, "append") {
            Some(pair) => pair,
            None => return existing.to_string(),
        };

        if !self.append_separator.is_empty() {
            existing_fragment
                .nodes
                .push(MarkupNode::Text(self.append_separator.clone()));
        }
        existing_fragment.nodes.extend(new_fragment.nodes);
        existing_fragment.render()
    }

    /// Parses both sides of a merge, or reports why the merge is skipped.
    fn parse_pair(&self, existing: &str, new: &str, operation: &str) -> Option<(Fragment, Fragment)> {
        let existing_fragment = match Fragment::parse(existing) {
            Ok(fragment) => fragment,
            Err(error) => {
                warn!(
                    %error,
                    existing = %existing,
                    new = %new,
                    "existing template failed to parse during merge {operation}; retaining it as-is"
                );
                return None;
            }
        };
        let new_fragment = match Fragment::parse(new) {
            Ok(fragment) => fragment,
            Err(error) => {
                warn!(
                    %error,
                    existing = %existing,
                    new = %new,
                    "new template failed to parse during merge {operation}; retaining existing template"
                );
                return None;
            }
        };
        Some((existing_fragment, new_fragment))
    }
}

fn choice_branch(content: Vec<MarkupNode>) -> Element {
    let mut branch = Element::new(CHOICE_TAG);
    branch.children = content;
    branch
}
