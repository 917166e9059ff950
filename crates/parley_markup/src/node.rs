//! The markup tree.
//!
//! Templates are fragments of a generic markup tree: elements with a tag
//! name, an ordered attribute list, and ordered children, interleaved with
//! text. Nothing here depends on a particular document-object API; the one
//! extension beyond plain markup is the synthetic-container marker attribute
//! used by the merge logic.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::parser;
use crate::render;
use parley_foundation::Result;

/// One node of a markup tree.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MarkupNode {
    /// An element with a tag name, attributes, and children.
    Element(Element),
    /// A run of character data.
    Text(String),
}

/// A markup element.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<MarkupNode>,
}

impl Element {
    /// Creates an empty element with the given tag name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Gets an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the attribute is present.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    /// Sets an attribute, replacing any existing value.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child node.
    pub fn push_child(&mut self, child: MarkupNode) {
        self.children.push(child);
    }
}

/// A parsed template fragment: the ordered root-level nodes.
#[derive(Clone, Debug, Eq, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Fragment {
    /// Root-level nodes in document order.
    pub nodes: Vec<MarkupNode>,
}

impl Fragment {
    /// Creates an empty fragment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses fragment source into a tree.
    ///
    /// # Errors
    /// Returns a markup error if the source is not well-formed: mismatched
    /// end tags, unterminated constructs, bare `&`, or unquoted attributes.
    pub fn parse(source: &str) -> Result<Self> {
        parser::parse_fragment(source)
    }

    /// Renders the fragment back to markup text.
    #[must_use]
    pub fn render(&self) -> String {
        render::render_fragment(self)
    }

    /// Returns the first root-level node, if any.
    #[must_use]
    pub fn first(&self) -> Option<&MarkupNode> {
        self.nodes.first()
    }
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
