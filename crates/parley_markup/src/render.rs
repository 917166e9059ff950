//! Fragment renderer.
//!
//! Serializes a markup tree back to text. Text nodes escape `&`, `<`, and
//! `>`; attribute values additionally escape `"`. Childless elements render
//! self-closing.

use std::fmt::Write;

use crate::node::{Element, Fragment, MarkupNode};

/// Renders a fragment to markup text.
#[must_use]
pub fn render_fragment(fragment: &Fragment) -> String {
    let mut out = String::new();
    for node in &fragment.nodes {
        render_node(&mut out, node);
    }
    out
}

fn render_node(out: &mut String, node: &MarkupNode) {
    match node {
        MarkupNode::Text(text) => escape_text(out, text),
        MarkupNode::Element(element) => render_element(out, element),
    }
}

fn render_element(out: &mut String, element: &Element) {
    let _ = write!(out, "<{}", element.name);
    for (name, value) in &element.attributes {
        let _ = write!(out, " {name}=\"");
        escape_attribute(out, value);
        out.push('"');
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &element.children {
        render_node(out, child);
    }
    let _ = write!(out, "</{}>", element.name);
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
