//! Generic markup tree, fragment parser, and template merge algorithms for
//! Parley.
//!
//! This crate provides:
//! - [`Fragment`] / [`MarkupNode`] / [`Element`] - The markup tree
//! - [`Fragment::parse`] - Well-formedness-checking fragment parser
//! - [`Fragment::render`] - Serializer with entity escaping
//! - [`TemplateCombiner`] - The combine/append merge algorithms

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod combine;
mod node;
mod parser;
mod render;

pub use combine::{CHOICE_TAG, RANDOM_TAG, SYNTHETIC_ATTRIBUTE, TemplateCombiner};
pub use node::{Element, Fragment, MarkupNode};
pub use parser::parse_fragment;
pub use render::render_fragment;
