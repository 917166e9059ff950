//! Core tokens, path assembly, word interning, settings, and errors for
//! Parley.
//!
//! This crate provides:
//! - [`Token`] / [`Segment`] - Path tokens and segment state
//! - [`rule_path`] / [`query_path`] / [`word_split`] - Path assembly
//! - [`WordTable`] / [`WordId`] - Interned literal words
//! - [`GraphSettings`] / [`MergePolicy`] - Engine configuration
//! - [`Error`] / [`ErrorKind`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod settings;
mod token;
mod word;

pub use error::{Error, ErrorKind, NodeRef, Result};
pub use settings::{GraphSettings, MergePolicy};
pub use token::{Segment, Token, query_path, rule_path, word_split};
pub use word::{WordId, WordTable};
