//! Fragment parser.
//!
//! Parses template text into a [`Fragment`], enforcing well-formedness:
//! every open tag needs a matching close tag, attributes must be quoted,
//! and `&` must begin a recognized entity. A template that fails here is
//! rejected wholesale; merge logic treats that as a recoverable condition
//! and keeps the previously stored template.

use crate::node::{Element, Fragment, MarkupNode};
use parley_foundation::{Error, Result};

/// Parses fragment source into a tree.
///
/// # Errors
/// Returns a markup error describing the first well-formedness violation.
pub fn parse_fragment(source: &str) -> Result<Fragment> {
    let mut parser = Parser::new(source);
    let nodes = parser.parse_nodes(None)?;
    Ok(Fragment { nodes })
}

/// Cursor over fragment source.
struct Parser<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current byte offset in source.
    position: usize,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            rest: source,
            position: 0,
        }
    }

    /// Parses a run of sibling nodes.
    ///
    /// When `enclosing` is set, stops (without consuming) at the matching
    /// end tag; at the top level, runs to end of input.
    fn parse_nodes(&mut self, enclosing: Option<&str>) -> Result<Vec<MarkupNode>> {
        let mut nodes = Vec::new();

        loop {
            if self.rest.is_empty() {
                if let Some(name) = enclosing {
                    return Err(self.error(format!("missing end tag for <{name}>")));
                }
                return Ok(nodes);
            }

            if self.rest.starts_with("</") {
                match enclosing {
                    Some(_) => return Ok(nodes),
                    None => return Err(self.error("end tag with no open element")),
                }
            }

            if self.rest.starts_with("<!--") {
                self.skip_comment()?;
            } else if self.rest.starts_with('<') {
                nodes.push(MarkupNode::Element(self.parse_element()?));
            } else {
                nodes.push(MarkupNode::Text(self.parse_text()?));
            }
        }
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.advance(1); // consume '<'
        let name = self.parse_name("element name")?;
        let mut element = Element::new(name.clone());

        loop {
            self.skip_whitespace();

            if self.rest.starts_with("/>") {
                self.advance(2);
                return Ok(element);
            }
            if self.rest.starts_with('>') {
                self.advance(1);
                element.children = self.parse_nodes(Some(&name))?;
                self.consume_end_tag(&name)?;
                return Ok(element);
            }
            if self.rest.is_empty() {
                return Err(self.error(format!("unterminated tag <{name}")));
            }

            let attr_name = self.parse_name("attribute name")?;
            self.skip_whitespace();
            if !self.rest.starts_with('=') {
                return Err(self.error(format!("attribute {attr_name} missing '='")));
            }
            self.advance(1);
            self.skip_whitespace();
            let value = self.parse_attribute_value()?;
            element.set_attribute(attr_name, value);
        }
    }

    fn consume_end_tag(&mut self, name: &str) -> Result<()> {
        debug_assert!(self.rest.starts_with("</"));
        self.advance(2);
        let closing = self.parse_name("end tag name")?;
        if closing != name {
            return Err(self.error(format!("expected </{name}>, found </{closing}>")));
        }
        self.skip_whitespace();
        if !self.rest.starts_with('>') {
            return Err(self.error(format!("unterminated end tag </{closing}")));
        }
        self.advance(1);
        Ok(())
    }

    fn parse_name(&mut self, what: &str) -> Result<String> {
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| !is_name_char(*c))
            .map_or(self.rest.len(), |(i, _)| i);
        if end == 0 {
            return Err(self.error(format!("expected {what}")));
        }
        let name = self.rest[..end].to_string();
        self.advance(end);
        Ok(name)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let Some(quote) = self.rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            return Err(self.error("attribute value must be quoted"));
        };
        self.advance(1);

        let mut value = String::new();
        loop {
            let Some(c) = self.rest.chars().next() else {
                return Err(self.error("unterminated attribute value"));
            };
            if c == quote {
                self.advance(1);
                return Ok(value);
            }
            if c == '<' {
                return Err(self.error("'<' not allowed in attribute value"));
            }
            if c == '&' {
                value.push(self.parse_entity()?);
            } else {
                value.push(c);
                self.advance(c.len_utf8());
            }
        }
    }

    fn parse_text(&mut self) -> Result<String> {
        let mut text = String::new();
        loop {
            match self.rest.chars().next() {
                None | Some('<') => return Ok(text),
                Some('&') => text.push(self.parse_entity()?),
                Some(c) => {
                    text.push(c);
                    self.advance(c.len_utf8());
                }
            }
        }
    }

    /// Decodes one `&...;` entity reference.
    fn parse_entity(&mut self) -> Result<char> {
        debug_assert!(self.rest.starts_with('&'));
        let Some(end) = self.rest.find(';') else {
            return Err(self.error("bare '&' (unterminated entity)"));
        };
        let entity = &self.rest[1..end];

        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = entity
                    .strip_prefix("#x")
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()));
                match code.and_then(char::from_u32) {
                    Some(c) => c,
                    None => return Err(self.error(format!("unknown entity &{entity};"))),
                }
            }
        };

        self.advance(end + 1);
        Ok(decoded)
    }

    fn skip_comment(&mut self) -> Result<()> {
        debug_assert!(self.rest.starts_with("<!--"));
        let Some(end) = self.rest.find("-->") else {
            return Err(self.error("unterminated comment"));
        };
        self.advance(end + 3);
        Ok(())
    }

    fn skip_whitespace(&mut self) {
        let end = self
            .rest
            .char_indices()
            .find(|(_, c)| !c.is_whitespace())
            .map_or(self.rest.len(), |(i, _)| i);
        self.advance(end);
    }

    fn advance(&mut self, bytes: usize) {
        self.rest = &self.rest[bytes..];
        self.position += bytes;
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::markup(message, self.position)
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | ':')
}
