//! In-memory infotexts document tree.
//!
//! A thin tree over `quick-xml` events. Text, attribute values, comments
//! and other markup are kept in their raw (escaped) source form so that
//! nodes nobody touches serialize back exactly as they were read.
//!
//! # Submodules
//!
//! - [`key`] - Entry key derivation from tag names
//! - [`index`] - Per-document key index
//! - [`parse`] - Bytes to tree
//! - [`write`] - Tree to bytes (BOM, declaration, indentation)

pub mod index;
pub mod key;
pub mod parse;
pub mod write;

use std::borrow::Cow;
use std::path::Path;

use quick_xml::escape::{escape, partial_escape, unescape};

use crate::error::{Error, Result};

pub use index::KeyIndex;
pub use key::EntryKey;

/// Tag name every infotexts document must use for its root.
pub const ROOT_TAG: &str = "infotexts";

/// Root attribute naming the document language.
pub const LANGUAGE_ATTR: &str = "language";

/// Root attribute carrying the language's display name.
pub const DISPLAY_NAME_ATTR: &str = "display-name";

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Character data, escaped as in the source.
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
    DocType(String),
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    /// `(name, raw value)` pairs in source order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Unescaped value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, raw)| decode(raw).into_owned())
    }

    /// Set an attribute, replacing it in place or appending it.
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let raw = escape(value).into_owned();
        if let Some(slot) = self.attributes.iter_mut().find(|(k, _)| k == name) {
            slot.1 = raw;
        } else {
            self.attributes.push((name.to_string(), raw));
        }
    }

    /// Leading text of the element.
    ///
    /// The text is the run of text and CDATA nodes before the first child
    /// of any other kind. Whitespace that only separates child elements is
    /// formatting, not text, and yields `None`.
    #[must_use]
    pub fn text(&self) -> Option<String> {
        let lead = self.leading_text_len();
        if lead == 0 {
            return None;
        }

        let mut text = String::new();
        for node in &self.children[..lead] {
            match node {
                Node::Text(raw) => text.push_str(&decode(raw)),
                Node::CData(content) => text.push_str(content),
                _ => {}
            }
        }

        let has_child_elements = self
            .children
            .iter()
            .any(|n| matches!(n, Node::Element(_)));
        if has_child_elements && text.trim().is_empty() {
            return None;
        }
        Some(text)
    }

    /// Replace the leading text of the element.
    pub fn set_text(&mut self, text: &str) {
        let lead = self.leading_text_len();
        self.children.drain(..lead);
        self.children
            .insert(0, Node::Text(partial_escape(text).into_owned()));
    }

    /// Iterate over child elements, skipping other nodes.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    fn leading_text_len(&self) -> usize {
        self.children
            .iter()
            .take_while(|n| matches!(n, Node::Text(_) | Node::CData(_)))
            .count()
    }
}

/// A parsed document: markup before the root, the root, markup after it.
///
/// The XML declaration is not kept; serialization always writes its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub epilog: Vec<Node>,
}

impl Document {
    /// Parse a document from bytes (UTF-8, optional BOM).
    ///
    /// # Errors
    ///
    /// Returns `Error::Document` if the bytes are not well-formed XML.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| Error::Document(format!("document is not valid UTF-8: {e}")))?;
        parse::parse_str(text)
    }

    /// Read and parse a document file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not well-formed.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Serialize with BOM, declaration and indentation.
    ///
    /// # Errors
    ///
    /// Returns `Error::Document` if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        write::write_document(self)
    }

    /// Root `language` attribute.
    #[must_use]
    pub fn language(&self) -> Option<String> {
        self.root.attribute(LANGUAGE_ATTR)
    }

    /// Root `display-name` attribute.
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.root.attribute(DISPLAY_NAME_ATTR)
    }

    /// Element at a child-index path from the root (empty path is the root).
    #[must_use]
    pub fn element_at(&self, path: &[usize]) -> Option<&Element> {
        let mut current = &self.root;
        for &i in path {
            match current.children.get(i) {
                Some(Node::Element(e)) => current = e,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Mutable element at a child-index path from the root.
    pub fn element_at_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = &mut self.root;
        for &i in path {
            match current.children.get_mut(i) {
                Some(Node::Element(e)) => current = e,
                _ => return None,
            }
        }
        Some(current)
    }
}

/// Unescape raw text, falling back to the raw form for unknown entities.
fn decode(raw: &str) -> Cow<'_, str> {
    unescape(raw).unwrap_or(Cow::Borrowed(raw))
}
