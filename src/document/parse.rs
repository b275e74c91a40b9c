//! Parse XML text into a [`Document`].

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::{Document, Element, Node};
use crate::error::{Error, Result};

const BOM: char = '\u{feff}';

/// Parse a document from a string.
///
/// A leading byte-order mark is ignored. Whitespace outside the root is
/// dropped; comments, processing instructions and the doctype are kept.
///
/// # Errors
///
/// Returns `Error::Document` for malformed XML, unknown entities, a
/// missing root, or more than one root element.
pub fn parse_str(input: &str) -> Result<Document> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let mut reader = Reader::from_str(input);

    let mut prolog = Vec::new();
    let mut epilog = Vec::new();
    let mut root: Option<Element> = None;
    let mut stack: Vec<Element> = Vec::new();

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::Document(format!("{e} at byte {}", reader.error_position()))
        })?;

        match event {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                attach(Node::Element(element), &mut stack, &mut root, &mut prolog, &mut epilog)?;
            }
            Event::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(Error::Document("unexpected closing tag".to_string()));
                };
                attach(Node::Element(element), &mut stack, &mut root, &mut prolog, &mut epilog)?;
            }
            Event::Text(text) => {
                let raw = utf8(&text)?;
                if stack.is_empty() {
                    if raw.trim().is_empty() {
                        continue;
                    }
                    return Err(Error::Document(format!(
                        "text outside the root element: {:?}",
                        raw.trim()
                    )));
                }
                unescape(&raw).map_err(|e| Error::Document(e.to_string()))?;
                attach(Node::Text(raw), &mut stack, &mut root, &mut prolog, &mut epilog)?;
            }
            Event::CData(cdata) => {
                let content = utf8(&cdata)?;
                attach(Node::CData(content), &mut stack, &mut root, &mut prolog, &mut epilog)?;
            }
            Event::Comment(comment) => {
                let raw = utf8(&comment)?;
                attach(Node::Comment(raw), &mut stack, &mut root, &mut prolog, &mut epilog)?;
            }
            Event::PI(pi) => {
                let raw = utf8(&pi)?;
                attach(
                    Node::ProcessingInstruction(raw),
                    &mut stack,
                    &mut root,
                    &mut prolog,
                    &mut epilog,
                )?;
            }
            Event::DocType(doctype) => {
                let raw = utf8(&doctype)?;
                attach(
                    Node::DocType(raw.trim_start().to_string()),
                    &mut stack,
                    &mut root,
                    &mut prolog,
                    &mut epilog,
                )?;
            }
            Event::Decl(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Document(format!("unclosed element <{}>", open.name)));
    }

    let root = root.ok_or_else(|| Error::Document("document has no root element".to_string()))?;
    Ok(Document { prolog, root, epilog })
}

/// Place a finished node: into the open parent, as the root, or around it.
fn attach(
    node: Node,
    stack: &mut [Element],
    root: &mut Option<Element>,
    prolog: &mut Vec<Node>,
    epilog: &mut Vec<Node>,
) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
        return Ok(());
    }

    match node {
        Node::Element(element) => {
            if root.is_some() {
                return Err(Error::Document(format!(
                    "multiple root elements (second is <{}>)",
                    element.name
                )));
            }
            *root = Some(element);
        }
        other if root.is_some() => epilog.push(other),
        other => prolog.push(other),
    }
    Ok(())
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(utf8(start.name().as_ref())?);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::Document(e.to_string()))?;
        let value = utf8(&attr.value)?;
        unescape(&value).map_err(|e| Error::Document(e.to_string()))?;
        element
            .attributes
            .push((utf8(attr.key.as_ref())?, value));
    }
    Ok(element)
}

fn utf8(bytes: &[u8]) -> Result<String> {
    String::from_utf8(bytes.to_vec())
        .map_err(|e| Error::Document(format!("invalid UTF-8: {e}")))
}
