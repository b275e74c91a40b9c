//! Serialize a [`Document`] to bytes.
//!
//! Output starts with a UTF-8 byte-order mark and an explicit
//! `<?xml version="1.0" encoding="UTF-8"?>` declaration. Elements whose
//! content is only other markup get two-space indentation; elements that
//! carry text of their own (including formatting whitespace from the
//! source) are written exactly as stored.

use std::borrow::Cow;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use super::{Document, Element, Node};
use crate::error::{Error, Result};

/// UTF-8 byte-order mark.
pub const BOM: &[u8] = b"\xEF\xBB\xBF";

const INDENT: &str = "  ";

/// Serialize a document.
///
/// # Errors
///
/// Returns `Error::Document` if an event cannot be written.
pub fn write_document(doc: &Document) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(4096);
    out.extend_from_slice(BOM);

    let mut writer = Writer::new(out);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    newline(&mut writer, 0)?;

    for node in &doc.prolog {
        write_node(&mut writer, node, 0)?;
        newline(&mut writer, 0)?;
    }

    write_element(&mut writer, &doc.root, 0)?;
    newline(&mut writer, 0)?;

    for node in &doc.epilog {
        write_node(&mut writer, node, 0)?;
        newline(&mut writer, 0)?;
    }

    Ok(writer.into_inner())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element, depth: usize) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, raw) in &element.attributes {
        start.push_attribute(Attribute {
            key: QName(key.as_bytes()),
            value: Cow::Borrowed(raw.as_bytes()),
        });
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;

    let indent = !element
        .children
        .iter()
        .any(|n| matches!(n, Node::Text(_) | Node::CData(_)));

    for child in &element.children {
        if indent {
            newline(writer, depth + 1)?;
        }
        write_node(writer, child, depth + 1)?;
    }
    if indent {
        newline(writer, depth)?;
    }

    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node, depth: usize) -> Result<()> {
    match node {
        Node::Element(element) => write_element(writer, element, depth),
        Node::Text(raw) => emit(writer, Event::Text(BytesText::from_escaped(raw.as_str()))),
        Node::CData(content) => emit(writer, Event::CData(BytesCData::new(content.as_str()))),
        Node::Comment(raw) => emit(writer, Event::Comment(BytesText::from_escaped(raw.as_str()))),
        Node::ProcessingInstruction(raw) => emit(writer, Event::PI(BytesPI::new(raw.as_str()))),
        Node::DocType(raw) => emit(writer, Event::DocType(BytesText::from_escaped(raw.as_str()))),
    }
}

fn newline(writer: &mut Writer<Vec<u8>>, depth: usize) -> Result<()> {
    let pad = format!("\n{}", INDENT.repeat(depth));
    emit(writer, Event::Text(BytesText::from_escaped(pad)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Document(format!("failed to write document: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parse::parse_str;

    fn render(xml: &str) -> String {
        let bytes = write_document(&parse_str(xml).unwrap()).unwrap();
        assert!(bytes.starts_with(BOM));
        String::from_utf8(bytes[BOM.len()..].to_vec()).unwrap()
    }

    #[test]
    fn test_declaration_and_indentation() {
        let out = render(r#"<infotexts language="English"><a>x</a><b><c/></b></infotexts>"#);
        assert_eq!(
            out,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <infotexts language=\"English\">\n  <a>x</a>\n  <b>\n    <c/>\n  </b>\n</infotexts>\n"
        );
    }

    #[test]
    fn test_formatted_source_is_stable() {
        let source = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
                      <!-- header -->\n\
                      <infotexts language=\"English\" display-name=\"English\">\n  \
                      <a>Fish &amp; chips</a>\n  <!-- keep -->\n  <b><![CDATA[<raw>]]></b>\n\
                      </infotexts>\n";
        let once = render(source);
        assert_eq!(once, source);
        assert_eq!(render(&once), once);
    }

    #[test]
    fn test_mixed_content_not_reindented() {
        let out = render("<infotexts><p>one <b>two</b> three</p></infotexts>");
        assert!(out.contains("<p>one <b>two</b> three</p>"));
    }
}
