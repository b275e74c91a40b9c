//! Key index over a document.
//!
//! Built once per document so that ingestion and reconstruction are both
//! a single linear pass. When several elements derive the same key, the
//! first in document order owns it and the rest are counted as duplicates.

use std::collections::HashMap;

use super::{Document, Element, EntryKey, Node};

/// Map from entry key to the element's child-index path.
#[derive(Debug, Default)]
pub struct KeyIndex {
    paths: HashMap<EntryKey, Vec<usize>>,
    order: Vec<EntryKey>,
    duplicates: usize,
}

impl KeyIndex {
    /// Index every element of the document, root included, in document order.
    #[must_use]
    pub fn build(doc: &Document) -> Self {
        let mut index = Self::default();
        let mut path = Vec::new();
        index.visit(&doc.root, &mut path);
        index
    }

    fn visit(&mut self, element: &Element, path: &mut Vec<usize>) {
        let key = EntryKey::derive(&element.name);
        if self.paths.contains_key(&key) {
            tracing::debug!(tag = %element.name, "Duplicate key, only the first element is used");
            self.duplicates += 1;
        } else {
            self.paths.insert(key.clone(), path.clone());
            self.order.push(key);
        }

        for (i, child) in element.children.iter().enumerate() {
            if let Node::Element(child) = child {
                path.push(i);
                self.visit(child, path);
                path.pop();
            }
        }
    }

    /// Keys in document order (first occurrences only).
    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &EntryKey> {
        self.order.iter()
    }

    #[must_use]
    pub fn contains(&self, key: &EntryKey) -> bool {
        self.paths.contains_key(key)
    }

    /// Number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Elements skipped because an earlier element had the same key.
    #[must_use]
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[must_use]
    pub fn element<'d>(&self, doc: &'d Document, key: &EntryKey) -> Option<&'d Element> {
        self.paths.get(key).and_then(|p| doc.element_at(p))
    }

    pub fn element_mut<'d>(&self, doc: &'d mut Document, key: &EntryKey) -> Option<&'d mut Element> {
        self.paths.get(key).and_then(|p| doc.element_at_mut(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_in_document_order() {
        let doc = Document::from_bytes(
            b"<infotexts><a.x>1</a.x><!-- c --><g><b>2</b></g><a.x>dup</a.x></infotexts>",
        )
        .unwrap();
        let index = KeyIndex::build(&doc);

        let tags: Vec<String> = index.keys().map(EntryKey::tag).collect();
        assert_eq!(tags, ["infotexts", "a.x", "g", "b"]);
        assert_eq!(index.duplicates(), 1);

        let first = index.element(&doc, &EntryKey::new("a", "x")).unwrap();
        assert_eq!(first.text().as_deref(), Some("1"));
        let nested = index.element(&doc, &EntryKey::derive("b")).unwrap();
        assert_eq!(nested.text().as_deref(), Some("2"));
        assert!(!index.contains(&EntryKey::derive("missing")));
    }
}
