//! Reconstruct a document from stored entries.

use std::collections::HashMap;

use serde::Serialize;

use crate::document::{Document, EntryKey, KeyIndex, DISPLAY_NAME_ATTR, LANGUAGE_ATTR};
use crate::error::Result;
use crate::language::Language;
use crate::storage::SqliteStorage;

/// What rendering did to the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RenderStats {
    /// Elements whose text was replaced.
    pub written: usize,
    /// Elements whose text already matched the entry.
    pub unchanged: usize,
    /// Entries without text; their elements were left alone.
    pub skipped: usize,
    /// Entries whose key is not in this document.
    pub missing: usize,
}

/// Apply stored entries to a copy of `doc`.
///
/// Each entry's element is found through the key index and its text is
/// overwritten. Entries with no text, and elements with no entry, are
/// left untouched. With a target language, the root `language` and
/// `display-name` attributes are rewritten to it. The store is only read.
///
/// # Errors
///
/// Returns an error if the entries cannot be listed.
pub fn render_document(
    storage: &SqliteStorage,
    project_id: i64,
    doc: &Document,
    target: Option<&Language>,
) -> Result<(Document, RenderStats)> {
    let mut out = doc.clone();
    let index = KeyIndex::build(doc);
    let mut stats = RenderStats::default();

    let mut texts: HashMap<EntryKey, String> = HashMap::new();
    for entry in storage.list_entries(project_id)? {
        let key = entry.key();
        match entry.text {
            None => stats.skipped += 1,
            Some(_) if !index.contains(&key) => stats.missing += 1,
            Some(text) => {
                texts.insert(key, text);
            }
        }
    }

    // Paths point into the source tree: write descendants before ancestors.
    for key in index.keys().rev() {
        let Some(text) = texts.get(key) else {
            continue;
        };
        let Some(element) = index.element_mut(&mut out, key) else {
            stats.missing += 1;
            continue;
        };

        if element.text().as_deref() == Some(text.as_str()) {
            stats.unchanged += 1;
        } else {
            tracing::debug!(tag = %key, "Writing entry text");
            element.set_text(text);
            stats.written += 1;
        }
    }

    if let Some(lang) = target {
        out.root.set_attribute(LANGUAGE_ATTR, lang.name);
        out.root.set_attribute(DISPLAY_NAME_ATTR, lang.display_name);
    }

    tracing::info!(
        written = stats.written,
        unchanged = stats.unchanged,
        missing = stats.missing,
        to = target.map(|l| l.name),
        "Rendered document"
    );
    Ok((out, stats))
}

/// Render to bytes: BOM, declaration, indented markup.
///
/// # Errors
///
/// Returns an error if entries cannot be listed or serialization fails.
pub fn render(
    storage: &SqliteStorage,
    project_id: i64,
    doc: &Document,
    target: Option<&Language>,
) -> Result<Vec<u8>> {
    let (out, _) = render_document(storage, project_id, doc, target)?;
    out.to_bytes()
}
