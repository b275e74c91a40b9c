//! Document ingestion into the entry store.

use serde::Serialize;

use crate::document::{Document, KeyIndex};
use crate::error::Result;
use crate::language::Language;
use crate::model::Entry;
use crate::storage::{NewEntry, SqliteStorage};

/// Outcome of one ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestStats {
    /// Elements walked, duplicates included.
    pub visited: usize,
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Elements skipped because an earlier element had the same key.
    pub duplicates: usize,
}

impl IngestStats {
    /// Entries written by this ingestion.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Reconcile a validated document into a project's entries.
///
/// Every element is keyed by its tag. New keys are inserted, keys whose
/// text changed are updated (text and language), and everything else is
/// left alone. Entries missing from the document are kept. The document
/// language is recorded on the project in the same transaction as the
/// entry writes.
///
/// # Errors
///
/// Returns an error if the store rejects the writes; nothing is written
/// in that case.
pub fn ingest(
    storage: &mut SqliteStorage,
    project_id: i64,
    doc: &Document,
    language: &Language,
) -> Result<IngestStats> {
    let index = KeyIndex::build(doc);

    let entries: Vec<NewEntry> = index
        .keys()
        .map(|key| {
            let text = index.element(doc, key).and_then(|e| e.text());
            tracing::debug!(tag = %key, has_text = text.is_some(), "Ingesting element");
            NewEntry {
                principal_tag: key.principal.clone(),
                variable: key.variable.clone(),
                text,
            }
        })
        .collect();

    let before = storage.get_project_counts(project_id)?.entries;
    let results = storage.upsert_entries(project_id, &entries, language.name)?;
    let after = storage.get_project_counts(project_id)?.entries;

    let changed = results.iter().filter(|u| u.changed).count();
    let inserted = after.saturating_sub(before);
    let stats = IngestStats {
        visited: index.len() + index.duplicates(),
        inserted,
        updated: changed.saturating_sub(inserted),
        unchanged: results.len() - changed,
        duplicates: index.duplicates(),
    };

    if stats.duplicates > 0 {
        tracing::warn!(
            duplicates = stats.duplicates,
            "Skipped elements whose key was already used earlier in the document"
        );
    }
    tracing::info!(
        language = language.name,
        visited = stats.visited,
        inserted = stats.inserted,
        updated = stats.updated,
        unchanged = stats.unchanged,
        "Ingested document"
    );

    Ok(stats)
}

/// Stored entries whose key no longer appears in the document.
///
/// Read-only: stale entries are reported, never removed.
///
/// # Errors
///
/// Returns an error if the entries cannot be listed.
pub fn stale_entries(storage: &SqliteStorage, project_id: i64, doc: &Document) -> Result<Vec<Entry>> {
    let index = KeyIndex::build(doc);
    Ok(storage
        .list_entries(project_id)?
        .into_iter()
        .filter(|e| !index.contains(&e.key()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language;

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<infotexts language="English" display-name="English">
  <menu.title>File</menu.title>
  <menu.open>Open</menu.open>
  <!-- comments are not entries -->
  <empty/>
  <menu.title>Duplicate</menu.title>
</infotexts>
"#;

    fn setup() -> (SqliteStorage, i64) {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let project = storage.create_project("menus", "/work/menus").unwrap();
        (storage, project.id)
    }

    fn english() -> &'static Language {
        language::find("English").unwrap()
    }

    #[test]
    fn test_first_ingest_inserts_every_key() {
        let (mut storage, pid) = setup();
        let doc = Document::from_bytes(DOC.as_bytes()).unwrap();

        let stats = ingest(&mut storage, pid, &doc, english()).unwrap();
        assert_eq!(stats.visited, 5);
        assert_eq!(stats.inserted, 4);
        assert_eq!(stats.duplicates, 1);

        let entries = storage.list_entries(pid).unwrap();
        let tags: Vec<String> = entries.iter().map(Entry::tag).collect();
        assert_eq!(tags, ["infotexts", "menu.title", "menu.open", "empty"]);
        assert_eq!(entries[0].text, None);
        assert_eq!(entries[1].text.as_deref(), Some("File"));
        assert_eq!(entries[3].text, None);

        let project = storage.get_project(pid).unwrap().unwrap();
        assert_eq!(project.language.as_deref(), Some("English"));
    }

    #[test]
    fn test_second_ingest_changes_nothing() {
        let (mut storage, pid) = setup();
        let doc = Document::from_bytes(DOC.as_bytes()).unwrap();
        ingest(&mut storage, pid, &doc, english()).unwrap();
        storage.mark_clean();

        let stats = ingest(&mut storage, pid, &doc, english()).unwrap();
        assert_eq!(stats.changed(), 0);
        assert_eq!(stats.unchanged, 4);
        assert!(!storage.is_dirty());
    }

    #[test]
    fn test_changed_text_updates_entry() {
        let (mut storage, pid) = setup();
        let doc = Document::from_bytes(DOC.as_bytes()).unwrap();
        ingest(&mut storage, pid, &doc, english()).unwrap();

        let edited = DOC.replace(">Open<", ">Open...<");
        let doc = Document::from_bytes(edited.as_bytes()).unwrap();
        let stats = ingest(&mut storage, pid, &doc, english()).unwrap();
        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.updated, 1);
    }

    #[test]
    fn test_removed_elements_are_kept_and_reported() {
        let (mut storage, pid) = setup();
        let doc = Document::from_bytes(DOC.as_bytes()).unwrap();
        ingest(&mut storage, pid, &doc, english()).unwrap();

        let trimmed = DOC.replace("<menu.open>Open</menu.open>", "");
        let doc = Document::from_bytes(trimmed.as_bytes()).unwrap();
        ingest(&mut storage, pid, &doc, english()).unwrap();

        assert_eq!(storage.list_entries(pid).unwrap().len(), 4);
        let stale = stale_entries(&storage, pid, &doc).unwrap();
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].tag(), "menu.open");
    }
}
