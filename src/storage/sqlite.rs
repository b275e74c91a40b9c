//! SQLite storage implementation.
//!
//! This module provides the entry store for infotexts using SQLite.
//! It follows the MutationContext pattern for transaction discipline and
//! keeps a store-level dirty flag that only promotion clears.

use crate::error::{Error, Result};
use crate::model::{Entry, Project, Upsert};
use crate::storage::schema::{apply_schema, find_schema_problem};
use rusqlite::backup::{Backup, StepResult};
use rusqlite::{Connection, OpenFlags, OptionalExtension, Transaction};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pages copied per backup step.
const BACKUP_PAGES_PER_STEP: i32 = 16;

/// SQLite-based entry store.
#[derive(Debug)]
pub struct SqliteStorage {
    conn: Connection,
    path: Option<PathBuf>,
    dirty: bool,
}

/// Context for a mutation operation, tracking side effects.
///
/// Passed to mutation closures so they can report whether they actually
/// changed anything. A mutation that reports a change marks the store
/// dirty once its transaction commits.
pub struct MutationContext {
    /// Name of the operation being performed.
    pub op_name: String,
    /// Rows written by this operation.
    pub rows_changed: usize,
}

impl MutationContext {
    /// Create a new mutation context.
    #[must_use]
    pub fn new(op_name: &str) -> Self {
        Self {
            op_name: op_name.to_string(),
            rows_changed: 0,
        }
    }

    /// Record that `rows` rows were written.
    pub fn record_change(&mut self, rows: usize) {
        self.rows_changed += rows;
    }

    #[must_use]
    pub fn changed(&self) -> bool {
        self.rows_changed > 0
    }
}

/// A new entry as read from a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    pub principal_tag: String,
    pub variable: String,
    pub text: Option<String>,
}

/// Counts of entries for a project.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct ProjectCounts {
    /// Number of entries.
    pub entries: usize,
    /// Entries with non-empty text.
    pub with_text: usize,
    /// Entries per language, most common first.
    pub by_language: Vec<LanguageCount>,
}

/// Number of entries whose text is in one language.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LanguageCount {
    pub language: Option<String>,
    pub entries: usize,
}

/// Progress of a backup, reported after every step.
#[derive(Debug, Clone, Copy)]
pub struct BackupProgress {
    /// Steps completed so far.
    pub step: usize,
    pub remaining: i32,
    pub pagecount: i32,
}

impl SqliteStorage {
    /// Open (or create) a store at the given path.
    ///
    /// Creates the database and applies schema if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or schema fails.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_schema(&conn)?;
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            dirty: false,
        })
    }

    /// Open an existing project store read-only and check its shape.
    ///
    /// Nothing is created or written. The file must exist, contain the
    /// `Projects` and `Entries` tables, and hold at least one project.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreUnavailable` if the file is missing, unreadable,
    /// or lacks a required table, and `Error::InvalidProjectStore` if it
    /// has no project row.
    pub fn open_existing(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| Error::StoreUnavailable {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable("file not found".to_string()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| unavailable(e.to_string()))?;

        if let Some(problem) = find_schema_problem(&conn).map_err(|e| unavailable(e.to_string()))? {
            return Err(unavailable(problem));
        }

        let storage = Self {
            conn,
            path: Some(path.to_path_buf()),
            dirty: false,
        };

        if storage
            .first_project()
            .map_err(|e| unavailable(e.to_string()))?
            .is_none()
        {
            return Err(Error::InvalidProjectStore {
                path: path.to_path_buf(),
                reason: "no project row".to_string(),
            });
        }

        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn,
            path: None,
            dirty: false,
        })
    }

    /// Get a reference to the underlying connection (for read operations).
    #[must_use]
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// File backing this store (`None` for in-memory stores).
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether anything changed since the last promotion.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the store as changed without a write.
    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clear the dirty flag. Only promotion calls this.
    pub(crate) fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Execute a mutation with the transaction protocol.
    ///
    /// This method:
    /// 1. Begins an IMMEDIATE transaction (for write locking)
    /// 2. Executes the mutation closure
    /// 3. Commits (or rolls back on error)
    /// 4. Marks the store dirty if the closure recorded a change
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails. The transaction is rolled back on error.
    pub fn mutate<F, R>(&mut self, op: &str, f: F) -> Result<R>
    where
        F: FnOnce(&Transaction, &mut MutationContext) -> Result<R>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

        let mut ctx = MutationContext::new(op);

        // Execute the mutation
        let result = f(&tx, &mut ctx)?;

        // Commit
        tx.commit()?;

        if ctx.changed() {
            self.dirty = true;
            tracing::debug!(op = %ctx.op_name, rows = ctx.rows_changed, "Mutation committed");
        }

        Ok(result)
    }

    // ==================
    // Project Operations
    // ==================

    /// Insert a project row.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_project(&mut self, name: &str, folder_path: &str) -> Result<Project> {
        self.mutate("create_project", |tx, ctx| {
            tx.execute(
                "INSERT INTO Projects (name, folder_path) VALUES (?1, ?2)",
                rusqlite::params![name, folder_path],
            )?;
            ctx.record_change(1);

            Ok(Project {
                id: tx.last_insert_rowid(),
                name: name.to_string(),
                folder_path: folder_path.to_string(),
                language: None,
            })
        })
    }

    /// Get a project by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_project(&self, id: i64) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, folder_path, language FROM Projects WHERE id = ?1",
                [id],
                map_project_row,
            )
            .optional()?;
        Ok(project)
    }

    /// The project this store is bound to (lowest ID).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn first_project(&self) -> Result<Option<Project>> {
        let project = self
            .conn
            .query_row(
                "SELECT id, name, folder_path, language FROM Projects ORDER BY id LIMIT 1",
                [],
                map_project_row,
            )
            .optional()?;
        Ok(project)
    }

    /// Rename a project and move it to another folder.
    ///
    /// # Errors
    ///
    /// Returns an error if the project doesn't exist or the update fails.
    pub fn rename_project(&mut self, id: i64, name: &str, folder_path: &str) -> Result<()> {
        self.mutate("rename_project", |tx, ctx| {
            let rows = tx.execute(
                "UPDATE Projects SET name = ?1, folder_path = ?2 WHERE id = ?3",
                rusqlite::params![name, folder_path, id],
            )?;
            if rows == 0 {
                return Err(Error::Other(format!("Project not found: {id}")));
            }
            ctx.record_change(rows);
            Ok(())
        })
    }

    /// Record the document language on a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_project_language(&mut self, id: i64, language: &str) -> Result<()> {
        self.mutate("set_project_language", |tx, ctx| {
            let rows = tx.execute(
                "UPDATE Projects SET language = ?1 WHERE id = ?2 AND language IS NOT ?1",
                rusqlite::params![language, id],
            )?;
            ctx.record_change(rows);
            Ok(())
        })
    }

    // ==================
    // Entry Operations
    // ==================

    /// Insert an entry, or update its text if it changed.
    ///
    /// An absent entry is inserted. A present entry whose text differs
    /// (`NULL` and `""` differ) gets the new text and language. A present
    /// entry with the same text is left alone and reports `changed: false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; nothing is written in that case.
    pub fn upsert_entry(
        &mut self,
        project_id: i64,
        principal_tag: &str,
        variable: &str,
        text: Option<&str>,
        language: &str,
    ) -> Result<Upsert> {
        self.mutate("upsert_entry", |tx, ctx| {
            upsert_in_tx(tx, ctx, project_id, principal_tag, variable, text, language)
        })
    }

    /// Upsert many entries and record `language` on the project.
    ///
    /// One transaction: either every entry is reconciled and the project
    /// language is set, or nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    pub fn upsert_entries(
        &mut self,
        project_id: i64,
        entries: &[NewEntry],
        language: &str,
    ) -> Result<Vec<Upsert>> {
        self.mutate("upsert_entries", |tx, ctx| {
            let results = entries
                .iter()
                .map(|e| {
                    upsert_in_tx(
                        tx,
                        ctx,
                        project_id,
                        &e.principal_tag,
                        &e.variable,
                        e.text.as_deref(),
                        language,
                    )
                })
                .collect::<Result<Vec<_>>>()?;

            let rows = tx.execute(
                "UPDATE Projects SET language = ?1 WHERE id = ?2 AND language IS NOT ?1",
                rusqlite::params![language, project_id],
            )?;
            ctx.record_change(rows);
            Ok(results)
        })
    }

    /// List a project's entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_entries(&self, project_id: i64) -> Result<Vec<Entry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, principal_tag, variable, text, language
             FROM Entries
             WHERE project_id = ?1
             ORDER BY id ASC",
        )?;

        let entries = stmt
            .query_map([project_id], map_entry_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(entries)
    }

    /// Get an entry by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_entry(&self, id: i64) -> Result<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                "SELECT id, project_id, principal_tag, variable, text, language
                 FROM Entries WHERE id = ?1",
                [id],
                map_entry_row,
            )
            .optional()?;
        Ok(entry)
    }

    /// Overwrite an entry's text. Always marks the store dirty.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntryNotFound` if no entry has this ID.
    pub fn update_text(&mut self, id: i64, text: &str) -> Result<()> {
        self.mutate("update_text", |tx, ctx| {
            let rows = tx.execute("UPDATE Entries SET text = ?1 WHERE id = ?2", rusqlite::params![text, id])?;
            if rows == 0 {
                return Err(Error::EntryNotFound { id });
            }
            ctx.record_change(rows);
            Ok(())
        })
    }

    /// Overwrite an entry's text and language in one write.
    ///
    /// # Errors
    ///
    /// Returns `Error::EntryNotFound` if no entry has this ID.
    pub fn update_translation(&mut self, id: i64, text: &str, language: &str) -> Result<()> {
        self.mutate("update_translation", |tx, ctx| {
            let rows = tx.execute(
                "UPDATE Entries SET text = ?1, language = ?2 WHERE id = ?3",
                rusqlite::params![text, language, id],
            )?;
            if rows == 0 {
                return Err(Error::EntryNotFound { id });
            }
            ctx.record_change(rows);
            Ok(())
        })
    }

    /// Summary counts for a project.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn get_project_counts(&self, project_id: i64) -> Result<ProjectCounts> {
        let count = |sql: &str| -> Result<usize> {
            let n: i64 = self.conn.query_row(sql, [project_id], |row| row.get(0))?;
            Ok(usize::try_from(n).unwrap_or(0))
        };

        let entries = count("SELECT COUNT(*) FROM Entries WHERE project_id = ?1")?;
        let with_text = count(
            "SELECT COUNT(*) FROM Entries WHERE project_id = ?1 AND TRIM(COALESCE(text, '')) <> ''",
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT language, COUNT(*) FROM Entries
             WHERE project_id = ?1
             GROUP BY language
             ORDER BY COUNT(*) DESC, language",
        )?;
        let by_language = stmt
            .query_map([project_id], |row| {
                let n: i64 = row.get(1)?;
                Ok(LanguageCount {
                    language: row.get(0)?,
                    entries: usize::try_from(n).unwrap_or(0),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(ProjectCounts {
            entries,
            with_text,
            by_language,
        })
    }

    // ==================
    // Backup
    // ==================

    /// Copy the whole database to `dest` with the online-backup API.
    ///
    /// # Errors
    ///
    /// Returns an error if the destination cannot be opened or a step fails.
    pub fn backup_to(&self, dest: &Path) -> Result<()> {
        self.backup_to_with(dest, |_| Ok(()))
    }

    /// Like [`backup_to`](Self::backup_to), calling `on_step` after every
    /// step. An error from `on_step` aborts the copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails or `on_step` fails.
    pub fn backup_to_with<F>(&self, dest: &Path, mut on_step: F) -> Result<()>
    where
        F: FnMut(BackupProgress) -> Result<()>,
    {
        let mut dst = Connection::open(dest)?;
        let backup = Backup::new(&self.conn, &mut dst)?;

        let mut step = 0;
        loop {
            let result = backup.step(BACKUP_PAGES_PER_STEP)?;
            step += 1;
            let progress = backup.progress();
            on_step(BackupProgress {
                step,
                remaining: progress.remaining,
                pagecount: progress.pagecount,
            })?;

            match result {
                StepResult::Done => break,
                StepResult::More => {}
                StepResult::Busy | StepResult::Locked => {
                    std::thread::sleep(Duration::from_millis(25));
                }
                #[allow(unreachable_patterns)]
                _ => {
                    return Err(Error::Other("unexpected backup step result".to_string()));
                }
            }
        }

        tracing::debug!(dest = %dest.display(), steps = step, "Backup complete");
        Ok(())
    }
}

fn upsert_in_tx(
    tx: &Transaction,
    ctx: &mut MutationContext,
    project_id: i64,
    principal_tag: &str,
    variable: &str,
    text: Option<&str>,
    language: &str,
) -> Result<Upsert> {
    let existing: Option<(i64, Option<String>)> = tx
        .query_row(
            "SELECT id, text FROM Entries
             WHERE project_id = ?1 AND principal_tag = ?2 AND variable = ?3",
            rusqlite::params![project_id, principal_tag, variable],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    match existing {
        None => {
            tx.execute(
                "INSERT INTO Entries (project_id, principal_tag, variable, text, language)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![project_id, principal_tag, variable, text, language],
            )?;
            ctx.record_change(1);
            Ok(Upsert {
                id: tx.last_insert_rowid(),
                changed: true,
            })
        }
        Some((id, stored)) if stored.as_deref() != text => {
            tx.execute(
                "UPDATE Entries SET text = ?1, language = ?2 WHERE id = ?3",
                rusqlite::params![text, language, id],
            )?;
            ctx.record_change(1);
            Ok(Upsert { id, changed: true })
        }
        Some((id, _)) => Ok(Upsert { id, changed: false }),
    }
}

// Helper to map project rows
fn map_project_row(row: &rusqlite::Row) -> rusqlite::Result<Project> {
    Ok(Project {
        id: row.get(0)?,
        name: row.get(1)?,
        folder_path: row.get(2)?,
        language: row.get(3)?,
    })
}

// Helper to map entry rows
fn map_entry_row(row: &rusqlite::Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: row.get(0)?,
        project_id: row.get(1)?,
        principal_tag: row.get(2)?,
        variable: row.get(3)?,
        text: row.get(4)?,
        language: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_with_project() -> (SqliteStorage, i64) {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let project = storage.create_project("menus", "/work/menus").unwrap();
        storage.mark_clean();
        (storage, project.id)
    }

    #[test]
    fn test_open_memory() {
        let storage = SqliteStorage::open_memory();
        assert!(storage.is_ok());
        assert!(!storage.unwrap().is_dirty());
    }

    #[test]
    fn test_project_crud() {
        let mut storage = SqliteStorage::open_memory().unwrap();
        let project = storage.create_project("untitled", "").unwrap();
        assert!(storage.is_dirty());

        storage.rename_project(project.id, "menus", "/work/menus").unwrap();
        storage.set_project_language(project.id, "English").unwrap();

        let loaded = storage.first_project().unwrap().unwrap();
        assert_eq!(loaded.name, "menus");
        assert_eq!(loaded.language.as_deref(), Some("English"));
        assert_eq!(storage.get_project(project.id).unwrap(), Some(loaded));
        assert!(storage.get_project(999).unwrap().is_none());
    }

    #[test]
    fn test_upsert_insert_update_noop() {
        let (mut storage, pid) = storage_with_project();

        let first = storage.upsert_entry(pid, "menu", "title", Some("File"), "English").unwrap();
        assert!(first.changed);
        assert!(storage.is_dirty());
        storage.mark_clean();

        let same = storage.upsert_entry(pid, "menu", "title", Some("File"), "English").unwrap();
        assert_eq!(same, Upsert { id: first.id, changed: false });
        assert!(!storage.is_dirty());

        let updated = storage.upsert_entry(pid, "menu", "title", Some("Archive"), "German").unwrap();
        assert_eq!(updated, Upsert { id: first.id, changed: true });
        let entry = storage.get_entry(first.id).unwrap().unwrap();
        assert_eq!(entry.text.as_deref(), Some("Archive"));
        assert_eq!(entry.language.as_deref(), Some("German"));
    }

    #[test]
    fn test_null_and_empty_text_differ() {
        let (mut storage, pid) = storage_with_project();
        let a = storage.upsert_entry(pid, "a", "", None, "English").unwrap();
        let b = storage.upsert_entry(pid, "a", "", Some(""), "English").unwrap();
        assert!(b.changed);
        assert_eq!(a.id, b.id);
        let c = storage.upsert_entry(pid, "a", "", Some(""), "English").unwrap();
        assert!(!c.changed);
    }

    #[test]
    fn test_list_entries_in_insertion_order() {
        let (mut storage, pid) = storage_with_project();
        let batch = vec![
            NewEntry { principal_tag: "z".into(), variable: String::new(), text: Some("1".into()) },
            NewEntry { principal_tag: "a".into(), variable: "x".into(), text: None },
            NewEntry { principal_tag: "m".into(), variable: String::new(), text: Some("3".into()) },
        ];
        let results = storage.upsert_entries(pid, &batch, "English").unwrap();
        assert!(results.iter().all(|u| u.changed));

        let tags: Vec<String> = storage.list_entries(pid).unwrap().iter().map(Entry::tag).collect();
        assert_eq!(tags, ["z", "a.x", "m"]);
        let project = storage.get_project(pid).unwrap().unwrap();
        assert_eq!(project.language.as_deref(), Some("English"));
    }

    #[test]
    fn test_upsert_entries_rolls_back_with_project_language() {
        let (mut storage, pid) = storage_with_project();
        storage
            .conn()
            .execute_batch(
                "CREATE TRIGGER lock_language BEFORE UPDATE OF language ON Projects
                 BEGIN SELECT RAISE(ABORT, 'language locked'); END;",
            )
            .unwrap();
        storage.mark_clean();

        let batch = vec![NewEntry { principal_tag: "a".into(), variable: String::new(), text: Some("1".into()) }];
        assert!(storage.upsert_entries(pid, &batch, "German").is_err());
        assert!(storage.list_entries(pid).unwrap().is_empty());
        assert!(!storage.is_dirty());
    }

    #[test]
    fn test_update_text_marks_dirty() {
        let (mut storage, pid) = storage_with_project();
        let u = storage.upsert_entry(pid, "a", "", Some("x"), "English").unwrap();
        storage.mark_clean();

        storage.update_text(u.id, "y").unwrap();
        assert!(storage.is_dirty());

        storage.mark_clean();
        // Same text still counts as a write
        storage.update_text(u.id, "y").unwrap();
        assert!(storage.is_dirty());

        let err = storage.update_text(999, "y").unwrap_err();
        assert!(matches!(err, Error::EntryNotFound { id: 999 }));
    }

    #[test]
    fn test_update_translation() {
        let (mut storage, pid) = storage_with_project();
        let u = storage.upsert_entry(pid, "a", "", Some("Hello"), "English").unwrap();
        storage.update_translation(u.id, "Hallo", "German").unwrap();
        let entry = storage.get_entry(u.id).unwrap().unwrap();
        assert_eq!(entry.text.as_deref(), Some("Hallo"));
        assert_eq!(entry.language.as_deref(), Some("German"));
    }

    #[test]
    fn test_project_counts() {
        let (mut storage, pid) = storage_with_project();
        storage.upsert_entry(pid, "a", "", Some("x"), "English").unwrap();
        storage.upsert_entry(pid, "b", "", None, "English").unwrap();
        let c = storage.upsert_entry(pid, "c", "", Some("y"), "English").unwrap();
        storage.update_translation(c.id, "z", "German").unwrap();

        let counts = storage.get_project_counts(pid).unwrap();
        assert_eq!(counts.entries, 3);
        assert_eq!(counts.with_text, 2);
        assert_eq!(counts.by_language[0].language.as_deref(), Some("English"));
        assert_eq!(counts.by_language[0].entries, 2);
    }

    #[test]
    fn test_backup_and_open_existing() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("copy.db");

        let (mut storage, pid) = storage_with_project();
        storage.upsert_entry(pid, "a", "", Some("x"), "English").unwrap();
        storage.backup_to(&dest).unwrap();

        let copy = SqliteStorage::open_existing(&dest).unwrap();
        assert_eq!(copy.first_project().unwrap().unwrap().name, "menus");
        assert_eq!(copy.list_entries(pid).unwrap().len(), 1);
    }

    #[test]
    fn test_backup_step_failure_propagates() {
        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("copy.db");
        let (storage, _) = storage_with_project();

        let err = storage
            .backup_to_with(&dest, |_| Err(Error::Other("interrupted".into())))
            .unwrap_err();
        assert!(err.to_string().contains("interrupted"));
    }

    #[test]
    fn test_open_existing_rejects_bad_stores() {
        let temp = TempDir::new().unwrap();

        let missing = temp.path().join("missing");
        assert!(matches!(
            SqliteStorage::open_existing(&missing),
            Err(Error::StoreUnavailable { .. })
        ));

        let garbage = temp.path().join("garbage");
        std::fs::write(&garbage, b"definitely not sqlite, just some bytes padded out").unwrap();
        assert!(matches!(
            SqliteStorage::open_existing(&garbage),
            Err(Error::StoreUnavailable { .. })
        ));

        let no_entries = temp.path().join("no-entries");
        let conn = Connection::open(&no_entries).unwrap();
        conn.execute_batch(
            "CREATE TABLE Projects (id INTEGER PRIMARY KEY, name TEXT, folder_path TEXT, language TEXT);
             INSERT INTO Projects (name, folder_path) VALUES ('p', '/p');",
        )
        .unwrap();
        drop(conn);
        assert!(matches!(
            SqliteStorage::open_existing(&no_entries),
            Err(Error::StoreUnavailable { .. })
        ));

        let empty = temp.path().join("empty");
        SqliteStorage::open(&empty).unwrap();
        assert!(matches!(
            SqliteStorage::open_existing(&empty),
            Err(Error::InvalidProjectStore { .. })
        ));
    }
}
