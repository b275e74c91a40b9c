//! Database schema definitions.
//!
//! A project store is a single SQLite file with two tables. The rollback
//! journal (not WAL) keeps every committed byte in the main file, which
//! is what whole-file promotion copies.

use rusqlite::{Connection, Result};

/// Schema version recorded in `PRAGMA user_version`.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Tables every project store must have, with their required columns.
pub const REQUIRED_TABLES: &[(&str, &[&str])] = &[
    ("Projects", &["id", "name", "folder_path", "language"]),
    (
        "Entries",
        &["id", "project_id", "principal_tag", "variable", "text", "language"],
    ),
];

/// The complete SQL schema for a project store.
pub const SCHEMA_SQL: &str = r"
-- Projects: one row per project bound to this store
CREATE TABLE IF NOT EXISTS Projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    folder_path TEXT NOT NULL,
    language TEXT
);

-- Entries: translatable texts keyed by (project, principal tag, variable)
CREATE TABLE IF NOT EXISTS Entries (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL REFERENCES Projects(id) ON DELETE CASCADE,
    principal_tag TEXT NOT NULL,
    variable TEXT NOT NULL DEFAULT '',
    text TEXT,
    language TEXT,
    UNIQUE (project_id, principal_tag, variable)
);

CREATE INDEX IF NOT EXISTS idx_entries_project ON Entries(project_id, id);
";

/// Apply the schema to a database connection.
///
/// This function is idempotent - it uses `CREATE TABLE IF NOT EXISTS`.
///
/// # Errors
///
/// Returns an error if the SQL execution fails or pragmas cannot be set.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    // Set pragmas before schema creation
    conn.pragma_update(None, "journal_mode", "DELETE")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "FULL")?;

    conn.execute_batch(SCHEMA_SQL)?;

    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version == 0 {
        conn.pragma_update(None, "user_version", CURRENT_SCHEMA_VERSION)?;
    }

    Ok(())
}

/// Check that a table exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1)",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Check if a column exists in a table.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM pragma_table_info(?1) WHERE name = ?2)",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// First structural problem with an existing store, if any.
///
/// # Errors
///
/// Returns an error if the file cannot be queried (e.g. it is not a
/// database at all).
pub fn find_schema_problem(conn: &Connection) -> Result<Option<String>> {
    for (table, columns) in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Ok(Some(format!("missing table {table}")));
        }
        for column in *columns {
            if !column_exists(conn, table, column)? {
                return Ok(Some(format!("table {table} has no column {column}")));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_schema() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();

        assert!(table_exists(&conn, "Projects").unwrap());
        assert!(table_exists(&conn, "Entries").unwrap());
        assert!(column_exists(&conn, "Entries", "principal_tag").unwrap());
        assert!(!column_exists(&conn, "Entries", "nope").unwrap());
        assert_eq!(find_schema_problem(&conn).unwrap(), None);
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();

        let version: i32 = conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version, CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn test_foreign_keys_enabled() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        let fk: i32 = conn
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();
        assert_eq!(fk, 1);

        let orphan = conn.execute(
            "INSERT INTO Entries (project_id, principal_tag, variable) VALUES (99, 'a', '')",
            [],
        );
        assert!(orphan.is_err());
    }

    #[test]
    fn test_unique_key_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn.execute("INSERT INTO Projects (name, folder_path) VALUES ('p', '/p')", [])
            .unwrap();
        conn.execute(
            "INSERT INTO Entries (project_id, principal_tag, variable) VALUES (1, 'a', 'b')",
            [],
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO Entries (project_id, principal_tag, variable) VALUES (1, 'a', 'b')",
            [],
        );
        assert!(dup.is_err());
    }

    #[test]
    fn test_reports_missing_table() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Projects (id INTEGER, name TEXT, folder_path TEXT, language TEXT);",
        )
        .unwrap();
        let problem = find_schema_problem(&conn).unwrap().unwrap();
        assert!(problem.contains("Entries"));
    }
}
