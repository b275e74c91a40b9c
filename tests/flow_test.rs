use std::cell::Cell;
use std::fs;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use itx::config::Settings;
use itx::language::{self, Language};
use itx::staging::StoreState;
use itx::storage::SqliteStorage;
use itx::translate::{TranslatePolicy, Translator};
use itx::validate::DisplayNamePolicy;
use itx::{Error, Result, Session};

const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<infotexts language="English" display-name="English">
  <a>one</a>
  <b.x>two</b.x>
  <c>three</c>
  <d>four</d>
  <e>five</e>
</infotexts>
"#;

/// Upper-cases text, failing on one call.
struct Shouting {
    fail_on: usize,
    calls: Cell<usize>,
}

impl Translator for Shouting {
    fn name(&self) -> &str {
        "shouting"
    }

    fn translate(&self, text: &str, _source: &Language, _target: &Language) -> Result<String> {
        let call = self.calls.get() + 1;
        self.calls.set(call);
        if call == self.fail_on {
            return Err(Error::Translator("rate limited".into()));
        }
        Ok(text.to_uppercase())
    }
}

fn session(root: &Path) -> Session {
    let settings = Settings {
        temp_root: root.join("scratch"),
        ..Settings::default()
    };
    Session::new(settings, false)
}

#[test]
fn test_partial_translation_is_promoted() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(&input, DOC).unwrap();
    let folder = dir.path().join("doc");

    let mut s = session(dir.path());
    s.ingest(&input, DisplayNamePolicy::Abort).unwrap();
    let project = s.create_project(&folder).unwrap();

    let translator = Shouting {
        fail_on: 3,
        calls: Cell::new(0),
    };
    let german = language::find("German").unwrap();
    let cancel = AtomicBool::new(false);
    let report = s
        .translate(&translator, german, Some(TranslatePolicy::All), &cancel)
        .unwrap();
    assert_eq!(report.succeeded, 2);
    let failure = report.failure.clone().unwrap();
    assert_eq!(failure.tag, "c");

    s.commit().unwrap().unwrap();
    drop(s);

    let store = SqliteStorage::open_existing(&folder.join("project-store")).unwrap();
    let texts: Vec<(String, Option<String>)> = store
        .list_entries(project.id)
        .unwrap()
        .into_iter()
        .filter(|e| e.principal_tag != "infotexts")
        .map(|e| (e.tag(), e.text))
        .collect();
    assert_eq!(
        texts,
        [
            ("a".to_string(), Some("ONE".to_string())),
            ("b.x".to_string(), Some("TWO".to_string())),
            ("c".to_string(), Some("three".to_string())),
            ("d".to_string(), Some("four".to_string())),
            ("e".to_string(), Some("five".to_string())),
        ]
    );
    assert!(matches!(report.into_result(), Err(Error::Translation { .. })));
}

#[test]
fn test_reopened_project_keeps_translations_across_ingest() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("doc.xml");
    fs::write(&input, DOC).unwrap();
    let folder = dir.path().join("doc");

    let mut s = session(dir.path());
    s.create_project(&folder).unwrap();
    s.ingest(&input, DisplayNamePolicy::Abort).unwrap();
    s.commit().unwrap().unwrap();
    drop(s);

    let mut s = session(dir.path());
    s.open_project(&folder.join("project-store")).unwrap();
    assert_eq!(s.state(), StoreState::PermanentActive);
    let outcome = s.ingest(&input, DisplayNamePolicy::Abort).unwrap();
    assert_eq!(outcome.stats.changed(), 0);
    assert!(s.commit().unwrap().is_none());

    let (bytes, stats) = s.render(&input, None).unwrap();
    assert_eq!(stats.written, 0);
    assert_eq!(&bytes[3..], DOC.as_bytes());
}

#[test]
fn test_open_rejects_store_without_entries_table() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("project-store");
    let conn = rusqlite::Connection::open(&bogus).unwrap();
    conn.execute_batch(
        "CREATE TABLE Projects (id INTEGER PRIMARY KEY, name TEXT, folder_path TEXT, language TEXT);
         INSERT INTO Projects (name, folder_path) VALUES ('p', '/p');",
    )
    .unwrap();
    drop(conn);

    let mut s = session(dir.path());
    let err = s.open_project(&bogus).unwrap_err();
    assert!(matches!(err, Error::StoreUnavailable { .. }));
    assert_eq!(err.exit_code(), 2);
    assert_eq!(s.state(), StoreState::NoActiveStore);
}
