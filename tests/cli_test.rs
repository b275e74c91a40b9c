use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<infotexts language="English" display-name="English">
  <menu.title>File</menu.title>
  <menu.open>Open</menu.open>
  <!-- toolbar -->
  <toolbar>Tools</toolbar>
</infotexts>
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("home")).unwrap();
        fs::create_dir_all(dir.path().join("scratch")).unwrap();
        fs::write(dir.path().join("menus.xml"), DOC).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn itx(&self) -> Command {
        let mut cmd = Command::cargo_bin("itx").unwrap();
        cmd.current_dir(self.path())
            .env("ITX_HOME", self.path().join("home"))
            .env("ITX_TMPDIR", self.path().join("scratch"))
            .env("ITX_TRANSLATE_ENDPOINT", "http://127.0.0.1:9")
            .env("ITX_TRANSLATE_TIMEOUT", "5")
            .env_remove("ITX_PROJECT")
            .env_remove("ITX_DEFAULT_TARGET")
            .env_remove("RUST_LOG");
        cmd
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self.itx().args(args).output().unwrap();
        assert!(
            output.status.success(),
            "itx {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn scratch_is_empty(&self) -> bool {
        fs::read_dir(self.path().join("scratch")).unwrap().next().is_none()
    }
}

#[test]
fn test_version() {
    let ws = Workspace::new();
    ws.itx()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_languages_lists_table() {
    let ws = Workspace::new();
    let langs = ws.json(&["languages"]);
    let langs = langs.as_array().unwrap();
    assert_eq!(langs.len(), 13);
    assert!(langs
        .iter()
        .any(|l| l["name"] == "German" && l["display_name"] == "Deutsch" && l["code"] == "de"));
}

#[test]
fn test_project_create_and_show() {
    let ws = Workspace::new();
    let created = ws.json(&["project", "create", "menus"]);
    assert_eq!(created["name"], "menus");
    assert!(ws.path().join("menus").join("project-store").is_file());

    let shown = ws.json(&["--project", "menus", "project", "show"]);
    assert_eq!(shown["state"], "permanent_active");
    assert_eq!(shown["counts"]["entries"], 0);
    assert!(ws.scratch_is_empty());
}

#[test]
fn test_project_create_twice_fails() {
    let ws = Workspace::new();
    ws.json(&["project", "create", "menus"]);
    ws.itx()
        .args(["project", "create", "menus"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("PROJECT_EXISTS"));
}

#[test]
fn test_ingest_then_render_round_trips() {
    let ws = Workspace::new();
    ws.json(&["project", "create", "menus"]);

    let ingested = ws.json(&["--project", "menus", "ingest", "menus.xml"]);
    assert_eq!(ingested["inserted"], 4);
    assert!(ingested["promoted"].is_object());

    let again = ws.json(&["--project", "menus", "ingest", "menus.xml"]);
    assert_eq!(again["inserted"], 0);
    assert_eq!(again["updated"], 0);
    assert!(again["promoted"].is_null());

    let entries = ws.json(&["--project", "menus", "entries"]);
    assert_eq!(entries["total"], 4);

    ws.json(&[
        "--project", "menus", "render", "menus.xml", "--to", "English", "-o", "out.xml",
    ]);
    let out = fs::read(ws.path().join("out.xml")).unwrap();
    assert_eq!(&out[..3], b"\xEF\xBB\xBF");
    assert_eq!(&out[3..], DOC.as_bytes());
    assert!(ws.scratch_is_empty());
}

#[test]
fn test_render_rewrites_root_language() {
    let ws = Workspace::new();
    ws.json(&["project", "create", "menus"]);
    ws.json(&["--project", "menus", "ingest", "menus.xml"]);
    ws.json(&["--project", "menus", "render", "menus.xml", "--to", "de", "-o", "de.xml"]);

    let out = fs::read_to_string(ws.path().join("de.xml")).unwrap();
    assert!(out.contains(r#"<infotexts language="German" display-name="Deutsch">"#));
    assert!(out.contains("<menu.open>Open</menu.open>"));
}

#[test]
fn test_unsupported_language_is_rejected() {
    let ws = Workspace::new();
    ws.json(&["project", "create", "menus"]);
    fs::write(
        ws.path().join("klingon.xml"),
        DOC.replace(r#"language="English""#, r#"language="Klingon""#),
    )
    .unwrap();

    ws.itx()
        .args(["--project", "menus", "ingest", "klingon.xml"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("VALIDATION_ERROR"));

    let entries = ws.json(&["--project", "menus", "entries"]);
    assert_eq!(entries["total"], 0);
}

#[test]
fn test_display_name_mismatch_can_be_accepted() {
    let ws = Workspace::new();
    ws.json(&["project", "create", "menus"]);
    fs::write(
        ws.path().join("german.xml"),
        DOC.replace(
            r#"language="English" display-name="English""#,
            r#"language="German" display-name="German""#,
        ),
    )
    .unwrap();

    ws.itx()
        .args(["--project", "menus", "ingest", "german.xml"])
        .assert()
        .code(4);

    let ingested = ws.json(&["--project", "menus", "ingest", "german.xml", "--accept-display-name"]);
    assert_eq!(ingested["display_name_rewritten"], true);
    assert_eq!(ingested["language"], "German");
}

#[test]
fn test_commands_need_a_project() {
    let ws = Workspace::new();
    ws.itx()
        .args(["translate", "--to", "German"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("NO_PROJECT_BOUND"));
}

#[test]
fn test_dry_run_leaves_store_untouched() {
    let ws = Workspace::new();
    ws.json(&["project", "create", "menus"]);
    let store = ws.path().join("menus").join("project-store");
    let before = fs::read(&store).unwrap();

    let ingested = ws.json(&["--dry-run", "--project", "menus", "ingest", "menus.xml"]);
    assert_eq!(ingested["inserted"], 4);
    assert!(ingested["promoted"].is_null());
    assert_eq!(fs::read(&store).unwrap(), before);
}

#[test]
fn test_run_with_unreachable_translator_fails_fast() {
    let ws = Workspace::new();
    ws.itx()
        .args(["run", "menus.xml", "--to", "German", "-o", "out.xml", "--project-name", "menus"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("TRANSLATION_FAILURE"));

    assert!(!ws.path().join("out.xml").exists());

    // The project was created and holds the ingested entries.
    let shown = ws.json(&["--project", "menus", "project", "show"]);
    assert_eq!(shown["counts"]["entries"], 4);
    assert_eq!(shown["project"]["language"], "English");
    assert!(ws.scratch_is_empty());
}

#[test]
fn test_stale_entries() {
    let ws = Workspace::new();
    ws.json(&["project", "create", "menus"]);
    ws.json(&["--project", "menus", "ingest", "menus.xml"]);
    fs::write(
        ws.path().join("trimmed.xml"),
        DOC.replace("<toolbar>Tools</toolbar>", ""),
    )
    .unwrap();

    let stale = ws.json(&["--project", "menus", "entries", "--stale", "trimmed.xml"]);
    assert_eq!(stale["count"], 1);
    assert_eq!(stale["entries"][0]["principal_tag"], "toolbar");
}

#[test]
fn test_completions() {
    let ws = Workspace::new();
    ws.itx()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("itx"));
}
