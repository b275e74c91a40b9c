//! Command implementations.
//!
//! Each command builds a [`Session`] from a [`Context`], runs one or more
//! session operations and prints the outcome as text or JSON.

pub mod completions;
pub mod entries;
pub mod ingest;
pub mod languages;
pub mod project;
pub mod render;
pub mod run;
pub mod translate;
pub mod version;

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::Cli;
use crate::config::{self, Overrides, Settings};
use crate::error::{Error, Result};
use crate::session::Session;

/// Global options every command sees.
#[derive(Debug, Clone)]
pub struct Context {
    pub project: Option<PathBuf>,
    pub overrides: Overrides,
    pub json: bool,
    pub quiet: bool,
    pub dry_run: bool,
}

impl Context {
    #[must_use]
    pub fn from_cli(cli: &Cli, json: bool) -> Self {
        Self {
            project: cli.project.clone(),
            overrides: Overrides {
                translate_endpoint: cli.endpoint.clone(),
                translate_policy: None,
                temp_root: cli.tmpdir.clone(),
            },
            json,
            quiet: cli.quiet,
            dry_run: cli.dry_run,
        }
    }

    /// A session with no active store.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if settings cannot be resolved.
    pub fn session(&self) -> Result<Session> {
        let settings = Settings::load(&self.overrides)?;
        Ok(Session::new(settings, self.dry_run))
    }

    /// A session with the resolved project store open.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoProjectBound` if no store can be found, or the
    /// error from opening it.
    pub fn project_session(&self) -> Result<Session> {
        let store = config::resolve_project_store(self.project.as_deref()).ok_or(Error::NoProjectBound)?;
        let mut session = self.session()?;
        session.open_project(&store)?;
        Ok(session)
    }
}

/// Print a value as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First line of `s`, cut to `max_len` characters.
fn truncate(s: &str, max_len: usize) -> String {
    let first_line = s.lines().next().unwrap_or(s);
    if first_line.chars().count() <= max_len {
        first_line.to_string()
    } else {
        let cut: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
