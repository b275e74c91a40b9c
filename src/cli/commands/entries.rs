//! Entries command implementation.

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use super::{print_json, truncate, Context};
use crate::error::Result;
use crate::model::Entry;

#[derive(Serialize)]
struct EntriesOutput {
    entries: Vec<Entry>,
    count: usize,
    total: usize,
}

/// List the project's entries, or only the stale ones.
///
/// # Errors
///
/// Returns an error if no project is found or the document cannot be read.
pub fn execute(stale: Option<&Path>, limit: Option<usize>, ctx: &Context) -> Result<()> {
    let session = ctx.project_session()?;
    let mut entries = match stale {
        Some(doc) => session.stale_entries(doc)?,
        None => session.entries()?,
    };
    let total = entries.len();
    if let Some(limit) = limit {
        entries.truncate(limit);
    }

    if ctx.json {
        return print_json(&EntriesOutput {
            count: entries.len(),
            entries,
            total,
        });
    }
    if ctx.quiet {
        return Ok(());
    }

    if entries.is_empty() {
        if stale.is_some() {
            println!("No stale entries.");
        } else {
            println!("No entries. Add some with: itx ingest <file>");
        }
        return Ok(());
    }

    println!(
        "{}",
        format!("{:>5}  {:<32} {:<22} {}", "ID", "TAG", "LANGUAGE", "TEXT").bold()
    );
    for entry in &entries {
        let text = match entry.text.as_deref() {
            Some(t) => truncate(t, 60).normal(),
            None => "(no text)".dimmed(),
        };
        println!(
            "{:>5}  {:<32} {:<22} {}",
            entry.id,
            truncate(&entry.tag(), 32),
            entry.language.as_deref().unwrap_or("-"),
            text
        );
    }
    if total > entries.len() {
        println!("{}", format!("... {} more", total - entries.len()).dimmed());
    }
    Ok(())
}
