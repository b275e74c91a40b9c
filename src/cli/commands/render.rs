//! Render command implementation.

use super::{print_json, Context};
use crate::cli::RenderArgs;
use crate::error::Result;
use crate::session::RenderOutcome;

/// Rebuild a document from the project's entries.
///
/// # Errors
///
/// Returns an error if no project is found, the input cannot be read, or
/// the output cannot be written.
pub fn execute(args: &RenderArgs, ctx: &Context) -> Result<()> {
    let session = ctx.project_session()?;
    let target = session.settings().target_language(args.to.as_deref())?;
    let outcome = session.render_to(&args.input, &args.output, Some(target))?;

    if ctx.json {
        return print_json(&outcome);
    }
    if !ctx.quiet {
        print_outcome(&outcome, ctx.dry_run);
    }
    Ok(())
}

pub(super) fn print_outcome(outcome: &RenderOutcome, dry_run: bool) {
    let verb = if dry_run { "Would write" } else { "Wrote" };
    println!(
        "{verb} {} ({}, {} bytes)",
        outcome.output.display(),
        outcome.language.unwrap_or("source language"),
        outcome.bytes
    );
    println!(
        "  {} texts replaced, {} unchanged",
        outcome.stats.written, outcome.stats.unchanged
    );
    if outcome.stats.missing > 0 {
        println!("  {} stored entries not in this document", outcome.stats.missing);
    }
}
