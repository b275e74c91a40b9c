//! Ingest command implementation.

use super::{print_json, Context};
use crate::cli::IngestArgs;
use crate::error::Result;
use crate::session::IngestOutcome;
use crate::staging::PromoteReport;
use crate::validate::DisplayNamePolicy;

#[derive(serde::Serialize)]
struct IngestOutput {
    #[serde(flatten)]
    outcome: IngestOutcome,
    promoted: Option<PromoteReport>,
}

/// Validate a document, reconcile it into the project and promote.
///
/// # Errors
///
/// Returns an error if no project is found, the document is rejected, or
/// promotion fails.
pub fn execute(args: &IngestArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.project_session()?;
    let outcome = session.ingest(&args.file, display_name_policy(args.accept_display_name))?;
    let promoted = session.commit()?;

    if ctx.json {
        return print_json(&IngestOutput { outcome, promoted });
    }
    if !ctx.quiet {
        print_outcome(&outcome);
        if promoted.is_some() {
            println!("Saved to project store.");
        }
    }
    Ok(())
}

pub(super) fn display_name_policy(accept: bool) -> DisplayNamePolicy {
    if accept {
        DisplayNamePolicy::Accept
    } else {
        DisplayNamePolicy::Abort
    }
}

pub(super) fn print_outcome(outcome: &IngestOutcome) {
    let stats = &outcome.stats;
    println!("Ingested {} ({})", outcome.document.display(), outcome.language);
    if outcome.display_name_rewritten {
        println!("  display-name rewritten");
    }
    println!(
        "  {} new, {} updated, {} unchanged",
        stats.inserted, stats.updated, stats.unchanged
    );
    if stats.duplicates > 0 {
        println!("  {} duplicate elements ignored", stats.duplicates);
    }
}
