//! Translate command implementation.

use std::sync::atomic::AtomicBool;

use colored::Colorize;
use serde::Serialize;

use super::{print_json, Context};
use crate::cli::TranslateArgs;
use crate::error::Result;
use crate::staging::PromoteReport;
use crate::translate::TranslationReport;

#[derive(Serialize)]
struct TranslateOutput {
    #[serde(flatten)]
    report: TranslationReport,
    promoted: Option<PromoteReport>,
}

/// Translate the project's entries and promote whatever succeeded.
///
/// A translator failure still promotes the entries written before it,
/// then exits with the translation error.
///
/// # Errors
///
/// Returns an error if no project is found, the target is unsupported,
/// or a translation failed.
pub fn execute(args: &TranslateArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.project_session()?;
    let target = session.settings().target_language(args.to.as_deref())?;
    let translator = session.translator()?;
    let cancel = AtomicBool::new(false);

    let report = session.translate(&translator, target, args.policy, &cancel)?;
    let promoted = session.commit()?;

    if ctx.json {
        print_json(&TranslateOutput {
            report: report.clone(),
            promoted,
        })?;
    } else if !ctx.quiet {
        print_report(&report);
    }

    report.into_result().map(|_| ())
}

pub(super) fn print_report(report: &TranslationReport) {
    println!(
        "Translated {} entries into {} ({} skipped)",
        report.succeeded.to_string().green(),
        report.target,
        report.skipped
    );
    if report.cancelled {
        println!("{}", "Cancelled before all entries were processed.".yellow());
    }
    if let Some(failure) = &report.failure {
        println!(
            "{} entry {} ({}) failed; later entries were not attempted.",
            "Stopped:".red().bold(),
            failure.entry_id,
            failure.tag
        );
    }
}
