//! One-shot flow: ingest, translate, render.
//!
//! Works on a temporary store. With `--project-name` the store becomes a
//! new project before translation, and the translations are promoted
//! into it.

use std::sync::atomic::AtomicBool;

use serde::Serialize;

use super::{ingest, print_json, render, translate, Context};
use crate::cli::RunArgs;
use crate::error::Result;
use crate::model::Project;
use crate::session::{IngestOutcome, RenderOutcome};
use crate::staging::PromoteReport;
use crate::translate::TranslationReport;

#[derive(Serialize)]
struct RunOutput {
    ingest: IngestOutcome,
    project: Option<Project>,
    translation: TranslationReport,
    promoted: Option<PromoteReport>,
    render: Option<RenderOutcome>,
}

/// Execute the run command.
///
/// # Errors
///
/// Returns the first failing step's error. A translation failure is
/// reported after partial results are promoted; nothing is rendered then.
pub fn execute(args: &RunArgs, ctx: &Context) -> Result<()> {
    let mut session = ctx.session()?;
    let target = session.settings().target_language(args.to.as_deref())?;
    let translator = session.translator()?;

    let ingested = session.ingest(&args.file, ingest::display_name_policy(args.accept_display_name))?;

    let project = match &args.project_name {
        Some(name) if ctx.dry_run => {
            tracing::warn!(project = %name, "Dry run: project not created");
            None
        }
        Some(name) => {
            let folder = std::env::current_dir()?.join(name);
            Some(session.create_project(&folder)?)
        }
        None => None,
    };

    let cancel = AtomicBool::new(false);
    let translation = session.translate(&translator, target, args.policy, &cancel)?;
    let promoted = if project.is_some() { session.commit()? } else { None };

    let rendered = if translation.failure.is_none() && !translation.cancelled {
        Some(session.render_to(&args.file, &args.output, Some(target))?)
    } else {
        None
    };

    if ctx.json {
        print_json(&RunOutput {
            ingest: ingested,
            project,
            translation: translation.clone(),
            promoted,
            render: rendered,
        })?;
    } else if !ctx.quiet {
        ingest::print_outcome(&ingested);
        if let Some(p) = &project {
            println!("Created project {} in {}", p.name, p.folder_path);
        }
        translate::print_report(&translation);
        if let Some(outcome) = &rendered {
            render::print_outcome(outcome, ctx.dry_run);
        }
    }

    translation.into_result().map(|_| ())
}
