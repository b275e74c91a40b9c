//! Project management commands.
//!
//! - `itx project create <name>` - Create a project folder with an empty store
//! - `itx project show` - Show the project, its state and entry counts

use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use super::{print_json, Context};
use crate::cli::ProjectCommands;
use crate::error::{Error, Result};
use crate::model::Project;
use crate::session::Summary;

#[derive(Serialize)]
struct ProjectOutput {
    id: i64,
    name: String,
    folder_path: String,
    store_path: String,
    language: Option<String>,
}

impl From<Project> for ProjectOutput {
    fn from(p: Project) -> Self {
        Self {
            store_path: p.store_path().display().to_string(),
            id: p.id,
            name: p.name,
            folder_path: p.folder_path,
            language: p.language,
        }
    }
}

/// Execute a project command.
///
/// # Errors
///
/// Returns an error if the project cannot be created or opened.
pub fn execute(command: &ProjectCommands, ctx: &Context) -> Result<()> {
    match command {
        ProjectCommands::Create { name, dir } => execute_create(name, dir.as_deref(), ctx),
        ProjectCommands::Show => execute_show(ctx),
    }
}

fn execute_create(name: &str, dir: Option<&Path>, ctx: &Context) -> Result<()> {
    let name = name.trim();
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(Error::InvalidArgument(format!(
            "Project name '{name}' must be a non-empty folder name"
        )));
    }

    let parent = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let folder = parent.join(name);

    let mut session = ctx.session()?;
    let project = session.create_project(&folder)?;

    if ctx.json {
        print_json(&ProjectOutput::from(project))?;
    } else if !ctx.quiet {
        println!("Created project: {}", project.name.bold());
        println!("  Folder: {}", project.folder_path);
        println!("  Store:  {}", project.store_path().display());
    }
    Ok(())
}

fn execute_show(ctx: &Context) -> Result<()> {
    let session = ctx.project_session()?;
    let summary = session.summary()?;

    if ctx.json {
        return print_json(&summary);
    }
    if !ctx.quiet {
        print_summary(&summary);
    }
    Ok(())
}

fn print_summary(summary: &Summary) {
    let project = &summary.project;
    println!("{}", project.name.cyan().bold());
    println!("  Folder:   {}", project.folder_path);
    if let Some(path) = &summary.store_path {
        println!("  Store:    {}", path.display());
    }
    println!(
        "  Language: {}",
        project.language.as_deref().unwrap_or("(none yet)")
    );
    println!();
    println!("Entries: {}", summary.counts.entries);
    println!("  With text: {}", summary.counts.with_text);
    for lang in &summary.counts.by_language {
        println!(
            "  {:<24} {}",
            lang.language.as_deref().unwrap_or("(unknown)"),
            lang.entries
        );
    }
}
