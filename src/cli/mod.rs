//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::translate::TranslatePolicy;

pub mod commands;

/// infotexts - ingest, translate and rebuild infotexts documents
#[derive(Parser, Debug)]
#[command(name = "itx", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project store, or the folder holding it (default: nearest `project-store`)
    #[arg(long, global = true, env = "ITX_PROJECT")]
    pub project: Option<PathBuf>,

    /// Translation service endpoint
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Directory for temporary stores
    #[arg(long, global = true)]
    pub tmpdir: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against the working copy but never promote or write output
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project management
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },

    /// Validate a document and store its entries in the project
    Ingest(IngestArgs),

    /// Translate the project's entries
    Translate(TranslateArgs),

    /// Rebuild a document from the project's entries
    Render(RenderArgs),

    /// Ingest, translate and render in one go
    Run(RunArgs),

    /// List the project's entries
    Entries {
        /// Only entries whose key is missing from this document
        #[arg(long, value_name = "FILE")]
        stale: Option<PathBuf>,

        /// Maximum entries to show
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// List supported languages
    Languages,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Print version information
    Version,
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ============================================================================
// Project Commands
// ============================================================================

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a new, empty project
    Create {
        /// Project name; also the folder created for it
        name: String,

        /// Parent directory of the project folder (defaults to current directory)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Show the project, its state and entry counts
    Show,
}

// ============================================================================
// Document Commands
// ============================================================================

#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Document to ingest
    pub file: PathBuf,

    /// Rewrite a mismatched display-name instead of failing
    #[arg(long)]
    pub accept_display_name: bool,
}

#[derive(Args, Debug)]
pub struct TranslateArgs {
    /// Target language (name or code; default from config)
    #[arg(long)]
    pub to: Option<String>,

    /// Which entries to send
    #[arg(long, value_enum)]
    pub policy: Option<TranslatePolicy>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Document whose structure is rebuilt
    pub input: PathBuf,

    /// Language written to the root attributes
    #[arg(long)]
    pub to: Option<String>,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Document to translate
    pub file: PathBuf,

    /// Target language (name or code; default from config)
    #[arg(long)]
    pub to: Option<String>,

    /// Output file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Keep the entries as a new project with this name
    #[arg(long)]
    pub project_name: Option<String>,

    /// Rewrite a mismatched display-name instead of failing
    #[arg(long)]
    pub accept_display_name: bool,

    /// Which entries to send
    #[arg(long, value_enum)]
    pub policy: Option<TranslatePolicy>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "itx", "run", "menus.xml", "--to", "German", "-o", "out.xml", "--project-name", "menus",
            "--json",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.to.as_deref(), Some("German"));
                assert_eq!(args.project_name.as_deref(), Some("menus"));
                assert_eq!(args.policy, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_policy() {
        let cli = Cli::try_parse_from(["itx", "translate", "--to", "de", "--policy", "untranslated"]).unwrap();
        match cli.command {
            Commands::Translate(args) => assert_eq!(args.policy, Some(TranslatePolicy::Untranslated)),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
