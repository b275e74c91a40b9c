//! One user session: the active store plus the settings it runs with.
//!
//! Every operation the CLI offers goes through a [`Session`]. It owns the
//! [`StagingManager`] and sequences validation, ingestion, translation,
//! rendering and promotion against the active store.

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;

use serde::Serialize;

use crate::config::Settings;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::model::{Entry, Project};
use crate::staging::{PromoteReport, StagingManager, StoreState};
use crate::storage::ProjectCounts;
use crate::sync::{self, IngestStats, RenderStats};
use crate::translate::{GoogleTranslator, TranslatePolicy, TranslationReport, Translator};
use crate::validate::{validate_document, DisplayNamePolicy};

/// Result of [`Session::ingest`].
#[derive(Debug, Clone, Serialize)]
pub struct IngestOutcome {
    pub document: PathBuf,
    pub language: &'static str,
    /// True when validation rewrote the `display-name` attribute.
    pub display_name_rewritten: bool,
    #[serde(flatten)]
    pub stats: IngestStats,
}

/// Result of [`Session::render_to`].
#[derive(Debug, Clone, Serialize)]
pub struct RenderOutcome {
    pub output: PathBuf,
    pub language: Option<&'static str>,
    pub bytes: usize,
    #[serde(flatten)]
    pub stats: RenderStats,
}

/// Snapshot of the active store.
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    pub state: StoreState,
    pub project: Project,
    pub store_path: Option<PathBuf>,
    pub dirty: bool,
    pub counts: ProjectCounts,
}

/// Explicit session state, passed to every command.
#[derive(Debug)]
pub struct Session {
    staging: StagingManager,
    settings: Settings,
    dry_run: bool,
}

impl Session {
    #[must_use]
    pub fn new(settings: Settings, dry_run: bool) -> Self {
        let staging = StagingManager::new(settings.temp_root.clone());
        Self {
            staging,
            settings,
            dry_run,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    #[must_use]
    pub fn state(&self) -> StoreState {
        self.staging.state()
    }

    #[must_use]
    pub fn staging(&self) -> &StagingManager {
        &self.staging
    }

    /// Open a permanent store; its working copy becomes the active store.
    ///
    /// # Errors
    ///
    /// See [`StagingManager::open_project`].
    pub fn open_project(&mut self, store_path: &Path) -> Result<Project> {
        self.staging.open_project(store_path)
    }

    /// Create a project in `folder`, binding the current temporary store.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` in a dry run, otherwise see
    /// [`StagingManager::create_project`].
    pub fn create_project(&mut self, folder: &Path) -> Result<Project> {
        if self.dry_run {
            return Err(Error::InvalidArgument(
                "Cannot create a project during a dry run".to_string(),
            ));
        }
        self.staging.create_project(folder)
    }

    /// Validate a document file and reconcile it into the active store.
    ///
    /// A temporary store is started if nothing is active. Validation runs
    /// before the store is touched.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` for a rejected document, `Error::Document`
    /// for malformed XML, or a store error.
    pub fn ingest(&mut self, path: &Path, display_names: DisplayNamePolicy) -> Result<IngestOutcome> {
        let mut doc = Document::load(path)?;
        let before = doc.display_name();
        let language = validate_document(&mut doc, display_names)?;
        let display_name_rewritten = doc.display_name() != before;

        if self.staging.state() == StoreState::NoActiveStore {
            self.staging.start_temporary()?;
        }
        let project_id = self.staging.project()?.id;
        let stats = sync::ingest(self.staging.storage_mut()?, project_id, &doc, language)?;

        Ok(IngestOutcome {
            document: path.to_path_buf(),
            language: language.name,
            display_name_rewritten,
            stats,
        })
    }

    /// Build the translator the settings describe.
    ///
    /// # Errors
    ///
    /// Returns `Error::Translator` if the HTTP client cannot be created.
    pub fn translator(&self) -> Result<GoogleTranslator> {
        GoogleTranslator::with_config(
            self.settings.translate_endpoint.clone(),
            self.settings.translate_timeout,
        )
    }

    /// Translate the active project's entries into `target`.
    ///
    /// `policy` falls back to the configured one.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveStore` if nothing is active, or a store error.
    /// Translator failures are recorded in the report.
    pub fn translate(
        &mut self,
        translator: &dyn Translator,
        target: &'static Language,
        policy: Option<TranslatePolicy>,
        cancel: &AtomicBool,
    ) -> Result<TranslationReport> {
        let policy = policy.unwrap_or(self.settings.translate_policy);
        let project_id = self.staging.project()?.id;
        crate::translate::translate_all(
            self.staging.storage_mut()?,
            project_id,
            translator,
            target,
            policy,
            cancel,
        )
    }

    /// Render `input` with the active project's entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or parsed, or entries
    /// cannot be listed.
    pub fn render(&self, input: &Path, target: Option<&'static Language>) -> Result<(Vec<u8>, RenderStats)> {
        let doc = Document::load(input)?;
        let project_id = self.staging.project()?.id;
        let (out, stats) = sync::render_document(self.staging.storage()?, project_id, &doc, target)?;
        Ok((out.to_bytes()?, stats))
    }

    /// Render `input` and write it to `output` atomically.
    ///
    /// In a dry run nothing is written.
    ///
    /// # Errors
    ///
    /// See [`Session::render`]; also fails if the output cannot be written.
    pub fn render_to(
        &self,
        input: &Path,
        output: &Path,
        target: Option<&'static Language>,
    ) -> Result<RenderOutcome> {
        let (bytes, stats) = self.render(input, target)?;
        if self.dry_run {
            tracing::info!(output = %output.display(), "Dry run: output not written");
        } else {
            sync::atomic_write(output, &bytes)?;
        }
        Ok(RenderOutcome {
            output: output.to_path_buf(),
            language: target.map(|l| l.name),
            bytes: bytes.len(),
            stats,
        })
    }

    /// Entries of the active project, in ID order.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveStore` if nothing is active.
    pub fn entries(&self) -> Result<Vec<Entry>> {
        let project_id = self.staging.project()?.id;
        self.staging.storage()?.list_entries(project_id)
    }

    /// Entries whose key is absent from the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded.
    pub fn stale_entries(&self, path: &Path) -> Result<Vec<Entry>> {
        let doc = Document::load(path)?;
        let project_id = self.staging.project()?.id;
        sync::stale_entries(self.staging.storage()?, project_id, &doc)
    }

    /// Project, counts and state of the active store.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoActiveStore` if nothing is active.
    pub fn summary(&self) -> Result<Summary> {
        let project = self.staging.project()?;
        let counts = self.staging.storage()?.get_project_counts(project.id)?;
        Ok(Summary {
            state: self.staging.state(),
            store_path: self.staging.permanent_path().map(Path::to_path_buf),
            dirty: self.staging.is_dirty(),
            project,
            counts,
        })
    }

    /// Promote the working copy into the permanent store.
    ///
    /// Returns `None` in a dry run, or when nothing changed since the last
    /// promotion.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoProjectBound` unless a project is open, or the
    /// promotion error (the permanent store is then unchanged).
    pub fn commit(&mut self) -> Result<Option<PromoteReport>> {
        if self.dry_run {
            tracing::info!("Dry run: changes not promoted");
            return Ok(None);
        }
        if self.staging.state() != StoreState::PermanentActive {
            return Err(Error::NoProjectBound);
        }
        if !self.staging.is_dirty() {
            tracing::debug!("Nothing to promote");
            return Ok(None);
        }
        self.staging.promote().map(Some)
    }
}
