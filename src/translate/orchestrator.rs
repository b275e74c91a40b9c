//! Drive a translator over a project's entries.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

use super::Translator;
use crate::error::{Error, Result};
use crate::language::{self, Language};
use crate::model::Entry;
use crate::storage::SqliteStorage;

/// Which entries a translation run sends to the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TranslatePolicy {
    /// Every entry with text, even ones already in the target language.
    #[default]
    All,
    /// Only entries whose recorded language differs from the target.
    Untranslated,
}

impl TranslatePolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Untranslated => "untranslated",
        }
    }
}

impl std::str::FromStr for TranslatePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "untranslated" => Ok(Self::Untranslated),
            other => Err(Error::InvalidArgument(format!(
                "Unknown translate policy '{other}' (expected all or untranslated)"
            ))),
        }
    }
}

/// The entry that stopped a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationFailure {
    pub entry_id: i64,
    pub tag: String,
    pub message: String,
}

/// Outcome of [`translate_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TranslationReport {
    pub target: String,
    /// Entries sent to the translator, the failing one included.
    pub attempted: usize,
    pub succeeded: usize,
    /// Entries with no text, or already in the target under `Untranslated`.
    pub skipped: usize,
    pub failure: Option<TranslationFailure>,
    pub cancelled: bool,
}

impl TranslationReport {
    /// Turn a recorded failure into `Error::Translation`.
    ///
    /// # Errors
    ///
    /// Returns the failure, if there was one.
    pub fn into_result(self) -> Result<Self> {
        match self.failure {
            Some(TranslationFailure { entry_id, tag, message }) => Err(Error::Translation {
                entry_id,
                tag,
                message,
            }),
            None => Ok(self),
        }
    }
}

/// Translate every entry of a project into `target`.
///
/// Entries are processed in ID order. Each translation is written as soon
/// as it arrives. The store is dirty once any entry was attempted, whether
/// or not the call succeeded. The first
/// failure stops the run; earlier writes stay. `cancel` is checked before
/// each entry.
///
/// The source language of an entry is the language its text was recorded
/// in, falling back to the project language.
///
/// # Errors
///
/// Returns an error if the project is missing, has no language to
/// translate from, or the store rejects a write. Translator failures are
/// reported in [`TranslationReport::failure`] instead.
pub fn translate_all(
    storage: &mut SqliteStorage,
    project_id: i64,
    translator: &dyn Translator,
    target: &'static Language,
    policy: TranslatePolicy,
    cancel: &AtomicBool,
) -> Result<TranslationReport> {
    let project = storage
        .get_project(project_id)?
        .ok_or(Error::NoProjectBound)?;
    let project_language = project
        .language
        .as_deref()
        .and_then(language::find)
        .ok_or_else(|| {
            Error::InvalidArgument(format!(
                "Project '{}' has no source language; ingest a document first",
                project.name
            ))
        })?;

    let entries = storage.list_entries(project_id)?;
    let mut report = TranslationReport {
        target: target.name.to_string(),
        ..TranslationReport::default()
    };

    tracing::info!(
        translator = translator.name(),
        to = target.name,
        policy = policy.as_str(),
        entries = entries.len(),
        "Starting translation"
    );

    for entry in &entries {
        if cancel.load(Ordering::SeqCst) {
            tracing::warn!(
                succeeded = report.succeeded,
                remaining = entries.len() - report.attempted - report.skipped,
                "Translation cancelled"
            );
            report.cancelled = true;
            break;
        }

        let Some(text) = sendable_text(entry, target, policy) else {
            report.skipped += 1;
            continue;
        };
        let source = entry
            .language
            .as_deref()
            .and_then(language::find)
            .unwrap_or(project_language);

        report.attempted += 1;
        storage.mark_dirty();
        match translator.translate(text, source, target) {
            Ok(translated) => {
                storage.update_translation(entry.id, &translated, target.name)?;
                report.succeeded += 1;
                tracing::debug!(id = entry.id, tag = %entry.tag(), "Translated entry");
            }
            Err(e) => {
                tracing::warn!(id = entry.id, tag = %entry.tag(), error = %e, "Translation failed");
                report.failure = Some(TranslationFailure {
                    entry_id: entry.id,
                    tag: entry.tag(),
                    message: e.to_string(),
                });
                break;
            }
        }
    }

    tracing::info!(
        succeeded = report.succeeded,
        skipped = report.skipped,
        failed = report.failure.is_some(),
        "Translation finished"
    );
    Ok(report)
}

fn sendable_text<'e>(entry: &'e Entry, target: &Language, policy: TranslatePolicy) -> Option<&'e str> {
    if !entry.has_translatable_text() {
        return None;
    }
    if policy == TranslatePolicy::Untranslated && entry.language.as_deref() == Some(target.name) {
        return None;
    }
    entry.text.as_deref()
}
