//! Translation of stored entries.
//!
//! A [`Translator`] turns one text from a source language into a target
//! language. [`orchestrator::translate_all`] drives it over every entry of
//! a project and writes the results back to the store.

pub mod google;
pub mod orchestrator;

pub use google::GoogleTranslator;
pub use orchestrator::{translate_all, TranslatePolicy, TranslationFailure, TranslationReport};

use crate::error::Result;
use crate::language::Language;

/// A translation service.
///
/// Implementations are synchronous; HTTP-backed ones block on their own
/// runtime for each request.
pub trait Translator {
    /// Short name for logs and reports.
    fn name(&self) -> &str;

    /// Translate `text` from `source` into `target`.
    ///
    /// # Errors
    ///
    /// Returns `Error::Translator` if the service fails or answers with
    /// something that is not a translation.
    fn translate(&self, text: &str, source: &Language, target: &Language) -> Result<String>;
}

/// Boxed translator for dynamic dispatch.
pub type BoxedTranslator = Box<dyn Translator>;
