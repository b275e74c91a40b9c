//! Entry model.

use serde::{Deserialize, Serialize};

use crate::document::EntryKey;

/// A translatable text keyed by `(project_id, principal_tag, variable)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: i64,
    pub project_id: i64,
    pub principal_tag: String,
    /// Empty when the tag has no variable part.
    pub variable: String,
    /// `None` when the element had no text.
    pub text: Option<String>,
    /// Language the text is known to be in.
    pub language: Option<String>,
}

impl Entry {
    #[must_use]
    pub fn key(&self) -> EntryKey {
        EntryKey::new(self.principal_tag.as_str(), self.variable.as_str())
    }

    /// Tag name of the element this entry came from.
    #[must_use]
    pub fn tag(&self) -> String {
        self.key().tag()
    }

    /// Whether the entry has text worth sending to a translator.
    #[must_use]
    pub fn has_translatable_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }
}

/// Outcome of a single upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upsert {
    pub id: i64,
    /// False when the stored text already matched.
    pub changed: bool,
}
