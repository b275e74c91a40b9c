//! Entry key derivation from element tag names.
//!
//! A tag such as `menu.title` splits on the first `.` into the principal
//! tag `menu` and the variable `title`. Tags without a delimiter have an
//! empty variable.

use serde::Serialize;
use std::fmt;

/// Delimiter between principal tag and variable.
pub const KEY_DELIMITER: char = '.';

/// Natural key of an entry: `(principal_tag, variable)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntryKey {
    pub principal: String,
    pub variable: String,
}

impl EntryKey {
    /// Build a key from its parts.
    pub fn new(principal: impl Into<String>, variable: impl Into<String>) -> Self {
        Self {
            principal: principal.into(),
            variable: variable.into(),
        }
    }

    /// Derive the key for a tag name.
    #[must_use]
    pub fn derive(tag: &str) -> Self {
        match tag.split_once(KEY_DELIMITER) {
            Some((principal, variable)) => Self::new(principal, variable),
            None => Self::new(tag, ""),
        }
    }

    /// Rebuild the tag name this key was derived from.
    #[must_use]
    pub fn tag(&self) -> String {
        if self.variable.is_empty() {
            self.principal.clone()
        } else {
            format!("{}{KEY_DELIMITER}{}", self.principal, self.variable)
        }
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}
