//! Supported document languages.
//!
//! Every infotexts document declares one of these languages on its root.
//! Each language pairs the identifier used in documents with its canonical
//! display name and the code the translation service expects.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// A supported document language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Language {
    /// Identifier used in the root `language` attribute (e.g. "Castilian Spanish").
    pub name: &'static str,
    /// Canonical value of the root `display-name` attribute.
    pub display_name: &'static str,
    /// Language code for the translation service.
    pub code: &'static str,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Languages accepted in documents, ordered by name.
pub static LANGUAGES: [Language; 13] = [
    Language { name: "Brazilian Portuguese", display_name: "Português brasileiro", code: "pt" },
    Language { name: "Castilian Spanish", display_name: "Castellano", code: "es" },
    Language { name: "English", display_name: "English", code: "en" },
    Language { name: "French", display_name: "Français", code: "fr" },
    Language { name: "German", display_name: "Deutsch", code: "de" },
    Language { name: "Japanese", display_name: "日本語", code: "ja" },
    Language { name: "Korean", display_name: "한국어", code: "ko" },
    Language { name: "Latinamerican Spanish", display_name: "Español Latinoamericano", code: "es" },
    Language { name: "Polish", display_name: "Polski", code: "pl" },
    Language { name: "Russian", display_name: "Русский", code: "ru" },
    Language { name: "Simplified Chinese", display_name: "中文(简体)", code: "zh-CN" },
    Language { name: "Traditional Chinese", display_name: "中文(繁體)", code: "zh-TW" },
    Language { name: "Turkish", display_name: "Türkçe", code: "tr" },
];

static BY_NAME: LazyLock<HashMap<&'static str, &'static Language>> =
    LazyLock::new(|| LANGUAGES.iter().map(|l| (l.name, l)).collect());

/// Look up a language by its exact document identifier.
#[must_use]
pub fn find(name: &str) -> Option<&'static Language> {
    BY_NAME.get(name).copied()
}

/// Resolve user input to a language.
///
/// Accepts the exact identifier, a case-insensitive identifier, or a
/// translation code when exactly one language uses it ("es" is ambiguous).
#[must_use]
pub fn resolve(input: &str) -> Option<&'static Language> {
    if let Some(lang) = find(input) {
        return Some(lang);
    }

    let trimmed = input.trim();
    if let Some(lang) = LANGUAGES
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(trimmed))
    {
        return Some(lang);
    }

    let mut by_code = LANGUAGES
        .iter()
        .filter(|l| l.code.eq_ignore_ascii_case(trimmed));
    match (by_code.next(), by_code.next()) {
        (Some(lang), None) => Some(lang),
        _ => None,
    }
}

/// All language identifiers, for suggestions and help text.
pub fn names() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|l| l.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_exact() {
        let lang = find("Castilian Spanish").unwrap();
        assert_eq!(lang.display_name, "Castellano");
        assert_eq!(lang.code, "es");
        assert!(find("castilian spanish").is_none());
        assert!(find("Klingon").is_none());
    }

    #[test]
    fn test_resolve_user_input() {
        assert_eq!(resolve("german").unwrap().name, "German");
        assert_eq!(resolve("zh-TW").unwrap().name, "Traditional Chinese");
        // Two Spanish variants share the code
        assert!(resolve("es").is_none());
        assert!(resolve("Klingon").is_none());
    }

    #[test]
    fn test_table_names_unique() {
        assert_eq!(BY_NAME.len(), LANGUAGES.len());
        assert_eq!(names().count(), 13);
    }
}
