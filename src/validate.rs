//! Document validation with typo recovery.
//!
//! A document is accepted when its root is `<infotexts>`, its `language`
//! attribute names a supported language, and its `display-name` matches
//! that language's canonical display name. Unknown languages come back
//! with the closest supported name as a suggestion.

use thiserror::Error;

use crate::document::{Document, DISPLAY_NAME_ATTR, LANGUAGE_ATTR, ROOT_TAG};
use crate::language::{self, Language};

/// What to do when `display-name` disagrees with the language table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayNamePolicy {
    /// Fail with `ValidationIssue::DisplayNameMismatch`.
    #[default]
    Abort,
    /// Rewrite the attribute to the canonical display name.
    Accept,
}

/// A reason a document was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("root element is <{found}>, expected <infotexts>")]
    WrongRoot { found: String },

    #[error("root element has no `{name}` attribute")]
    MissingAttribute { name: &'static str },

    #[error("unsupported language: {language}")]
    UnsupportedLanguage {
        language: String,
        suggestion: Option<String>,
    },

    #[error("display-name for {language} is \"{found}\", expected \"{expected}\"")]
    DisplayNameMismatch {
        language: String,
        found: String,
        expected: String,
    },
}

impl ValidationIssue {
    /// Recovery hint shown next to the error.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::WrongRoot { .. } => {
                Some(format!("Only <{ROOT_TAG}> documents can be ingested."))
            }
            Self::MissingAttribute { name } => Some(format!(
                "Add {name}=\"...\" to the <{ROOT_TAG}> element."
            )),
            Self::UnsupportedLanguage { suggestion, .. } => match suggestion {
                Some(s) => Some(format!("Did you mean \"{s}\"? Run `itx languages` for the full list.")),
                None => Some("Run `itx languages` for the supported languages.".to_string()),
            },
            Self::DisplayNameMismatch { expected, .. } => Some(format!(
                "Re-run with --accept-display-name to rewrite it to \"{expected}\"."
            )),
        }
    }
}

/// Validate a document and return its language.
///
/// With `DisplayNamePolicy::Accept`, a display-name mismatch is corrected
/// in the document instead of rejected. No other issue is recoverable.
///
/// # Errors
///
/// Returns the first `ValidationIssue` found.
pub fn validate_document(
    doc: &mut Document,
    policy: DisplayNamePolicy,
) -> Result<&'static Language, ValidationIssue> {
    if doc.root.name != ROOT_TAG {
        return Err(ValidationIssue::WrongRoot {
            found: doc.root.name.clone(),
        });
    }

    let name = doc.language().ok_or(ValidationIssue::MissingAttribute {
        name: LANGUAGE_ATTR,
    })?;

    let Some(lang) = language::find(&name) else {
        let suggestion = find_closest_language(&name);
        return Err(ValidationIssue::UnsupportedLanguage {
            language: name,
            suggestion,
        });
    };

    let found = doc.display_name().unwrap_or_default();
    if found != lang.display_name {
        match policy {
            DisplayNamePolicy::Abort => {
                return Err(ValidationIssue::DisplayNameMismatch {
                    language: lang.name.to_string(),
                    found,
                    expected: lang.display_name.to_string(),
                });
            }
            DisplayNamePolicy::Accept => {
                tracing::info!(
                    language = lang.name,
                    from = %found,
                    to = lang.display_name,
                    "Rewriting display-name"
                );
                doc.root.set_attribute(DISPLAY_NAME_ATTR, lang.display_name);
            }
        }
    }

    Ok(lang)
}

/// Find the supported language closest to the input (case-insensitive).
fn find_closest_language(input: &str) -> Option<String> {
    let lower = input.to_lowercase();
    let mut best: Option<(&str, usize)> = None;

    for name in language::names() {
        let dist = levenshtein_distance(&lower, &name.to_lowercase());
        if dist <= 3 && best.is_none_or(|(_, d)| dist < d) {
            best = Some((name, dist));
        }
    }

    best.map(|(v, _)| v.to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let a_len = a.len();
    let b_len = b.len();

    if a_len == 0 {
        return b_len;
    }
    if b_len == 0 {
        return a_len;
    }

    // Use single-row optimization (O(min(m,n)) space)
    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for i in 1..=a_len {
        curr[0] = i;
        for j in 1..=b_len {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(xml: &str) -> Document {
        Document::from_bytes(xml.as_bytes()).unwrap()
    }

    #[test]
    fn test_accepts_valid_document() {
        let mut d = doc(r#"<infotexts language="German" display-name="Deutsch"><a>x</a></infotexts>"#);
        let lang = validate_document(&mut d, DisplayNamePolicy::Abort).unwrap();
        assert_eq!(lang.code, "de");
    }

    #[test]
    fn test_rejects_wrong_root() {
        let mut d = doc(r#"<texts language="German" display-name="Deutsch"/>"#);
        let err = validate_document(&mut d, DisplayNamePolicy::Accept).unwrap_err();
        assert_eq!(err, ValidationIssue::WrongRoot { found: "texts".into() });
    }

    #[test]
    fn test_rejects_unknown_language() {
        let mut d = doc(r#"<infotexts language="Klingon" display-name="tlhIngan"/>"#);
        let err = validate_document(&mut d, DisplayNamePolicy::Accept).unwrap_err();
        assert!(matches!(err, ValidationIssue::UnsupportedLanguage { suggestion: None, .. }));
    }

    #[test]
    fn test_suggests_close_language() {
        let mut d = doc(r#"<infotexts language="Frensh" display-name="Français"/>"#);
        match validate_document(&mut d, DisplayNamePolicy::Abort).unwrap_err() {
            ValidationIssue::UnsupportedLanguage { suggestion, .. } => {
                assert_eq!(suggestion.as_deref(), Some("French"));
            }
            other => panic!("unexpected issue: {other:?}"),
        }
    }

    #[test]
    fn test_missing_language() {
        let mut d = doc("<infotexts/>");
        let err = validate_document(&mut d, DisplayNamePolicy::Abort).unwrap_err();
        assert_eq!(err, ValidationIssue::MissingAttribute { name: LANGUAGE_ATTR });
    }

    #[test]
    fn test_display_name_mismatch_policy() {
        let xml = r#"<infotexts language="Castilian Spanish" display-name="Spanish"/>"#;

        let mut d = doc(xml);
        let err = validate_document(&mut d, DisplayNamePolicy::Abort).unwrap_err();
        assert!(matches!(err, ValidationIssue::DisplayNameMismatch { .. }));
        assert_eq!(d.display_name().as_deref(), Some("Spanish"));

        let mut d = doc(xml);
        validate_document(&mut d, DisplayNamePolicy::Accept).unwrap();
        assert_eq!(d.display_name().as_deref(), Some("Castellano"));
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }
}
