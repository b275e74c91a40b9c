//! List the supported languages.

use colored::Colorize;

use super::print_json;
use crate::error::Result;
use crate::language::LANGUAGES;

/// Execute the languages command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(json: bool) -> Result<()> {
    if json {
        return print_json(&LANGUAGES);
    }

    println!(
        "{}",
        format!("{:<24} {:<26} {}", "NAME", "DISPLAY NAME", "CODE").bold()
    );
    for lang in &LANGUAGES {
        println!("{:<24} {:<26} {}", lang.name, lang.display_name, lang.code.dimmed());
    }
    Ok(())
}
