//! Text helpers for accent-insensitive search and name validation.

use unicode_normalization::UnicodeNormalization;
use unicode_properties::{GeneralCategory, UnicodeGeneralCategory};

use crate::{EngineError, ResultEngine};

/// Maximum length (in characters) of a catalogue name.
pub const NAME_MAX_LEN: usize = 150;

/// Fold `input` for search comparison: canonical decomposition, nonspacing
/// marks (`Mn`) removed, lowercase.
///
/// Spacing and enclosing marks are kept, so scripts that write vowels as
/// marks still compare letter by letter. Lowercasing runs on the whole string
/// to get context-dependent mappings such as the word-final sigma.
///
/// The result is only ever compared or stored in a `*_norm` column; the
/// displayed value keeps its original spelling.
///
/// ```rust
/// use engine::normalize_text;
///
/// assert_eq!(normalize_text("Café"), "cafe");
/// assert_eq!(normalize_text("Ñoquis"), "noquis");
/// assert_eq!(normalize_text("Pollo a la Parrilla"), "pollo a la parrilla");
/// ```
pub fn normalize_text(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let stripped: String = input.nfd().filter(|ch| !is_nonspacing_mark(*ch)).collect();
    // Some lowercase mappings emit a nonspacing mark of their own.
    stripped
        .to_lowercase()
        .nfd()
        .filter(|ch| !is_nonspacing_mark(*ch))
        .collect()
}

fn is_nonspacing_mark(ch: char) -> bool {
    ch.general_category() == GeneralCategory::NonspacingMark
}

/// Trim and validate a required catalogue name.
pub(crate) fn normalize_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidName(format!(
            "{label} name must not be empty"
        )));
    }
    if trimmed.chars().count() > NAME_MAX_LEN {
        return Err(EngineError::InvalidName(format!(
            "{label} name cannot exceed {NAME_MAX_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Normalized search term, `None` when the input is absent or blank.
pub(crate) fn search_term(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(normalize_text)
        .filter(|s| !s.is_empty())
}

/// `LIKE` pattern matching `term` anywhere, with the wildcards of `term`
/// escaped by `\`.
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out.push('%');
    out
}
