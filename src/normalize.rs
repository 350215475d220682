//! Text normalization shared by every comparison in the crate.
//!
//! Queries, document lines and artifact filenames all pass through
//! [`normalize`] before they are compared, so two strings that differ only
//! in case or diacritics compare equal.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonicalizes `text` for comparison.
///
/// The string is decomposed (NFD), lowercased, and stripped of every
/// combining mark. The result stays decomposed; nothing is recomposed.
///
/// ```
/// use mip_search::normalize::normalize;
///
/// assert_eq!(normalize("Café"), normalize("CAFE"));
/// assert_eq!(normalize("Αίτηση"), "αιτηση");
/// ```
pub fn normalize(text: &str) -> String {
    text.nfd()
        .flat_map(char::to_lowercase)
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Returns true when `haystack` contains `needle` after normalizing both.
pub fn contains_normalized(haystack: &str, needle: &str) -> bool {
    normalize(haystack).contains(&normalize(needle))
}
