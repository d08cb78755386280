//! Text normalisation for matching keys.
//!
//! Ingredient names, units and category lookups are matched on their
//! normalised form: lower-case, canonical decomposition, combining marks
//! stripped. The same function runs on the write path (what gets stored)
//! and the read path (what gets matched), so "Café" and "cafe" meet in the
//! middle.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Lower-case `text` and strip diacritics via NFD decomposition.
/// Total over any input; the empty string maps to itself.
pub fn normalise(text: &str) -> String {
    text.to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}
