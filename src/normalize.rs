//! Text normalization applied before classification and sentiment scoring.
//! The stored `original_text` is always the raw input; normalization only
//! feeds the AI ports.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid normalizer regex"));

/// Lowercase, trim, and strip everything that is not a word character or
/// whitespace. Pure and total; Unicode word characters survive.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    NON_WORD.replace_all(lowered.trim(), "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_lowercases() {
        assert_eq!(
            normalize("  My ORDER #42 never arrived!!! "),
            "my order 42 never arrived"
        );
    }

    #[test]
    fn keeps_unicode_word_characters() {
        assert_eq!(normalize("Überweisung fehlgeschlagen?"), "überweisung fehlgeschlagen");
    }

    #[test]
    fn empty_and_symbol_only_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!...#"), "");
    }
}
