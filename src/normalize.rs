//! Text normalization shared by symptom matching and emergency scanning.
//!
//! Free text arrives from typing, speech recognition, or the symptom
//! database in English, Hindi (Devanagari) or Kannada. Everything is
//! compared in one canonical form:
//!
//! 1. NFC composition
//! 2. anything that is not a letter, number or whitespace becomes a space
//! 3. whitespace runs collapse to one space, ends trimmed
//! 4. lowercase
//!
//! Indic vowel signs, viramas and zero-width joiners are not letters, so
//! they split words like punctuation does. Keywords and texts go through the
//! same folding, which keeps containment matching consistent on both sides.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Keywords shorter than this (in chars) skip the word-boundary check.
const SHORT_KEYWORD_CHARS: usize = 4;

static NON_WORD_RUNS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{L}\p{N}\s]+").expect("valid non-word pattern")
});

/// Canonicalize free text for matching. Total and idempotent.
///
/// Lowercasing runs before the character filter. The result is the same as
/// lowercasing last, except that marks produced by case mapping
/// (U+0130 -> i + U+0307) are filtered too, so a second pass is a no-op.
pub fn normalize(s: &str) -> String {
    let lowered: String = s.nfc().flat_map(char::to_lowercase).nfc().collect();
    let spaced = NON_WORD_RUNS.replace_all(&lowered, " ");
    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// True iff `s` contains a Devanagari, Kannada or Tamil code point.
pub fn is_indic_script(s: &str) -> bool {
    s.chars().any(|ch| {
        matches!(ch,
            '\u{0900}'..='\u{097F}'
            | '\u{0C80}'..='\u{0CFF}'
            | '\u{0B80}'..='\u{0BFF}')
    })
}

/// A keyword normalized and compiled once, matched against many texts.
///
/// Matching rules, in order:
/// - empty keyword or empty text never matches
/// - Indic keyword or Indic text: plain substring containment
/// - keyword under 4 chars: plain substring containment
/// - otherwise: case-insensitive match anchored on ASCII word boundaries
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    normalized: String,
    indic: bool,
    bounded: Option<Regex>,
}

impl KeywordMatcher {
    /// Normalize `keyword` and prepare it for matching.
    pub fn new(keyword: &str) -> Self {
        Self::from_normalized(normalize(keyword))
    }

    /// Prepare an already-normalized keyword.
    pub fn from_normalized(normalized: String) -> Self {
        let indic = is_indic_script(&normalized);
        let bounded = if indic || normalized.chars().count() < SHORT_KEYWORD_CHARS {
            None
        } else {
            // The pattern is escaped, so compilation only fails on size limits;
            // containment is the fallback in that case.
            // ASCII word boundaries: a non-ASCII letter next to the keyword
            // counts as a separator.
            Regex::new(&format!(r"(?i)(?-u:\b){}(?-u:\b)", regex::escape(&normalized))).ok()
        };

        Self {
            normalized,
            indic,
            bounded,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.normalized
    }

    /// Match against text that has already been through [`normalize`].
    pub fn matches(&self, normalized_text: &str) -> bool {
        if self.normalized.is_empty() || normalized_text.is_empty() {
            return false;
        }
        if self.indic || is_indic_script(normalized_text) {
            return normalized_text.contains(&self.normalized);
        }
        match &self.bounded {
            Some(re) => re.is_match(normalized_text),
            None => normalized_text.contains(&self.normalized),
        }
    }
}

/// Normalize both sides and test whether `keyword` occurs in `text`.
///
/// Convenience for one-off checks; the symptom engine prepares its
/// keywords once at load time instead.
pub fn match_keyword_in_text(keyword: &str, text: &str) -> bool {
    KeywordMatcher::new(keyword).matches(&normalize(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── normalize ──

    #[test]
    fn lowercases_and_strips_punctuation() {
        assert_eq!(normalize("I have a FEVER!!"), "i have a fever");
        assert_eq!(normalize("head-ache, since 2 days."), "head ache since 2 days");
    }

    #[test]
    fn collapses_whitespace_and_trims() {
        assert_eq!(normalize("  stomach \t\n  pain   "), "stomach pain");
    }

    #[test]
    fn empty_and_punctuation_only_inputs() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("?!...,;"), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn composes_decomposed_accents() {
        // "e" + combining acute -> "é"
        assert_eq!(normalize("Fie\u{0301}vre"), "fi\u{e9}vre");
    }

    #[test]
    fn indic_marks_split_words() {
        assert_eq!(normalize("बुखार"), "ब ख र");
        assert_eq!(normalize("सिर   दर्द।"), "स र दर द");
        assert_eq!(normalize("ಜ್ವರ"), "ಜ ವರ");
    }

    #[test]
    fn zero_width_joiners_become_spaces() {
        assert_eq!(normalize("क\u{200D}ख"), "क ख");
        assert_eq!(normalize("ಅ\u{200C}ಬ"), "ಅ ಬ");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in [
            "",
            "!!!",
            "I have a FEVER, since Monday.",
            "\u{0130}stanbul",
            "Fie\u{0301}vre",
            "मुझे बुखार है!",
            "ತಲೆನೋವು   ಇದೆ",
            "ALL CAPS\tand\ttabs\n",
            "ǅemal",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "not idempotent for {s:?}");
        }
    }

    // ── is_indic_script ──

    #[test]
    fn detects_indic_blocks() {
        assert!(is_indic_script("बुखार"));
        assert!(is_indic_script("ಜ್ವರ"));
        assert!(is_indic_script("காய்ச்சல்"));
        assert!(is_indic_script("fever ज्वर"));
        assert!(!is_indic_script("fever"));
        assert!(!is_indic_script(""));
    }

    // ── match_keyword_in_text ──

    #[test]
    fn word_boundary_match() {
        assert!(match_keyword_in_text("fever", "I have a high fever today"));
        assert!(match_keyword_in_text("fever", "FEVER!"));
        assert!(!match_keyword_in_text("fever", "feeling feverish"));
    }

    #[test]
    fn multi_word_keyword() {
        assert!(match_keyword_in_text("Chest Pain", "sudden chest-pain at night"));
        assert!(!match_keyword_in_text("chest pain", "chest painful"));
    }

    #[test]
    fn short_keyword_uses_containment() {
        assert!(match_keyword_in_text("flu", "influenza"));
        assert!(!match_keyword_in_text("rash", "rashes on arm"));
        assert!(match_keyword_in_text("itc", "itching"));
    }

    #[test]
    fn indic_keyword_uses_containment() {
        assert!(match_keyword_in_text("बुखार", "मुझे तेज़ बुखार है"));
        assert!(match_keyword_in_text("ತಲೆನೋವು", "ನನಗೆ ತಲೆನೋವು ಇದೆ"));
    }

    #[test]
    fn indic_vowel_sign_differences_are_ignored() {
        assert!(match_keyword_in_text("बुखार", "बाखार"));
    }

    #[test]
    fn non_ascii_letter_is_a_word_boundary() {
        assert!(match_keyword_in_text("fever", "feveré"));
        assert!(match_keyword_in_text("fever", "éfever"));
        assert!(!match_keyword_in_text("fever", "fevers"));
    }

    #[test]
    fn indic_text_switches_latin_keyword_to_containment() {
        assert!(match_keyword_in_text("fever", "मुझे feverish लग रहा"));
    }

    #[test]
    fn empty_inputs_never_match() {
        assert!(!match_keyword_in_text("", "fever"));
        assert!(!match_keyword_in_text("fever", ""));
        assert!(!match_keyword_in_text("!!", "fever"));
    }

    #[test]
    fn punctuation_in_keywords_is_neutralized() {
        assert!(match_keyword_in_text("c++ pain", "c pain"));
        assert!(!match_keyword_in_text("a.b.c.", "axbxc"));
    }

    #[test]
    fn matcher_reuses_prepared_keyword() {
        let matcher = KeywordMatcher::new("Headache");
        assert_eq!(matcher.keyword(), "headache");
        assert!(matcher.matches(&normalize("Bad headache since morning")));
        assert!(!matcher.matches(&normalize("headaches")));
    }
}
