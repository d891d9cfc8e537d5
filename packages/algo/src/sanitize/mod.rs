//! Text Sanitization
//!
//! Normalisation helpers shared by scoring, hints and filtering.
//!
//! Functions:
//! - Answer normalisation (trim + lowercase)
//! - Vietnamese accent folding
//! - Hint masking
//! - Phrase tokenisation

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::types::HINT_MASK;

/// Normalizes user input: trims surrounding whitespace and lowercases
pub fn normalize_answer(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Folds Vietnamese diacritics away and lowercases.
///
/// Canonical decomposition strips tone and vowel marks; `đ`/`Đ` are separate
/// letters that do not decompose and are mapped explicitly.
pub fn strip_accents(input: &str) -> String {
    input
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Masks a hint target, keeping only its first and last characters.
///
/// Targets of two characters or fewer are fully masked.
pub fn mask_hint(target: &str) -> String {
    let chars: Vec<char> = target.trim().chars().collect();
    let len = chars.len();
    if len <= 2 {
        return HINT_MASK.to_string().repeat(len);
    }
    let mut masked = String::with_capacity(len);
    masked.push(chars[0]);
    masked.extend(std::iter::repeat(HINT_MASK).take((len - 2).max(1)));
    masked.push(chars[len - 1]);
    masked
}

/// True when the text is a phrase (contains whitespace or a hyphen)
pub fn is_phrase(text: &str) -> bool {
    text.trim()
        .chars()
        .any(|c| c.is_whitespace() || c == '-')
}

/// Splits a phrase on whitespace and hyphens, keeping at most `limit` tokens
pub fn phrase_tokens(text: &str, limit: usize) -> Vec<&str> {
    text.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|t| !t.is_empty())
        .take(limit)
        .collect()
}

/// Case-insensitive filter used by the word list search box
pub fn matches_filter(query: &str, text: &str, ipa: Option<&str>) -> bool {
    let q = normalize_answer(query);
    if q.is_empty() {
        return true;
    }
    text.to_lowercase().contains(&q) || ipa.unwrap_or("").to_lowercase().contains(&q)
}
