//! Scoring / matching strategy
//!
//! Pure comparison of a learner's input against the expected side of a
//! question:
//! - `vi2en` (word typed): exact match after trim + lowercase
//! - `en2vi` (meaning typed): substring of any recorded meaning, either
//!   directly or with Vietnamese accents folded on both sides

use crate::sanitize::{mask_hint, normalize_answer, strip_accents};
use crate::types::Direction;

/// The data needed to grade one question
#[derive(Clone, Copy, Debug)]
pub struct AnswerKey<'a> {
    pub direction: Direction,
    pub word_text: &'a str,
    pub meanings: &'a [String],
}

impl<'a> AnswerKey<'a> {
    pub fn new(direction: Direction, word_text: &'a str, meanings: &'a [String]) -> Self {
        Self {
            direction,
            word_text,
            meanings,
        }
    }

    /// Whether `input` answers this question. Blank input never matches.
    pub fn accepts(&self, input: &str) -> bool {
        let value = normalize_answer(input);
        if value.is_empty() {
            return false;
        }
        match self.direction {
            Direction::MeaningToWord => normalize_answer(self.word_text) == value,
            Direction::WordToMeaning => matches_any_meaning(&value, self.meanings),
        }
    }

    /// The answer revealed after the second miss: the word itself, or the
    /// primary meaning (empty when the word has none)
    pub fn expected(&self) -> &'a str {
        match self.direction {
            Direction::MeaningToWord => self.word_text,
            Direction::WordToMeaning => self.meanings.first().map(String::as_str).unwrap_or(""),
        }
    }

    /// Masked hint shown after the first miss
    pub fn hint(&self) -> String {
        mask_hint(self.expected())
    }
}

fn matches_any_meaning(value: &str, meanings: &[String]) -> bool {
    let folded_value = strip_accents(value);
    meanings.iter().any(|m| {
        let meaning = normalize_answer(m);
        meaning.contains(value) || strip_accents(&meaning).contains(&folded_value)
    })
}
