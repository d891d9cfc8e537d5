//! Session builder
//!
//! Turns a word selection into the ordered question sequence of a practice
//! session:
//! - the sequence holds `max(requested, available)` slots, so every selected
//!   word appears at least once
//! - words are cycled round-robin in base order to fill the slots
//! - shuffling permutes the expanded sequence, not the base set
//! - in random mode each slot gets its own coin flip, stored in the item

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Direction, DirectionMode, LectureId, QuestionItem, Word, WordId};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("no words selected")]
    EmptySelection,
}

/// Practice configuration chosen before starting
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Requested number of questions; raised to the number of selected words
    pub question_count: usize,
    pub shuffle: bool,
    pub direction: DirectionMode,
}

/// Which lectures, and optionally which individual words, to practise
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSelection {
    pub lecture_ids: Vec<LectureId>,
    /// Explicit word picks; empty means every word of the selected lectures
    #[serde(default)]
    pub word_ids: HashSet<WordId>,
}

impl WordSelection {
    /// Concatenates the selected lectures' words in selection order, each
    /// lecture in `order_in_lecture` order, then applies explicit picks.
    pub fn apply(&self, words: &[Word]) -> Vec<Word> {
        let mut base = Vec::new();
        for lecture_id in &self.lecture_ids {
            let mut lecture_words: Vec<&Word> =
                words.iter().filter(|w| &w.lecture_id == lecture_id).collect();
            lecture_words.sort_by_key(|w| w.order_in_lecture);
            base.extend(lecture_words.into_iter().cloned());
        }
        if !self.word_ids.is_empty() {
            base.retain(|w| self.word_ids.contains(&w.id));
        }
        base
    }
}

/// Seedable generator used for shuffles and direction coin flips
pub fn session_rng(seed: Option<u64>) -> ChaCha8Rng {
    let seed = seed.unwrap_or_else(|| rand::thread_rng().gen());
    ChaCha8Rng::seed_from_u64(seed)
}

/// Number of slots a session over `available` words will hold
pub fn sequence_len(requested: usize, available: usize) -> usize {
    requested.max(available)
}

/// Builds the question sequence for `base`.
///
/// The RNG is consumed by the shuffle first and then by the direction flips,
/// so a fixed seed reproduces the exact same session.
pub fn build_sequence<R: Rng + ?Sized>(
    base: &[Word],
    config: &SessionConfig,
    rng: &mut R,
) -> Result<Vec<QuestionItem>, BuildError> {
    if base.is_empty() {
        return Err(BuildError::EmptySelection);
    }

    let needed = sequence_len(config.question_count, base.len());
    let mut words: Vec<&Word> = base.iter().cycle().take(needed).collect();

    if config.shuffle {
        words.shuffle(rng);
    }

    let items = words
        .into_iter()
        .enumerate()
        .map(|(slot, word)| {
            let direction = config.direction.fixed().unwrap_or_else(|| {
                if rng.gen_bool(0.5) {
                    Direction::MeaningToWord
                } else {
                    Direction::WordToMeaning
                }
            });
            QuestionItem {
                slot,
                word: word.clone(),
                direction,
            }
        })
        .collect();

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(texts: &[&str]) -> Vec<Word> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| Word::new(*t, "l1", *t).with_order(i as u32))
            .collect()
    }

    fn texts(items: &[QuestionItem]) -> Vec<&str> {
        items.iter().map(|q| q.word.text.as_str()).collect()
    }

    #[test]
    fn test_cycles_in_base_order_without_shuffle() {
        let base = words(&["A", "B", "C"]);
        let config = SessionConfig {
            question_count: 5,
            shuffle: false,
            direction: DirectionMode::MeaningToWord,
        };
        let items = build_sequence(&base, &config, &mut session_rng(Some(1))).unwrap();
        assert_eq!(texts(&items), vec!["A", "B", "C", "A", "B"]);
        assert!(items.iter().all(|q| q.direction == Direction::MeaningToWord));
        assert_eq!(items.iter().map(|q| q.slot).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_requested_below_available_keeps_every_word() {
        let base = words(&["A", "B", "C", "D"]);
        let config = SessionConfig {
            question_count: 2,
            shuffle: false,
            direction: DirectionMode::WordToMeaning,
        };
        let items = build_sequence(&base, &config, &mut session_rng(Some(1))).unwrap();
        assert_eq!(texts(&items), vec!["A", "B", "C", "D"]);
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let config = SessionConfig::default();
        let result = build_sequence(&[], &config, &mut session_rng(Some(1)));
        assert_eq!(result, Err(BuildError::EmptySelection));
    }

    #[test]
    fn test_shuffle_is_a_permutation_of_the_expanded_sequence() {
        let base = words(&["A", "B", "C"]);
        let config = SessionConfig {
            question_count: 7,
            shuffle: true,
            direction: DirectionMode::MeaningToWord,
        };
        let items = build_sequence(&base, &config, &mut session_rng(Some(42))).unwrap();
        let mut got: Vec<_> = texts(&items);
        got.sort();
        assert_eq!(got, vec!["A", "A", "A", "B", "B", "C", "C"]);
    }

    #[test]
    fn test_same_seed_reproduces_session() {
        let base = words(&["A", "B", "C", "D", "E"]);
        let config = SessionConfig {
            question_count: 12,
            shuffle: true,
            direction: DirectionMode::Random,
        };
        let first = build_sequence(&base, &config, &mut session_rng(Some(7))).unwrap();
        let second = build_sequence(&base, &config, &mut session_rng(Some(7))).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_random_mode_flips_per_slot() {
        let base = words(&["A"]);
        let config = SessionConfig {
            question_count: 64,
            shuffle: false,
            direction: DirectionMode::Random,
        };
        let items = build_sequence(&base, &config, &mut session_rng(Some(3))).unwrap();
        let vi2en = items
            .iter()
            .filter(|q| q.direction == Direction::MeaningToWord)
            .count();
        // the same word shows up with both directions
        assert!(vi2en > 0 && vi2en < items.len());
    }

    #[test]
    fn test_selection_orders_by_lecture_then_position() {
        let all = vec![
            Word::new("b2", "lb", "b2").with_order(1),
            Word::new("a1", "la", "a1").with_order(0),
            Word::new("b1", "lb", "b1").with_order(0),
            Word::new("x", "lx", "x").with_order(0),
        ];
        let selection = WordSelection {
            lecture_ids: vec!["lb".into(), "la".into()],
            word_ids: HashSet::new(),
        };
        let ids: Vec<_> = selection.apply(&all).into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["b1", "b2", "a1"]);

        let picked = WordSelection {
            lecture_ids: vec!["lb".into(), "la".into()],
            word_ids: ["a1".to_string(), "b2".to_string()].into_iter().collect(),
        };
        let ids: Vec<_> = picked.apply(&all).into_iter().map(|w| w.id).collect();
        assert_eq!(ids, vec!["b2", "a1"]);
    }
}
