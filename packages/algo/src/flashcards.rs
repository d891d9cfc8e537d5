//! Flashcard test session
//!
//! A looser companion to the practice engine: questions are drawn without
//! repetition, the learner moves freely between cards, answers are stored per
//! slot and only graded when the test is finished.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::builder::BuildError;
use crate::repository::MeaningBook;
use crate::scoring::AnswerKey;
use crate::types::{Direction, QuestionItem, Word};

pub const DEFAULT_TEST_COUNT: usize = 10;
pub const MAX_TEST_COUNT: usize = 100;

/// Clamps a requested question count into `1..=100`
pub fn clamp_count(requested: usize) -> usize {
    requested.clamp(1, MAX_TEST_COUNT)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TestPhase {
    Configuring,
    InProgress,
    Finished,
}

/// Graded outcome of one card
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradedAnswer {
    pub item: QuestionItem,
    pub answer: String,
    pub expected: String,
    pub correct: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestReport {
    pub total: usize,
    pub correct: usize,
    pub answers: Vec<GradedAnswer>,
}

#[derive(Clone, Debug)]
pub struct FlashcardTest {
    phase: TestPhase,
    items: Vec<QuestionItem>,
    answers: Vec<String>,
    meanings: MeaningBook,
    index: usize,
    flipped: bool,
}

impl Default for FlashcardTest {
    fn default() -> Self {
        Self::new()
    }
}

impl FlashcardTest {
    pub fn new() -> Self {
        Self {
            phase: TestPhase::Configuring,
            items: Vec::new(),
            answers: Vec::new(),
            meanings: MeaningBook::new(),
            index: 0,
            flipped: false,
        }
    }

    /// Draws `min(count, words.len())` distinct words in random order, each
    /// with its own random direction.
    pub fn build<R: Rng + ?Sized>(
        words: &[Word],
        count: usize,
        meanings: MeaningBook,
        rng: &mut R,
    ) -> Result<Self, BuildError> {
        if words.is_empty() {
            return Err(BuildError::EmptySelection);
        }
        let mut pool: Vec<&Word> = words.iter().collect();
        pool.shuffle(rng);
        pool.truncate(clamp_count(count).min(words.len()));

        let items: Vec<QuestionItem> = pool
            .into_iter()
            .enumerate()
            .map(|(slot, word)| QuestionItem {
                slot,
                word: word.clone(),
                direction: if rng.gen_bool(0.5) {
                    Direction::WordToMeaning
                } else {
                    Direction::MeaningToWord
                },
            })
            .collect();

        Ok(Self {
            phase: TestPhase::InProgress,
            answers: vec![String::new(); items.len()],
            items,
            meanings,
            index: 0,
            flipped: false,
        })
    }

    pub fn phase(&self) -> TestPhase {
        self.phase
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    pub fn meanings(&self) -> &MeaningBook {
        &self.meanings
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn current(&self) -> Option<&QuestionItem> {
        match self.phase {
            TestPhase::InProgress => self.items.get(self.index),
            _ => None,
        }
    }

    /// Answer stored for the current card
    pub fn current_answer(&self) -> &str {
        self.answers.get(self.index).map(String::as_str).unwrap_or("")
    }

    pub fn set_answer(&mut self, value: &str) {
        if self.phase != TestPhase::InProgress {
            return;
        }
        if let Some(slot) = self.answers.get_mut(self.index) {
            *slot = value.to_string();
        }
    }

    pub fn flip(&mut self) {
        if self.phase == TestPhase::InProgress {
            self.flipped = !self.flipped;
        }
    }

    pub fn previous(&mut self) {
        if self.phase == TestPhase::InProgress && self.index > 0 {
            self.index -= 1;
            self.flipped = false;
        }
    }

    /// Moves to the next card; on the last card this finishes the test
    pub fn next(&mut self) {
        if self.phase != TestPhase::InProgress {
            return;
        }
        if self.index + 1 < self.items.len() {
            self.index += 1;
            self.flipped = false;
        } else {
            self.phase = TestPhase::Finished;
        }
    }

    pub fn finish(&mut self) {
        if self.phase == TestPhase::InProgress {
            self.phase = TestPhase::Finished;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Grades every card with the practice scoring rules
    pub fn report(&self) -> TestReport {
        let answers: Vec<GradedAnswer> = self
            .items
            .iter()
            .zip(&self.answers)
            .map(|(item, answer)| {
                let key = AnswerKey::new(
                    item.direction,
                    &item.word.text,
                    self.meanings.meanings(&item.word.id),
                );
                GradedAnswer {
                    item: item.clone(),
                    answer: answer.clone(),
                    expected: key.expected().to_string(),
                    correct: key.accepts(answer),
                }
            })
            .collect();
        TestReport {
            total: answers.len(),
            correct: answers.iter().filter(|a| a.correct).count(),
            answers,
        }
    }
}
