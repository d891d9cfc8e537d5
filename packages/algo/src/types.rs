//! Common Types and Constants
//!
//! Shared data structures used across the practice modules. Field names follow
//! the rows served by the data gateway (`word_id`, `order_in_lecture`, ...).

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==================== Constants ====================

/// Delay before an auto-advance after a correct answer
pub const CORRECT_DISPLAY_DELAY: Duration = Duration::from_millis(600);

/// Delay before showing results after the last question was failed
pub const REVEAL_DISPLAY_DELAY: Duration = Duration::from_millis(900);

/// Wrong attempts allowed before the answer is revealed
pub const MAX_ATTEMPTS: u8 = 2;

/// Character used to mask hints
pub const HINT_MASK: char = '*';

/// Note text stored when a learner misses a word
pub const MISS_NOTE_TEXT: &str = "Sai trong luyện tập";

/// Placeholder shown when a word has no meaning yet
pub const MISSING_MEANING: &str = "—";

pub type WordId = String;
pub type LectureId = String;
pub type CourseId = String;
pub type UserId = String;

// ==================== Catalog Types ====================

/// A vocabulary word inside a lecture
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    #[serde(rename = "word_id")]
    pub id: WordId,
    pub lecture_id: LectureId,
    pub text: String,
    #[serde(default)]
    pub ipa: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// Position within the lecture, contiguous `0..N-1` after compaction
    #[serde(default)]
    pub order_in_lecture: u32,
}

impl Word {
    pub fn new(id: impl Into<String>, lecture_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            lecture_id: lecture_id.into(),
            text: text.into(),
            ipa: None,
            audio_url: None,
            image_url: None,
            order_in_lecture: 0,
        }
    }

    pub fn with_order(mut self, order: u32) -> Self {
        self.order_in_lecture = order;
        self
    }
}

/// One meaning row of a word
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meaning {
    #[serde(rename = "meaning_id", default)]
    pub id: String,
    pub word_id: WordId,
    pub meaning: String,
    #[serde(default)]
    pub part_of_speech: Option<String>,
    /// Creation time, used for stable ordering (primary meaning first)
    #[serde(rename = "meaning_added_at", default)]
    pub added_at: Option<DateTime<Utc>>,
}

/// A lecture groups words inside a course
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub lecture_id: LectureId,
    pub course_id: CourseId,
    pub title: String,
}

// ==================== Practice Types ====================

/// Which side is shown as the prompt and which side is typed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Word shown, Vietnamese meaning typed
    #[serde(rename = "en2vi")]
    WordToMeaning,
    /// Meaning shown, word typed
    #[serde(rename = "vi2en")]
    MeaningToWord,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::WordToMeaning => "en2vi",
            Direction::MeaningToWord => "vi2en",
        }
    }
}

/// Direction requested when configuring a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DirectionMode {
    #[serde(rename = "en2vi")]
    WordToMeaning,
    #[default]
    #[serde(rename = "vi2en")]
    MeaningToWord,
    #[serde(rename = "random")]
    Random,
}

impl DirectionMode {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "en2vi" => Some(DirectionMode::WordToMeaning),
            "vi2en" => Some(DirectionMode::MeaningToWord),
            "random" => Some(DirectionMode::Random),
            _ => None,
        }
    }

    /// The fixed direction, if this mode is not random
    pub fn fixed(&self) -> Option<Direction> {
        match self {
            DirectionMode::WordToMeaning => Some(Direction::WordToMeaning),
            DirectionMode::MeaningToWord => Some(Direction::MeaningToWord),
            DirectionMode::Random => None,
        }
    }
}

/// One resolved (word, direction) pairing at a fixed slot
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub slot: usize,
    pub word: Word,
    pub direction: Direction,
}

/// Outcome of one finalized question
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeResult {
    pub item: QuestionItem,
    pub user_answer: String,
    pub correct: bool,
    pub attempts: u8,
}

/// Aggregate numbers shown on the results screen
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub wrong: usize,
    /// Rounded percentage of correct answers among answered questions
    pub accuracy_percent: u32,
}

impl SessionSummary {
    pub fn from_results(total: usize, results: &[PracticeResult]) -> Self {
        let answered = results.len();
        let correct = results.iter().filter(|r| r.correct).count();
        let accuracy_percent = if answered > 0 {
            ((correct as f64 / answered as f64) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            total,
            answered,
            correct,
            wrong: answered - correct,
            accuracy_percent,
        }
    }
}

/// Number of recorded misses for a word
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissCount {
    pub word_id: WordId,
    pub text: String,
    pub count: usize,
}
