//! Practice session engine
//!
//! State machine that steps through a built question sequence:
//!
//! ```text
//! configuring ──start──▶ active(i) ──back──▶ reviewing(j) ──forward──▶ active(watermark)
//!                           │                     │
//!                           └──advance/pending────┴──────────▶ completed
//! ```
//!
//! - A question is finalized when answered correctly or missed twice; its
//!   result is appended and the watermark is raised to `slot + 1`.
//! - `index <= watermark <= len` and `results.len() == watermark` hold after
//!   every transition.
//! - Delayed transitions (auto-advance, results screen) are returned as
//!   [`PendingTransition`] values and applied with [`PracticeSession::resolve_pending`];
//!   any navigation invalidates them.

use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::builder::{build_sequence, BuildError, SessionConfig};
use crate::repository::MeaningBook;
use crate::scoring::AnswerKey;
use crate::types::{
    Direction, PracticeResult, QuestionItem, SessionSummary, Word, WordId, CORRECT_DISPLAY_DELAY,
    MAX_ATTEMPTS, MISSING_MEANING, REVEAL_DISPLAY_DELAY,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("cannot start an empty session")]
    EmptySequence,
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("session is not accepting this action in phase {0:?}")]
    NotActive(Phase),
    #[error("current question has not been answered yet")]
    Unanswered,
    #[error("already at the first question")]
    AtStart,
    #[error("no reviewed question ahead")]
    NothingAhead,
    #[error("session is not in review mode")]
    NotReviewing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Configuring,
    Active,
    Reviewing,
    Completed,
}

/// Message state shown under the answer box
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Feedback {
    None,
    Correct,
    Hint { mask: String },
    Revealed { answer: String },
    ReviewCorrect { given: String, attempts: u8 },
    ReviewWrong { given: String, expected: String, attempts: u8 },
    Unanswered,
}

impl Feedback {
    pub fn message(&self) -> String {
        match self {
            Feedback::None => String::new(),
            Feedback::Correct => "✅ Chính xác!".to_string(),
            Feedback::Hint { mask } => format!("Gợi ý: {mask}"),
            Feedback::Revealed { answer } => format!("❌ Sai. Đáp án: {answer}"),
            Feedback::ReviewCorrect { given, attempts } => {
                format!("✅ Chính xác! Bạn đã nhập: \"{given}\" ({attempts} lần thử)")
            }
            Feedback::ReviewWrong {
                given,
                expected,
                attempts,
            } => format!(
                "❌ Sai. Bạn đã nhập: \"{given}\" | Đáp án đúng: \"{expected}\" ({attempts} lần thử)"
            ),
            Feedback::Unanswered => "Câu này chưa được trả lời".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PendingKind {
    Advance,
    Complete,
}

/// A transition the host should apply after `delay`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransition {
    pub token: u64,
    pub kind: PendingKind,
    #[serde(serialize_with = "serialize_millis")]
    pub delay: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}

/// Result of a submit call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// Blank input or the question was already finalized
    Ignored,
    Correct {
        pending: Option<PendingTransition>,
    },
    /// First miss; the input was cleared
    Hint { mask: String },
    /// Second miss; `missed_word` should be recorded against the learner
    Revealed {
        answer: String,
        missed_word: WordId,
        pending: Option<PendingTransition>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeOptions {
    pub auto_advance: bool,
    pub correct_delay: Duration,
    pub reveal_delay: Duration,
}

impl Default for PracticeOptions {
    fn default() -> Self {
        Self {
            auto_advance: true,
            correct_delay: CORRECT_DISPLAY_DELAY,
            reveal_delay: REVEAL_DISPLAY_DELAY,
        }
    }
}

/// What the current card shows
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub slot: usize,
    pub total: usize,
    pub direction: Direction,
    pub word_id: WordId,
    /// Word text for `en2vi`, primary meaning for `vi2en`
    pub shown: String,
    pub ipa: Option<String>,
    pub audio_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct PracticeSession {
    options: PracticeOptions,
    phase: Phase,
    items: Vec<QuestionItem>,
    meanings: MeaningBook,
    results: Vec<PracticeResult>,
    index: usize,
    watermark: usize,
    attempts: u8,
    input: String,
    feedback: Feedback,
    answered: bool,
    pending: Option<PendingTransition>,
    pending_seq: u64,
}

impl PracticeSession {
    pub fn new(options: PracticeOptions) -> Self {
        Self {
            options,
            phase: Phase::Configuring,
            items: Vec::new(),
            meanings: MeaningBook::new(),
            results: Vec::new(),
            index: 0,
            watermark: 0,
            attempts: 0,
            input: String::new(),
            feedback: Feedback::None,
            answered: false,
            pending: None,
            pending_seq: 0,
        }
    }

    /// Starts a session over an already built sequence
    pub fn start(
        &mut self,
        items: Vec<QuestionItem>,
        meanings: MeaningBook,
    ) -> Result<(), SessionError> {
        if items.is_empty() {
            return Err(SessionError::EmptySequence);
        }
        let options = self.options.clone();
        *self = Self::new(options);
        self.items = items;
        self.meanings = meanings;
        self.phase = Phase::Active;
        Ok(())
    }

    /// Builds the sequence from `base` and starts. On error nothing changes.
    pub fn begin<R: Rng + ?Sized>(
        &mut self,
        base: &[Word],
        config: &SessionConfig,
        meanings: MeaningBook,
        rng: &mut R,
    ) -> Result<(), SessionError> {
        let items = build_sequence(base, config, rng)?;
        self.start(items, meanings)
    }

    // ==================== Answering ====================

    pub fn submit(&mut self, input: &str) -> Result<Submission, SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::NotActive(self.phase));
        }
        let value = input.trim();
        if value.is_empty() || self.answered {
            return Ok(Submission::Ignored);
        }

        let (correct, mask, expected, word_id) = {
            let item = &self.items[self.index];
            let key = AnswerKey::new(
                item.direction,
                &item.word.text,
                self.meanings.meanings(&item.word.id),
            );
            (
                key.accepts(value),
                key.hint(),
                key.expected().to_string(),
                item.word.id.clone(),
            )
        };
        let is_last = self.index + 1 >= self.items.len();
        self.input = value.to_string();

        if correct {
            self.finalize(value.to_string(), true, self.attempts + 1);
            self.feedback = Feedback::Correct;
            let pending = if is_last {
                Some(self.schedule(PendingKind::Complete, self.options.correct_delay))
            } else if self.options.auto_advance {
                Some(self.schedule(PendingKind::Advance, self.options.correct_delay))
            } else {
                None
            };
            return Ok(Submission::Correct { pending });
        }

        if self.attempts + 1 < MAX_ATTEMPTS {
            self.attempts += 1;
            self.input.clear();
            self.feedback = Feedback::Hint { mask: mask.clone() };
            return Ok(Submission::Hint { mask });
        }

        self.finalize(value.to_string(), false, self.attempts + 1);
        self.feedback = Feedback::Revealed {
            answer: expected.clone(),
        };
        let pending = if is_last {
            Some(self.schedule(PendingKind::Complete, self.options.reveal_delay))
        } else {
            None
        };
        Ok(Submission::Revealed {
            answer: expected,
            missed_word: word_id,
            pending,
        })
    }

    /// Applies a delayed transition if `token` is still the current one
    pub fn resolve_pending(&mut self, token: u64) -> bool {
        match &self.pending {
            Some(p) if p.token == token && self.phase == Phase::Active => {}
            _ => return false,
        }
        let Some(pending) = self.pending.take() else {
            return false;
        };
        match pending.kind {
            PendingKind::Advance if self.index + 1 < self.items.len() => {
                self.go_live(self.index + 1)
            }
            _ => self.phase = Phase::Completed,
        }
        true
    }

    // ==================== Navigation ====================

    /// Moves past an answered question, completing the session on the last one
    pub fn advance(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Active {
            return Err(SessionError::NotActive(self.phase));
        }
        if !self.answered {
            return Err(SessionError::Unanswered);
        }
        self.pending = None;
        if self.index + 1 < self.items.len() {
            self.go_live(self.index + 1);
        } else {
            self.phase = Phase::Completed;
        }
        Ok(())
    }

    /// Steps back into read-only review of the previous question
    pub fn step_back(&mut self) -> Result<(), SessionError> {
        if !matches!(self.phase, Phase::Active | Phase::Reviewing) {
            return Err(SessionError::NotActive(self.phase));
        }
        if self.index == 0 {
            return Err(SessionError::AtStart);
        }
        self.pending = None;
        self.index -= 1;
        self.phase = Phase::Reviewing;
        self.show_slot(self.index);
        Ok(())
    }

    /// Steps forward while reviewing. Reaching the first unfinalized slot
    /// resumes live practice; stepping past a fully answered last slot
    /// completes the session.
    pub fn step_forward(&mut self) -> Result<(), SessionError> {
        if self.phase != Phase::Reviewing {
            return Err(SessionError::NotReviewing);
        }
        let target = self.index + 1;
        if target >= self.items.len() {
            if self.results.len() == self.items.len() {
                self.phase = Phase::Completed;
                return Ok(());
            }
            return Err(SessionError::NothingAhead);
        }
        if target > self.watermark {
            return Err(SessionError::NothingAhead);
        }
        self.index = target;
        if self.results.get(target).is_some() {
            self.show_slot(target);
        } else {
            self.go_live(target);
        }
        Ok(())
    }

    /// Discards all progress and returns to configuration
    pub fn restart(&mut self) {
        let options = self.options.clone();
        *self = Self::new(options);
    }

    // ==================== Accessors ====================

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn options(&self) -> &PracticeOptions {
        &self.options
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn watermark(&self) -> usize {
        self.watermark
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    pub fn results(&self) -> &[PracticeResult] {
        &self.results
    }

    pub fn meanings(&self) -> &MeaningBook {
        &self.meanings
    }

    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn feedback(&self) -> &Feedback {
        &self.feedback
    }

    pub fn is_answered(&self) -> bool {
        self.answered
    }

    pub fn pending(&self) -> Option<&PendingTransition> {
        self.pending.as_ref()
    }

    pub fn current(&self) -> Option<&QuestionItem> {
        match self.phase {
            Phase::Active | Phase::Reviewing => self.items.get(self.index),
            _ => None,
        }
    }

    pub fn prompt(&self) -> Option<Prompt> {
        let item = self.current()?;
        let shown = match item.direction {
            Direction::WordToMeaning => item.word.text.clone(),
            Direction::MeaningToWord => self
                .meanings
                .primary(&item.word.id)
                .unwrap_or(MISSING_MEANING)
                .to_string(),
        };
        Some(Prompt {
            slot: item.slot,
            total: self.items.len(),
            direction: item.direction,
            word_id: item.word.id.clone(),
            shown,
            ipa: item.word.ipa.clone(),
            audio_url: item.word.audio_url.clone(),
        })
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary::from_results(self.items.len(), &self.results)
    }

    // ==================== Internals ====================

    fn finalize(&mut self, answer: String, correct: bool, attempts: u8) {
        let item = self.items[self.index].clone();
        self.results.push(PracticeResult {
            item,
            user_answer: answer,
            correct,
            attempts,
        });
        self.attempts = attempts;
        self.answered = true;
        self.watermark = self.watermark.max(self.index + 1);
    }

    fn schedule(&mut self, kind: PendingKind, delay: Duration) -> PendingTransition {
        self.pending_seq += 1;
        let pending = PendingTransition {
            token: self.pending_seq,
            kind,
            delay,
        };
        self.pending = Some(pending.clone());
        pending
    }

    fn go_live(&mut self, target: usize) {
        self.index = target;
        self.watermark = self.watermark.max(target);
        self.phase = Phase::Active;
        self.input.clear();
        self.attempts = 0;
        self.answered = false;
        self.feedback = Feedback::None;
    }

    fn show_slot(&mut self, slot: usize) {
        match self.results.get(slot) {
            Some(result) => {
                let expected = AnswerKey::new(
                    result.item.direction,
                    &result.item.word.text,
                    self.meanings.meanings(&result.item.word.id),
                )
                .expected()
                .to_string();
                self.input = result.user_answer.clone();
                self.answered = true;
                self.attempts = result.attempts;
                self.feedback = if result.correct {
                    Feedback::ReviewCorrect {
                        given: result.user_answer.clone(),
                        attempts: result.attempts,
                    }
                } else {
                    Feedback::ReviewWrong {
                        given: result.user_answer.clone(),
                        expected,
                        attempts: result.attempts,
                    }
                };
            }
            None => {
                self.input.clear();
                self.answered = false;
                self.attempts = 0;
                self.feedback = Feedback::Unanswered;
            }
        }
    }
}

impl Default for PracticeSession {
    fn default() -> Self {
        Self::new(PracticeOptions::default())
    }
}
