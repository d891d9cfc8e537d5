//! # tuvung-algo - 词汇练习核心库
//!
//! Pure, synchronous core of the vocabulary practice app. Nothing here talks
//! to the network; callers fetch words and meanings first and feed them in.
//!
//! ## 模块结构
//!
//! - [`types`] - 公共类型和常量 (Word, Meaning, QuestionItem, ...)
//! - [`sanitize`] - 文本规范化 (accent folding, hint masking, phrase tokens)
//! - [`repository`] - word/meaning projection and miss statistics
//! - [`builder`] - question sequence expansion, shuffle, direction resolution
//! - [`scoring`] - answer matching and hints
//! - [`engine`] - practice session state machine with review navigation
//! - [`flashcards`] - free-navigation flashcard test
//! - [`reorder`] - drag-and-drop reordering and order compaction
//! - [`phrase_audio`] - token clip decoding (MP3/WAV) and phrase WAV composition
//!
//! ## 使用示例
//!
//! ```rust
//! use tuvung_algo::{
//!     session_rng, DirectionMode, MeaningBook, PracticeSession, SessionConfig, Submission, Word,
//! };
//!
//! let words = vec![Word::new("w1", "l1", "cat"), Word::new("w2", "l1", "dog").with_order(1)];
//! let config = SessionConfig { question_count: 3, shuffle: false, direction: DirectionMode::MeaningToWord };
//!
//! let mut session = PracticeSession::default();
//! session.begin(&words, &config, MeaningBook::new(), &mut session_rng(Some(7))).unwrap();
//! assert_eq!(session.total(), 3);
//! assert!(matches!(session.submit("Cat").unwrap(), Submission::Correct { .. }));
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod builder;
pub mod engine;
pub mod flashcards;
pub mod phrase_audio;
pub mod reorder;
pub mod repository;
pub mod sanitize;
pub mod scoring;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

pub use builder::{build_sequence, session_rng, BuildError, SessionConfig, WordSelection};
pub use engine::{
    Feedback, PendingKind, PendingTransition, Phase, PracticeOptions, PracticeSession, Prompt,
    SessionError, Submission,
};
pub use flashcards::{FlashcardTest, GradedAnswer, TestPhase, TestReport};
pub use reorder::{
    DragPreview, PersistFailurePolicy, ReorderError, ReorderGate, StagedOrder, ValidationError,
};
pub use repository::{top_missed, LectureView, MeaningBook, WordEntry};
pub use scoring::AnswerKey;
