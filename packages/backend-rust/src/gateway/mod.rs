//! Data access gateway
//!
//! Everything persistent (courses, lectures, words, meanings, miss notes,
//! stored files, user sessions) lives in the hosted data service. The rest of
//! the backend only sees the [`DataGateway`] trait.

mod memory;
mod rest;

pub use memory::InMemoryGateway;
pub use rest::RestGateway;

use async_trait::async_trait;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use tuvung_algo::{Lecture, LectureId, Meaning, UserId, Word, WordId};

use crate::auth::AuthUser;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    NotFound(String),
    #[error("not authenticated")]
    Unauthenticated,
    #[error("gateway not configured: {0}")]
    NotConfigured(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: String,
    pub name: String,
    #[serde(default)]
    pub creator_id: Option<UserId>,
}

/// Row for a newly created word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewWord {
    pub lecture_id: LectureId,
    pub text: String,
    pub ipa: Option<String>,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
    pub order_in_lecture: u32,
}

/// Meaning row written alongside a word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewMeaning {
    pub meaning: String,
    pub part_of_speech: Option<String>,
}

impl NewMeaning {
    pub fn new(meaning: impl Into<String>) -> Self {
        Self {
            meaning: meaning.into(),
            part_of_speech: None,
        }
    }

    pub fn with_part_of_speech(mut self, part_of_speech: impl Into<String>) -> Self {
        self.part_of_speech = Some(part_of_speech.into());
        self
    }
}

/// Partial update; `Some(None)` clears an optional column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WordPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ipa: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_in_lecture: Option<u32>,
}

#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Short label used by health checks
    fn kind(&self) -> &'static str;

    async fn fetch_lecture(&self, lecture_id: &str) -> Result<Lecture, GatewayError>;

    async fn course_owner(&self, course_id: &str) -> Result<Option<UserId>, GatewayError>;

    /// Words of one lecture ordered by `order_in_lecture`
    async fn fetch_words(&self, lecture_id: &str) -> Result<Vec<Word>, GatewayError>;

    async fn fetch_words_for_lectures(
        &self,
        lecture_ids: &[LectureId],
    ) -> Result<Vec<Word>, GatewayError>;

    /// Meaning rows of the given words ordered by creation time
    async fn fetch_meanings(&self, word_ids: &[WordId]) -> Result<Vec<Meaning>, GatewayError>;

    async fn next_order(&self, lecture_id: &str) -> Result<u32, GatewayError>;

    async fn insert_word(&self, word: NewWord) -> Result<Word, GatewayError>;

    async fn update_word(&self, word_id: &str, patch: WordPatch) -> Result<Word, GatewayError>;

    async fn delete_word(&self, word_id: &str) -> Result<(), GatewayError>;

    async fn replace_meanings(
        &self,
        word_id: &str,
        meanings: &[NewMeaning],
    ) -> Result<(), GatewayError>;

    /// Stores the full ordering of a lecture in one call
    async fn persist_order(
        &self,
        lecture_id: &str,
        ordered_ids: &[WordId],
    ) -> Result<(), GatewayError>;

    async fn record_miss(&self, user_id: &str, word_id: &str) -> Result<(), GatewayError>;

    /// Word id of every miss note the user has for the given words
    async fn fetch_miss_notes(
        &self,
        user_id: &str,
        word_ids: &[WordId],
    ) -> Result<Vec<WordId>, GatewayError>;

    /// Stores a file and returns its storage path
    async fn upload_asset(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError>;

    fn resolve_public_url(&self, bucket: &str, path: Option<&str>) -> Option<String>;

    async fn resolve_user(&self, token: &str) -> Result<AuthUser, GatewayError>;
}

/// Public URL for a stored object. Empty paths have none; absolute URLs are
/// returned unchanged.
pub fn public_url(base: &str, bucket: &str, path: Option<&str>) -> Option<String> {
    let path = path.map(str::trim).filter(|p| !p.is_empty())?;
    if path.starts_with("http") {
        return Some(path.to_string());
    }
    Some(format!(
        "{}/storage/v1/object/public/{}/{}",
        base.trim_end_matches('/'),
        bucket,
        path.trim_start_matches('/')
    ))
}
