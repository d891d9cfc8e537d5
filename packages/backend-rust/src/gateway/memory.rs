use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use tuvung_algo::{Lecture, LectureId, Meaning, UserId, Word, WordId, MISS_NOTE_TEXT};

use super::{public_url, Course, DataGateway, GatewayError, NewMeaning, NewWord, WordPatch};
use crate::auth::AuthUser;

const MEMORY_STORAGE_BASE: &str = "http://localhost:54321";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissNote {
    pub user_id: UserId,
    pub word_id: WordId,
    pub note_text: String,
}

#[derive(Default)]
struct Store {
    courses: HashMap<String, Course>,
    lectures: HashMap<LectureId, Lecture>,
    words: Vec<Word>,
    meanings: Vec<Meaning>,
    notes: Vec<MissNote>,
    assets: HashMap<(String, String), Bytes>,
    users: HashMap<String, AuthUser>,
}

/// Gateway backed by process memory, used for local runs and tests
#[derive(Default)]
pub struct InMemoryGateway {
    store: RwLock<Store>,
    fail_writes: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A small course so a fresh local instance has something to practise
    pub fn demo() -> Self {
        let gateway = Self::new()
            .with_course("demo-course", "Tiếng Anh cơ bản", Some("demo-user"))
            .with_lecture("demo-lecture", "demo-course", "Động vật")
            .with_user("demo-token", "demo-user");
        for (i, (text, meaning)) in [("cat", "con mèo"), ("dog", "con chó"), ("bird", "con chim")]
            .into_iter()
            .enumerate()
        {
            gateway.add_word(
                Word::new(format!("demo-w{i}"), "demo-lecture", text).with_order(i as u32),
                &[meaning],
            );
        }
        gateway
    }

    pub fn with_course(self, course_id: &str, name: &str, creator_id: Option<&str>) -> Self {
        self.store.write().courses.insert(
            course_id.to_string(),
            Course {
                course_id: course_id.to_string(),
                name: name.to_string(),
                creator_id: creator_id.map(str::to_string),
            },
        );
        self
    }

    pub fn with_lecture(self, lecture_id: &str, course_id: &str, title: &str) -> Self {
        self.store.write().lectures.insert(
            lecture_id.to_string(),
            Lecture {
                lecture_id: lecture_id.to_string(),
                course_id: course_id.to_string(),
                title: title.to_string(),
            },
        );
        self
    }

    pub fn with_user(self, token: &str, user_id: &str) -> Self {
        self.store.write().users.insert(
            token.to_string(),
            AuthUser {
                id: user_id.to_string(),
                email: None,
            },
        );
        self
    }

    pub fn with_word(self, word: Word, meanings: &[&str]) -> Self {
        self.add_word(word, meanings);
        self
    }

    pub fn add_word(&self, word: Word, meanings: &[&str]) {
        let mut store = self.store.write();
        let base = Utc::now();
        let offset = store.meanings.len() as i64;
        for (i, meaning) in meanings.iter().enumerate() {
            store.meanings.push(Meaning {
                id: Uuid::new_v4().to_string(),
                word_id: word.id.clone(),
                meaning: meaning.to_string(),
                part_of_speech: None,
                added_at: Some(base + Duration::milliseconds(offset + i as i64)),
            });
        }
        store.words.push(word);
    }

    /// Rejects writes to words and miss notes
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::Relaxed);
    }

    pub fn notes(&self) -> Vec<MissNote> {
        self.store.read().notes.clone()
    }

    pub fn words_snapshot(&self, lecture_id: &str) -> Vec<Word> {
        let mut words: Vec<Word> = self
            .store
            .read()
            .words
            .iter()
            .filter(|w| w.lecture_id == lecture_id)
            .cloned()
            .collect();
        words.sort_by_key(|w| w.order_in_lecture);
        words
    }

    pub fn asset(&self, bucket: &str, path: &str) -> Option<Bytes> {
        self.store
            .read()
            .assets
            .get(&(bucket.to_string(), path.to_string()))
            .cloned()
    }

    fn check_writes(&self) -> Result<(), GatewayError> {
        if self.fail_writes.load(Ordering::Relaxed) {
            return Err(GatewayError::HttpStatus {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "write rejected".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DataGateway for InMemoryGateway {
    fn kind(&self) -> &'static str {
        "memory"
    }

    async fn fetch_lecture(&self, lecture_id: &str) -> Result<Lecture, GatewayError> {
        self.store
            .read()
            .lectures
            .get(lecture_id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("bài học {lecture_id}")))
    }

    async fn course_owner(&self, course_id: &str) -> Result<Option<UserId>, GatewayError> {
        Ok(self
            .store
            .read()
            .courses
            .get(course_id)
            .and_then(|c| c.creator_id.clone()))
    }

    async fn fetch_words(&self, lecture_id: &str) -> Result<Vec<Word>, GatewayError> {
        Ok(self.words_snapshot(lecture_id))
    }

    async fn fetch_words_for_lectures(
        &self,
        lecture_ids: &[LectureId],
    ) -> Result<Vec<Word>, GatewayError> {
        let store = self.store.read();
        Ok(store
            .words
            .iter()
            .filter(|w| lecture_ids.contains(&w.lecture_id))
            .cloned()
            .collect())
    }

    async fn fetch_meanings(&self, word_ids: &[WordId]) -> Result<Vec<Meaning>, GatewayError> {
        let store = self.store.read();
        let mut rows: Vec<Meaning> = store
            .meanings
            .iter()
            .filter(|m| word_ids.contains(&m.word_id))
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.added_at);
        Ok(rows)
    }

    async fn next_order(&self, lecture_id: &str) -> Result<u32, GatewayError> {
        Ok(tuvung_algo::reorder::next_order(
            &self.words_snapshot(lecture_id),
        ))
    }

    async fn insert_word(&self, word: NewWord) -> Result<Word, GatewayError> {
        self.check_writes()?;
        let row = Word {
            id: Uuid::new_v4().to_string(),
            lecture_id: word.lecture_id,
            text: word.text,
            ipa: word.ipa,
            audio_url: word.audio_url,
            image_url: word.image_url,
            order_in_lecture: word.order_in_lecture,
        };
        self.store.write().words.push(row.clone());
        Ok(row)
    }

    async fn update_word(&self, word_id: &str, patch: WordPatch) -> Result<Word, GatewayError> {
        self.check_writes()?;
        let mut store = self.store.write();
        let word = store
            .words
            .iter_mut()
            .find(|w| w.id == word_id)
            .ok_or_else(|| GatewayError::NotFound(format!("từ {word_id}")))?;
        if let Some(text) = patch.text {
            word.text = text;
        }
        if let Some(ipa) = patch.ipa {
            word.ipa = ipa;
        }
        if let Some(audio_url) = patch.audio_url {
            word.audio_url = audio_url;
        }
        if let Some(image_url) = patch.image_url {
            word.image_url = image_url;
        }
        if let Some(order) = patch.order_in_lecture {
            word.order_in_lecture = order;
        }
        Ok(word.clone())
    }

    async fn delete_word(&self, word_id: &str) -> Result<(), GatewayError> {
        let mut store = self.store.write();
        let before = store.words.len();
        store.words.retain(|w| w.id != word_id);
        if store.words.len() == before {
            return Err(GatewayError::NotFound(format!("từ {word_id}")));
        }
        store.meanings.retain(|m| m.word_id != word_id);
        Ok(())
    }

    async fn replace_meanings(
        &self,
        word_id: &str,
        meanings: &[NewMeaning],
    ) -> Result<(), GatewayError> {
        let mut store = self.store.write();
        store.meanings.retain(|m| m.word_id != word_id);
        let base = Utc::now();
        for (i, meaning) in meanings.iter().enumerate() {
            store.meanings.push(Meaning {
                id: Uuid::new_v4().to_string(),
                word_id: word_id.to_string(),
                meaning: meaning.meaning.clone(),
                part_of_speech: meaning.part_of_speech.clone(),
                added_at: Some(base + Duration::milliseconds(i as i64)),
            });
        }
        Ok(())
    }

    async fn persist_order(
        &self,
        lecture_id: &str,
        ordered_ids: &[WordId],
    ) -> Result<(), GatewayError> {
        self.check_writes()?;
        let mut store = self.store.write();
        for word in store.words.iter_mut().filter(|w| w.lecture_id == lecture_id) {
            if let Some(pos) = ordered_ids.iter().position(|id| id == &word.id) {
                word.order_in_lecture = pos as u32;
            }
        }
        Ok(())
    }

    async fn record_miss(&self, user_id: &str, word_id: &str) -> Result<(), GatewayError> {
        self.check_writes()?;
        self.store.write().notes.push(MissNote {
            user_id: user_id.to_string(),
            word_id: word_id.to_string(),
            note_text: MISS_NOTE_TEXT.to_string(),
        });
        Ok(())
    }

    async fn fetch_miss_notes(
        &self,
        user_id: &str,
        word_ids: &[WordId],
    ) -> Result<Vec<WordId>, GatewayError> {
        Ok(self
            .store
            .read()
            .notes
            .iter()
            .filter(|n| n.user_id == user_id && word_ids.contains(&n.word_id))
            .map(|n| n.word_id.clone())
            .collect())
    }

    async fn upload_asset(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<String, GatewayError> {
        self.store
            .write()
            .assets
            .insert((bucket.to_string(), path.to_string()), bytes);
        Ok(path.to_string())
    }

    fn resolve_public_url(&self, bucket: &str, path: Option<&str>) -> Option<String> {
        public_url(MEMORY_STORAGE_BASE, bucket, path)
    }

    async fn resolve_user(&self, token: &str) -> Result<AuthUser, GatewayError> {
        self.store
            .read()
            .users
            .get(token)
            .cloned()
            .ok_or(GatewayError::Unauthenticated)
    }
}
