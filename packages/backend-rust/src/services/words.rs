//! Lecture word management: listing, editing, deletion and drag reordering

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use tuvung_algo::reorder::{filter_words, parse_order_index, sorted_by_order};
use tuvung_algo::{
    Lecture, LectureView, MeaningBook, ReorderError, ReorderGate, StagedOrder, Word, WordId,
};

use crate::auth::AuthUser;
use crate::gateway::{NewMeaning, NewWord, WordPatch};
use crate::response::AppError;
use crate::services::assets::{AUDIO_BUCKET, IMAGE_BUCKET};
use crate::state::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordRow {
    pub word_id: WordId,
    pub text: String,
    pub ipa: Option<String>,
    pub order_in_lecture: u32,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
    pub audio_public_url: Option<String>,
    pub image_public_url: Option<String>,
    pub meanings: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LectureWords {
    pub lecture: Lecture,
    pub can_edit: bool,
    /// Reordering needs an unfiltered list
    pub can_reorder: bool,
    pub words: Vec<WordRow>,
}

/// Word form as submitted. `order` is the raw text of the order field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordForm {
    pub text: String,
    #[serde(default)]
    pub ipa: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    /// Generated phrase clip from the suggest endpoint
    #[serde(default)]
    pub audio_draft_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub meanings: Vec<MeaningInput>,
}

/// A meaning as plain text or with its part of speech
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MeaningInput {
    Text(String),
    Entry(MeaningEntry),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeaningEntry {
    pub meaning: String,
    #[serde(default)]
    pub part_of_speech: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub from_id: WordId,
    pub to_id: WordId,
    /// Search box contents at drop time
    #[serde(default)]
    pub filter: String,
}

/// Order after a reorder or delete. `persisted` is false when the order
/// could not be stored; `words` then follows the configured failure policy.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderOutcome {
    pub words: Vec<WordRow>,
    pub persisted: bool,
    pub error: Option<String>,
}

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn clean_meanings(meanings: &[MeaningInput]) -> Vec<NewMeaning> {
    meanings
        .iter()
        .filter_map(|input| {
            let (text, part_of_speech) = match input {
                MeaningInput::Text(text) => (text.as_str(), None),
                MeaningInput::Entry(entry) => (entry.meaning.as_str(), entry.part_of_speech.as_deref()),
            };
            let text = text.trim();
            (!text.is_empty()).then(|| NewMeaning {
                meaning: text.to_string(),
                part_of_speech: blank_to_none(part_of_speech),
            })
        })
        .collect()
}

fn meaning_texts(meanings: &[NewMeaning]) -> Vec<String> {
    meanings.iter().map(|m| m.meaning.clone()).collect()
}

fn row(state: &AppState, word: &Word, meanings: &[String]) -> WordRow {
    let gateway = state.gateway();
    WordRow {
        word_id: word.id.clone(),
        text: word.text.clone(),
        ipa: word.ipa.clone(),
        order_in_lecture: word.order_in_lecture,
        audio_url: word.audio_url.clone(),
        image_url: word.image_url.clone(),
        audio_public_url: gateway.resolve_public_url(AUDIO_BUCKET, word.audio_url.as_deref()),
        image_public_url: gateway.resolve_public_url(IMAGE_BUCKET, word.image_url.as_deref()),
        meanings: meanings.to_vec(),
    }
}

fn rows(state: &AppState, words: &[Word], meanings: &MeaningBook) -> Vec<WordRow> {
    words
        .iter()
        .map(|w| row(state, w, meanings.meanings(&w.id)))
        .collect()
}

async fn can_edit(state: &AppState, lecture: &Lecture, user: Option<&AuthUser>) -> Result<bool, AppError> {
    let Some(user) = user else {
        return Ok(false);
    };
    let owner = state.gateway().course_owner(&lecture.course_id).await?;
    Ok(owner.as_deref() == Some(user.id.as_str()))
}

async fn require_editor(state: &AppState, lecture_id: &str, user: &AuthUser) -> Result<Lecture, AppError> {
    let lecture = state.gateway().fetch_lecture(lecture_id).await?;
    if !can_edit(state, &lecture, Some(user)).await? {
        return Err(ReorderError::Forbidden.into());
    }
    Ok(lecture)
}

async fn load_view(state: &AppState, lecture_id: &str) -> Result<LectureView, AppError> {
    let gateway = state.gateway();
    let words = gateway.fetch_words(lecture_id).await?;
    let ids: Vec<WordId> = words.iter().map(|w| w.id.clone()).collect();
    let meanings = if ids.is_empty() {
        MeaningBook::new()
    } else {
        MeaningBook::from_rows(gateway.fetch_meanings(&ids).await?)
    };
    Ok(LectureView::new(words, meanings))
}

pub async fn list(
    state: &AppState,
    lecture_id: &str,
    user: Option<&AuthUser>,
    filter: &str,
) -> Result<LectureWords, AppError> {
    let lecture = state.gateway().fetch_lecture(lecture_id).await?;
    let can_edit = can_edit(state, &lecture, user).await?;
    let view = load_view(state, lecture_id).await?;
    let words = filter_words(view.words(), filter)
        .into_iter()
        .map(|w| row(state, w, view.meanings().meanings(&w.id)))
        .collect();
    Ok(LectureWords {
        lecture,
        can_reorder: ReorderGate::new(can_edit, filter).check().is_ok(),
        can_edit,
        words,
    })
}

/// Audio column to store: a generated draft is uploaded, anything else kept.
/// The draft stays available until [`release_draft`] runs after the word write.
async fn resolve_audio(state: &AppState, form: &WordForm) -> Result<Option<String>, AppError> {
    let Some(draft_id) = form.audio_draft_id else {
        return Ok(blank_to_none(form.audio_url.as_deref()));
    };
    let bytes = state
        .audio_drafts()
        .with(&draft_id, |bytes| bytes.clone())
        .ok_or_else(|| AppError::validation("Bản ghi âm tạm không còn tồn tại"))?;
    let path = format!("{}.wav", Uuid::new_v4());
    let stored = state
        .gateway()
        .upload_asset(AUDIO_BUCKET, &path, bytes, "audio/wav")
        .await?;
    Ok(Some(stored))
}

fn release_draft(state: &AppState, form: &WordForm) {
    if let Some(draft_id) = form.audio_draft_id {
        state.audio_drafts().remove(&draft_id);
    }
}

fn require_text(form: &WordForm) -> Result<String, AppError> {
    let text = form.text.trim();
    if text.is_empty() {
        return Err(AppError::validation("Từ vựng không được để trống"));
    }
    Ok(text.to_string())
}

pub async fn create(
    state: &AppState,
    lecture_id: &str,
    user: &AuthUser,
    form: WordForm,
) -> Result<WordRow, AppError> {
    require_editor(state, lecture_id, user).await?;
    let text = require_text(&form)?;
    let gateway = state.gateway();

    let order_input = form.order.as_deref().unwrap_or("");
    let next = if order_input.trim().is_empty() {
        gateway.next_order(lecture_id).await?
    } else {
        0
    };
    let order = parse_order_index(order_input, next)?;

    let audio_url = resolve_audio(state, &form).await?;
    let word = gateway
        .insert_word(NewWord {
            lecture_id: lecture_id.to_string(),
            text,
            ipa: blank_to_none(form.ipa.as_deref()),
            audio_url,
            image_url: blank_to_none(form.image_url.as_deref()),
            order_in_lecture: order,
        })
        .await?;
    release_draft(state, &form);

    let meanings = clean_meanings(&form.meanings);
    if !meanings.is_empty() {
        gateway.replace_meanings(&word.id, &meanings).await?;
    }
    info!(lecture_id, word_id = %word.id, order, "word created");
    Ok(row(state, &word, &meaning_texts(&meanings)))
}

pub async fn update(
    state: &AppState,
    lecture_id: &str,
    word_id: &str,
    user: &AuthUser,
    form: WordForm,
) -> Result<WordRow, AppError> {
    require_editor(state, lecture_id, user).await?;
    let text = require_text(&form)?;
    let gateway = state.gateway();

    let current = gateway
        .fetch_words(lecture_id)
        .await?
        .into_iter()
        .find(|w| w.id == word_id)
        .ok_or_else(|| AppError::not_found(format!("Không tìm thấy từ {word_id}")))?;
    let order = parse_order_index(
        form.order.as_deref().unwrap_or(""),
        current.order_in_lecture,
    )?;

    let audio_url = resolve_audio(state, &form).await?;
    let word = gateway
        .update_word(
            word_id,
            WordPatch {
                text: Some(text),
                ipa: Some(blank_to_none(form.ipa.as_deref())),
                audio_url: Some(audio_url),
                image_url: Some(blank_to_none(form.image_url.as_deref())),
                order_in_lecture: Some(order),
            },
        )
        .await?;
    release_draft(state, &form);

    let meanings = clean_meanings(&form.meanings);
    gateway.replace_meanings(word_id, &meanings).await?;
    info!(lecture_id, word_id, "word updated");
    Ok(row(state, &word, &meaning_texts(&meanings)))
}

/// Stores the staged order and settles it against the failure policy
async fn persist_staged(
    state: &AppState,
    lecture_id: &str,
    staged: StagedOrder,
    meanings: &MeaningBook,
) -> ReorderOutcome {
    let policy = state.config().reorder_failure_policy;
    let result = state.gateway().persist_order(lecture_id, &staged.ids()).await;
    let error = match result {
        Ok(()) => None,
        Err(err) => {
            warn!(lecture_id, error = %err, ?policy, "order not persisted");
            Some("Không thể cập nhật thứ tự".to_string())
        }
    };
    let words = staged.settle(error.is_none(), policy);
    ReorderOutcome {
        words: rows(state, &words, meanings),
        persisted: error.is_none(),
        error,
    }
}

pub async fn delete(
    state: &AppState,
    lecture_id: &str,
    word_id: &str,
    user: &AuthUser,
) -> Result<ReorderOutcome, AppError> {
    require_editor(state, lecture_id, user).await?;
    let view = load_view(state, lecture_id).await?;
    let staged = StagedOrder::stage_delete(view.words(), word_id)?;

    state.gateway().delete_word(word_id).await?;
    info!(lecture_id, word_id, "word deleted");

    // the deleted row is gone whatever happens to the new order
    let snapshot: Vec<Word> = staged
        .snapshot()
        .iter()
        .filter(|w| w.id != word_id)
        .cloned()
        .collect();
    let staged = StagedOrder::new(snapshot, staged.commit());

    let (_, mut meanings) = view.into_parts();
    meanings.remove(word_id);
    Ok(persist_staged(state, lecture_id, staged, &meanings).await)
}

pub async fn reorder(
    state: &AppState,
    lecture_id: &str,
    user: Option<&AuthUser>,
    request: ReorderRequest,
) -> Result<ReorderOutcome, AppError> {
    let lecture = state.gateway().fetch_lecture(lecture_id).await?;
    let editable = can_edit(state, &lecture, user).await?;
    let gate = ReorderGate::new(editable, &request.filter);

    let view = load_view(state, lecture_id).await?;
    let current = sorted_by_order(view.words());
    let staged = StagedOrder::stage_move(&gate, &current, &request.from_id, &request.to_id)?;
    info!(lecture_id, from = %request.from_id, to = %request.to_id, "reordering words");
    Ok(persist_staged(state, lecture_id, staged, view.meanings()).await)
}
