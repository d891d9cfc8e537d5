//! Practice sessions held in memory, one per started run

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use tuvung_algo::{
    session_rng, top_missed, DirectionMode, Feedback, LectureId, MeaningBook, MissCount,
    PendingTransition, Phase, PracticeOptions, PracticeResult, PracticeSession, Prompt,
    SessionConfig, SessionSummary, Submission, UserId, WordId, WordSelection,
};

use crate::auth::AuthUser;
use crate::response::AppError;
use crate::state::AppState;

pub const TOP_MISSED_LIMIT: usize = 10;

pub struct PracticeEntry {
    owner: Option<UserId>,
    session: PracticeSession,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPractice {
    pub lecture_ids: Vec<LectureId>,
    #[serde(default)]
    pub word_ids: Vec<WordId>,
    #[serde(default)]
    pub question_count: usize,
    #[serde(default)]
    pub shuffle: bool,
    #[serde(default)]
    pub direction: DirectionMode,
    pub seed: Option<u64>,
    pub auto_advance: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeView {
    pub session_id: Uuid,
    pub phase: Phase,
    pub index: usize,
    pub watermark: usize,
    pub total: usize,
    pub prompt: Option<Prompt>,
    pub attempts: u8,
    pub input: String,
    pub answered: bool,
    pub feedback: Feedback,
    pub message: String,
    pub pending: Option<PendingTransition>,
    pub summary: SessionSummary,
    pub results: Vec<PracticeResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "camelCase")]
pub enum AnswerOutcome {
    Ignored,
    Correct,
    Hint { mask: String },
    Revealed { answer: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerResponse {
    pub outcome: AnswerOutcome,
    pub session: PracticeView,
}

fn view_of(session_id: Uuid, session: &PracticeSession) -> PracticeView {
    PracticeView {
        session_id,
        phase: session.phase(),
        index: session.index(),
        watermark: session.watermark(),
        total: session.total(),
        prompt: session.prompt(),
        attempts: session.attempts(),
        input: session.input().to_string(),
        answered: session.is_answered(),
        feedback: session.feedback().clone(),
        message: session.feedback().message(),
        pending: session.pending().cloned(),
        summary: session.summary(),
        results: session.results().to_vec(),
    }
}

fn session_not_found() -> AppError {
    AppError::not_found("Không tìm thấy phiên luyện tập")
}

fn same_owner(entry: &PracticeEntry, user: Option<&AuthUser>) -> bool {
    match &entry.owner {
        Some(owner) => user.is_some_and(|u| &u.id == owner),
        None => true,
    }
}

/// Runs `f` on the caller's session under the store lock
fn with_session<R>(
    state: &AppState,
    id: Uuid,
    user: Option<&AuthUser>,
    f: impl FnOnce(&mut PracticeSession) -> Result<R, AppError>,
) -> Result<R, AppError> {
    state
        .practice()
        .with_mut(&id, |entry| {
            if !same_owner(entry, user) {
                return Err(session_not_found());
            }
            f(&mut entry.session)
        })
        .unwrap_or_else(|| Err(session_not_found()))
}

pub async fn start(
    state: &AppState,
    user: Option<&AuthUser>,
    request: StartPractice,
) -> Result<PracticeView, AppError> {
    if request.lecture_ids.is_empty() {
        return Err(AppError::validation("Hãy chọn ít nhất một bài học"));
    }

    let gateway = state.gateway();
    let words = gateway.fetch_words_for_lectures(&request.lecture_ids).await?;
    let selection = WordSelection {
        lecture_ids: request.lecture_ids.clone(),
        word_ids: request.word_ids.iter().cloned().collect::<HashSet<_>>(),
    };
    let base = selection.apply(&words);
    if base.is_empty() {
        return Err(AppError::validation("Chưa chọn từ nào để luyện tập"));
    }

    let ids: Vec<WordId> = base.iter().map(|w| w.id.clone()).collect();
    let meanings = MeaningBook::from_rows(gateway.fetch_meanings(&ids).await?);

    let config = SessionConfig {
        question_count: request.question_count,
        shuffle: request.shuffle,
        direction: request.direction,
    };
    let mut session = PracticeSession::new(PracticeOptions {
        auto_advance: request
            .auto_advance
            .unwrap_or(state.config().practice_auto_advance),
        ..PracticeOptions::default()
    });
    session.begin(&base, &config, meanings, &mut session_rng(request.seed))?;

    let id = state.practice().insert(PracticeEntry {
        owner: user.map(|u| u.id.clone()),
        session,
    });
    info!(
        session_id = %id,
        words = base.len(),
        questions = config.question_count.max(base.len()),
        "practice session started"
    );
    view(state, id, user)
}

pub fn view(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<PracticeView, AppError> {
    with_session(state, id, user, |session| Ok(view_of(id, session)))
}

pub fn answer(
    state: &AppState,
    id: Uuid,
    user: Option<&AuthUser>,
    input: &str,
) -> Result<AnswerResponse, AppError> {
    let (submission, session) = with_session(state, id, user, |session| {
        let submission = session.submit(input)?;
        Ok((submission, view_of(id, session)))
    })?;

    let outcome = match submission {
        Submission::Ignored => AnswerOutcome::Ignored,
        Submission::Correct { pending } => {
            if let Some(pending) = pending {
                schedule_pending(state, id, pending);
            }
            AnswerOutcome::Correct
        }
        Submission::Hint { mask } => AnswerOutcome::Hint { mask },
        Submission::Revealed {
            answer,
            missed_word,
            pending,
        } => {
            if let Some(user) = user {
                record_miss(state, &user.id, &missed_word);
            }
            if let Some(pending) = pending {
                schedule_pending(state, id, pending);
            }
            AnswerOutcome::Revealed { answer }
        }
    };

    Ok(AnswerResponse { outcome, session })
}

pub fn advance(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<PracticeView, AppError> {
    with_session(state, id, user, |session| {
        session.advance()?;
        Ok(view_of(id, session))
    })
}

pub fn back(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<PracticeView, AppError> {
    with_session(state, id, user, |session| {
        session.step_back()?;
        Ok(view_of(id, session))
    })
}

pub fn forward(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<PracticeView, AppError> {
    with_session(state, id, user, |session| {
        session.step_forward()?;
        Ok(view_of(id, session))
    })
}

pub fn restart(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<PracticeView, AppError> {
    with_session(state, id, user, |session| {
        session.restart();
        Ok(view_of(id, session))
    })
}

pub fn delete(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<(), AppError> {
    with_session(state, id, user, |_| Ok(()))?;
    state.practice().remove(&id);
    Ok(())
}

/// Most missed words of the given lectures for `user`
pub async fn stats(
    state: &AppState,
    user: &AuthUser,
    lecture_ids: &[LectureId],
) -> Result<Vec<MissCount>, AppError> {
    if lecture_ids.is_empty() {
        return Ok(Vec::new());
    }
    let gateway = state.gateway();
    let words = gateway.fetch_words_for_lectures(lecture_ids).await?;
    let ids: Vec<WordId> = words.iter().map(|w| w.id.clone()).collect();
    let notes = gateway.fetch_miss_notes(&user.id, &ids).await?;
    Ok(top_missed(&notes, &words, TOP_MISSED_LIMIT))
}

fn schedule_pending(state: &AppState, id: Uuid, pending: PendingTransition) {
    let store = state.practice();
    tokio::spawn(async move {
        tokio::time::sleep(pending.delay).await;
        let applied = store
            .with_mut(&id, |entry| entry.session.resolve_pending(pending.token))
            .unwrap_or(false);
        debug!(session_id = %id, token = pending.token, applied, "pending transition fired");
    });
}

fn record_miss(state: &AppState, user_id: &str, word_id: &str) {
    let gateway = state.gateway();
    let user_id = user_id.to_string();
    let word_id = word_id.to_string();
    tokio::spawn(async move {
        if let Err(err) = gateway.record_miss(&user_id, &word_id).await {
            debug!(%user_id, %word_id, error = %err, "miss note not recorded");
        }
    });
}
