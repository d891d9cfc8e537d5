use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use tuvung_algo::flashcards::{clamp_count, DEFAULT_TEST_COUNT};
use tuvung_algo::{
    session_rng, Direction, FlashcardTest, LectureId, MeaningBook, TestPhase, TestReport, UserId,
    WordId, WordSelection, MISSING_MEANING,
};

use crate::auth::AuthUser;
use crate::response::AppError;
use crate::services::assets::{AUDIO_BUCKET, IMAGE_BUCKET};
use crate::state::AppState;

pub struct TestEntry {
    owner: Option<UserId>,
    test: FlashcardTest,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTest {
    pub lecture_ids: Vec<LectureId>,
    #[serde(default)]
    pub word_ids: Vec<WordId>,
    pub count: Option<usize>,
    pub seed: Option<u64>,
}

/// The card as shown: `front` is the prompt, `back` the expected side
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardView {
    pub slot: usize,
    pub word_id: WordId,
    pub direction: Direction,
    pub front: String,
    pub back: String,
    pub ipa: Option<String>,
    pub audio_url: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestView {
    pub test_id: Uuid,
    pub phase: TestPhase,
    pub index: usize,
    pub total: usize,
    pub flipped: bool,
    pub answer: String,
    pub card: Option<CardView>,
    pub report: Option<TestReport>,
}

fn card_view(state: &AppState, test: &FlashcardTest) -> Option<CardView> {
    let item = test.current()?;
    let meanings = test.meanings().meanings(&item.word.id);
    let meaning_text = if meanings.is_empty() {
        MISSING_MEANING.to_string()
    } else {
        meanings.join(" / ")
    };
    let (front, back) = match item.direction {
        Direction::WordToMeaning => (item.word.text.clone(), meaning_text),
        Direction::MeaningToWord => (meaning_text, item.word.text.clone()),
    };
    let gateway = state.gateway();
    Some(CardView {
        slot: item.slot,
        word_id: item.word.id.clone(),
        direction: item.direction,
        front,
        back,
        ipa: item.word.ipa.clone(),
        audio_url: gateway.resolve_public_url(AUDIO_BUCKET, item.word.audio_url.as_deref()),
        image_url: gateway.resolve_public_url(IMAGE_BUCKET, item.word.image_url.as_deref()),
    })
}

fn view_of(state: &AppState, test_id: Uuid, test: &FlashcardTest) -> TestView {
    TestView {
        test_id,
        phase: test.phase(),
        index: test.index(),
        total: test.total(),
        flipped: test.is_flipped(),
        answer: test.current_answer().to_string(),
        card: card_view(state, test),
        report: (test.phase() == TestPhase::Finished).then(|| test.report()),
    }
}

fn with_test(
    state: &AppState,
    id: Uuid,
    user: Option<&AuthUser>,
    f: impl FnOnce(&mut FlashcardTest),
) -> Result<TestView, AppError> {
    state
        .tests()
        .with_mut(&id, |entry| {
            let allowed = match &entry.owner {
                Some(owner) => user.is_some_and(|u| &u.id == owner),
                None => true,
            };
            if !allowed {
                return None;
            }
            f(&mut entry.test);
            Some(view_of(state, id, &entry.test))
        })
        .flatten()
        .ok_or_else(|| AppError::not_found("Không tìm thấy bài kiểm tra"))
}

pub async fn start(
    state: &AppState,
    user: Option<&AuthUser>,
    request: StartTest,
) -> Result<TestView, AppError> {
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
    let ids: Vec<WordId> = base.iter().map(|w| w.id.clone()).collect();
    let meanings = if ids.is_empty() {
        MeaningBook::new()
    } else {
        MeaningBook::from_rows(gateway.fetch_meanings(&ids).await?)
    };

    let count = clamp_count(request.count.unwrap_or(DEFAULT_TEST_COUNT));
    let test = FlashcardTest::build(&base, count, meanings, &mut session_rng(request.seed))?;
    let id = state.tests().insert(TestEntry {
        owner: user.map(|u| u.id.clone()),
        test,
    });
    info!(test_id = %id, count, "flashcard test started");
    view(state, id, user)
}

pub fn view(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<TestView, AppError> {
    with_test(state, id, user, |_| {})
}

pub fn set_answer(
    state: &AppState,
    id: Uuid,
    user: Option<&AuthUser>,
    answer: &str,
) -> Result<TestView, AppError> {
    with_test(state, id, user, |test| test.set_answer(answer))
}

pub fn previous(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<TestView, AppError> {
    with_test(state, id, user, FlashcardTest::previous)
}

pub fn next(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<TestView, AppError> {
    with_test(state, id, user, FlashcardTest::next)
}

pub fn flip(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<TestView, AppError> {
    with_test(state, id, user, FlashcardTest::flip)
}

pub fn finish(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<TestView, AppError> {
    with_test(state, id, user, FlashcardTest::finish)
}

pub fn reset(state: &AppState, id: Uuid, user: Option<&AuthUser>) -> Result<TestView, AppError> {
    with_test(state, id, user, FlashcardTest::reset)
}
