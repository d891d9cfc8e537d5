//! Debounced auto-suggest for the word form
//!
//! Each client holds a generation counter. Issuing a ticket bumps it, so any
//! earlier request of the same client observes a stale generation at its next
//! checkpoint and returns [`SuggestOutcome::Superseded`] instead of data.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use tuvung_algo::sanitize::is_phrase;

use super::dictionary::{lookup_dictionary, DictionaryMeaning, MAX_TEXT_SUGGESTIONS};
use super::phrase_audio::compose_phrase_audio;
use super::translate::translate_texts;
use crate::state::AppState;

const VI_MEANING_SUGGESTIONS: usize = 3;
const EN_MEANING_SUGGESTIONS: usize = 2;

type Generations = Arc<Mutex<HashMap<String, Arc<AtomicU64>>>>;

#[derive(Default)]
pub struct SuggestTracker {
    generations: Generations,
}

impl SuggestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new request for `client`, superseding its earlier ones
    pub fn issue(&self, client: &str) -> SuggestTicket {
        let mut generations = self.generations.lock();
        let counter = Arc::clone(
            generations
                .entry(client.to_string())
                .or_insert_with(|| Arc::new(AtomicU64::new(0))),
        );
        // bumped under the lock so a finishing ticket never races a new one
        let generation = counter.fetch_add(1, Ordering::SeqCst) + 1;
        SuggestTicket {
            counter,
            generation,
            registration: Some((Arc::clone(&self.generations), client.to_string())),
        }
    }

    /// A ticket no other request can supersede
    pub fn detached(&self) -> SuggestTicket {
        SuggestTicket {
            counter: Arc::new(AtomicU64::new(1)),
            generation: 1,
            registration: None,
        }
    }

    /// Clients with a request in flight
    pub fn len(&self) -> usize {
        self.generations.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct SuggestTicket {
    counter: Arc<AtomicU64>,
    generation: u64,
    registration: Option<(Generations, String)>,
}

impl SuggestTicket {
    pub fn is_current(&self) -> bool {
        self.counter.load(Ordering::SeqCst) == self.generation
    }
}

impl Drop for SuggestTicket {
    /// The newest ticket of a client takes the client's entry with it
    fn drop(&mut self) {
        let Some((generations, client)) = &self.registration else {
            return;
        };
        let mut generations = generations.lock();
        let owned = generations
            .get(client)
            .is_some_and(|counter| Arc::ptr_eq(counter, &self.counter));
        if owned && self.is_current() {
            generations.remove(client);
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    pub text_suggestions: Vec<String>,
    pub ipa: Option<String>,
    pub audio_url: Option<String>,
    /// Generated phrase clip waiting to be saved with the word
    pub audio_draft_id: Option<Uuid>,
    pub meaning_suggestions: Vec<DictionaryMeaning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SuggestOutcome {
    Superseded,
    Ready(Suggestions),
}

macro_rules! bail_if_stale {
    ($ticket:expr) => {
        if !$ticket.is_current() {
            return SuggestOutcome::Superseded;
        }
    };
}

/// Waits out the debounce window, then gathers spelling suggestions,
/// dictionary data, translated meaning suggestions and, for phrases without
/// audio, a composed clip.
pub async fn run_suggest(state: &AppState, ticket: &SuggestTicket, text: &str) -> SuggestOutcome {
    let debounce = state.config().suggest_debounce;
    if !debounce.is_zero() {
        tokio::time::sleep(debounce).await;
    }
    bail_if_stale!(ticket);

    let text = text.trim();
    if text.is_empty() {
        return SuggestOutcome::Ready(Suggestions::default());
    }

    let dictionary = state.dictionary();
    let text_suggestions = match dictionary.suggest(text).await {
        Ok(mut words) => {
            words.truncate(MAX_TEXT_SUGGESTIONS);
            words
        }
        Err(err) => {
            debug!(text, error = %err, "spelling suggestions failed");
            Vec::new()
        }
    };
    bail_if_stale!(ticket);

    let dict = lookup_dictionary(dictionary.as_ref(), text).await;
    bail_if_stale!(ticket);

    let definitions: Vec<String> = dict.meanings.iter().map(|m| m.meaning.clone()).collect();
    let translated = translate_texts(state.translator().as_ref(), &definitions, "vi").await;
    bail_if_stale!(ticket);

    let meaning_suggestions = translated
        .into_iter()
        .take(VI_MEANING_SUGGESTIONS)
        .map(|meaning| DictionaryMeaning {
            part_of_speech: Some("vi".to_string()),
            meaning,
        })
        .chain(dict.meanings.iter().take(EN_MEANING_SUGGESTIONS).cloned())
        .collect();

    let mut audio_draft_id = None;
    if dict.audio_url.is_none() && is_phrase(text) {
        let composed = compose_phrase_audio(dictionary.as_ref(), text).await;
        bail_if_stale!(ticket);
        if let Some(wav) = composed {
            audio_draft_id = Some(state.audio_drafts().insert(wav.into()));
        }
    }

    SuggestOutcome::Ready(Suggestions {
        text_suggestions,
        ipa: dict.ipa,
        audio_url: dict.audio_url,
        audio_draft_id,
        meaning_suggestions,
    })
}
