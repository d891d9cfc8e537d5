//! English dictionary lookups with phrase fallbacks

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tuvung_algo::sanitize::phrase_tokens;

use super::{read_json, LookupError};
use crate::config::Config;

/// Definitions kept per entry
pub const MAX_DEFINITIONS: usize = 5;
/// Tokens looked up separately when a phrase has no entry of its own
pub const MAX_LOOKUP_TOKENS: usize = 4;
pub const MAX_TEXT_SUGGESTIONS: usize = 5;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryMeaning {
    pub part_of_speech: Option<String>,
    pub meaning: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryResult {
    pub ipa: Option<String>,
    pub audio_url: Option<String>,
    pub meanings: Vec<DictionaryMeaning>,
}

impl DictionaryResult {
    pub fn is_empty(&self) -> bool {
        self.ipa.is_none() && self.audio_url.is_none() && self.meanings.is_empty()
    }
}

#[async_trait]
pub trait DictionarySource: Send + Sync {
    /// `Ok(None)` when the term has no entry
    async fn fetch_entry(&self, term: &str) -> Result<Option<DictionaryResult>, LookupError>;

    /// Spelling suggestions, best first
    async fn suggest(&self, text: &str) -> Result<Vec<String>, LookupError>;

    async fn fetch_audio(&self, url: &str) -> Result<Bytes, LookupError>;
}

// ==================== Wire format ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEntry {
    phonetic: Option<String>,
    phonetics: Vec<RawPhonetic>,
    meanings: Vec<RawMeaning>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPhonetic {
    text: Option<String>,
    audio: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawMeaning {
    part_of_speech: Option<String>,
    definitions: Vec<RawDefinition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawDefinition {
    definition: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    word: String,
}

fn non_empty(value: Option<&String>) -> Option<String> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_entry(entry: &RawEntry) -> DictionaryResult {
    let ipa = non_empty(entry.phonetic.as_ref()).or_else(|| {
        entry
            .phonetics
            .iter()
            .find_map(|p| non_empty(p.text.as_ref()))
    });
    let audio_url = entry
        .phonetics
        .iter()
        .find_map(|p| non_empty(p.audio.as_ref()))
        .map(|url| absolute_url(&url));
    let meanings = entry
        .meanings
        .iter()
        .flat_map(|m| {
            m.definitions.iter().filter_map(move |d| {
                non_empty(d.definition.as_ref()).map(|meaning| DictionaryMeaning {
                    part_of_speech: m.part_of_speech.clone(),
                    meaning,
                })
            })
        })
        .take(MAX_DEFINITIONS)
        .collect();
    DictionaryResult {
        ipa,
        audio_url,
        meanings,
    }
}

/// Audio links are sometimes protocol-relative
fn absolute_url(url: &str) -> String {
    match url.strip_prefix("//") {
        Some(rest) => format!("https://{rest}"),
        None => url.to_string(),
    }
}

// ==================== HTTP source ====================

#[derive(Clone)]
pub struct HttpDictionary {
    entries_url: String,
    suggest_url: String,
    client: reqwest::Client,
}

impl HttpDictionary {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            entries_url: config.dictionary_api_url.trim_end_matches('/').to_string(),
            suggest_url: config.suggest_api_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl DictionarySource for HttpDictionary {
    async fn fetch_entry(&self, term: &str) -> Result<Option<DictionaryResult>, LookupError> {
        let url = format!("{}/{}", self.entries_url, urlencoding::encode(term));
        let resp = self.client.get(url).send().await?;
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let entries: Vec<RawEntry> = read_json(resp).await?;
        Ok(entries.first().map(parse_entry).filter(|r| !r.is_empty()))
    }

    async fn suggest(&self, text: &str) -> Result<Vec<String>, LookupError> {
        let url = format!("{}/sug?s={}", self.suggest_url, urlencoding::encode(text));
        let resp = self.client.get(url).send().await?;
        let rows: Vec<RawSuggestion> = read_json(resp).await?;
        Ok(rows
            .into_iter()
            .map(|r| r.word)
            .take(MAX_TEXT_SUGGESTIONS)
            .collect())
    }

    async fn fetch_audio(&self, url: &str) -> Result<Bytes, LookupError> {
        let resp = self.client.get(absolute_url(url)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::HttpStatus {
                status,
                body: String::new(),
            });
        }
        Ok(resp.bytes().await?)
    }
}

// ==================== Fixed-table source ====================

/// Source answering from fixed tables; records every entry lookup
#[derive(Default)]
pub struct StaticDictionary {
    entries: HashMap<String, DictionaryResult>,
    suggestions: HashMap<String, Vec<String>>,
    audio: HashMap<String, Bytes>,
    calls: Mutex<Vec<String>>,
}

impl StaticDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, term: &str, result: DictionaryResult) -> Self {
        self.entries.insert(term.to_lowercase(), result);
        self
    }

    pub fn with_suggestions(mut self, text: &str, words: &[&str]) -> Self {
        self.suggestions.insert(
            text.to_lowercase(),
            words.iter().map(|w| w.to_string()).collect(),
        );
        self
    }

    pub fn with_audio(mut self, url: &str, bytes: impl Into<Bytes>) -> Self {
        self.audio.insert(url.to_string(), bytes.into());
        self
    }

    /// Terms passed to `fetch_entry`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl DictionarySource for StaticDictionary {
    async fn fetch_entry(&self, term: &str) -> Result<Option<DictionaryResult>, LookupError> {
        self.calls.lock().push(term.to_string());
        Ok(self.entries.get(&term.to_lowercase()).cloned())
    }

    async fn suggest(&self, text: &str) -> Result<Vec<String>, LookupError> {
        Ok(self
            .suggestions
            .get(&text.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_audio(&self, url: &str) -> Result<Bytes, LookupError> {
        self.audio.get(url).cloned().ok_or(LookupError::Empty)
    }
}

// ==================== Lookup ====================

async fn fetch_quiet(source: &dyn DictionarySource, term: &str) -> Option<DictionaryResult> {
    match source.fetch_entry(term).await {
        Ok(found) => found,
        Err(err) => {
            debug!(term, error = %err, "dictionary lookup failed");
            None
        }
    }
}

/// Hyphenated and spaced spellings of `term`, without `term` itself
fn variants(term: &str) -> Vec<String> {
    let hyphenated = term.split_whitespace().collect::<Vec<_>>().join("-");
    let spaced = term
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let mut out: Vec<String> = Vec::new();
    for candidate in [hyphenated, spaced] {
        if candidate != term && !candidate.is_empty() && !out.contains(&candidate) {
            out.push(candidate);
        }
    }
    out
}

/// Looks a term up, falling back in order to spelling variants, per-token
/// lookups for phrases, and finally the first spelling suggestion. Returns
/// an empty result when nothing matched.
pub async fn lookup_dictionary(source: &dyn DictionarySource, term: &str) -> DictionaryResult {
    let term = term.trim();
    if term.is_empty() {
        return DictionaryResult::default();
    }

    if let Some(found) = fetch_quiet(source, term).await {
        return found;
    }

    for variant in variants(term) {
        if let Some(found) = fetch_quiet(source, &variant).await {
            return found;
        }
    }

    let tokens = phrase_tokens(term, MAX_LOOKUP_TOKENS);
    if tokens.len() > 1 {
        let mut found = Vec::new();
        for token in tokens {
            if let Some(result) = fetch_quiet(source, token).await {
                found.push(result);
            }
        }
        if !found.is_empty() {
            let ipa = found
                .iter()
                .filter_map(|r| r.ipa.as_deref())
                .collect::<Vec<_>>()
                .join(" ");
            // token audio would only pronounce one word
            return DictionaryResult {
                ipa: Some(ipa).filter(|v| !v.is_empty()),
                audio_url: None,
                meanings: found
                    .into_iter()
                    .flat_map(|r| r.meanings)
                    .take(MAX_DEFINITIONS)
                    .collect(),
            };
        }
    }

    match source.suggest(term).await {
        Ok(suggestions) => {
            if let Some(first) = suggestions.first() {
                if let Some(found) = fetch_quiet(source, first).await {
                    return found;
                }
            }
        }
        Err(err) => debug!(term, error = %err, "spelling suggestions failed"),
    }

    DictionaryResult::default()
}
