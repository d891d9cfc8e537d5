pub mod assets;
pub mod dictionary;
pub mod flashcard_tests;
pub mod phrase_audio;
pub mod practice;
pub mod suggest;
pub mod translate;
pub mod words;

use thiserror::Error;

/// Failure of an enrichment lookup. Callers degrade these to empty results.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("JSON decode failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("empty response")]
    Empty,
}

pub(crate) async fn read_json<T: serde::de::DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, LookupError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(LookupError::HttpStatus { status, body });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
