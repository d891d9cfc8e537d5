use futures::future::join_all;
use tracing::debug;

use tuvung_algo::phrase_audio::{compose_phrase_wav, MAX_PHRASE_TOKENS, MIN_PHRASE_TOKENS};
use tuvung_algo::sanitize::phrase_tokens;

use super::dictionary::DictionarySource;

async fn token_audio(source: &dyn DictionarySource, token: &str) -> Option<Vec<u8>> {
    let entry = match source.fetch_entry(token).await {
        Ok(entry) => entry?,
        Err(err) => {
            debug!(token, error = %err, "token lookup failed");
            return None;
        }
    };
    let url = entry.audio_url?;
    match source.fetch_audio(&url).await {
        Ok(bytes) => Some(bytes.to_vec()),
        Err(err) => {
            debug!(token, %url, error = %err, "token audio fetch failed");
            None
        }
    }
}

/// Builds a WAV pronunciation for a phrase from its tokens' dictionary audio.
/// `None` for single words or when no token clip could be decoded.
pub async fn compose_phrase_audio(source: &dyn DictionarySource, text: &str) -> Option<Vec<u8>> {
    let tokens = phrase_tokens(text, MAX_PHRASE_TOKENS);
    if tokens.len() < MIN_PHRASE_TOKENS {
        return None;
    }
    let clips: Vec<Vec<u8>> = join_all(tokens.iter().map(|t| token_audio(source, t)))
        .await
        .into_iter()
        .flatten()
        .collect();
    compose_phrase_wav(&clips)
}
