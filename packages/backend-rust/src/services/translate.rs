use std::collections::HashMap;

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use tracing::warn;

use super::{read_json, LookupError};
use crate::config::Config;

/// Texts translated per request
pub const MAX_TRANSLATIONS: usize = 3;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, LookupError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryResponse {
    response_data: MyMemoryData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MyMemoryData {
    translated_text: Option<String>,
}

#[derive(Clone)]
pub struct MyMemoryTranslator {
    base_url: String,
    client: reqwest::Client,
}

impl MyMemoryTranslator {
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            base_url: config.translate_api_url.trim_end_matches('/').to_string(),
            client,
        }
    }
}

#[async_trait]
impl Translator for MyMemoryTranslator {
    async fn translate(&self, text: &str, source: &str, target: &str) -> Result<String, LookupError> {
        let url = format!(
            "{}/get?q={}&langpair={}",
            self.base_url,
            urlencoding::encode(text),
            urlencoding::encode(&format!("{source}|{target}"))
        );
        let resp = self.client.get(url).send().await?;
        let body: MyMemoryResponse = read_json(resp).await?;
        body.response_data
            .translated_text
            .filter(|t| !t.trim().is_empty())
            .ok_or(LookupError::Empty)
    }
}

/// Translator backed by a fixed table; unknown texts fail
#[derive(Default)]
pub struct StaticTranslator {
    table: HashMap<String, String>,
}

impl StaticTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, text: &str, translated: &str) -> Self {
        self.table.insert(text.to_string(), translated.to_string());
        self
    }
}

#[async_trait]
impl Translator for StaticTranslator {
    async fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, LookupError> {
        self.table.get(text).cloned().ok_or(LookupError::Empty)
    }
}

/// Translates the first three texts into `target`. Any failure yields an
/// empty list.
pub async fn translate_texts(translator: &dyn Translator, texts: &[String], target: &str) -> Vec<String> {
    let top: Vec<&str> = texts
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .take(MAX_TRANSLATIONS)
        .collect();
    if top.is_empty() {
        return Vec::new();
    }
    let source = if target == "vi" { "en" } else { "vi" };

    let results = join_all(top.iter().map(|text| translator.translate(text, source, target))).await;
    match results.into_iter().collect::<Result<Vec<_>, _>>() {
        Ok(translations) => translations,
        Err(err) => {
            warn!(error = %err, target, "translation failed");
            Vec::new()
        }
    }
}
