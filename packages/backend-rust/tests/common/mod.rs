#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use tuvung_algo::Word;
use tuvung_backend::config::Config;
use tuvung_backend::gateway::InMemoryGateway;
use tuvung_backend::services::dictionary::{DictionaryMeaning, DictionaryResult, StaticDictionary};
use tuvung_backend::services::translate::StaticTranslator;
use tuvung_backend::state::AppState;

pub const OWNER_TOKEN: &str = "owner-token";
pub const GUEST_TOKEN: &str = "guest-token";
pub const OWNER_ID: &str = "u-owner";

pub struct TestApp {
    pub router: Router,
    pub gateway: Arc<InMemoryGateway>,
    pub state: AppState,
}

/// Lecture `l1` (course `c1`, owned by `u-owner`) holding cat, dog, bird
pub fn fixture_gateway() -> InMemoryGateway {
    InMemoryGateway::new()
        .with_course("c1", "Tiếng Anh cơ bản", Some(OWNER_ID))
        .with_lecture("l1", "c1", "Động vật")
        .with_lecture("l-empty", "c1", "Trống")
        .with_user(OWNER_TOKEN, OWNER_ID)
        .with_user(GUEST_TOKEN, "u-guest")
        .with_word(Word::new("w-cat", "l1", "cat").with_order(0), &["con mèo"])
        .with_word(Word::new("w-dog", "l1", "dog").with_order(1), &["con chó"])
        .with_word(Word::new("w-bird", "l1", "bird").with_order(2), &["con chim"])
}

fn meaning(pos: &str, text: &str) -> DictionaryMeaning {
    DictionaryMeaning {
        part_of_speech: Some(pos.to_string()),
        meaning: text.to_string(),
    }
}

pub fn fixture_dictionary() -> StaticDictionary {
    StaticDictionary::new()
        .with_entry(
            "cat",
            DictionaryResult {
                ipa: Some("/kæt/".into()),
                audio_url: Some("https://audio.test/cat.mp3".into()),
                meanings: vec![meaning("noun", "a small domesticated feline")],
            },
        )
        .with_entry(
            "good",
            DictionaryResult {
                ipa: Some("/ɡʊd/".into()),
                audio_url: None,
                meanings: vec![meaning("adjective", "to be desired or approved of")],
            },
        )
        .with_entry(
            "morning",
            DictionaryResult {
                ipa: Some("/ˈmɔːnɪŋ/".into()),
                audio_url: None,
                meanings: vec![meaning("noun", "the period of time before noon")],
            },
        )
        .with_suggestions("cat", &["cat", "cats", "catch"])
}

pub fn fixture_translator() -> StaticTranslator {
    StaticTranslator::new().with("a small domesticated feline", "con mèo nhà")
}

pub fn create_test_app() -> TestApp {
    let config = Config {
        suggest_debounce: Duration::ZERO,
        ..Config::default()
    };
    create_test_app_with(config)
}

pub fn create_test_app_with(config: Config) -> TestApp {
    let gateway = Arc::new(fixture_gateway());
    let state = AppState::new(
        config,
        gateway.clone(),
        Arc::new(fixture_dictionary()),
        Arc::new(fixture_translator()),
    );
    TestApp {
        router: tuvung_backend::build_router(state.clone()),
        gateway,
        state,
    }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}

pub fn word_texts(words: &[Word]) -> Vec<&str> {
    words.iter().map(|w| w.text.as_str()).collect()
}
