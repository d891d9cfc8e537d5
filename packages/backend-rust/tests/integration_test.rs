mod common;

use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use tuvung_backend::config::Config;
use tuvung_backend::gateway::DataGateway;

use common::{create_test_app, create_test_app_with, word_texts, GUEST_TOKEN, OWNER_ID, OWNER_TOKEN};

fn texts_of(data: &Value) -> Vec<String> {
    data["words"]
        .as_array()
        .map(|words| {
            words
                .iter()
                .filter_map(|w| w["text"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ==================== Health ====================

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_test_app();

    let (status, body) = app.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = app.get("/health/live", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.get("/health/info", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["service"], "tuvung-backend");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app();
    let (status, body) = app.get("/nope/at/all", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "NOT_FOUND");
}

// ==================== Practice ====================

#[tokio::test]
async fn test_practice_flow_with_review_and_miss_notes() {
    let app = create_test_app();

    let (status, body) = app
        .post(
            "/api/practice/sessions",
            Some(OWNER_TOKEN),
            json!({
                "lectureIds": ["l1"],
                "questionCount": 3,
                "shuffle": false,
                "direction": "vi2en",
                "autoAdvance": false,
                "seed": 1
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let session = &body["data"];
    assert_eq!(session["phase"], "active");
    assert_eq!(session["total"], 3);
    assert_eq!(session["prompt"]["shown"], "con mèo");
    let id = session["sessionId"].as_str().unwrap().to_string();
    let base = format!("/api/practice/sessions/{id}");

    let (status, body) = app
        .post(&format!("{base}/answer"), Some(OWNER_TOKEN), json!({ "answer": "Cat " }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["outcome"]["result"], "correct");
    assert_eq!(body["data"]["session"]["watermark"], 1);
    // manual mode leaves the card on screen
    assert_eq!(body["data"]["session"]["index"], 0);

    let (_, body) = app.post(&format!("{base}/advance"), Some(OWNER_TOKEN), json!({})).await;
    assert_eq!(body["data"]["index"], 1);
    assert_eq!(body["data"]["prompt"]["shown"], "con chó");

    let (_, body) = app
        .post(&format!("{base}/answer"), Some(OWNER_TOKEN), json!({ "answer": "zzz" }))
        .await;
    assert_eq!(body["data"]["outcome"]["result"], "hint");
    assert_eq!(body["data"]["session"]["input"], "");

    let (_, body) = app
        .post(&format!("{base}/answer"), Some(OWNER_TOKEN), json!({ "answer": "zzz" }))
        .await;
    assert_eq!(body["data"]["outcome"]["result"], "revealed");
    assert_eq!(body["data"]["outcome"]["answer"], "dog");

    tokio::time::sleep(Duration::from_millis(50)).await;
    let notes = app.gateway.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].user_id, OWNER_ID);
    assert_eq!(notes[0].word_id, "w-dog");

    let (_, body) = app.post(&format!("{base}/back"), Some(OWNER_TOKEN), json!({})).await;
    assert_eq!(body["data"]["phase"], "reviewing");
    assert_eq!(body["data"]["index"], 0);
    assert_eq!(body["data"]["feedback"]["kind"], "reviewCorrect");

    let (status, _) = app.post(&format!("{base}/answer"), Some(OWNER_TOKEN), json!({ "answer": "cat" })).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = app.post(&format!("{base}/forward"), Some(OWNER_TOKEN), json!({})).await;
    assert_eq!(body["data"]["index"], 1);
    assert_eq!(body["data"]["feedback"]["kind"], "reviewWrong");

    let (_, body) = app.post(&format!("{base}/forward"), Some(OWNER_TOKEN), json!({})).await;
    assert_eq!(body["data"]["phase"], "active");
    assert_eq!(body["data"]["index"], 2);

    let (_, body) = app
        .post(&format!("{base}/answer"), Some(OWNER_TOKEN), json!({ "answer": "bird" }))
        .await;
    assert_eq!(body["data"]["outcome"]["result"], "correct");
    assert_eq!(body["data"]["session"]["pending"]["kind"], "complete");

    let (_, body) = app.post(&format!("{base}/advance"), Some(OWNER_TOKEN), json!({})).await;
    let data = &body["data"];
    assert_eq!(data["phase"], "completed");
    assert_eq!(data["summary"]["answered"], 3);
    assert_eq!(data["summary"]["correct"], 2);
    assert_eq!(data["summary"]["wrong"], 1);
    assert_eq!(data["results"].as_array().unwrap().len(), 3);

    let (status, _) = app.get(&base, Some(GUEST_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = app.delete(&base, Some(OWNER_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["deleted"], true);
    let (status, _) = app.get(&base, Some(OWNER_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_practice_stats_counts_misses() {
    let app = create_test_app();

    let (status, _) = app.get("/api/practice/stats?lectureIds=l1", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, body) = app
        .post(
            "/api/practice/sessions",
            Some(OWNER_TOKEN),
            json!({ "lectureIds": ["l1"], "direction": "en2vi", "autoAdvance": false }),
        )
        .await;
    let id = body["data"]["sessionId"].as_str().unwrap().to_string();
    let answer = format!("/api/practice/sessions/{id}/answer");
    app.post(&answer, Some(OWNER_TOKEN), json!({ "answer": "sai" })).await;
    app.post(&answer, Some(OWNER_TOKEN), json!({ "answer": "sai" })).await;
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, body) = app.get("/api/practice/stats?lectureIds=l1", Some(OWNER_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    let top = body["data"].as_array().unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0]["wordId"], "w-cat");
    assert_eq!(top[0]["count"], 1);
}

#[tokio::test]
async fn test_practice_rejects_bad_input() {
    let app = create_test_app();

    let (status, body) = app
        .post("/api/practice/sessions", None, json!({ "lectureIds": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app
        .post("/api/practice/sessions", None, json!({ "lectureIds": ["l-empty"] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app.get("/api/practice/sessions/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = app.get(&format!("/api/practice/sessions/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ==================== Words ====================

#[tokio::test]
async fn test_list_words_reports_permissions() {
    let app = create_test_app();

    let (status, body) = app.get("/api/lectures/l1/words", Some(OWNER_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["canEdit"], true);
    assert_eq!(body["data"]["canReorder"], true);
    assert_eq!(texts_of(&body["data"]), vec!["cat", "dog", "bird"]);

    let (_, body) = app.get("/api/lectures/l1/words?q=do", Some(GUEST_TOKEN)).await;
    assert_eq!(body["data"]["canEdit"], false);
    assert_eq!(texts_of(&body["data"]), vec!["dog"]);
}

#[tokio::test]
async fn test_reorder_gates_and_moves() {
    let app = create_test_app();
    let uri = "/api/lectures/l1/order";
    let mv = json!({ "fromId": "w-cat", "toId": "w-bird" });

    let (status, body) = app.put(uri, Some(GUEST_TOKEN), mv.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = app
        .put(uri, Some(OWNER_TOKEN), json!({ "fromId": "w-cat", "toId": "w-bird", "filter": "c" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "FILTER_ACTIVE");

    let (status, body) = app.put(uri, Some(OWNER_TOKEN), mv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["persisted"], true);
    assert_eq!(texts_of(&body["data"]), vec!["dog", "bird", "cat"]);
    assert_eq!(word_texts(&app.gateway.words_snapshot("l1")), vec!["dog", "bird", "cat"]);
}

#[tokio::test]
async fn test_reorder_failure_keeps_new_order() {
    let app = create_test_app();
    app.gateway.set_fail_writes(true);

    let (status, body) = app
        .put(
            "/api/lectures/l1/order",
            Some(OWNER_TOKEN),
            json!({ "fromId": "w-bird", "toId": "w-cat" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["persisted"], false);
    assert!(body["data"]["error"].is_string());
    assert_eq!(texts_of(&body["data"]), vec!["bird", "cat", "dog"]);
    assert_eq!(word_texts(&app.gateway.words_snapshot("l1")), vec!["cat", "dog", "bird"]);
}

#[tokio::test]
async fn test_create_word_validates_order_and_auth() {
    let app = create_test_app();
    let uri = "/api/lectures/l1/words";

    let (status, _) = app.post(uri, None, json!({ "text": "fish" })).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.post(uri, Some(GUEST_TOKEN), json!({ "text": "fish" })).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .post(uri, Some(OWNER_TOKEN), json!({ "text": "fish", "order": "-1" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, _) = app.post(uri, Some(OWNER_TOKEN), json!({ "text": "   " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post(
            uri,
            Some(OWNER_TOKEN),
            json!({ "text": " fish ", "order": "", "meanings": ["con cá", " "] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["text"], "fish");
    assert_eq!(body["data"]["orderInLecture"], 3);
    assert_eq!(body["data"]["meanings"], json!(["con cá"]));
}

#[tokio::test]
async fn test_update_word_keeps_order_when_blank() {
    let app = create_test_app();
    let (status, body) = app
        .put(
            "/api/lectures/l1/words/w-dog",
            Some(OWNER_TOKEN),
            json!({ "text": "puppy", "order": " ", "meanings": ["chó con"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "puppy");
    assert_eq!(body["data"]["orderInLecture"], 1);
    assert_eq!(body["data"]["meanings"], json!(["chó con"]));
}

#[tokio::test]
async fn test_word_meanings_keep_part_of_speech() {
    let app = create_test_app();
    let (status, body) = app
        .post(
            "/api/lectures/l1/words",
            Some(OWNER_TOKEN),
            json!({
                "text": "fish",
                "meanings": [
                    { "meaning": " con cá ", "partOfSpeech": "noun" },
                    "cá",
                    { "meaning": "câu cá", "partOfSpeech": " " }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["meanings"], json!(["con cá", "cá", "câu cá"]));

    let word_id = body["data"]["wordId"].as_str().unwrap().to_string();
    let rows = app.gateway.fetch_meanings(&[word_id]).await.unwrap();
    let stored: Vec<_> = rows
        .iter()
        .map(|m| (m.meaning.as_str(), m.part_of_speech.as_deref()))
        .collect();
    assert_eq!(
        stored,
        vec![("con cá", Some("noun")), ("cá", None), ("câu cá", None)]
    );
}

#[tokio::test]
async fn test_audio_draft_survives_failed_word_write() {
    let app = create_test_app();
    let drafts = app.state.audio_drafts();
    let draft_id = drafts.insert(bytes::Bytes::from_static(b"RIFF-draft"));
    let form = json!({ "text": "puppy", "audioDraftId": draft_id });

    app.gateway.set_fail_writes(true);
    let (status, _) = app
        .put("/api/lectures/l1/words/w-dog", Some(OWNER_TOKEN), form.clone())
        .await;
    assert!(status.is_server_error());
    assert!(drafts.with(&draft_id, |_| ()).is_some());

    let (status, _) = app
        .post("/api/lectures/l1/words", Some(OWNER_TOKEN), form.clone())
        .await;
    assert!(status.is_server_error());
    assert!(drafts.with(&draft_id, |_| ()).is_some());

    app.gateway.set_fail_writes(false);
    let (status, body) = app
        .put("/api/lectures/l1/words/w-dog", Some(OWNER_TOKEN), form)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["audioUrl"].as_str().unwrap().ends_with(".wav"));
    assert!(drafts.with(&draft_id, |_| ()).is_none());

    let (status, _) = app
        .get(&format!("/api/suggest/audio/{draft_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_word_compacts_order() {
    let app = create_test_app();
    let (status, body) = app.delete("/api/lectures/l1/words/w-cat", Some(OWNER_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(texts_of(&body["data"]), vec!["dog", "bird"]);

    let orders: Vec<u32> = app
        .gateway
        .words_snapshot("l1")
        .iter()
        .map(|w| w.order_in_lecture)
        .collect();
    assert_eq!(orders, vec![0, 1]);

    let (status, _) = app.delete("/api/lectures/l1/words/w-cat", Some(OWNER_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ==================== Flashcard tests ====================

#[tokio::test]
async fn test_flashcard_flow_produces_report() {
    let app = create_test_app();

    let (status, body) = app
        .post("/api/tests", None, json!({ "lectureIds": ["l1"], "count": 2, "seed": 5 }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["phase"], "inProgress");
    assert_eq!(data["total"], 2);
    let id = data["testId"].as_str().unwrap().to_string();
    let base = format!("/api/tests/{id}");
    let expected = data["card"]["back"].as_str().unwrap().to_string();

    let (_, body) = app.put(&format!("{base}/answer"), None, json!({ "answer": expected })).await;
    assert_eq!(body["data"]["answer"], expected);

    let (_, body) = app.post(&format!("{base}/flip"), None, json!({})).await;
    assert_eq!(body["data"]["flipped"], true);

    let (_, body) = app.post(&format!("{base}/next"), None, json!({})).await;
    assert_eq!(body["data"]["index"], 1);
    assert_eq!(body["data"]["flipped"], false);
    app.put(&format!("{base}/answer"), None, json!({ "answer": "xyz" })).await;

    let (_, body) = app.post(&format!("{base}/previous"), None, json!({})).await;
    assert_eq!(body["data"]["answer"], expected);

    let (_, body) = app.post(&format!("{base}/finish"), None, json!({})).await;
    let data = &body["data"];
    assert_eq!(data["phase"], "finished");
    assert!(data["card"].is_null());
    assert_eq!(data["report"]["total"], 2);
    assert_eq!(data["report"]["correct"], 1);

    let (_, body) = app.post(&format!("{base}/reset"), None, json!({})).await;
    assert_eq!(body["data"]["phase"], "configuring");
    assert_eq!(body["data"]["total"], 0);
}

#[tokio::test]
async fn test_flashcard_owner_is_enforced() {
    let app = create_test_app();
    let (_, body) = app
        .post("/api/tests", Some(OWNER_TOKEN), json!({ "lectureIds": ["l1"] }))
        .await;
    // the default count is larger than the lecture
    assert_eq!(body["data"]["total"], 3);
    let id = body["data"]["testId"].as_str().unwrap().to_string();

    let (status, _) = app.get(&format!("/api/tests/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app.get(&format!("/api/tests/{id}"), Some(OWNER_TOKEN)).await;
    assert_eq!(status, StatusCode::OK);
}

// ==================== Lookup ====================

#[tokio::test]
async fn test_dictionary_lookup_combines_phrase_tokens() {
    let app = create_test_app();

    let (status, body) = app.get("/api/dictionary/cat", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["ipa"], "/kæt/");
    assert_eq!(body["data"]["audioUrl"], "https://audio.test/cat.mp3");

    let (_, body) = app.get("/api/dictionary/good%20morning", None).await;
    let ipa = body["data"]["ipa"].as_str().unwrap();
    assert!(ipa.contains("ɡʊd") && ipa.contains("mɔːnɪŋ"));
    assert!(body["data"]["audioUrl"].is_null());
    assert_eq!(body["data"]["meanings"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_translate_endpoint() {
    let app = create_test_app();

    let (status, body) = app
        .post(
            "/api/translate",
            None,
            json!({ "texts": ["a small domesticated feline"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["translations"], json!(["con mèo nhà"]));

    let (status, body) = app
        .post("/api/translate", None, json!({ "texts": ["unknown text"] }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["translations"], json!([]));

    let (status, _) = app
        .post("/api/translate", None, json!({ "texts": ["x"], "target": "fr" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_suggest_endpoint() {
    let app = create_test_app();

    let (status, body) = app.get("/api/suggest?text=cat&clientId=tab-1", None).await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["status"], "ready");
    assert_eq!(data["textSuggestions"], json!(["cat", "cats", "catch"]));
    assert_eq!(data["ipa"], "/kæt/");
    let meanings = data["meaningSuggestions"].as_array().unwrap();
    assert_eq!(meanings[0]["partOfSpeech"], "vi");
    assert_eq!(meanings[0]["meaning"], "con mèo nhà");
    assert_eq!(meanings[1]["partOfSpeech"], "noun");

    let (status, _) = app
        .get(&format!("/api/suggest/audio/{}", uuid::Uuid::new_v4()), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_suggest_supersedes_only_the_same_caller() {
    let app = create_test_app_with(Config {
        suggest_debounce: Duration::from_millis(40),
        ..Config::default()
    });

    // different callers without a client id do not cancel each other
    let (anonymous, guest) = tokio::join!(
        app.get("/api/suggest?text=cat", None),
        app.get("/api/suggest?text=cat", Some(GUEST_TOKEN)),
    );
    assert_eq!(anonymous.1["data"]["status"], "ready");
    assert_eq!(guest.1["data"]["status"], "ready");

    let (first, second) = tokio::join!(
        app.get("/api/suggest?text=ca", Some(GUEST_TOKEN)),
        app.get("/api/suggest?text=cat", Some(GUEST_TOKEN)),
    );
    assert_eq!(first.1["data"]["status"], "superseded");
    assert_eq!(second.1["data"]["status"], "ready");

    let (first, second) = tokio::join!(
        app.get("/api/suggest?text=ca&clientId=tab-1", Some(OWNER_TOKEN)),
        app.get("/api/suggest?text=cat&clientId=tab-2", Some(OWNER_TOKEN)),
    );
    assert_eq!(first.1["data"]["status"], "ready");
    assert_eq!(second.1["data"]["status"], "ready");

    assert!(app.state.suggest().is_empty());
}

#[tokio::test]
async fn test_idle_sessions_are_evicted() {
    let app = create_test_app_with(Config {
        suggest_debounce: Duration::ZERO,
        session_ttl: Duration::from_millis(200),
        ..Config::default()
    });
    let start = json!({ "lectureIds": ["l1"] });

    let mut ids = Vec::new();
    for _ in 0..5 {
        let (status, body) = app.post("/api/practice/sessions", None, start.clone()).await;
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["sessionId"].as_str().unwrap().to_string());
    }
    assert_eq!(app.state.practice().len(), 5);

    tokio::time::sleep(Duration::from_millis(300)).await;
    let (status, _) = app.get(&format!("/api/practice/sessions/{}", ids[0]), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    app.post("/api/practice/sessions", None, start).await;
    assert_eq!(app.state.practice().len(), 1);
}

// ==================== Assets ====================

#[tokio::test]
async fn test_asset_upload() {
    let app = create_test_app();

    let upload = |token: Option<&str>, bucket: &str, bytes: &'static [u8]| {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/assets/{bucket}?name=clip.mp3"))
            .header(header::CONTENT_TYPE, "audio/mpeg");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        builder.body(Body::from(bytes)).unwrap()
    };

    let response = app
        .router
        .clone()
        .oneshot(upload(None, "word-audios", b"ID3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .router
        .clone()
        .oneshot(upload(Some(OWNER_TOKEN), "secrets", b"ID3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(upload(Some(OWNER_TOKEN), "word-audios", b""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .router
        .clone()
        .oneshot(upload(Some(OWNER_TOKEN), "word-audios", b"ID3 audio"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    let path = body["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".mp3"));
    assert!(body["data"]["publicUrl"].as_str().unwrap().contains(path));
    assert_eq!(
        app.gateway.asset("word-audios", path).as_deref(),
        Some(&b"ID3 audio"[..])
    );
}
