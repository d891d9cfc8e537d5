use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use tuvung_algo::{Lecture, LectureId, Meaning, UserId, Word, WordId, MISS_NOTE_TEXT};

use super::{public_url, DataGateway, GatewayError, NewMeaning, NewWord, WordPatch};
use crate::auth::AuthUser;
use crate::config::Config;

const MEANING_COLUMNS: &str = "meaning_id,word_id,meaning,part_of_speech,meaning_added_at";

/// Gateway speaking the hosted service's REST dialect: PostgREST tables and
/// RPCs under `/rest/v1`, object storage under `/storage/v1`, and user
/// lookup under `/auth/v1`.
#[derive(Clone)]
pub struct RestGateway {
    base_url: String,
    api_key: String,
    bearer: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct OwnerRow {
    creator_id: Option<UserId>,
}

#[derive(Deserialize)]
struct OrderRow {
    order_in_lecture: Option<u32>,
}

#[derive(Deserialize)]
struct NoteRow {
    word_id: WordId,
}

#[derive(Deserialize)]
struct UserRow {
    id: String,
    email: Option<String>,
}

impl RestGateway {
    pub fn from_config(config: &Config) -> Result<Self, GatewayError> {
        let base_url = config
            .supabase_url
            .clone()
            .ok_or(GatewayError::NotConfigured("SUPABASE_URL"))?;
        let api_key = config
            .supabase_anon_key
            .clone()
            .ok_or(GatewayError::NotConfigured("SUPABASE_ANON_KEY"))?;
        let bearer = config
            .supabase_service_key
            .clone()
            .unwrap_or_else(|| api_key.clone());

        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Ok(Self {
            base_url,
            api_key,
            bearer,
            client,
        })
    }

    fn rest_url(&self, path_and_query: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path_and_query)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(value) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", value);
        }
        headers
    }

    async fn get_rows<T: DeserializeOwned>(&self, path_and_query: &str) -> Result<Vec<T>, GatewayError> {
        let resp = self
            .client
            .get(self.rest_url(path_and_query))
            .headers(self.headers())
            .bearer_auth(&self.bearer)
            .send()
            .await?;
        decode(resp).await
    }

    async fn send_ok(&self, request: reqwest::RequestBuilder) -> Result<(), GatewayError> {
        let resp = request
            .headers(self.headers())
            .bearer_auth(&self.bearer)
            .send()
            .await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }
        let body = resp.text().await.unwrap_or_default();
        Err(GatewayError::HttpStatus { status, body })
    }

    async fn returning_word(&self, request: reqwest::RequestBuilder) -> Result<Word, GatewayError> {
        let resp = request
            .headers(self.headers())
            .header("Prefer", "return=representation")
            .bearer_auth(&self.bearer)
            .send()
            .await?;
        let rows: Vec<Word> = decode(resp).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound("từ".to_string()))
    }
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, GatewayError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(GatewayError::HttpStatus { status, body });
    }
    let bytes = resp.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// PostgREST `in.(...)` list with each value quoted
fn in_list(values: &[String]) -> String {
    let quoted: Vec<String> = values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('"', "")))
        .collect();
    urlencoding::encode(&format!("({})", quoted.join(","))).into_owned()
}

fn eq(value: &str) -> String {
    format!("eq.{}", urlencoding::encode(value))
}

#[async_trait]
impl DataGateway for RestGateway {
    fn kind(&self) -> &'static str {
        "rest"
    }

    async fn fetch_lecture(&self, lecture_id: &str) -> Result<Lecture, GatewayError> {
        let rows: Vec<Lecture> = self
            .get_rows(&format!(
                "lectures?select=lecture_id,course_id,title&lecture_id={}",
                eq(lecture_id)
            ))
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| GatewayError::NotFound(format!("bài học {lecture_id}")))
    }

    async fn course_owner(&self, course_id: &str) -> Result<Option<UserId>, GatewayError> {
        let rows: Vec<OwnerRow> = self
            .get_rows(&format!("courses?select=creator_id&course_id={}", eq(course_id)))
            .await?;
        Ok(rows.into_iter().next().and_then(|r| r.creator_id))
    }

    async fn fetch_words(&self, lecture_id: &str) -> Result<Vec<Word>, GatewayError> {
        self.get_rows(&format!(
            "words?select=*&lecture_id={}&order=order_in_lecture.asc",
            eq(lecture_id)
        ))
        .await
    }

    async fn fetch_words_for_lectures(
        &self,
        lecture_ids: &[LectureId],
    ) -> Result<Vec<Word>, GatewayError> {
        if lecture_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get_rows(&format!(
            "words?select=*&lecture_id=in.{}&order=order_in_lecture.asc",
            in_list(lecture_ids)
        ))
        .await
    }

    async fn fetch_meanings(&self, word_ids: &[WordId]) -> Result<Vec<Meaning>, GatewayError> {
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.get_rows(&format!(
            "wordmeanings?select={MEANING_COLUMNS}&word_id=in.{}&order=meaning_added_at.asc",
            in_list(word_ids)
        ))
        .await
    }

    async fn next_order(&self, lecture_id: &str) -> Result<u32, GatewayError> {
        let rows: Vec<OrderRow> = self
            .get_rows(&format!(
                "words?select=order_in_lecture&lecture_id={}&order=order_in_lecture.desc&limit=1",
                eq(lecture_id)
            ))
            .await?;
        Ok(rows
            .first()
            .map_or(0, |r| r.order_in_lecture.unwrap_or(0) + 1))
    }

    async fn insert_word(&self, word: NewWord) -> Result<Word, GatewayError> {
        let request = self.client.post(self.rest_url("words")).json(&word);
        self.returning_word(request).await
    }

    async fn update_word(&self, word_id: &str, patch: WordPatch) -> Result<Word, GatewayError> {
        let request = self
            .client
            .patch(self.rest_url(&format!("words?word_id={}", eq(word_id))))
            .json(&patch);
        self.returning_word(request).await
    }

    async fn delete_word(&self, word_id: &str) -> Result<(), GatewayError> {
        let request = self
            .client
            .delete(self.rest_url(&format!("words?word_id={}", eq(word_id))));
        self.send_ok(request).await
    }

    async fn replace_meanings(
        &self,
        word_id: &str,
        meanings: &[NewMeaning],
    ) -> Result<(), GatewayError> {
        let clear = self
            .client
            .delete(self.rest_url(&format!("wordmeanings?word_id={}", eq(word_id))));
        self.send_ok(clear).await?;
        if meanings.is_empty() {
            return Ok(());
        }
        let rows: Vec<serde_json::Value> = meanings
            .iter()
            .map(|m| {
                json!({
                    "word_id": word_id,
                    "meaning": m.meaning,
                    "part_of_speech": m.part_of_speech,
                })
            })
            .collect();
        let insert = self.client.post(self.rest_url("wordmeanings")).json(&rows);
        self.send_ok(insert).await
    }

    async fn persist_order(
        &self,
        lecture_id: &str,
        ordered_ids: &[WordId],
    ) -> Result<(), GatewayError> {
        let request = self
            .client
            .post(self.rest_url("rpc/reorder_words"))
            .json(&json!({ "p_lecture_id": lecture_id, "p_word_ids": ordered_ids }));
        self.send_ok(request).await
    }

    async fn record_miss(&self, user_id: &str, word_id: &str) -> Result<(), GatewayError> {
        let request = self.client.post(self.rest_url("note")).json(&json!([{
            "user_id": user_id,
            "word_id": word_id,
            "note_text": MISS_NOTE_TEXT,
        }]));
        self.send_ok(request).await
    }

    async fn fetch_miss_notes(
        &self,
        user_id: &str,
        word_ids: &[WordId],
    ) -> Result<Vec<WordId>, GatewayError> {
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<NoteRow> = self
            .get_rows(&format!(
                "note?select=word_id&user_id={}&word_id=in.{}",
                eq(user_id),
                in_list(word_ids)
            ))
            .await?;
        Ok(rows.into_iter().map(|r| r.word_id).collect())
    }

    async fn upload_asset(
        &self,
        bucket: &str,
        path: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path);
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header("x-upsert", "false")
            .body(bytes);
        self.send_ok(request).await?;
        Ok(path.to_string())
    }

    fn resolve_public_url(&self, bucket: &str, path: Option<&str>) -> Option<String> {
        public_url(&self.base_url, bucket, path)
    }

    async fn resolve_user(&self, token: &str) -> Result<AuthUser, GatewayError> {
        let resp = self
            .client
            .get(format!("{}/auth/v1/user", self.base_url))
            .headers(self.headers())
            .bearer_auth(token)
            .send()
            .await?;
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED
            || resp.status() == reqwest::StatusCode::FORBIDDEN
        {
            return Err(GatewayError::Unauthenticated);
        }
        let user: UserRow = decode(resp).await?;
        Ok(AuthUser {
            id: user.id,
            email: user.email,
        })
    }
}
