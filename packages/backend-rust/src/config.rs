use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use tuvung_algo::PersistFailurePolicy;

use crate::store::{AUDIO_DRAFT_TTL, SESSION_TTL};

const DEFAULT_DICTIONARY_API_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";
const DEFAULT_SUGGEST_API_URL: &str = "https://api.datamuse.com";
const DEFAULT_TRANSLATE_API_URL: &str = "https://api.mymemory.translated.net";
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_SUGGEST_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub file_logs: bool,
    pub log_dir: String,
    /// Base URL of the hosted data service; `None` runs on the in-memory gateway
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub supabase_service_key: Option<String>,
    pub dictionary_api_url: String,
    pub suggest_api_url: String,
    pub translate_api_url: String,
    pub http_timeout: Duration,
    pub suggest_debounce: Duration,
    pub practice_auto_advance: bool,
    pub reorder_failure_policy: PersistFailurePolicy,
    /// Idle lifetime of practice sessions and flashcard tests
    pub session_ttl: Duration,
    /// Idle lifetime of generated phrase audio waiting to be saved
    pub audio_draft_ttl: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let reorder_failure_policy = if env_bool("REORDER_ROLLBACK_ON_FAILURE").unwrap_or(false) {
            PersistFailurePolicy::RollBack
        } else {
            PersistFailurePolicy::KeepOptimistic
        };

        Self {
            host,
            port,
            log_level,
            file_logs: env_bool("ENABLE_FILE_LOGS").unwrap_or(false),
            log_dir: env_string("LOG_DIR").unwrap_or_else(|| "./logs".to_string()),
            supabase_url: env_string("SUPABASE_URL").map(|v| v.trim_end_matches('/').to_string()),
            supabase_anon_key: env_string("SUPABASE_ANON_KEY"),
            supabase_service_key: env_string("SUPABASE_SERVICE_KEY"),
            dictionary_api_url: env_string("DICTIONARY_API_URL")
                .unwrap_or_else(|| DEFAULT_DICTIONARY_API_URL.to_string()),
            suggest_api_url: env_string("SUGGEST_API_URL")
                .unwrap_or_else(|| DEFAULT_SUGGEST_API_URL.to_string()),
            translate_api_url: env_string("TRANSLATE_API_URL")
                .unwrap_or_else(|| DEFAULT_TRANSLATE_API_URL.to_string()),
            http_timeout: Duration::from_millis(
                env_u64("HTTP_TIMEOUT_MS").unwrap_or(DEFAULT_HTTP_TIMEOUT_MS),
            ),
            suggest_debounce: Duration::from_millis(
                env_u64("SUGGEST_DEBOUNCE_MS").unwrap_or(DEFAULT_SUGGEST_DEBOUNCE_MS),
            ),
            practice_auto_advance: env_bool("PRACTICE_AUTO_ADVANCE").unwrap_or(true),
            reorder_failure_policy,
            session_ttl: env_u64("SESSION_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(SESSION_TTL),
            audio_draft_ttl: env_u64("AUDIO_DRAFT_TTL_SECS")
                .map(Duration::from_secs)
                .unwrap_or(AUDIO_DRAFT_TTL),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 3000,
            log_level: "info".to_string(),
            file_logs: false,
            log_dir: "./logs".to_string(),
            supabase_url: None,
            supabase_anon_key: None,
            supabase_service_key: None,
            dictionary_api_url: DEFAULT_DICTIONARY_API_URL.to_string(),
            suggest_api_url: DEFAULT_SUGGEST_API_URL.to_string(),
            translate_api_url: DEFAULT_TRANSLATE_API_URL.to_string(),
            http_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
            suggest_debounce: Duration::from_millis(DEFAULT_SUGGEST_DEBOUNCE_MS),
            practice_auto_advance: true,
            reorder_failure_policy: PersistFailurePolicy::KeepOptimistic,
            session_ttl: SESSION_TTL,
            audio_draft_ttl: AUDIO_DRAFT_TTL,
        }
    }
}

pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_u64(key: &str) -> Option<u64> {
    env_string(key)?.trim().parse().ok()
}

fn env_bool(key: &str) -> Option<bool> {
    let value = env_string(key)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}
