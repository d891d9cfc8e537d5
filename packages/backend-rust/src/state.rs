use std::sync::Arc;
use std::time::{Instant, SystemTime};

use bytes::Bytes;

use crate::config::Config;
use crate::gateway::{DataGateway, InMemoryGateway, RestGateway};
use crate::services::dictionary::{DictionarySource, HttpDictionary};
use crate::services::flashcard_tests::TestEntry;
use crate::services::practice::PracticeEntry;
use crate::services::suggest::SuggestTracker;
use crate::services::translate::{MyMemoryTranslator, Translator};
use crate::store::SessionStore;

#[derive(Clone)]
pub struct AppState {
    started_at: Instant,
    started_at_system: SystemTime,
    config: Arc<Config>,
    gateway: Arc<dyn DataGateway>,
    dictionary: Arc<dyn DictionarySource>,
    translator: Arc<dyn Translator>,
    practice: Arc<SessionStore<PracticeEntry>>,
    tests: Arc<SessionStore<TestEntry>>,
    suggest: Arc<SuggestTracker>,
    audio_drafts: Arc<SessionStore<Bytes>>,
}

impl AppState {
    pub fn new(
        config: Config,
        gateway: Arc<dyn DataGateway>,
        dictionary: Arc<dyn DictionarySource>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            started_at: Instant::now(),
            started_at_system: SystemTime::now(),
            practice: Arc::new(SessionStore::with_ttl(config.session_ttl)),
            tests: Arc::new(SessionStore::with_ttl(config.session_ttl)),
            suggest: Arc::new(SuggestTracker::new()),
            audio_drafts: Arc::new(SessionStore::with_ttl(config.audio_draft_ttl)),
            config: Arc::new(config),
            gateway,
            dictionary,
            translator,
        }
    }

    /// Wires the HTTP collaborators from `config`. Without a data service URL
    /// the in-memory gateway with demo content is used.
    pub fn from_config(config: Config) -> Self {
        let gateway: Arc<dyn DataGateway> = match RestGateway::from_config(&config) {
            Ok(gateway) => Arc::new(gateway),
            Err(err) => {
                tracing::warn!(error = %err, "data service not configured, using in-memory gateway");
                Arc::new(InMemoryGateway::demo())
            }
        };
        let dictionary = Arc::new(HttpDictionary::from_config(&config));
        let translator = Arc::new(MyMemoryTranslator::from_config(&config));
        Self::new(config, gateway, dictionary, translator)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub fn started_at_system(&self) -> SystemTime {
        self.started_at_system
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn gateway(&self) -> Arc<dyn DataGateway> {
        Arc::clone(&self.gateway)
    }

    pub fn dictionary(&self) -> Arc<dyn DictionarySource> {
        Arc::clone(&self.dictionary)
    }

    pub fn translator(&self) -> Arc<dyn Translator> {
        Arc::clone(&self.translator)
    }

    pub fn practice(&self) -> Arc<SessionStore<PracticeEntry>> {
        Arc::clone(&self.practice)
    }

    pub fn tests(&self) -> Arc<SessionStore<TestEntry>> {
        Arc::clone(&self.tests)
    }

    pub fn suggest(&self) -> Arc<SuggestTracker> {
        Arc::clone(&self.suggest)
    }

    pub fn audio_drafts(&self) -> Arc<SessionStore<Bytes>> {
        Arc::clone(&self.audio_drafts)
    }
}
