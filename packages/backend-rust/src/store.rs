use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use uuid::Uuid;

pub const SESSION_TTL: Duration = Duration::from_secs(2 * 60 * 60);
pub const AUDIO_DRAFT_TTL: Duration = Duration::from_secs(30 * 60);

struct Slot<T> {
    value: T,
    touched: Instant,
}

impl<T> Slot<T> {
    fn expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.touched) >= ttl
    }
}

/// Owned per-client sessions keyed by id. Closures run under the lock and
/// must not await.
///
/// Entries idle for longer than the TTL are treated as gone; expired entries
/// are swept on every insert.
pub struct SessionStore<T> {
    ttl: Duration,
    entries: RwLock<HashMap<Uuid, Slot<T>>>,
}

impl<T> Default for SessionStore<T> {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl<T> SessionStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn insert(&self, value: T) -> Uuid {
        let id = Uuid::new_v4();
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, slot| !slot.expired(self.ttl, now));
        let evicted = before - entries.len();
        if evicted > 0 {
            tracing::debug!(evicted, "expired sessions swept");
        }
        entries.insert(id, Slot { value, touched: now });
        id
    }

    /// Reads an entry and refreshes its idle timer
    pub fn with<R>(&self, id: &Uuid, f: impl FnOnce(&T) -> R) -> Option<R> {
        self.with_mut(id, |value| f(value))
    }

    pub fn with_mut<R>(&self, id: &Uuid, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let now = Instant::now();
        let mut entries = self.entries.write();
        if entries.get(id)?.expired(self.ttl, now) {
            entries.remove(id);
            return None;
        }
        let slot = entries.get_mut(id)?;
        slot.touched = now;
        Some(f(&mut slot.value))
    }

    pub fn remove(&self, id: &Uuid) -> Option<T> {
        let slot = self.entries.write().remove(id)?;
        (!slot.expired(self.ttl, Instant::now())).then_some(slot.value)
    }

    /// Drops every expired entry, returning how many were removed
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, slot| !slot.expired(self.ttl, now));
        before - entries.len()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .values()
            .filter(|slot| !slot.expired(self.ttl, now))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
