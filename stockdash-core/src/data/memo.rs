//! Time-bounded memo for repeated identical requests.
//!
//! A map from request key to (value, expiry). Expired entries are pruned
//! lazily whenever the memo is consulted; nothing runs in the background.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Default time-to-live for memoized responses.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60 * 60);

/// Identity of a request: same ticker and same date range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    /// `None` when the TTL is too large to represent; such entries never expire.
    expires_at: Option<Instant>,
}

/// Memo keyed by `RequestKey` with a fixed time-to-live.
#[derive(Debug)]
pub struct ResponseMemo<V> {
    ttl: Duration,
    entries: HashMap<RequestKey, Entry<V>>,
}

impl<V: Clone> ResponseMemo<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Look up a live entry.
    pub fn get(&mut self, key: &RequestKey) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    /// Look up a live entry as of `now`, dropping everything that has expired.
    pub fn get_at(&mut self, key: &RequestKey, now: Instant) -> Option<V> {
        self.prune(now);
        self.entries.get(key).map(|e| e.value.clone())
    }

    pub fn insert(&mut self, key: RequestKey, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: RequestKey, value: V, now: Instant) {
        let expires_at = now.checked_add(self.ttl);
        self.entries.insert(key, Entry { value, expires_at });
    }

    /// Number of stored entries, including any not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn prune(&mut self, now: Instant) {
        self.entries
            .retain(|_, e| e.expires_at.map_or(true, |at| at > now));
    }
}

impl<V: Clone> Default for ResponseMemo<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}
