//! Idempotency-key deduplication for document requests.
//!
//! A key is held for `ttl` after it is first acquired; a second acquire of the
//! same key inside that window is rejected. Expired entries are swept lazily on
//! every acquire.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

pub struct RequestDeduplicator {
    ttl: Duration,
    seen: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl RequestDeduplicator {
    pub fn new(ttl: std::time::Duration) -> Self {
        Self {
            ttl: Duration::from_std(ttl).unwrap_or_else(|_| Duration::seconds(30)),
            seen: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` when the caller owns `key` for the next `ttl`.
    pub fn try_acquire(&self, key: &str) -> bool {
        self.try_acquire_at(key, Utc::now())
    }

    pub fn try_acquire_at(&self, key: &str, now: DateTime<Utc>) -> bool {
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        seen.retain(|_, expires_at| *expires_at > now);

        if seen.contains_key(key) {
            debug!("Duplicate request for idempotency key {key}");
            return false;
        }
        seen.insert(key.to_string(), now + self.ttl);
        true
    }

    /// Frees `key` early, e.g. after the request it guarded failed.
    pub fn release(&self, key: &str) {
        let mut seen = match self.seen.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        seen.remove(key);
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.seen.lock().map(|s| s.len()).unwrap_or(0)
    }
}
