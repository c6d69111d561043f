//! Registry of in-flight requests keyed by endpoint and parameters.
//!
//! Used to skip a polling tick while the previous fetch is still pending and
//! to drop results from requests that a newer one has superseded.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey(String);

impl RequestKey {
    /// Parameters are sorted so their order does not change the key.
    pub fn new(path: &str, params: &[(String, String)]) -> Self {
        if params.is_empty() {
            return Self(path.to_string());
        }
        let mut sorted: Vec<_> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
        sorted.sort();
        Self(format!("{path}?{}", sorted.join("&")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Idle,
    Pending(RequestToken),
    Resolved,
    Rejected,
}

#[derive(Debug, Default)]
pub struct InFlightRegistry {
    entries: DashMap<RequestKey, RequestState>,
    next: AtomicU64,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&self) -> RequestToken {
        RequestToken(self.next.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn state(&self, key: &RequestKey) -> RequestState {
        self.entries.get(key).map(|s| *s).unwrap_or(RequestState::Idle)
    }

    /// Start a request unless one is already pending for `key`.
    pub fn try_begin(&self, key: &RequestKey) -> Option<RequestToken> {
        let mut entry = self.entries.entry(key.clone()).or_insert(RequestState::Idle);
        if let RequestState::Pending(current) = *entry {
            debug!(key = key.as_str(), generation = current.generation(), "request_still_pending");
            return None;
        }
        let token = self.issue();
        *entry = RequestState::Pending(token);
        Some(token)
    }

    /// Start a request that replaces whatever is pending for `key`.
    pub fn supersede(&self, key: &RequestKey) -> RequestToken {
        let token = self.issue();
        self.entries.insert(key.clone(), RequestState::Pending(token));
        token
    }

    pub fn is_current(&self, key: &RequestKey, token: RequestToken) -> bool {
        self.state(key) == RequestState::Pending(token)
    }

    /// Record the outcome. Returns `false` when `token` is stale and its
    /// result must not be applied.
    pub fn finish(&self, key: &RequestKey, token: RequestToken, ok: bool) -> bool {
        let Some(mut entry) = self.entries.get_mut(key) else {
            return false;
        };
        if *entry != RequestState::Pending(token) {
            debug!(key = key.as_str(), generation = token.generation(), "stale_result_dropped");
            return false;
        }
        *entry = if ok { RequestState::Resolved } else { RequestState::Rejected };
        true
    }

    pub fn reset(&self, key: &RequestKey) {
        self.entries.remove(key);
    }
}
