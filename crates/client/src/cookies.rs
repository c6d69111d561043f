//! Cookie store that survives process restarts.
//!
//! The backend keeps its session and refresh tokens in HttpOnly cookies. An
//! in-memory jar loses them when the process exits, so this store keeps the
//! `name -> value` pairs as one JSON object in a [`CookiePersistence`]
//! backend and re-reads it on every request. The client only ever talks to
//! one backend, so domain and path attributes are not tracked.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use reqwest::Url;
use tracing::{debug, warn};

pub type PersistError = Box<dyn std::error::Error + Send + Sync>;

/// Durable slot holding the encoded cookie jar.
pub trait CookiePersistence: Send + Sync {
    fn load_cookies(&self) -> Option<String>;
    fn save_cookies(&self, encoded: &str) -> Result<(), PersistError>;
}

pub struct PersistentCookies {
    backend: Arc<dyn CookiePersistence>,
}

impl PersistentCookies {
    pub fn new(backend: Arc<dyn CookiePersistence>) -> Self {
        Self { backend }
    }

    fn jar(&self) -> BTreeMap<String, String> {
        let Some(raw) = self.backend.load_cookies() else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "stored cookies could not be decoded; starting empty");
            BTreeMap::new()
        })
    }
}

impl CookieStore for PersistentCookies {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {
        let mut jar = self.jar();
        let mut changed = false;
        for header in cookie_headers {
            let Some(cookie) = header.to_str().ok().and_then(SetCookie::parse) else {
                continue;
            };
            if cookie.expired {
                changed |= jar.remove(cookie.name).is_some();
            } else if jar.get(cookie.name).map(String::as_str) != Some(cookie.value) {
                jar.insert(cookie.name.to_string(), cookie.value.to_string());
                changed = true;
            }
        }
        if !changed {
            return;
        }
        match serde_json::to_string(&jar) {
            Ok(encoded) => {
                if let Err(e) = self.backend.save_cookies(&encoded) {
                    warn!(error = %e, "cookies could not be persisted");
                } else {
                    debug!(count = jar.len(), "cookies_persisted");
                }
            }
            Err(e) => warn!(error = %e, "cookies could not be encoded"),
        }
    }

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        let jar = self.jar();
        if jar.is_empty() {
            return None;
        }
        let header = jar
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        HeaderValue::from_str(&header).ok()
    }
}

/// The parts of a `Set-Cookie` header the store cares about.
struct SetCookie<'a> {
    name: &'a str,
    value: &'a str,
    expired: bool,
}

impl<'a> SetCookie<'a> {
    fn parse(raw: &'a str) -> Option<Self> {
        let mut parts = raw.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let value = value.trim().trim_matches('"');
        let max_age_gone = parts.filter_map(|attr| attr.split_once('=')).any(|(k, v)| {
            k.trim().eq_ignore_ascii_case("max-age") && v.trim().parse::<i64>().map_or(false, |age| age <= 0)
        });
        Some(Self { name, value, expired: value.is_empty() || max_age_gone })
    }
}
