//! Client-side session: tenant identifier, cached user and backend cookies.
//!
//! The tenant identifier and the backend's cookie jar live in a cookie-like
//! medium, the cached user in a persistent key-value medium. Either medium
//! may be missing (e.g. when rendering ahead of time); reads then return
//! `None` and writes are no-ops. The context also owns the auth lifecycle
//! state, so every service sharing it sees the same state. It is passed
//! explicitly to the services that need it.

use std::sync::Arc;

use arc_swap::ArcSwap;
use client::{CookiePersistence, PersistError, TenantSource};
use configs::SessionConfig;
use models::user::UserSummary;
use tracing::{debug, warn};

use crate::auth::SessionState;
use crate::errors::SessionError;
use crate::storage::MemoryMedium;

/// Keys left behind by the token-in-storage scheme; removed on every clear.
const LEGACY_TOKEN_KEYS: [&str; 2] = ["accessToken", "refreshToken"];

/// Cookie-medium key holding the backend's cookies as a JSON object.
pub const COOKIE_JAR_KEY: &str = "cookieJar";

/// String key-value medium. A single `set`/`remove` must be atomic.
pub trait SessionMedium: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionKeys {
    pub tenant_cookie: String,
    pub user_key: String,
}

impl Default for SessionKeys {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionKeys {
    fn from(cfg: &SessionConfig) -> Self {
        Self { tenant_cookie: cfg.tenant_cookie.clone(), user_key: cfg.user_key.clone() }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub tenant_identifier: Option<String>,
    pub cached_user: Option<UserSummary>,
}

pub struct SessionContext {
    cookies: Option<Arc<dyn SessionMedium>>,
    storage: Option<Arc<dyn SessionMedium>>,
    keys: SessionKeys,
    state: ArcSwap<SessionState>,
}

impl SessionContext {
    pub fn new(
        cookies: Option<Arc<dyn SessionMedium>>,
        storage: Option<Arc<dyn SessionMedium>>,
        keys: SessionKeys,
    ) -> Self {
        let ctx = Self { cookies, storage, keys, state: ArcSwap::from_pointee(SessionState::Anonymous) };
        ctx.settle_state();
        ctx
    }

    /// Cookie and storage share one medium, as with a single session file.
    pub fn shared(medium: Arc<dyn SessionMedium>, keys: SessionKeys) -> Self {
        Self::new(Some(medium.clone()), Some(medium), keys)
    }

    pub fn in_memory() -> Self {
        let cookies: Arc<dyn SessionMedium> = Arc::new(MemoryMedium::new());
        let storage: Arc<dyn SessionMedium> = Arc::new(MemoryMedium::new());
        Self::new(Some(cookies), Some(storage), SessionKeys::default())
    }

    /// No medium at all: every read is `None`, every write a no-op.
    pub fn detached() -> Self {
        Self::new(None, None, SessionKeys::default())
    }

    pub fn keys(&self) -> &SessionKeys {
        &self.keys
    }

    pub fn tenant_identifier(&self) -> Option<String> {
        self.cookies
            .as_ref()?
            .get(&self.keys.tenant_cookie)
            .filter(|t| !t.trim().is_empty())
    }

    /// Decode failures are logged and reported as no cached user.
    pub fn cached_user(&self) -> Option<UserSummary> {
        let raw = self.storage.as_ref()?.get(&self.keys.user_key)?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(key = %self.keys.user_key, error = %e, "cached user could not be decoded");
                None
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state.load().as_ref().clone()
    }

    /// Marks a login or registration as in flight.
    pub(crate) fn begin_authenticating(&self) {
        self.state.store(Arc::new(SessionState::Authenticating));
    }

    /// Leave any transitional state: `Authenticated` when a user is cached,
    /// `Anonymous` otherwise.
    pub(crate) fn settle_state(&self) {
        let next = match self.cached_user() {
            Some(user) => SessionState::Authenticated(user),
            None => SessionState::Anonymous,
        };
        self.state.store(Arc::new(next));
    }

    pub fn set_session(&self, user: &UserSummary, tenant_identifier: Option<&str>) -> Result<(), SessionError> {
        if let Some(storage) = &self.storage {
            let encoded = serde_json::to_string(user).map_err(|e| SessionError::Encode(e.to_string()))?;
            storage.set(&self.keys.user_key, &encoded)?;
        }
        self.state.store(Arc::new(SessionState::Authenticated(user.clone())));
        if let Some(tenant) = tenant_identifier {
            self.set_tenant_identifier(tenant)?;
        }
        debug!(user_id = %user.id, "session_stored");
        Ok(())
    }

    pub fn set_tenant_identifier(&self, tenant_identifier: &str) -> Result<(), SessionError> {
        if let Some(cookies) = &self.cookies {
            cookies.set(&self.keys.tenant_cookie, tenant_identifier)?;
        }
        Ok(())
    }

    /// The state drops to `Anonymous` even if the medium refuses the removal.
    pub fn clear_cached_user(&self) -> Result<(), SessionError> {
        self.state.store(Arc::new(SessionState::Anonymous));
        if let Some(storage) = &self.storage {
            storage.remove(&self.keys.user_key)?;
        }
        Ok(())
    }

    /// Remove everything the session ever wrote. Safe on an empty session.
    ///
    /// Every key is attempted; the first failure is returned once all
    /// removals have run.
    pub fn clear_session(&self) -> Result<(), SessionError> {
        self.state.store(Arc::new(SessionState::Anonymous));
        let mut first_err = None;
        let mut remove = |medium: &Arc<dyn SessionMedium>, key: &str| {
            if let Err(e) = medium.remove(key) {
                warn!(key, error = %e, "session key could not be removed");
                first_err.get_or_insert(e);
            }
        };
        if let Some(storage) = &self.storage {
            remove(storage, self.keys.user_key.as_str());
            for key in LEGACY_TOKEN_KEYS {
                remove(storage, key);
            }
        }
        if let Some(cookies) = &self.cookies {
            remove(cookies, self.keys.tenant_cookie.as_str());
            remove(cookies, COOKIE_JAR_KEY);
        }
        match first_err {
            Some(e) => Err(e),
            None => {
                debug!("session_cleared");
                Ok(())
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot { tenant_identifier: self.tenant_identifier(), cached_user: self.cached_user() }
    }
}

impl TenantSource for SessionContext {
    fn tenant_identifier(&self) -> Option<String> {
        SessionContext::tenant_identifier(self)
    }
}

/// Backend cookies go to the cookie medium; without one they are not kept.
impl CookiePersistence for SessionContext {
    fn load_cookies(&self) -> Option<String> {
        self.cookies.as_ref()?.get(COOKIE_JAR_KEY)
    }

    fn save_cookies(&self, encoded: &str) -> Result<(), PersistError> {
        if let Some(cookies) = &self.cookies {
            cookies.set(COOKIE_JAR_KEY, encoded)?;
        }
        Ok(())
    }
}
