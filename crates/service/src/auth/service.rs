use std::sync::Arc;

use client::{ApiClient, RequestOptions};
use models::user::{AuthResponse, LoginCredentials, UserSummary};
use serde::de::IgnoredAny;
use tracing::{info, instrument, warn};

use super::state::SessionState;
use crate::endpoints;
use crate::errors::ServiceError;
use crate::session::SessionContext;

/// Login, logout and session refresh for the merchant admin.
///
/// The lifecycle state lives in the shared [`SessionContext`], so a
/// registration or a second service on the same session is reflected here.
pub struct AuthService {
    api: ApiClient,
    session: Arc<SessionContext>,
}

impl AuthService {
    pub fn new(api: ApiClient, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Authenticate and persist the returned user and tenant slug.
    ///
    /// Credentials are checked locally first; nothing is sent for an
    /// obviously invalid email or an empty password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use client::ApiClient;
    /// use configs::ApiConfig;
    /// use models::user::LoginCredentials;
    /// use service::auth::{AuthService, SessionState};
    /// use service::errors::ServiceError;
    /// use service::session::SessionContext;
    ///
    /// let session = Arc::new(SessionContext::in_memory());
    /// let api = ApiClient::new(&ApiConfig::default(), session.clone()).unwrap();
    /// let auth = AuthService::new(api, session);
    /// let err = tokio_test::block_on(auth.login(LoginCredentials::new("not-an-email", "x"))).unwrap_err();
    /// assert!(matches!(err, ServiceError::Validation(_)));
    /// assert_eq!(auth.state(), SessionState::Anonymous);
    /// ```
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: LoginCredentials) -> Result<AuthResponse, ServiceError> {
        credentials.validate()?;
        self.session.begin_authenticating();

        let response = match self
            .api
            .post::<AuthResponse, _>(endpoints::LOGIN, &credentials, RequestOptions::default())
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(status = ?e.status(), error_code = ?e.error_code(), "login_failed");
                self.fall_back_to_anonymous();
                return Err(e.into());
            }
        };

        if let Err(e) = self.session.set_session(&response.user, response.tenant_identifier()) {
            self.fall_back_to_anonymous();
            return Err(e.into());
        }
        info!(user_id = %response.user.id, tenant = ?response.tenant_identifier(), "login_succeeded");
        Ok(response)
    }

    /// Best-effort remote logout followed by an unconditional local clear.
    ///
    /// Only a failure to clear local storage is returned, and only after
    /// every key has been attempted.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<(), ServiceError> {
        if let Err(e) = self
            .api
            .post_empty::<IgnoredAny>(endpoints::LOGOUT, RequestOptions::default())
            .await
        {
            warn!(error = %e, "remote logout failed; clearing local session anyway");
        }
        self.session.clear_session()?;
        info!("logged_out");
        Ok(())
    }

    /// Renew the cookie session. Any remote failure logs out and yields `None`;
    /// a local clear that only partly succeeded is logged, not returned.
    #[instrument(skip(self))]
    pub async fn refresh_session(&self) -> Result<Option<AuthResponse>, ServiceError> {
        match self
            .api
            .post_empty::<AuthResponse>(endpoints::REFRESH, RequestOptions::default())
            .await
        {
            Ok(response) => {
                if let Err(e) = self.session.set_session(&response.user, response.tenant_identifier()) {
                    self.fall_back_to_anonymous();
                    return Err(e.into());
                }
                info!(user_id = %response.user.id, "session_refreshed");
                Ok(Some(response))
            }
            Err(e) => {
                warn!(status = ?e.status(), error = %e, "session refresh failed; logging out");
                if let Err(e) = self.logout().await {
                    warn!(error = %e, "local session only partly cleared after failed refresh");
                }
                Ok(None)
            }
        }
    }

    pub fn current_user(&self) -> Option<UserSummary> {
        self.session.cached_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.cached_user().is_some()
    }

    fn fall_back_to_anonymous(&self) {
        if let Err(e) = self.session.clear_cached_user() {
            warn!(error = %e, "could not drop cached user");
        }
    }
}
