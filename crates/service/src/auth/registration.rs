use std::sync::Arc;

use client::{ApiClient, RequestOptions};
use models::user::{RegisterInput, RegisterResponse};
use tracing::{info, instrument, warn};

use crate::endpoints;
use crate::errors::ServiceError;
use crate::session::SessionContext;

/// Public merchant sign-up. Creates the tenant and its first admin user.
pub struct RegistrationService {
    api: ApiClient,
    session: Arc<SessionContext>,
}

impl RegistrationService {
    pub fn new(api: ApiClient, session: Arc<SessionContext>) -> Self {
        Self { api, session }
    }

    /// On success the new tenant's slug becomes the session tenant, and the
    /// user is cached when the backend returns one.
    ///
    /// The shared session state is `Authenticating` while the request runs.
    /// A returned user ends `Authenticated`. Otherwise, errors included, the
    /// state settles on the cached user, which is `Anonymous` for a visitor.
    #[instrument(skip(self, input), fields(email = %input.email, tenant_name = %input.tenant_name))]
    pub async fn register(&self, input: RegisterInput) -> Result<RegisterResponse, ServiceError> {
        let input = input.normalized()?;
        self.session.begin_authenticating();
        let response: RegisterResponse =
            match self.api.post(endpoints::REGISTER, &input, RequestOptions::default()).await {
                Ok(r) => r,
                Err(e) => {
                    warn!(status = ?e.status(), error_code = ?e.error_code(), "registration_failed");
                    self.session.settle_state();
                    return Err(e.into());
                }
            };

        let slug = response.tenant.as_ref().map(|t| t.slug.as_str()).filter(|s| !s.trim().is_empty());
        let stored = match (&response.user, slug) {
            (Some(user), _) => self.session.set_session(user, slug),
            (None, Some(slug)) => self.session.set_tenant_identifier(slug),
            (None, None) => Ok(()),
        };
        if response.user.is_none() || stored.is_err() {
            self.session.settle_state();
        }
        stored?;
        info!(tenant = ?slug, user_returned = response.user.is_some(), "tenant_registered");
        Ok(response)
    }
}
