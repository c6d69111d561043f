use client::{ApiClient, RequestOptions};
use models::tenant::TenantInfo;
use tracing::{debug, instrument};

use crate::endpoints;
use crate::errors::ServiceError;

/// Read access to the tenant the session is scoped to.
#[derive(Clone)]
pub struct TenantService {
    api: ApiClient,
}

impl TenantService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<TenantInfo, ServiceError> {
        let tenant: TenantInfo = self
            .api
            .get(endpoints::CURRENT_TENANT, RequestOptions::tenant_required())
            .await?;
        debug!(tenant = %tenant.slug, plan = %tenant.plan, "tenant_loaded");
        Ok(tenant)
    }
}
