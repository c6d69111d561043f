use client::{ApiClient, RequestOptions};
use models::order::BackendOrder;
use tracing::{debug, instrument};

use crate::endpoints;
use crate::errors::ServiceError;

#[derive(Clone)]
pub struct OrderService {
    api: ApiClient,
}

impl OrderService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<BackendOrder>, ServiceError> {
        let orders: Option<Vec<BackendOrder>> = self
            .api
            .get(endpoints::ORDERS, RequestOptions::tenant_required())
            .await?;
        let orders = orders.unwrap_or_default();
        debug!(count = orders.len(), "orders_listed");
        Ok(orders)
    }
}
