use chrono::FixedOffset;
use client::{InFlightRegistry, RequestKey, RequestToken};
use models::tenant::TenantInfo;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::dashboard::{group_by_column, BoardColumn, DashboardOrder, OrderFilter};
use super::service::OrderService;
use crate::endpoints;
use crate::i18n::{user_message, Locale};
use crate::loading::LoadingFlag;
use crate::tenant_service::TenantService;

/// Result of one order fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A previous fetch was still pending; nothing was sent.
    Skipped,
    /// The fetched orders replaced the board.
    Applied,
    /// A newer fetch superseded this one; its result was dropped.
    Stale,
    /// The fetch failed and the error message was recorded.
    Failed,
}

/// Live order board for the current tenant.
///
/// Fetches go through an [`InFlightRegistry`]: a tick that arrives while the
/// previous fetch is still pending is skipped, and only the latest fetch may
/// update the board.
pub struct OrderBoard {
    orders_api: OrderService,
    tenants: TenantService,
    registry: InFlightRegistry,
    key: RequestKey,
    offset: FixedOffset,
    locale: Locale,
    orders: RwLock<Vec<DashboardOrder>>,
    error: RwLock<Option<String>>,
    tenant: RwLock<Option<TenantInfo>>,
    loading: LoadingFlag,
    tenant_loading: LoadingFlag,
}

impl OrderBoard {
    pub fn new(orders_api: OrderService, tenants: TenantService, offset: FixedOffset, locale: Locale) -> Self {
        Self {
            orders_api,
            tenants,
            registry: InFlightRegistry::new(),
            key: RequestKey::new(endpoints::ORDERS, &[]),
            offset,
            locale,
            orders: RwLock::new(Vec::new()),
            error: RwLock::new(None),
            tenant: RwLock::new(None),
            loading: LoadingFlag::new(true),
            tenant_loading: LoadingFlag::new(true),
        }
    }

    /// Periodic fetch; does nothing while another fetch is pending.
    pub async fn fetch_orders(&self) -> FetchOutcome {
        match self.registry.try_begin(&self.key) {
            Some(token) => self.run_fetch(token).await,
            None => {
                debug!("order fetch skipped; previous still pending");
                FetchOutcome::Skipped
            }
        }
    }

    /// Manual refetch; any fetch still pending becomes stale.
    pub async fn refetch_orders(&self) -> FetchOutcome {
        let token = self.registry.supersede(&self.key);
        self.run_fetch(token).await
    }

    async fn run_fetch(&self, token: RequestToken) -> FetchOutcome {
        let _loading = self.loading.begin();
        let result = self.orders_api.list().await;
        if !self.registry.finish(&self.key, token, result.is_ok()) {
            return FetchOutcome::Stale;
        }
        match result {
            Ok(list) => {
                let cards: Vec<DashboardOrder> =
                    list.iter().map(|o| DashboardOrder::from_backend(o, &self.offset)).collect();
                debug!(count = cards.len(), generation = token.generation(), "order_board_updated");
                *self.orders.write().await = cards;
                *self.error.write().await = None;
                FetchOutcome::Applied
            }
            Err(e) => {
                let message = user_message(self.locale, &e);
                warn!(status = ?e.status(), error_code = ?e.error_code(), %message, "order fetch failed");
                *self.error.write().await = Some(message);
                FetchOutcome::Failed
            }
        }
    }

    /// Load the tenant header. Failures are logged and leave the tenant unset.
    pub async fn load_tenant(&self) -> Option<TenantInfo> {
        let _loading = self.tenant_loading.begin();
        match self.tenants.current().await {
            Ok(tenant) => {
                *self.tenant.write().await = Some(tenant.clone());
                Some(tenant)
            }
            Err(e) => {
                warn!(error = %e, "failed to load tenant info");
                None
            }
        }
    }

    pub async fn orders(&self) -> Vec<DashboardOrder> {
        self.orders.read().await.clone()
    }

    pub async fn filtered(&self, filter: &OrderFilter) -> Vec<DashboardOrder> {
        filter.apply(&self.orders.read().await)
    }

    pub async fn columns(&self, filter: &OrderFilter) -> Vec<(BoardColumn, Vec<DashboardOrder>)> {
        group_by_column(&self.filtered(filter).await)
    }

    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    pub async fn tenant(&self) -> Option<TenantInfo> {
        self.tenant.read().await.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub fn is_tenant_loading(&self) -> bool {
        self.tenant_loading.is_loading()
    }
}
