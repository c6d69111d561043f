use models::category::{Category, CreateCategoryInput};
use tokio::sync::RwLock;
use tracing::warn;

use super::service::CategoryService;
use crate::errors::ServiceError;
use crate::i18n::{user_message, Locale};
use crate::loading::LoadingFlag;

/// Category list as shown on the admin page, with its loading and error state.
///
/// The list changes only after the backend confirms a mutation; a failed
/// create or toggle leaves it exactly as it was.
pub struct CategoryBoard {
    service: CategoryService,
    locale: Locale,
    categories: RwLock<Vec<Category>>,
    error: RwLock<Option<String>>,
    loading: LoadingFlag,
}

impl CategoryBoard {
    pub fn new(service: CategoryService, locale: Locale) -> Self {
        Self {
            service,
            locale,
            categories: RwLock::new(Vec::new()),
            error: RwLock::new(None),
            loading: LoadingFlag::default(),
        }
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.categories.read().await.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_loading()
    }

    pub async fn refresh(&self) -> Result<(), ServiceError> {
        let _loading = self.loading.begin();
        self.clear_error().await;
        match self.service.list().await {
            Ok(list) => {
                *self.categories.write().await = list;
                Ok(())
            }
            Err(e) => Err(self.record(e).await),
        }
    }

    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category, ServiceError> {
        self.clear_error().await;
        match self.service.create(input).await {
            Ok(created) => {
                self.categories.write().await.push(created.clone());
                Ok(created)
            }
            Err(e) => Err(self.record(e).await),
        }
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<Category, ServiceError> {
        self.clear_error().await;
        match self.service.set_active(id, is_active).await {
            Ok(updated) => {
                let mut list = self.categories.write().await;
                if let Some(slot) = list.iter_mut().find(|c| c.id == id) {
                    *slot = updated.clone();
                }
                Ok(updated)
            }
            Err(e) => Err(self.record(e).await),
        }
    }

    async fn clear_error(&self) {
        *self.error.write().await = None;
    }

    async fn record(&self, err: ServiceError) -> ServiceError {
        let message = user_message(self.locale, &err);
        warn!(status = ?err.status(), error_code = ?err.error_code(), %message, "category operation failed");
        *self.error.write().await = Some(message);
        err
    }
}
