use client::{ApiClient, MultipartForm, RequestOptions};
use models::category::{Category, CreateCategoryInput, ToggleActiveBody};
use tracing::{debug, info, instrument};

use crate::endpoints;
use crate::errors::ServiceError;

/// Tenant-scoped category management. Every call needs a tenant in session.
#[derive(Clone)]
pub struct CategoryService {
    api: ApiClient,
}

impl CategoryService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Category>, ServiceError> {
        let categories: Vec<Category> = self
            .api
            .get(endpoints::CATEGORIES, RequestOptions::tenant_required())
            .await?;
        debug!(count = categories.len(), "categories_listed");
        Ok(categories)
    }

    /// Multipart create: `name`, then `image` and `openingHours` when present.
    #[instrument(skip(self, input), fields(name = %input.name, with_image = input.image.is_some()))]
    pub async fn create(&self, input: CreateCategoryInput) -> Result<Category, ServiceError> {
        input.validate()?;
        let mut form = MultipartForm::new().text("name", input.name.trim());
        if let Some(image) = input.image {
            form = form.file("image", image.file_name, image.content_type, image.bytes);
        }
        if let Some(hours) = input.opening_hours.filter(|h| !h.trim().is_empty()) {
            form = form.text("openingHours", hours);
        }
        let created: Category = self
            .api
            .upload(endpoints::CATEGORIES, form, RequestOptions::tenant_required())
            .await?;
        info!(category_id = %created.id, "category_created");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn set_active(&self, id: &str, is_active: bool) -> Result<Category, ServiceError> {
        let updated: Category = self
            .api
            .patch(
                &endpoints::category_active(id),
                &ToggleActiveBody { is_active },
                RequestOptions::tenant_required(),
            )
            .await?;
        info!(category_id = %updated.id, is_active = updated.is_active, "category_toggled");
        Ok(updated)
    }
}
