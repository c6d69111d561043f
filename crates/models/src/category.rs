use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// Largest image accepted for a category upload.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
}

#[derive(Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CreateCategoryInput {
    pub name: String,
    pub image: Option<ImageUpload>,
    pub opening_hours: Option<String>,
}

impl CreateCategoryInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::Validation("category name required".into()));
        }
        if let Some(image) = &self.image {
            if image.bytes.len() > MAX_IMAGE_BYTES {
                return Err(ModelError::Validation("image larger than 5MB".into()));
            }
            if !ALLOWED_IMAGE_TYPES.contains(&image.content_type.as_str()) {
                return Err(ModelError::Validation(format!("unsupported image type {}", image.content_type)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleActiveBody {
    pub is_active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only_input_is_valid() {
        assert!(CreateCategoryInput::named("Bebidas").validate().is_ok());
        assert!(CreateCategoryInput::named("  ").validate().is_err());
    }

    #[test]
    fn image_constraints_enforced() {
        let mut input = CreateCategoryInput::named("Lanches");
        input.image = Some(ImageUpload { file_name: "a.gif".into(), content_type: "image/gif".into(), bytes: vec![0; 10] });
        assert!(input.validate().is_err());
        input.image = Some(ImageUpload { file_name: "a.png".into(), content_type: "image/png".into(), bytes: vec![0; MAX_IMAGE_BYTES + 1] });
        assert!(input.validate().is_err());
        input.image = Some(ImageUpload { file_name: "a.png".into(), content_type: "image/png".into(), bytes: vec![0; 16] });
        assert!(input.validate().is_ok());
    }

    #[test]
    fn toggle_body_is_camel_case() {
        let v = serde_json::to_value(ToggleActiveBody { is_active: false }).unwrap();
        assert_eq!(v, serde_json::json!({"isActive": false}));
    }
}
