use reqwest::multipart::{Form, Part};

use crate::error::ApiError;

#[derive(Debug, Clone)]
struct FilePart {
    field: String,
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// Multipart body for upload endpoints.
///
/// Kept as plain data until send time so it can be inspected and cloned.
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<(String, String)>,
    files: Vec<FilePart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((name.into(), value.to_string()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(FilePart {
            field: field.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        });
        self
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .map(|(k, _)| k.as_str())
            .chain(self.files.iter().map(|f| f.field.as_str()))
    }

    pub(crate) fn into_form(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.fields {
            form = form.text(name, value);
        }
        for file in self.files {
            let part = Part::bytes(file.bytes)
                .file_name(file.file_name)
                .mime_str(&file.content_type)
                .map_err(|e| ApiError::InvalidRequest(format!("content type {}: {e}", file.content_type)))?;
            form = form.part(file.field, part);
        }
        Ok(form)
    }
}
