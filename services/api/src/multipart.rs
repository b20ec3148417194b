//! Multipart form bodies
//!
//! `FormData` buffers every text part and file part of a request so form
//! fields can be validated together and reported as one field-keyed error
//! map. Names ending in `[]` are treated as their bare name.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use common::error::FieldErrors;
use uuid::Uuid;

use crate::{error::ApiError, storage::Upload};

#[derive(Debug, Default)]
pub struct FormData {
    fields: Vec<(String, String)>,
    files: Vec<Upload>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.fields.push((field_name(name), value.into()));
        self
    }

    pub fn with_file(mut self, mut upload: Upload) -> Self {
        upload.field = field_name(&upload.field);
        self.files.push(upload);
        self
    }

    pub async fn parse(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = FormData::new();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e.body_text())))?
        {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read {}: {}", name, e.body_text()))
                    })?;
                    // Browsers send an empty part for an untouched file input
                    if file_name.is_empty() && bytes.is_empty() {
                        continue;
                    }
                    form = form.with_file(Upload {
                        field: name,
                        file_name,
                        bytes,
                    });
                }
                None => {
                    let value = field.text().await.map_err(|e| {
                        ApiError::BadRequest(format!("Failed to read {}: {}", name, e.body_text()))
                    })?;
                    form = form.with_field(&name, value);
                }
            }
        }

        Ok(form)
    }

    /// First non-blank value of a field, trimmed
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.trim())
            .find(|v| !v.is_empty())
    }

    /// Every value of a repeated field; comma-separated values are split
    pub fn values(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(n, _)| n == name)
            .flat_map(|(_, v)| v.split(','))
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .collect()
    }

    pub fn files(&self, name: &str) -> Vec<&Upload> {
        self.files.iter().filter(|f| f.field == name).collect()
    }

    pub fn required_text(&self, name: &str, label: &str, errors: &mut FieldErrors) -> String {
        match self.text(name) {
            Some(value) => value.to_string(),
            None => {
                errors.add(name, format!("{} is required", label));
                String::new()
            }
        }
    }

    /// Non-negative integer; `None` when absent or invalid
    pub fn integer(&self, name: &str, label: &str, errors: &mut FieldErrors) -> Option<i32> {
        let value = self.text(name)?;
        match value.parse::<i32>() {
            Ok(n) if n >= 0 => Some(n),
            Ok(_) => {
                errors.add(name, format!("{} must not be negative", label));
                None
            }
            Err(_) => {
                errors.add(name, format!("{} must be a whole number", label));
                None
            }
        }
    }

    pub fn uuid(&self, name: &str, label: &str, errors: &mut FieldErrors) -> Option<Uuid> {
        let value = self.text(name)?;
        match Uuid::parse_str(value) {
            Ok(id) => Some(id),
            Err(_) => {
                errors.add(name, format!("{} must be a valid id", label));
                None
            }
        }
    }

    /// Distinct ids in submission order
    pub fn uuids(&self, name: &str, label: &str, errors: &mut FieldErrors) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for value in self.values(name) {
            match Uuid::parse_str(value) {
                Ok(id) if !ids.contains(&id) => ids.push(id),
                Ok(_) => {}
                Err(_) => errors.add(name, format!("{} must contain valid ids", label)),
            }
        }
        ids
    }
}

fn field_name(name: &str) -> String {
    name.strip_suffix("[]").unwrap_or(name).to_string()
}

#[async_trait]
impl<S> FromRequest<S> for FormData
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        FormData::parse(multipart).await
    }
}
