use chrono::{DateTime, Utc};
use common::error::FieldErrors;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for create and update
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
}

impl CategoryRequest {
    /// Trimmed name, or the field errors
    pub fn validate(&self) -> Result<String, FieldErrors> {
        let name = self.name.trim();
        let mut errors = FieldErrors::new();
        if name.is_empty() {
            errors.add("name", "Name is required");
        } else if name.chars().count() > MAX_NAME_LEN {
            errors.add("name", format!("Name must be at most {} characters", MAX_NAME_LEN));
        }
        errors.into_result().map(|_| name.to_string())
    }
}
