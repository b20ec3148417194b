use chrono::{DateTime, Utc};
use common::error::FieldErrors;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::lookup::Size;
use crate::multipart::FormData;

pub const MAX_TITLE_LEN: usize = 255;

/// Product with its visible images and available sizes
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub stock: i32,
    pub category_id: Option<Uuid>,
    pub category: Option<String>,
    pub variant_id: Option<Uuid>,
    pub variant: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub images: Vec<ProductImage>,
    #[sqlx(skip)]
    pub sizes: Vec<Size>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProductImage {
    pub id: Uuid,
    pub filename: String,
    /// Filled in by the handler from the image store
    #[sqlx(skip)]
    pub url: String,
    pub created_at: DateTime<Utc>,
}

/// Validated product form; every scalar column is replaced on update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub title: String,
    pub description: String,
    pub price: i32,
    pub stock: i32,
    pub category_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub size_ids: Vec<Uuid>,
}

impl ProductInput {
    pub fn from_form(form: &FormData) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = form.required_text("title", "Title", &mut errors);
        if title.chars().count() > MAX_TITLE_LEN {
            errors.add(
                "title",
                format!("Title must be at most {} characters", MAX_TITLE_LEN),
            );
        }
        let description = form.text("description").unwrap_or_default().to_string();

        let price = form.integer("price", "Price", &mut errors);
        if price.is_none() {
            errors.add("price", "Price is required");
        }
        let stock = form.integer("stock", "Stock", &mut errors);

        let category_id = form.uuid("category_id", "Category", &mut errors);
        if category_id.is_none() {
            errors.add("category_id", "Category is required");
        }
        let variant_id = form.uuid("variant_id", "Variant", &mut errors);
        let size_ids = form.uuids("size_ids", "Sizes", &mut errors);

        match (price, category_id) {
            (Some(price), Some(category_id)) if errors.is_empty() => Ok(Self {
                title,
                description,
                price,
                stock: stock.unwrap_or(0),
                category_id,
                variant_id,
                size_ids,
            }),
            _ => Err(errors),
        }
    }
}
