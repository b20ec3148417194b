use chrono::{DateTime, Utc};
use common::error::FieldErrors;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Order header; `total` is aggregated from the line items on every read
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub customer_name: String,
    pub customer_email: String,
    pub status_id: Uuid,
    pub status: String,
    pub payment_method_id: Uuid,
    pub payment_method: String,
    pub shipping_method_id: Uuid,
    pub shipping_method: String,
    pub total: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    pub items: Vec<TransactionItem>,
}

/// Line item projection joined through products and sizes
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionItem {
    pub product_id: Uuid,
    pub title: String,
    pub size: Option<String>,
    pub quantity: i32,
    /// Base price plus the size surcharge
    pub unit_price: i64,
}

/// Body for `PATCH /admin/transactions/:id`
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionUpdateRequest {
    pub status_id: Option<Uuid>,
    pub payment_method_id: Option<Uuid>,
    pub shipping_method_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionUpdate {
    pub status_id: Uuid,
    pub payment_method_id: Uuid,
    pub shipping_method_id: Uuid,
}

impl TransactionUpdateRequest {
    pub fn validate(&self) -> Result<TransactionUpdate, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.status_id.is_none() {
            errors.add("status_id", "Status is required");
        }
        if self.payment_method_id.is_none() {
            errors.add("payment_method_id", "Payment method is required");
        }
        if self.shipping_method_id.is_none() {
            errors.add("shipping_method_id", "Shipping method is required");
        }

        match (self.status_id, self.payment_method_id, self.shipping_method_id) {
            (Some(status_id), Some(payment_method_id), Some(shipping_method_id)) => {
                Ok(TransactionUpdate {
                    status_id,
                    payment_method_id,
                    shipping_method_id,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Body for `PATCH /admin/transactions/:id/status`
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdateRequest {
    pub status_id: Option<Uuid>,
}

impl StatusUpdateRequest {
    pub fn validate(&self) -> Result<Uuid, FieldErrors> {
        self.status_id.ok_or_else(|| {
            let mut errors = FieldErrors::new();
            errors.add("status_id", "Status is required");
            errors
        })
    }
}
