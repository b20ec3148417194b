//! Reference tables: sizes, variants, statuses, payment and shipping methods

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Row of a name-only reference table
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LookupItem {
    pub id: Uuid,
    pub name: String,
}

/// Cup size with its surcharge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Size {
    pub id: Uuid,
    pub name: String,
    pub additional_price: i32,
}
