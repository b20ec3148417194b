//! Read-only access to the reference tables

use common::error::RepositoryResult;
use sqlx::PgPool;

use crate::models::{LookupItem, Size};

/// Name-only reference tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupTable {
    Variants,
    TransactionStatuses,
    PaymentMethods,
    ShippingMethods,
}

impl LookupTable {
    fn table(&self) -> &'static str {
        match self {
            LookupTable::Variants => "variants",
            LookupTable::TransactionStatuses => "transaction_statuses",
            LookupTable::PaymentMethods => "payment_methods",
            LookupTable::ShippingMethods => "shipping_methods",
        }
    }
}

#[derive(Clone)]
pub struct LookupRepository {
    pool: PgPool,
}

impl LookupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn sizes(&self) -> RepositoryResult<Vec<Size>> {
        let sizes = sqlx::query_as::<_, Size>(
            "SELECT id, name, additional_price FROM sizes ORDER BY additional_price, name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(sizes)
    }

    pub async fn list(&self, table: LookupTable) -> RepositoryResult<Vec<LookupItem>> {
        let sql = format!("SELECT id, name FROM {} ORDER BY name", table.table());
        let items = sqlx::query_as::<_, LookupItem>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(items)
    }
}
