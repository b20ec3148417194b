//! Transaction (order) repository for database operations

use common::error::{RepositoryError, RepositoryResult};
use sqlx::{PgPool, QueryBuilder};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    models::{Transaction, TransactionItem, TransactionUpdate},
    query::{ListParams, ListQuery, Page, SortSpec},
};

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("created_at", "t.created_at"),
        ("order_number", "t.order_number"),
        ("total", "total"),
    ],
    default: "created_at",
};

const SEARCH: [&str; 3] = ["t.order_number", "u.fullname", "u.email"];

// The total is never stored: base price plus size surcharge, times quantity
const SELECT_TRANSACTION: &str = r#"
    SELECT t.id, t.order_number, t.user_id,
           u.fullname AS customer_name, u.email AS customer_email,
           t.status_id, ts.name AS status,
           t.payment_method_id, pm.name AS payment_method,
           t.shipping_method_id, sm.name AS shipping_method,
           COALESCE((
               SELECT SUM((p.price::BIGINT + COALESCE(s.additional_price, 0)) * ti.quantity)
               FROM transaction_items ti
               JOIN products p ON p.id = ti.product_id
               LEFT JOIN sizes s ON s.id = ti.size_id
               WHERE ti.transaction_id = t.id
           ), 0)::BIGINT AS total,
           t.created_at, t.updated_at
    FROM transactions t
    JOIN users u ON u.id = t.user_id
    JOIN transaction_statuses ts ON ts.id = t.status_id
    JOIN payment_methods pm ON pm.id = t.payment_method_id
    JOIN shipping_methods sm ON sm.id = t.shipping_method_id"#;

#[derive(Clone)]
pub struct TransactionRepository {
    pool: PgPool,
}

impl TransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, params: &ListParams) -> RepositoryResult<Page<Transaction>> {
        let query = ListQuery::resolve(params, &SORT);

        let mut builder = QueryBuilder::new(SELECT_TRANSACTION);
        query.push_search(&mut builder, " WHERE ", &SEARCH);
        query.push_order_and_page(&mut builder);
        let rows = builder
            .build_query_as::<Transaction>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::new(
            "SELECT COUNT(*) FROM transactions t JOIN users u ON u.id = t.user_id",
        );
        query.push_search(&mut count, " WHERE ", &SEARCH);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut items = Vec::with_capacity(rows.len());
        for transaction in rows {
            items.push(self.hydrate(transaction).await);
        }

        Ok(query.into_page(items, total))
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Transaction> {
        let transaction =
            sqlx::query_as::<_, Transaction>(&format!("{} WHERE t.id = $1", SELECT_TRANSACTION))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or(RepositoryError::NotFound)?;

        Ok(self.hydrate(transaction).await)
    }

    /// Replace status, payment method and shipping method
    pub async fn update(&self, id: Uuid, update: &TransactionUpdate) -> RepositoryResult<Transaction> {
        info!("Updating transaction {}", id);

        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status_id = $1, payment_method_id = $2, shipping_method_id = $3,
                updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(update.status_id)
        .bind(update.payment_method_id)
        .bind(update.shipping_method_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get(id).await
    }

    pub async fn update_status(&self, id: Uuid, status_id: Uuid) -> RepositoryResult<Transaction> {
        info!("Updating status of transaction {} to {}", id, status_id);

        let result = sqlx::query(
            "UPDATE transactions SET status_id = $1, updated_at = now() WHERE id = $2",
        )
        .bind(status_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        self.get(id).await
    }

    /// Delete the line items, then the order
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        info!("Deleting transaction {}", id);

        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM transaction_items WHERE transaction_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e).on_delete())?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    async fn hydrate(&self, mut transaction: Transaction) -> Transaction {
        transaction.items = self.items_for(transaction.id).await.unwrap_or_else(|e| {
            warn!("Failed to load items for transaction {}: {}", transaction.id, e);
            Vec::new()
        });
        transaction
    }

    async fn items_for(&self, transaction_id: Uuid) -> Result<Vec<TransactionItem>, sqlx::Error> {
        sqlx::query_as::<_, TransactionItem>(
            r#"
            SELECT ti.product_id, p.title, s.name AS size, ti.quantity,
                   p.price::BIGINT + COALESCE(s.additional_price, 0) AS unit_price
            FROM transaction_items ti
            JOIN products p ON p.id = ti.product_id
            LEFT JOIN sizes s ON s.id = ti.size_id
            WHERE ti.transaction_id = $1
            ORDER BY p.title
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
    }
}
