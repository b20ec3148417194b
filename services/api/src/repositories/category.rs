//! Category repository for database operations

use common::error::{RepositoryError, RepositoryResult};
use sqlx::{PgPool, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::{
    models::Category,
    query::{ListParams, ListQuery, Page, SortSpec},
};

pub const SORT: SortSpec = SortSpec {
    columns: &[("created_at", "created_at"), ("name", "name")],
    default: "created_at",
};

const SEARCH: [&str; 1] = ["name"];

#[derive(Clone)]
pub struct CategoryRepository {
    pool: PgPool,
}

impl CategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> RepositoryResult<Category> {
        info!("Creating category: {}", name);

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(category)
    }

    pub async fn list(&self, params: &ListParams) -> RepositoryResult<Page<Category>> {
        let query = ListQuery::resolve(params, &SORT);

        let mut builder =
            QueryBuilder::new("SELECT id, name, created_at, updated_at FROM categories");
        query.push_search(&mut builder, " WHERE ", &SEARCH);
        query.push_order_and_page(&mut builder);
        let items = builder
            .build_query_as::<Category>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM categories");
        query.push_search(&mut count, " WHERE ", &SEARCH);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(query.into_page(items, total))
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Category> {
        sqlx::query_as::<_, Category>(
            "SELECT id, name, created_at, updated_at FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    pub async fn update(&self, id: Uuid, name: &str) -> RepositoryResult<Category> {
        info!("Updating category {}", id);

        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, updated_at = now()
            WHERE id = $2
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Fails with `Conflict` while products still use the category
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        info!("Deleting category {}", id);

        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e).on_delete())?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
