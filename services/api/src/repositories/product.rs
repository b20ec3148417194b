//! Product repository for database operations

use common::error::{RepositoryError, RepositoryResult};
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    models::{Product, ProductImage, ProductInput, Size},
    query::{ListParams, ListQuery, Page, SortSpec},
};

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("created_at", "p.created_at"),
        ("title", "p.title"),
        ("price", "p.price"),
        ("stock", "p.stock"),
    ],
    default: "created_at",
};

const SEARCH: [&str; 2] = ["p.title", "p.description"];

const SELECT_PRODUCT: &str = r#"
    SELECT p.id, p.title, p.description, p.price, p.stock,
           p.category_id, c.name AS category,
           p.variant_id, v.name AS variant,
           p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
    LEFT JOIN variants v ON v.id = p.variant_id
    WHERE p.deleted_at IS NULL"#;

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the product with its sizes and image rows in one transaction
    pub async fn create(&self, input: &ProductInput, images: &[String]) -> RepositoryResult<Product> {
        info!("Creating product: {}", input.title);

        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO products (title, description, price, stock, category_id, variant_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .bind(input.variant_id)
        .fetch_one(&mut *tx)
        .await?;

        insert_sizes(&mut tx, id, &input.size_ids).await?;
        insert_images(&mut tx, id, images).await?;

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn list(&self, params: &ListParams) -> RepositoryResult<Page<Product>> {
        let query = ListQuery::resolve(params, &SORT);

        let mut builder = QueryBuilder::new(SELECT_PRODUCT);
        query.push_search(&mut builder, " AND ", &SEARCH);
        query.push_order_and_page(&mut builder);
        let rows = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM products p WHERE p.deleted_at IS NULL");
        query.push_search(&mut count, " AND ", &SEARCH);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut items = Vec::with_capacity(rows.len());
        for product in rows {
            items.push(self.hydrate(product).await);
        }

        Ok(query.into_page(items, total))
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<Product> {
        let product = sqlx::query_as::<_, Product>(&format!("{} AND p.id = $1", SELECT_PRODUCT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(self.hydrate(product).await)
    }

    /// Replace every column and the size set
    ///
    /// With new images the visible ones are soft-deleted first; without, the
    /// current images stay.
    pub async fn update(
        &self,
        id: Uuid,
        input: &ProductInput,
        images: &[String],
    ) -> RepositoryResult<Product> {
        info!("Updating product {}", id);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE products
            SET title = $1, description = $2, price = $3, stock = $4,
                category_id = $5, variant_id = $6, updated_at = now()
            WHERE id = $7 AND deleted_at IS NULL
            "#,
        )
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.stock)
        .bind(input.category_id)
        .bind(input.variant_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM product_sizes WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        insert_sizes(&mut tx, id, &input.size_ids).await?;

        if !images.is_empty() {
            sqlx::query(
                r#"
                UPDATE product_images
                SET deleted_at = now(), updated_at = now()
                WHERE product_id = $1 AND deleted_at IS NULL
                "#,
            )
            .bind(id)
            .execute(&mut *tx)
            .await?;
            insert_images(&mut tx, id, images).await?;
        }

        tx.commit().await?;
        self.get(id).await
    }

    /// Delete images, size links and the product; returns every image file name
    /// that belonged to it
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<Vec<String>> {
        info!("Deleting product {}", id);

        let mut tx = self.pool.begin().await?;

        let images: Vec<String> =
            sqlx::query_scalar("DELETE FROM product_images WHERE product_id = $1 RETURNING filename")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM product_sizes WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e).on_delete())?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(images)
    }

    async fn hydrate(&self, mut product: Product) -> Product {
        product.images = self.images_for(product.id).await.unwrap_or_else(|e| {
            warn!("Failed to load images for product {}: {}", product.id, e);
            Vec::new()
        });
        product.sizes = self.sizes_for(product.id).await.unwrap_or_else(|e| {
            warn!("Failed to load sizes for product {}: {}", product.id, e);
            Vec::new()
        });
        product
    }

    async fn images_for(&self, product_id: Uuid) -> Result<Vec<ProductImage>, sqlx::Error> {
        sqlx::query_as::<_, ProductImage>(
            r#"
            SELECT id, filename, created_at
            FROM product_images
            WHERE product_id = $1 AND deleted_at IS NULL
            ORDER BY created_at, filename
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn sizes_for(&self, product_id: Uuid) -> Result<Vec<Size>, sqlx::Error> {
        sqlx::query_as::<_, Size>(
            r#"
            SELECT s.id, s.name, s.additional_price
            FROM product_sizes ps
            JOIN sizes s ON s.id = ps.size_id
            WHERE ps.product_id = $1
            ORDER BY s.additional_price, s.name
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await
    }
}

async fn insert_sizes(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    size_ids: &[Uuid],
) -> Result<(), sqlx::Error> {
    for size_id in size_ids {
        sqlx::query("INSERT INTO product_sizes (product_id, size_id) VALUES ($1, $2)")
            .bind(product_id)
            .bind(size_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

async fn insert_images(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    filenames: &[String],
) -> Result<(), sqlx::Error> {
    for filename in filenames {
        sqlx::query("INSERT INTO product_images (product_id, filename) VALUES ($1, $2)")
            .bind(product_id)
            .bind(filename)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}
