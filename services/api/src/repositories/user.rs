//! User repository for the admin user list

use common::error::{RepositoryError, RepositoryResult};
use sqlx::{PgPool, QueryBuilder};
use tracing::info;
use uuid::Uuid;

use crate::{
    models::{AdminUser, UserInput},
    query::{ListParams, ListQuery, Page, SortSpec},
};

pub const SORT: SortSpec = SortSpec {
    columns: &[
        ("created_at", "u.created_at"),
        ("fullname", "u.fullname"),
        ("email", "u.email"),
        ("role", "u.role"),
    ],
    default: "created_at",
};

const SEARCH: [&str; 2] = ["u.fullname", "u.email"];

const SELECT_USER: &str = r#"
    SELECT u.id, u.fullname, u.email, u.role,
           pr.phone, pr.address, pr.image,
           u.created_at, u.updated_at
    FROM users u
    LEFT JOIN profiles pr ON pr.user_id = u.id"#;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert the user and its profile in one transaction
    pub async fn create(
        &self,
        input: &UserInput,
        password_hash: &str,
        image: Option<&str>,
    ) -> RepositoryResult<AdminUser> {
        info!("Creating user: {}", input.email);

        let mut tx = self.pool.begin().await?;

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO users (fullname, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.fullname)
        .bind(&input.email)
        .bind(password_hash)
        .bind(input.role)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO profiles (user_id, phone, address, image) VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(image)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        self.get(id).await
    }

    pub async fn list(&self, params: &ListParams) -> RepositoryResult<Page<AdminUser>> {
        let query = ListQuery::resolve(params, &SORT);

        let mut builder = QueryBuilder::new(SELECT_USER);
        query.push_search(&mut builder, " WHERE ", &SEARCH);
        query.push_order_and_page(&mut builder);
        let items = builder
            .build_query_as::<AdminUser>()
            .fetch_all(&self.pool)
            .await?;

        let mut count = QueryBuilder::new("SELECT COUNT(*) FROM users u");
        query.push_search(&mut count, " WHERE ", &SEARCH);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        Ok(query.into_page(items, total))
    }

    pub async fn get(&self, id: Uuid) -> RepositoryResult<AdminUser> {
        sqlx::query_as::<_, AdminUser>(&format!("{} WHERE u.id = $1", SELECT_USER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Replace the user's columns and upsert the profile
    ///
    /// `password_hash` and `image` keep the stored values when `None`. Returns
    /// the updated user and the image file name it replaced, if any.
    pub async fn update(
        &self,
        id: Uuid,
        input: &UserInput,
        password_hash: Option<&str>,
        image: Option<&str>,
    ) -> RepositoryResult<(AdminUser, Option<String>)> {
        info!("Updating user {}", id);

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE users
            SET fullname = $1, email = $2, role = $3,
                password_hash = COALESCE($4, password_hash), updated_at = now()
            WHERE id = $5
            "#,
        )
        .bind(&input.fullname)
        .bind(&input.email)
        .bind(input.role)
        .bind(password_hash)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        let replaced = match image {
            Some(_) => sqlx::query_scalar::<_, Option<String>>(
                "SELECT image FROM profiles WHERE user_id = $1",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .flatten(),
            None => None,
        };

        sqlx::query(
            r#"
            INSERT INTO profiles (user_id, phone, address, image)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE
            SET phone = EXCLUDED.phone,
                address = EXCLUDED.address,
                image = COALESCE(EXCLUDED.image, profiles.image),
                updated_at = now()
            "#,
        )
        .bind(id)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(image)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok((self.get(id).await?, replaced))
    }

    /// Delete the profile, then the user; returns the profile image file name
    ///
    /// Fails with `Conflict` while the user still has transactions.
    pub async fn delete(&self, id: Uuid) -> RepositoryResult<Option<String>> {
        info!("Deleting user {}", id);

        let mut tx = self.pool.begin().await?;

        let image = sqlx::query_scalar::<_, Option<String>>(
            "DELETE FROM profiles WHERE user_id = $1 RETURNING image",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .flatten();

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e).on_delete())?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(image)
    }
}
