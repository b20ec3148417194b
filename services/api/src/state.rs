//! Application state shared across handlers

use common::{cache::RedisPool, token::TokenService};
use sqlx::PgPool;

use crate::{
    repositories::{
        CategoryRepository, LookupRepository, ProductRepository, TransactionRepository,
        UserRepository,
    },
    storage::ImageStore,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub category_repository: CategoryRepository,
    pub product_repository: ProductRepository,
    pub transaction_repository: TransactionRepository,
    pub user_repository: UserRepository,
    pub lookup_repository: LookupRepository,
    pub token_service: TokenService,
    pub redis_pool: RedisPool,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(
        pool: PgPool,
        token_service: TokenService,
        redis_pool: RedisPool,
        images: ImageStore,
    ) -> Self {
        Self {
            category_repository: CategoryRepository::new(pool.clone()),
            product_repository: ProductRepository::new(pool.clone()),
            transaction_repository: TransactionRepository::new(pool.clone()),
            user_repository: UserRepository::new(pool.clone()),
            lookup_repository: LookupRepository::new(pool),
            token_service,
            redis_pool,
            images,
        }
    }
}
