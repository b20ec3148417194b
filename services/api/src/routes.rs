//! API service routes

pub mod categories;
pub mod lookups;
pub mod products;
pub mod transactions;
pub mod users;

use axum::{
    Json, Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, header},
    middleware,
    response::IntoResponse,
    routing::{get, patch},
};
use serde_json::json;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use tracing::warn;

use crate::{
    AppState,
    config::ApiConfig,
    middleware::{auth_middleware, require_admin},
};

/// Create the router for the API service
pub fn create_router(state: AppState, config: &ApiConfig) -> Router {
    let admin_routes = Router::new()
        .route(
            "/categories",
            get(categories::list).post(categories::create),
        )
        .route(
            "/categories/:id",
            get(categories::get)
                .patch(categories::update)
                .delete(categories::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/:id",
            get(products::get)
                .patch(products::update)
                .delete(products::delete),
        )
        .route("/transactions", get(transactions::list))
        .route(
            "/transactions/:id",
            get(transactions::get)
                .patch(transactions::update)
                .delete(transactions::delete),
        )
        .route(
            "/transactions/:id/status",
            patch(transactions::update_status),
        )
        .route("/userslist", get(users::list).post(users::create))
        .route(
            "/userslist/:id",
            get(users::get).patch(users::update).delete(users::delete),
        )
        .route("/sizes", get(lookups::sizes))
        .route("/variants", get(lookups::variants))
        .route("/transaction-statuses", get(lookups::transaction_statuses))
        .route("/payment-methods", get(lookups::payment_methods))
        .route("/shipping-methods", get(lookups::shipping_methods))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let mut router = Router::new()
        .route("/health", get(health_check))
        .nest("/admin", admin_routes);

    if let Some(root) = state.images.local_root() {
        router = router.nest_service("/uploads", ServeDir::new(root));
    }

    router
        .layer(DefaultBodyLimit::max(config.max_request_bytes))
        .layer(cors_layer(&config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(_) => {
            warn!("Ignoring invalid CORS origin: {}", origin);
            layer
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "api-service"
    }))
}
