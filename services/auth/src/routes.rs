//! Authentication service routes

use std::sync::OnceLock;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderValue, Method, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::{
    error::FieldErrors,
    extract::JsonBody,
    password::{hash_password, verify_password},
    response::Reply,
    token::IssuedToken,
    validation::{normalize_email, validate_email, validate_fullname, validate_password},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

use crate::{
    AppState,
    error::AuthError,
    models::{LoginRequest, NewUser, RegisterRequest, UserProfile},
    rate_limiter::Decision,
};

/// Create the router for the authentication service
pub fn create_router(state: AppState, cors_origin: &str) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
        .layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
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
    Json(serde_json::json!({
        "status": "ok",
        "service": "auth-service"
    }))
}

/// User registration endpoint
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterRequest>,
) -> Result<Reply<UserProfile>, AuthError> {
    let email = normalize_email(&payload.email);
    info!("Registration attempt for: {}", email);

    let mut errors = FieldErrors::new();
    if let Err(msg) = validate_fullname(&payload.fullname) {
        errors.add("fullname", msg);
    }
    if let Err(msg) = validate_email(&email) {
        errors.add("email", msg);
    }
    if let Err(msg) = validate_password(&payload.password) {
        errors.add("password", msg);
    }
    errors.into_result().map_err(AuthError::Validation)?;

    let password_hash =
        hash_password(&payload.password).map_err(|e| AuthError::Internal(e.to_string()))?;

    let user = state
        .user_repository
        .create(&NewUser {
            fullname: payload.fullname.trim().to_string(),
            email,
            password_hash,
        })
        .await?;

    Ok(Reply::created("Register success", UserProfile::from(user)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginRequest>,
) -> Result<Reply<IssuedToken>, AuthError> {
    let email = normalize_email(&payload.email);
    info!("Login attempt for user: {}", email);

    let mut errors = FieldErrors::new();
    if email.is_empty() {
        errors.add("email", "Email is required");
    }
    if payload.password.is_empty() {
        errors.add("password", "Password is required");
    }
    errors.into_result().map_err(AuthError::Validation)?;

    if let Decision::Banned { retry_after } = state.rate_limiter.check(&email).await {
        return Err(AuthError::TooManyAttempts { retry_after });
    }

    let user = state.user_repository.find_by_email(&email).await?;

    let verified = match &user {
        Some(user) => verify_password(&payload.password, &user.password_hash),
        None => {
            // Same hashing cost as a real check so timing does not reveal the miss
            verify_password(&payload.password, dummy_hash());
            false
        }
    };

    let user = match user {
        Some(user) if verified => user,
        _ => {
            warn!("Rejected credentials for: {}", email);
            return Err(AuthError::InvalidCredentials);
        }
    };

    state.rate_limiter.reset(&email).await;

    let token = state
        .token_service
        .issue(user.id, &user.email, user.role)
        .map_err(|e| AuthError::Internal(e.to_string()))?;

    Ok(Reply::ok("Login success", token))
}

/// Logout endpoint; revokes the presented token for the rest of its lifetime
pub async fn logout(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
) -> Result<Reply<()>, AuthError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(AuthError::Unauthorized)?;

    let claims = state
        .token_service
        .verify(bearer.token())
        .map_err(|_| AuthError::Unauthorized)?;

    info!("Logout request for user: {}", claims.sub);

    state
        .redis_pool
        .revoke_token(&claims.jti, claims.remaining_seconds())
        .await
        .map_err(|e| AuthError::Internal(format!("Failed to revoke token: {}", e)))?;

    Ok(Reply::done("Logged out successfully"))
}

fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("dummy-password-0").unwrap_or_default())
}
