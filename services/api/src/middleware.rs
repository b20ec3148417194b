//! Bearer token authentication and the admin role gate

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::role::Role;
use tracing::{error, warn};
use uuid::Uuid;

use crate::{error::ApiError, state::AppState};

/// Authenticated user information
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Verify the bearer token and put the caller into the request extensions
///
/// Tokens revoked by logout are rejected. If the revocation list cannot be
/// read the request fails rather than letting the token through.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(Authorization(bearer)) = bearer.ok_or(ApiError::Unauthorized)?;

    let claims = state.token_service.verify(bearer.token()).map_err(|e| {
        warn!("Failed to validate token: {}", e);
        ApiError::Unauthorized
    })?;

    let revoked = state
        .redis_pool
        .is_token_revoked(&claims.jti)
        .await
        .map_err(|e| {
            error!("Failed to check token revocation: {}", e);
            ApiError::Internal("token revocation check failed".into())
        })?;
    if revoked {
        warn!("Rejected revoked token for user {}", claims.sub);
        return Err(ApiError::Unauthorized);
    }

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    });

    Ok(next.run(req).await)
}

/// Only admins get past this layer; must run after `auth_middleware`
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let user = req
        .extensions()
        .get::<AuthUser>()
        .ok_or(ApiError::Unauthorized)?;

    if user.role != Role::Admin {
        warn!("User {} denied admin access", user.id);
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(req).await)
}
