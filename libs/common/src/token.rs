//! Session token service
//!
//! Issues and validates HS256 JWTs carrying the user id, email and role.
//! The auth service issues tokens at login; the admin service only verifies
//! them.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::role::Role;

/// Default token lifetime: 24 hours
pub const DEFAULT_EXPIRY_SECONDS: u64 = 24 * 60 * 60;

/// Default `iss` claim
pub const DEFAULT_ISSUER: &str = "coffee-shop";

/// Token errors
#[derive(Error, Debug)]
pub enum TokenError {
    #[error("token configuration error: {0}")]
    Configuration(String),

    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("invalid token: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HMAC signing secret
    pub secret: String,
    /// Value of the `iss` claim, checked on verification
    pub issuer: String,
    /// Token lifetime in seconds
    pub expiry_seconds: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_SECRET`: signing secret (required, must not be empty)
    /// - `JWT_ISSUER`: issuer claim (default: "coffee-shop")
    /// - `JWT_EXPIRY_SECONDS`: token lifetime (default: 86400)
    pub fn from_env() -> Result<Self, TokenError> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| TokenError::Configuration("JWT_SECRET environment variable not set".into()))?;
        if secret.trim().is_empty() {
            return Err(TokenError::Configuration("JWT_SECRET must not be empty".into()));
        }

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| DEFAULT_ISSUER.to_string());

        let expiry_seconds = std::env::var("JWT_EXPIRY_SECONDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_EXPIRY_SECONDS);

        Ok(Self {
            secret,
            issuer,
            expiry_seconds,
        })
    }
}

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub iss: String,
    /// Issued at time
    pub iat: u64,
    /// Expiration time
    pub exp: u64,
    /// Token id, used as the revocation key
    pub jti: String,
}

impl Claims {
    /// Seconds until expiry, zero when already expired
    pub fn remaining_seconds(&self) -> u64 {
        self.exp.saturating_sub(now())
    }
}

/// A freshly signed token
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

/// Token service
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    config: TokenConfig,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_issuer(&[config.issuer.as_str()]);

        Self {
            encoding_key,
            decoding_key,
            validation,
            config,
        }
    }

    /// Sign a token for a user
    pub fn issue(&self, user_id: Uuid, email: &str, role: Role) -> Result<IssuedToken, TokenError> {
        let now = now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iss: self.config.issuer.clone(),
            iat: now,
            exp: now + self.config.expiry_seconds,
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken {
            token,
            token_type: "Bearer",
            expires_in: self.config.expiry_seconds,
        })
    }

    /// Validate a token and return the claims
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(TokenError::Invalid)
    }
}

fn now() -> u64 {
    Utc::now().timestamp().max(0) as u64
}
