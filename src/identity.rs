// src/identity.rs

use async_trait::async_trait;
use axum::http::{HeaderMap, header};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::{error::AppError, models::user::User};

/// The identity the external provider vouched for.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Stable subject identifier assigned by the provider.
    pub subject: String,
    pub email: Option<String>,
    pub name: String,
    pub picture: Option<String>,
}

/// Boundary to the external identity provider.
///
/// Verifies a bearer credential and returns the subject it belongs to.
/// Constructed once at startup and injected through `AppState`.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AppError>;
}

/// Claims carried by the provider's ID tokens.
/// Expiry is checked by `Validation`, which requires the `exp` claim.
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    picture: Option<String>,
}

/// JWT-backed identity provider.
///
/// Verifies HS256-signed ID tokens with a shared secret. Any verification
/// failure is reported uniformly as 401; provider-internal detail never
/// reaches the caller.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<VerifiedIdentity, AppError> {
        let token_data = decode::<IdTokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                tracing::debug!("Token verification failed: {:?}", e);
                AppError::AuthError("Invalid or expired token".to_string())
            })?;

        let claims = token_data.claims;
        if claims.sub.is_empty() {
            return Err(AppError::AuthError("Invalid or expired token".to_string()));
        }

        Ok(VerifiedIdentity {
            subject: claims.sub,
            email: claims.email,
            name: claims.name,
            picture: claims.picture,
        })
    }
}

/// Extracts the token from an 'Authorization: Bearer <token>' header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}

/// Resolves a verified identity to a durable user row, creating one on
/// first sight.
///
/// Lookup is keyed by email rather than the provider's subject id, for
/// parity with rows created by earlier deployments. Providers that allow
/// email reuse make this resolution ambiguous; see DESIGN.md.
pub async fn get_or_create_user(
    pool: &SqlitePool,
    identity: &VerifiedIdentity,
) -> Result<User, AppError> {
    let email = identity
        .email
        .clone()
        .unwrap_or_else(|| format!("{}@unknown.local", identity.subject));

    if let Some(user) = sqlx::query_as::<_, User>(
        "SELECT id, provider_uid, email, display_name, picture FROM users WHERE email = ?",
    )
    .bind(&email)
    .fetch_optional(pool)
    .await?
    {
        return Ok(user);
    }

    // Two requests may race on first sight; the conflict clause makes the
    // insert a no-op for the loser, which then re-selects.
    let inserted = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (provider_uid, email, display_name, picture)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(email) DO NOTHING
        RETURNING id, provider_uid, email, display_name, picture
        "#,
    )
    .bind(&identity.subject)
    .bind(&email)
    .bind(&identity.name)
    .bind(&identity.picture)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(user) => Ok(user),
        None => sqlx::query_as::<_, User>(
            "SELECT id, provider_uid, email, display_name, picture FROM users WHERE email = ?",
        )
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            AppError::InternalServerError("User row vanished during get-or-create".to_string())
        }),
    }
}
