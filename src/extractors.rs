// src/extractors.rs

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{
    error::AppError,
    identity::{bearer_token, get_or_create_user},
    models::user::User,
    state::AppState,
};

/// Extracts the authenticated user, creating the row on first sight.
/// Rejects with 401 when the bearer credential is missing or invalid.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::AuthError("Missing authorization token".to_string()))?;

        let identity = state.identity.verify_token(token).await?;
        let user = get_or_create_user(&state.pool, &identity).await?;

        Ok(CurrentUser(user))
    }
}

/// Like `CurrentUser`, but for routes where authentication is optional.
/// A missing or invalid credential yields `None` instead of rejecting.
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(MaybeUser(None));
        };

        let Ok(identity) = state.identity.verify_token(token).await else {
            return Ok(MaybeUser(None));
        };

        let user = get_or_create_user(&state.pool, &identity).await?;
        Ok(MaybeUser(Some(user)))
    }
}
