use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;
use crate::services::AuthService;
use crate::state::AppState;

/// Author authenticated by the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
pub struct AuthAuthor {
    pub author_id: Uuid,
}

impl FromRequestParts<AppState> for AuthAuthor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let author_id = AuthService::new(&state.db, &state.tokens)
            .validate_token(token)
            .map_err(|_| AppError::TokenInvalid)?;

        Ok(AuthAuthor { author_id })
    }
}
