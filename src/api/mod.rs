use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::db::User;
use crate::error::AppError;
use crate::jwt::{self, TokenKind};
use crate::AppState;

pub mod articles;
pub mod auth;
pub mod comments;

/// The user behind an `Authorization: Bearer <access-token>` header, if one
/// was sent. A present but invalid or expired token is a 401, not anonymity.
pub struct MaybeBearer(pub Option<User>);

impl FromRequestParts<AppState> for MaybeBearer {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(MaybeBearer(None));
        };
        let token = value
            .to_str()
            .ok()
            .and_then(|s| s.strip_prefix("Bearer "))
            .ok_or(AppError::InvalidToken)?;
        let claims = jwt::verify(token, TokenKind::Access)?;
        let user = state
            .get_user(claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;
        Ok(MaybeBearer(Some(user)))
    }
}
