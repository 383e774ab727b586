use axum::extract::State;
use axum::response::{IntoResponse, Redirect};
use axum_extra::extract::CookieJar;

use crate::cookies::{APPEND_EXPIRED_TOKEN, APPEND_NO_TOKEN, SESSION_COOKIE};
use crate::{AppError, AppState};

/// `GET /sign-out/`: revokes the session token and clears the cookie.
///
/// Not a `RequestBody` because it needs the raw cookie value.
pub async fn sign_out(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AppError> {
    let Some(token) = jar.get(SESSION_COOKIE) else {
        return Ok((APPEND_NO_TOKEN, Redirect::to("/")).into_response());
    };

    // a stale or garbled cookie still signs out; it just has nothing to revoke
    match state.revoke_token(token.value()).await {
        Ok(()) | Err(AppError::InvalidToken) | Err(AppError::TokenExpired) => {}
        Err(e) => return Err(e),
    }

    Ok((APPEND_EXPIRED_TOKEN, Redirect::to("/")).into_response())
}
