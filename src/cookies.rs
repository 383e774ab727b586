use axum::http::header::SET_COOKIE;
use axum::response::AppendHeaders;
use axum_extra::extract::CookieJar;

use crate::db::{TokenStatus, User};
use crate::{AppError, AppState};

/// Name of the session cookie. It holds a refresh token.
pub const SESSION_COOKIE: &str = "token";

const EXPIRED_TOKEN: &str = "token=expired; Path=/; Expires=Thu, 1 Jan 1970 00:00:00 GMT";
pub const APPEND_EXPIRED_TOKEN: AppendHeaders<Option<(axum::http::HeaderName, &'static str)>> =
    AppendHeaders(Some((SET_COOKIE, EXPIRED_TOKEN)));
pub const APPEND_NO_TOKEN: AppendHeaders<Option<(axum::http::HeaderName, &'static str)>> =
    AppendHeaders(None);

/// Resolves the session cookie to a signed-in user. Expired and unrecognized
/// tokens get their cookie cleared in the response.
pub async fn process_cookies(
    state: &AppState,
    jar: &CookieJar,
) -> Result<
    (
        Option<User>,
        AppendHeaders<Option<(axum::http::HeaderName, &'static str)>>,
    ),
    AppError,
> {
    let token = jar.get(SESSION_COOKIE).map(|cookie| cookie.value());
    let token_status = state.token_status(token).await?;
    let cookie_header = match &token_status {
        TokenStatus::None | TokenStatus::Valid(_) => APPEND_NO_TOKEN,
        TokenStatus::Expired | TokenStatus::Unknown => APPEND_EXPIRED_TOKEN,
    };
    let user = match token_status {
        TokenStatus::Valid(user) => Some(user),
        _ => None,
    };
    Ok((user, cookie_header))
}
