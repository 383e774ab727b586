use axum::body::Body;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, SameSite};
use axum_extra::extract::CookieJar;

use crate::cookies::SESSION_COOKIE;
use crate::db::User;
use crate::jwt::{self, TokenKind};
use crate::traits::RequestBody;
use crate::{AppError, AppState};

/// `GET /sign-in/`
#[derive(serde::Deserialize)]
pub struct SignInPage {
    pub redirect: Option<String>,
}

pub struct SignInPageResponse {
    user: Option<User>,
    redirect: Option<String>,
}

impl RequestBody for SignInPage {
    type Response = SignInPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(SignInPageResponse {
            user,
            redirect: self.redirect,
        })
    }
}

impl IntoResponse for SignInPageResponse {
    fn into_response(self) -> Response<Body> {
        if self.user.is_some() {
            // already signed in
            return Redirect::to(self.redirect.as_deref().unwrap_or("/")).into_response();
        }
        crate::templates::render_html_template(
            "sign_in.html",
            &self.user,
            serde_json::json!({ "redirect": self.redirect }),
        )
    }
}

/// Sets the session cookie and redirects. Shared by sign-in and the
/// registration page.
pub struct TokenReturn {
    pub token: String,
    pub redirect: Option<String>,
}

impl TokenReturn {
    pub fn for_user(user: &User, redirect: Option<String>) -> Result<Self, AppError> {
        Ok(TokenReturn {
            token: jwt::sign(user.id, TokenKind::Refresh)?,
            redirect,
        })
    }
}

impl IntoResponse for TokenReturn {
    fn into_response(self) -> Response<Body> {
        let cookie = Cookie::build((SESSION_COOKIE, self.token))
            .path("/")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Strict);
        let jar = CookieJar::new().add(cookie);

        // assume the redirect parameter is a relative url
        (
            jar,
            Redirect::to(self.redirect.as_deref().unwrap_or("/")),
        )
            .into_response()
    }
}

/// `POST /sign-in/`
#[derive(serde::Deserialize)]
pub struct SignInRequest {
    pub username: String,
    pub password: String,
    pub redirect: Option<String>,
}

impl RequestBody for SignInRequest {
    type Response = TokenReturn;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let user = state.authenticate(&self.username, &self.password).await?;
        TokenReturn::for_user(&user, self.redirect.filter(|s| !s.is_empty()))
    }
}
