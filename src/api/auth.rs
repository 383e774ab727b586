use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{PublicUser, User};
use crate::error::AppError;
use crate::jwt;
use crate::traits::RequestBody;
use crate::AppState;

/// User object plus a fresh token pair, returned by register and login.
#[must_use]
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub user: PublicUser,
    pub access: String,
    pub refresh: String,
    #[serde(skip)]
    code: StatusCode,
}

impl AuthResponse {
    fn new(user: &User, code: StatusCode) -> Result<Self, AppError> {
        let pair = jwt::issue(user.id)?;
        Ok(AuthResponse {
            user: user.to_public(),
            access: pair.access,
            refresh: pair.refresh,
            code,
        })
    }
}

impl IntoResponse for AuthResponse {
    fn into_response(self) -> Response<Body> {
        (self.code, Json(&self)).into_response()
    }
}

#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RequestBody for RegisterRequest {
    type Response = AuthResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        if self.password != self.password_confirm {
            return Err(AppError::PasswordsDoNotMatch);
        }
        let user = state
            .register_user(&self.username, &self.email, &self.password)
            .await?;
        tracing::info!(user_id = user.id.0, username = %user.username, "registered user");
        AuthResponse::new(&user, StatusCode::CREATED)
    }
}

#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl RequestBody for LoginRequest {
    type Response = AuthResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let user = state.authenticate(&self.username, &self.password).await?;
        AuthResponse::new(&user, StatusCode::OK)
    }
}

#[derive(Deserialize, Debug)]
pub struct LogoutRequest {
    pub refresh: String,
}

#[must_use]
#[derive(Serialize, Debug)]
pub struct LogoutResponse {}

impl RequestBody for LogoutRequest {
    type Response = LogoutResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        state.revoke_token(&self.refresh).await?;
        Ok(LogoutResponse {})
    }
}

impl IntoResponse for LogoutResponse {
    fn into_response(self) -> Response<Body> {
        Json(self).into_response()
    }
}

#[derive(Deserialize, Debug)]
pub struct RefreshTokenRequest {
    pub refresh: String,
}

#[must_use]
#[derive(Serialize, Debug)]
pub struct RefreshTokenResponse {
    pub access: String,
}

impl RequestBody for RefreshTokenRequest {
    type Response = RefreshTokenResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let access = state.refresh_access_token(&self.refresh).await?;
        Ok(RefreshTokenResponse { access })
    }
}

impl IntoResponse for RefreshTokenResponse {
    fn into_response(self) -> Response<Body> {
        Json(self).into_response()
    }
}

/// `GET /api/auth/token/verify`: echoes the bearer token's user.
#[derive(Default, Debug)]
pub struct VerifyTokenRequest {}

#[must_use]
#[derive(Serialize, Debug)]
pub struct VerifyTokenResponse {
    pub user: PublicUser,
}

impl RequestBody for VerifyTokenRequest {
    type Response = VerifyTokenResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let user = user.ok_or(AppError::NotLoggedIn)?;
        Ok(VerifyTokenResponse {
            user: user.to_public(),
        })
    }
}

impl IntoResponse for VerifyTokenResponse {
    fn into_response(self) -> Response<Body> {
        Json(self).into_response()
    }
}

/// `GET /api/auth/profile`: the bearer token's user and their profile.
#[derive(Default, Debug)]
pub struct ProfileRequest {}

#[must_use]
#[derive(Serialize, Debug)]
pub struct ProfileResponse {
    pub user: PublicUser,
    pub profile: crate::db::Profile,
}

impl RequestBody for ProfileRequest {
    type Response = ProfileResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let user = user.ok_or(AppError::NotLoggedIn)?;
        let profile = state
            .get_profile(user.id)
            .await?
            .ok_or(AppError::UserDoesNotExist)?;
        Ok(ProfileResponse {
            user: user.to_public(),
            profile,
        })
    }
}

impl IntoResponse for ProfileResponse {
    fn into_response(self) -> Response<Body> {
        Json(self).into_response()
    }
}
