use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::db::User;
use crate::html::sign_in::TokenReturn;
use crate::traits::RequestBody;
use crate::{AppError, AppState};

/// `GET /register/`
#[derive(serde::Deserialize)]
pub struct RegisterPage {}

pub struct RegisterPageResponse {
    user: Option<User>,
}

impl RequestBody for RegisterPage {
    type Response = RegisterPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(RegisterPageResponse { user })
    }
}

impl IntoResponse for RegisterPageResponse {
    fn into_response(self) -> Response<Body> {
        crate::templates::render_html_template("register.html", &self.user, serde_json::json!({}))
    }
}

/// `POST /register/`: create the account and sign straight in.
#[derive(serde::Deserialize)]
pub struct RegisterPageRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl RequestBody for RegisterPageRequest {
    type Response = TokenReturn;

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
        TokenReturn::for_user(&user, None)
    }
}
