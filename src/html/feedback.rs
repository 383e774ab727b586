use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::db::User;
use crate::traits::RequestBody;
use crate::{AppError, AppState};

/// `GET /feedback/`
#[derive(serde::Deserialize)]
pub struct FeedbackPage {}

pub struct FeedbackPageResponse {
    user: Option<User>,
}

impl RequestBody for FeedbackPage {
    type Response = FeedbackPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(FeedbackPageResponse { user })
    }
}

impl IntoResponse for FeedbackPageResponse {
    fn into_response(self) -> Response<Body> {
        crate::templates::render_html_template(
            "feedback.html",
            &self.user,
            serde_json::json!({ "form_submitted": false }),
        )
    }
}

/// `POST /feedback/`: the contact form. Submissions are logged, not stored.
#[derive(serde::Deserialize)]
pub struct FeedbackRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

pub struct FeedbackResponse {
    user: Option<User>,
    name: String,
}

impl RequestBody for FeedbackRequest {
    type Response = FeedbackResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        if self.name.trim().is_empty() || self.message.trim().is_empty() {
            return Err(AppError::InvalidQuery(
                "name and message must not be empty".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(AppError::InvalidQuery("invalid email address".to_string()));
        }

        tracing::info!(
            name = %self.name,
            email = %self.email,
            message = %self.message,
            "feedback submitted"
        );

        Ok(FeedbackResponse {
            user,
            name: self.name,
        })
    }
}

impl IntoResponse for FeedbackResponse {
    fn into_response(self) -> Response<Body> {
        crate::templates::render_html_template(
            "feedback.html",
            &self.user,
            serde_json::json!({
                "form_submitted": true,
                "name": ammonia::clean_text(&self.name),
            }),
        )
    }
}
