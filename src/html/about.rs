use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::db::User;
use crate::traits::RequestBody;
use crate::{AppError, AppState};

#[derive(serde::Deserialize)]
pub struct AboutPage {}

pub struct AboutPageResponse {
    user: Option<User>,
}

impl RequestBody for AboutPage {
    type Response = AboutPageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(AboutPageResponse { user })
    }
}

impl IntoResponse for AboutPageResponse {
    fn into_response(self) -> Response<Body> {
        crate::templates::render_html_template("about.html", &self.user, serde_json::json!({}))
    }
}
