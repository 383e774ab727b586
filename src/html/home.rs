use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::db::{FullArticle, User};
use crate::traits::RequestBody;
use crate::{AppError, AppState};

/// Number of articles shown on the home page.
const HOME_PAGE_ARTICLES: i64 = 10;

#[derive(serde::Deserialize)]
pub struct HomePage {}

pub struct HomePageResponse {
    user: Option<User>,
    articles: Vec<FullArticle>,
}

impl RequestBody for HomePage {
    type Response = HomePageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(HomePageResponse {
            user,
            articles: state.recent_articles(HOME_PAGE_ARTICLES).await?,
        })
    }
}

impl IntoResponse for HomePageResponse {
    fn into_response(self) -> Response<Body> {
        crate::templates::render_html_template(
            "home.html",
            &self.user,
            serde_json::json!({ "articles": self.articles }),
        )
    }
}
