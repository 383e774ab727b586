use axum::body::Body;
use axum::response::{IntoResponse, Redirect, Response};

use crate::db::{Category, User};
use crate::permissions;
use crate::traits::RequestBody;
use crate::{AppError, AppState};

fn allowed_categories(user: &User) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|&c| permissions::can_create(Some(user), c))
        .collect()
}

/// `GET /create-article/`: the creation form, offering only the categories
/// the signed-in user may post under.
#[derive(serde::Deserialize)]
pub struct CreateArticlePage {}

pub struct CreateArticlePageResponse {
    user: User,
    categories: Vec<Category>,
}

impl RequestBody for CreateArticlePage {
    type Response = CreateArticlePageResponse;

    async fn request(
        self,
        _state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let user = user.ok_or(AppError::NotLoggedIn)?;
        let categories = allowed_categories(&user);
        Ok(CreateArticlePageResponse { user, categories })
    }
}

impl IntoResponse for CreateArticlePageResponse {
    fn into_response(self) -> Response<Body> {
        let categories: Vec<serde_json::Value> = self
            .categories
            .iter()
            .map(|c| serde_json::json!({ "slug": c.slug(), "label": c.label() }))
            .collect();
        crate::templates::render_html_template(
            "create_article.html",
            &Some(self.user),
            serde_json::json!({ "categories": categories }),
        )
    }
}

/// `POST /create-article/`
#[derive(serde::Deserialize)]
pub struct CreateArticleRequest {
    pub title: String,
    pub text: String,
    pub category: String,
}

pub struct CreateArticleResponse {
    article_id: i64,
}

impl RequestBody for CreateArticleRequest {
    type Response = CreateArticleResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let category: Category = self.category.parse()?;
        if !permissions::can_create(user.as_ref(), category) {
            return Err(match user {
                None => AppError::NotLoggedIn,
                Some(_) => AppError::NotAuthorized,
            });
        }
        let user = user.expect("checked by can_create");

        let article = state
            .create_article(user.id, &self.title, &self.text, category)
            .await?;
        Ok(CreateArticleResponse {
            article_id: article.id.0,
        })
    }
}

impl IntoResponse for CreateArticleResponse {
    fn into_response(self) -> Response<Body> {
        Redirect::to(&format!("/news/{}/", self.article_id)).into_response()
    }
}
