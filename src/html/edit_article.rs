use axum::body::Body;
use axum::response::{IntoResponse, Redirect, Response};

use crate::db::{Article, ArticleId, Category, User};
use crate::permissions;
use crate::traits::RequestBody;
use crate::{AppError, AppState};

async fn load_editable(
    state: &AppState,
    id: ArticleId,
    user: Option<&User>,
) -> Result<Article, AppError> {
    let article = state
        .get_article(id)
        .await?
        .ok_or(AppError::ArticleDoesNotExist)?;
    if !permissions::can_modify(&article, user) {
        return Err(match user {
            None => AppError::NotLoggedIn,
            Some(_) => AppError::NotAuthorized,
        });
    }
    Ok(article)
}

/// `GET /edit-article/{id}/`
#[derive(derive_more::From)]
pub struct EditArticlePage {
    pub id: i64,
}

pub struct EditArticlePageResponse {
    user: Option<User>,
    article: Article,
}

impl RequestBody for EditArticlePage {
    type Response = EditArticlePageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let article = load_editable(&state, ArticleId(self.id), user.as_ref()).await?;
        Ok(EditArticlePageResponse { user, article })
    }
}

impl IntoResponse for EditArticlePageResponse {
    fn into_response(self) -> Response<Body> {
        let categories: Vec<serde_json::Value> = Category::ALL
            .iter()
            .filter(|&&c| permissions::can_assign_category(&self.article, self.user.as_ref(), c))
            .map(|c| {
                serde_json::json!({
                    "slug": c.slug(),
                    "label": c.label(),
                    "selected": *c == self.article.category,
                })
            })
            .collect();
        crate::templates::render_html_template(
            "edit_article.html",
            &self.user,
            serde_json::json!({
                "id": self.article.id,
                "title": self.article.title,
                "text": self.article.text,
                "categories": categories,
            }),
        )
    }
}

#[derive(serde::Deserialize)]
pub struct EditArticleForm {
    pub title: String,
    pub text: String,
    pub category: String,
}

/// `POST /edit-article/{id}/`
#[derive(derive_more::From)]
pub struct EditArticleRequest {
    pub id: i64,
    pub form: EditArticleForm,
}

pub struct EditArticleResponse {
    article_id: i64,
}

impl RequestBody for EditArticleRequest {
    type Response = EditArticleResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let id = ArticleId(self.id);
        let article = load_editable(&state, id, user.as_ref()).await?;
        let category: Category = self.form.category.parse()?;
        if !permissions::can_assign_category(&article, user.as_ref(), category) {
            return Err(AppError::NotAuthorized);
        }
        state
            .update_article(id, &self.form.title, &self.form.text, category)
            .await?;
        Ok(EditArticleResponse { article_id: self.id })
    }
}

impl IntoResponse for EditArticleResponse {
    fn into_response(self) -> Response<Body> {
        Redirect::to(&format!("/news/{}/", self.article_id)).into_response()
    }
}

/// `POST /delete-article/{id}/`
#[derive(derive_more::From)]
pub struct DeleteArticlePageRequest {
    pub id: i64,
}

pub struct DeleteArticlePageResponse {}

impl RequestBody for DeleteArticlePageRequest {
    type Response = DeleteArticlePageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let id = ArticleId(self.id);
        load_editable(&state, id, user.as_ref()).await?;
        state.delete_article(id).await?;
        Ok(DeleteArticlePageResponse {})
    }
}

impl IntoResponse for DeleteArticlePageResponse {
    fn into_response(self) -> Response<Body> {
        Redirect::to("/articles/").into_response()
    }
}
