use axum::body::Body;
use axum::response::{IntoResponse, Redirect, Response};

use crate::db::{ArticleId, Comment, FullArticle, User};
use crate::permissions;
use crate::traits::RequestBody;
use crate::{AppError, AppState};

/// `GET /news/{id}/`: one article with its comments and a guest comment form.
#[derive(derive_more::From)]
pub struct ArticleDetailPage {
    pub id: i64,
}

pub struct ArticleDetailPageResponse {
    user: Option<User>,
    article: FullArticle,
    comments: Vec<Comment>,
    can_modify: bool,
}

impl RequestBody for ArticleDetailPage {
    type Response = ArticleDetailPageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let id = ArticleId(self.id);
        let article = state
            .get_full_article(id)
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        let comments = state.comments_for_article(id).await?;

        let plain = state
            .get_article(id)
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        let can_modify = permissions::can_modify(&plain, user.as_ref());

        Ok(ArticleDetailPageResponse {
            user,
            article,
            comments,
            can_modify,
        })
    }
}

impl IntoResponse for ArticleDetailPageResponse {
    fn into_response(self) -> Response<Body> {
        let comments: Vec<serde_json::Value> = self
            .comments
            .iter()
            .map(|c| {
                serde_json::json!({
                    "author_name": c.html_author_name(),
                    "text": &c.text,
                    "created": c.created,
                })
            })
            .collect();
        crate::templates::render_html_template(
            "article.html",
            &self.user,
            serde_json::json!({
                "article": self.article,
                "comments": comments,
                "can_modify": self.can_modify,
            }),
        )
    }
}

#[derive(serde::Deserialize)]
pub struct AddCommentForm {
    pub author_name: String,
    pub text: String,
}

/// `POST /news/{id}/comment/`: guest comment, then back to the article.
#[derive(derive_more::From)]
pub struct AddCommentRequest {
    pub article_id: i64,
    pub form: AddCommentForm,
}

pub struct AddCommentResponse {
    article_id: ArticleId,
}

impl RequestBody for AddCommentRequest {
    type Response = AddCommentResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let comment = state
            .create_comment(
                ArticleId(self.article_id),
                &self.form.author_name,
                &self.form.text,
            )
            .await?;
        Ok(AddCommentResponse {
            article_id: comment.article_id,
        })
    }
}

impl IntoResponse for AddCommentResponse {
    fn into_response(self) -> Response<Body> {
        Redirect::to(&format!("/news/{}/", self.article_id.0)).into_response()
    }
}
