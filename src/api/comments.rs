use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::articles::DeleteResponse;
use crate::db::{ArticleId, CommentId, FullComment, User};
use crate::error::AppError;
use crate::permissions;
use crate::traits::RequestBody;
use crate::AppState;

/// `GET /api/articles/{id}/comments/`
#[derive(derive_more::From, Debug)]
pub struct ListCommentsRequest {
    pub article_id: i64,
}

#[must_use]
#[derive(Serialize, Debug)]
pub struct CommentListResponse {
    pub comments: Vec<FullComment>,
}

impl IntoResponse for CommentListResponse {
    fn into_response(self) -> Response<Body> {
        Json(self).into_response()
    }
}

impl RequestBody for ListCommentsRequest {
    type Response = CommentListResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let article_id = ArticleId(self.article_id);
        if state.get_article(article_id).await?.is_none() {
            return Err(AppError::ArticleDoesNotExist);
        }
        Ok(CommentListResponse {
            comments: state.full_comments_for_article(article_id).await?,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateCommentBody {
    pub author_name: String,
    pub text: String,
}

/// `POST /api/articles/{id}/comments/create/`. No auth: commenting is open
/// to guests, matching the comment form on the article page.
#[derive(derive_more::From, Debug)]
pub struct CreateCommentRequest {
    pub article_id: i64,
    pub body: CreateCommentBody,
}

#[must_use]
#[derive(Serialize, Debug)]
pub struct CommentResponse {
    #[serde(flatten)]
    pub comment: FullComment,
}

impl IntoResponse for CommentResponse {
    fn into_response(self) -> Response<Body> {
        (StatusCode::CREATED, Json(&self)).into_response()
    }
}

impl RequestBody for CreateCommentRequest {
    type Response = CommentResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let comment = state
            .create_comment(
                ArticleId(self.article_id),
                &self.body.author_name,
                &self.body.text,
            )
            .await?;
        let comment = state
            .full_comments_for_article(comment.article_id)
            .await?
            .into_iter()
            .find(|c| c.id == comment.id)
            .ok_or(AppError::CommentDoesNotExist)?;
        Ok(CommentResponse { comment })
    }
}

/// `DELETE /api/comments/{id}/delete/`. Gated by the same predicate as the
/// parent article: its owner or an elevated user.
#[derive(derive_more::From, Debug)]
pub struct DeleteCommentRequest {
    pub id: i64,
}

impl RequestBody for DeleteCommentRequest {
    type Response = DeleteResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let id = CommentId(self.id);
        let comment = state
            .get_comment(id)
            .await?
            .ok_or(AppError::CommentDoesNotExist)?;
        let article = state
            .get_article(comment.article_id)
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        if !permissions::can_modify(&article, user.as_ref()) {
            return Err(match user {
                None => AppError::NotLoggedIn,
                Some(_) => AppError::NotAuthorized,
            });
        }

        state.delete_comment(id).await?;
        Ok(DeleteResponse {})
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;
    use crate::db::Category;

    #[sqlx::test]
    async fn guests_can_comment(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let author = state
            .register_user("writer", "writer@example.com", "secret1")
            .await?;
        let article = state
            .create_article(author.id, "title", "text", Category::Works)
            .await?;

        let response = CreateCommentRequest::from((
            article.id.0,
            CreateCommentBody {
                author_name: "guest".to_string(),
                text: "hello".to_string(),
            },
        ))
        .request(state.clone(), None)
        .await?;
        assert_eq!(response.comment.author_name, "guest");
        assert_eq!(response.comment.article_title, "title");

        let list = ListCommentsRequest::from(article.id.0)
            .request(state, None)
            .await?;
        assert_eq!(list.comments.len(), 1);
        Ok(())
    }

    #[sqlx::test]
    async fn comment_deletion_gated_by_article_owner(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let owner = state
            .register_user("owner", "owner@example.com", "secret1")
            .await?;
        let stranger = state
            .register_user("stranger", "stranger@example.com", "secret1")
            .await?;
        let article = state
            .create_article(owner.id, "title", "text", Category::Works)
            .await?;
        let comment = state.create_comment(article.id, "guest", "spam").await?;

        let refused = DeleteCommentRequest::from(comment.id.0)
            .request(state.clone(), Some(stranger))
            .await;
        assert!(matches!(refused, Err(AppError::NotAuthorized)));

        let anonymous = DeleteCommentRequest::from(comment.id.0)
            .request(state.clone(), None)
            .await;
        assert!(matches!(anonymous, Err(AppError::NotLoggedIn)));

        DeleteCommentRequest::from(comment.id.0)
            .request(state.clone(), Some(owner))
            .await?;
        assert!(state.get_comment(comment.id).await?.is_none());
        Ok(())
    }
}
