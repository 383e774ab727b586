use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::db::{ArticleId, Category, FullArticle, User};
use crate::error::AppError;
use crate::permissions;
use crate::traits::RequestBody;
use crate::AppState;

/// `GET /api/articles/`
#[derive(Default, Debug)]
pub struct ListArticlesRequest {}

#[must_use]
#[derive(Serialize, Debug)]
pub struct ArticleListResponse {
    pub articles: Vec<FullArticle>,
}

impl RequestBody for ListArticlesRequest {
    type Response = ArticleListResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(ArticleListResponse {
            articles: state.list_articles().await?,
        })
    }
}

impl IntoResponse for ArticleListResponse {
    fn into_response(self) -> Response<Body> {
        Json(self).into_response()
    }
}

/// `GET /api/articles/{id}/`
#[derive(derive_more::From, Debug)]
pub struct GetArticleRequest {
    pub id: i64,
}

#[must_use]
#[derive(Serialize, Debug)]
pub struct ArticleResponse {
    #[serde(flatten)]
    pub article: FullArticle,
    #[serde(skip)]
    code: StatusCode,
}

impl IntoResponse for ArticleResponse {
    fn into_response(self) -> Response<Body> {
        (self.code, Json(&self)).into_response()
    }
}

impl RequestBody for GetArticleRequest {
    type Response = ArticleResponse;

    async fn request(
        self,
        state: AppState,
        _user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let article = state
            .get_full_article(ArticleId(self.id))
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        Ok(ArticleResponse {
            article,
            code: StatusCode::OK,
        })
    }
}

/// `POST /api/articles/create/`
#[derive(Deserialize, Debug)]
pub struct CreateArticleRequest {
    pub title: String,
    pub text: String,
    pub category: Category,
}

impl RequestBody for CreateArticleRequest {
    type Response = ArticleResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        if !permissions::can_create(user.as_ref(), self.category) {
            return Err(match user {
                None => AppError::NotLoggedIn,
                Some(_) => AppError::NotAuthorized,
            });
        }
        let user = user.expect("checked by can_create");

        let article = state
            .create_article(user.id, &self.title, &self.text, self.category)
            .await?;
        tracing::info!(article_id = article.id.0, user_id = user.id.0, "created article");

        let article = state
            .get_full_article(article.id)
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        Ok(ArticleResponse {
            article,
            code: StatusCode::CREATED,
        })
    }
}

#[derive(Deserialize, Debug)]
pub struct UpdateArticleBody {
    pub title: String,
    pub text: String,
    pub category: Category,
}

/// `PUT /api/articles/{id}/update/`
#[derive(derive_more::From, Debug)]
pub struct UpdateArticleRequest {
    pub id: i64,
    pub body: UpdateArticleBody,
}

impl RequestBody for UpdateArticleRequest {
    type Response = ArticleResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let id = ArticleId(self.id);
        let article = state
            .get_article(id)
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        if !permissions::can_modify(&article, user.as_ref()) {
            return Err(match user {
                None => AppError::NotLoggedIn,
                Some(_) => AppError::NotAuthorized,
            });
        }
        if !permissions::can_assign_category(&article, user.as_ref(), self.body.category) {
            return Err(AppError::NotAuthorized);
        }

        state
            .update_article(id, &self.body.title, &self.body.text, self.body.category)
            .await?;
        let article = state
            .get_full_article(id)
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        Ok(ArticleResponse {
            article,
            code: StatusCode::OK,
        })
    }
}

/// `DELETE /api/articles/{id}/delete/`
#[derive(derive_more::From, Debug)]
pub struct DeleteArticleRequest {
    pub id: i64,
}

#[must_use]
#[derive(Serialize, Debug)]
pub struct DeleteResponse {}

impl IntoResponse for DeleteResponse {
    fn into_response(self) -> Response<Body> {
        Json(self).into_response()
    }
}

impl RequestBody for DeleteArticleRequest {
    type Response = DeleteResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let id = ArticleId(self.id);
        let article = state
            .get_article(id)
            .await?
            .ok_or(AppError::ArticleDoesNotExist)?;
        if !permissions::can_modify(&article, user.as_ref()) {
            return Err(match user {
                None => AppError::NotLoggedIn,
                Some(_) => AppError::NotAuthorized,
            });
        }

        state.delete_article(id).await?;
        tracing::info!(article_id = id.0, "deleted article");
        Ok(DeleteResponse {})
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;

    async fn ordinary_user(state: &AppState, name: &str) -> Result<User, AppError> {
        state
            .register_user(name, &format!("{name}@example.com"), "secret1")
            .await
    }

    async fn staff_user(state: &AppState) -> Result<User, AppError> {
        let user = ordinary_user(state, "staff").await?;
        sqlx::query("UPDATE UserAccount SET is_staff = TRUE WHERE id = ?")
            .bind(user.id)
            .execute(&state.pool)
            .await?;
        Ok(state.get_user(user.id).await?.expect("user exists"))
    }

    #[sqlx::test]
    async fn create_respects_category_rules(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let user = ordinary_user(&state, "bob").await?;

        let refused = CreateArticleRequest {
            title: "breaking".to_string(),
            text: "text".to_string(),
            category: Category::News,
        }
        .request(state.clone(), Some(user.clone()))
        .await;
        match refused {
            Err(e) => assert_eq!(e.status_code(), StatusCode::FORBIDDEN),
            Ok(_) => panic!("ordinary user created a news article"),
        }

        let allowed = CreateArticleRequest {
            title: "my project".to_string(),
            text: "text".to_string(),
            category: Category::Works,
        }
        .request(state.clone(), Some(user))
        .await?;
        assert_eq!(allowed.article.author_name, "bob");

        let staff = staff_user(&state).await?;
        CreateArticleRequest {
            title: "breaking".to_string(),
            text: "text".to_string(),
            category: Category::News,
        }
        .request(state.clone(), Some(staff))
        .await?;
        Ok(())
    }

    #[sqlx::test]
    async fn create_requires_auth(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let result = CreateArticleRequest {
            title: "anything".to_string(),
            text: "text".to_string(),
            category: Category::Works,
        }
        .request(state, None)
        .await;
        match result {
            Err(e) => assert_eq!(e.status_code(), StatusCode::UNAUTHORIZED),
            Ok(_) => panic!("anonymous user created an article"),
        }
        Ok(())
    }

    #[sqlx::test]
    async fn update_gated_by_ownership(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let owner = ordinary_user(&state, "owner").await?;
        let stranger = ordinary_user(&state, "stranger").await?;
        let article = state
            .create_article(owner.id, "title", "text", Category::Works)
            .await?;

        let body = || UpdateArticleBody {
            title: "edited".to_string(),
            text: "edited text".to_string(),
            category: Category::Works,
        };

        let refused = UpdateArticleRequest::from((article.id.0, body()))
            .request(state.clone(), Some(stranger))
            .await;
        match refused {
            Err(e) => assert_eq!(e.status_code(), StatusCode::FORBIDDEN),
            Ok(_) => panic!("non-owner edited an article"),
        }

        let updated = UpdateArticleRequest::from((article.id.0, body()))
            .request(state.clone(), Some(owner.clone()))
            .await?;
        assert_eq!(updated.article.title, "edited");
        // the owner never changes
        assert_eq!(updated.article.author_id, owner.id);

        let staff = staff_user(&state).await?;
        UpdateArticleRequest::from((article.id.0, body()))
            .request(state.clone(), Some(staff))
            .await?;
        Ok(())
    }

    #[sqlx::test]
    async fn owner_cannot_recategorize_out_of_works(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let owner = ordinary_user(&state, "owner").await?;
        let article = state
            .create_article(owner.id, "title", "text", Category::Works)
            .await?;

        let body = |category| UpdateArticleBody {
            title: "title".to_string(),
            text: "text".to_string(),
            category,
        };

        let refused = UpdateArticleRequest::from((article.id.0, body(Category::News)))
            .request(state.clone(), Some(owner.clone()))
            .await;
        assert!(matches!(refused, Err(AppError::NotAuthorized)));

        // editing without changing the category still works
        UpdateArticleRequest::from((article.id.0, body(Category::Works)))
            .request(state.clone(), Some(owner))
            .await?;

        // staff may move it anywhere
        let staff = staff_user(&state).await?;
        let moved = UpdateArticleRequest::from((article.id.0, body(Category::News)))
            .request(state.clone(), Some(staff))
            .await?;
        assert_eq!(moved.article.category, Category::News);
        Ok(())
    }

    #[sqlx::test]
    async fn delete_unknown_article_is_404(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let staff = staff_user(&state).await?;
        let result = DeleteArticleRequest::from(999)
            .request(state, Some(staff))
            .await;
        match result {
            Err(e) => assert_eq!(e.status_code(), StatusCode::NOT_FOUND),
            Ok(_) => panic!("deleted an article that does not exist"),
        }
        Ok(())
    }
}
