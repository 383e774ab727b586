use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::ArticleId;
use crate::error::AppError;
use crate::AppState;

/// Maximum length of a comment author name.
const MAX_AUTHOR_NAME_LEN: usize = 100;

id_struct!(CommentId, Comment);

/// A comment on an article. `author_name` is free text: commenting is open
/// to guests and is deliberately not tied to a user account.
#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Comment {
    pub id: CommentId,
    pub article_id: ArticleId,
    pub author_name: String,
    pub text: String,
    pub created: DateTime<Utc>,
}

impl Comment {
    /// Author name sanitized for direct inclusion in HTML.
    pub fn html_author_name(&self) -> String {
        ammonia::clean_text(&self.author_name)
    }
}

/// View of a comment with its article's title, as served by the API.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct FullComment {
    pub id: CommentId,
    pub text: String,
    #[serde(rename = "created_date")]
    pub created: DateTime<Utc>,
    pub author_name: String,
    #[serde(rename = "article")]
    pub article_id: ArticleId,
    pub article_title: String,
}

impl AppState {
    pub async fn get_comment(&self, id: CommentId) -> sqlx::Result<Option<Comment>> {
        sqlx::query_as::<_, Comment>("SELECT * FROM Comment WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Comments on an article, oldest first.
    pub async fn comments_for_article(&self, article_id: ArticleId) -> sqlx::Result<Vec<Comment>> {
        sqlx::query_as::<_, Comment>(
            "SELECT * FROM Comment WHERE article_id = ? ORDER BY created ASC",
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Comments on an article with the article title attached, oldest first.
    pub async fn full_comments_for_article(
        &self,
        article_id: ArticleId,
    ) -> sqlx::Result<Vec<FullComment>> {
        sqlx::query_as::<_, FullComment>(
            "SELECT Comment.id, Comment.text, Comment.created, Comment.author_name,
                    Comment.article_id, Article.title AS article_title
             FROM Comment
             JOIN Article ON Comment.article_id = Article.id
             WHERE Comment.article_id = ?
             ORDER BY Comment.created ASC",
        )
        .bind(article_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn create_comment(
        &self,
        article_id: ArticleId,
        author_name: &str,
        text: &str,
    ) -> Result<Comment, AppError> {
        if author_name.trim().is_empty() || author_name.len() > MAX_AUTHOR_NAME_LEN {
            return Err(AppError::InvalidQuery(
                "author name must be non-empty and at most 100 characters".to_string(),
            ));
        }
        if text.trim().is_empty() {
            return Err(AppError::InvalidQuery(
                "comment text must not be empty".to_string(),
            ));
        }
        if self.get_article(article_id).await?.is_none() {
            return Err(AppError::ArticleDoesNotExist);
        }

        Ok(sqlx::query_as::<_, Comment>(
            "INSERT INTO Comment (article_id, author_name, text, created)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(article_id)
        .bind(author_name)
        .bind(text)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?)
    }

    pub async fn delete_comment(&self, id: CommentId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM Comment WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::CommentDoesNotExist);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;
    use crate::db::Category;

    #[sqlx::test]
    async fn comments_are_oldest_first(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let author = state
            .register_user("writer", "writer@example.com", "secret1")
            .await?;
        let article = state
            .create_article(author.id, "title", "text", Category::Works)
            .await?;

        state.create_comment(article.id, "first", "one").await?;
        state.create_comment(article.id, "second", "two").await?;

        let comments = state.comments_for_article(article.id).await?;
        assert_eq!(comments.len(), 2);
        assert!(comments[0].created <= comments[1].created);
        assert_eq!(comments[0].author_name, "first");

        let full = state.full_comments_for_article(article.id).await?;
        assert_eq!(full[0].article_title, "title");
        Ok(())
    }

    #[sqlx::test]
    async fn comment_on_missing_article_is_404(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let result = state.create_comment(ArticleId(99), "guest", "hello").await;
        assert!(matches!(result, Err(AppError::ArticleDoesNotExist)));
        Ok(())
    }
}
