use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{Category, UserId};
use crate::error::AppError;
use crate::AppState;

/// Maximum length of an article title.
const MAX_TITLE_LEN: usize = 200;

id_struct!(ArticleId, Article);

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub text: String,
    pub category: Category,
    pub created: DateTime<Utc>,
    pub author_id: UserId,
}

/// View of an article with its author's username, as served by the API and
/// rendered on pages.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
pub struct FullArticle {
    pub id: ArticleId,
    pub title: String,
    pub text: String,
    pub category: Category,
    #[serde(rename = "created_date")]
    pub created: DateTime<Utc>,
    #[serde(rename = "user")]
    pub author_id: UserId,
    pub author_name: String,
}

const FULL_ARTICLE_SELECT: &str = "
    SELECT Article.id, Article.title, Article.text, Article.category,
           Article.created, Article.author_id,
           UserAccount.username AS author_name
    FROM Article
    JOIN UserAccount ON Article.author_id = UserAccount.id
";

fn validate_article(title: &str, text: &str) -> Result<(), AppError> {
    if title.trim().is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(AppError::InvalidQuery(
            "title must be non-empty and at most 200 characters".to_string(),
        ));
    }
    if text.trim().is_empty() {
        return Err(AppError::InvalidQuery(
            "article text must not be empty".to_string(),
        ));
    }
    Ok(())
}

impl AppState {
    pub async fn get_article(&self, id: ArticleId) -> sqlx::Result<Option<Article>> {
        sqlx::query_as::<_, Article>("SELECT * FROM Article WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_full_article(&self, id: ArticleId) -> sqlx::Result<Option<FullArticle>> {
        let query = format!("{FULL_ARTICLE_SELECT} WHERE Article.id = ?");
        sqlx::query_as::<_, FullArticle>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// All articles, newest first.
    pub async fn list_articles(&self) -> sqlx::Result<Vec<FullArticle>> {
        let query = format!("{FULL_ARTICLE_SELECT} ORDER BY Article.created DESC");
        sqlx::query_as::<_, FullArticle>(&query)
            .fetch_all(&self.pool)
            .await
    }

    /// Articles in one category, newest first.
    pub async fn list_articles_in(&self, category: Category) -> sqlx::Result<Vec<FullArticle>> {
        let query =
            format!("{FULL_ARTICLE_SELECT} WHERE Article.category = ? ORDER BY Article.created DESC");
        sqlx::query_as::<_, FullArticle>(&query)
            .bind(category)
            .fetch_all(&self.pool)
            .await
    }

    /// The most recent articles, for the home page.
    pub async fn recent_articles(&self, limit: i64) -> sqlx::Result<Vec<FullArticle>> {
        let query = format!("{FULL_ARTICLE_SELECT} ORDER BY Article.created DESC LIMIT ?");
        sqlx::query_as::<_, FullArticle>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
    }

    pub async fn create_article(
        &self,
        author_id: UserId,
        title: &str,
        text: &str,
        category: Category,
    ) -> Result<Article, AppError> {
        validate_article(title, text)?;
        Ok(sqlx::query_as::<_, Article>(
            "INSERT INTO Article (title, text, category, created, author_id)
             VALUES (?, ?, ?, ?, ?) RETURNING *",
        )
        .bind(title)
        .bind(text)
        .bind(category)
        .bind(Utc::now())
        .bind(author_id)
        .fetch_one(&self.pool)
        .await?)
    }

    /// Updates an article's content. The author never changes.
    pub async fn update_article(
        &self,
        id: ArticleId,
        title: &str,
        text: &str,
        category: Category,
    ) -> Result<Article, AppError> {
        validate_article(title, text)?;
        sqlx::query_as::<_, Article>(
            "UPDATE Article SET title = ?, text = ?, category = ? WHERE id = ? RETURNING *",
        )
        .bind(title)
        .bind(text)
        .bind(category)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::ArticleDoesNotExist)
    }

    /// Deletes an article. Its comments go with it.
    pub async fn delete_article(&self, id: ArticleId) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM Article WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ArticleDoesNotExist);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;

    async fn author(state: &AppState) -> Result<UserId, AppError> {
        Ok(state
            .register_user("writer", "writer@example.com", "secret1")
            .await?
            .id)
    }

    #[sqlx::test]
    async fn articles_list_newest_first(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let author = author(&state).await?;
        let first = state
            .create_article(author, "first", "text", Category::Works)
            .await?;
        let second = state
            .create_article(author, "second", "text", Category::News)
            .await?;

        let all = state.list_articles().await?;
        assert_eq!(all.len(), 2);
        assert!(all[0].created >= all[1].created);

        let news = state.list_articles_in(Category::News).await?;
        assert_eq!(news.len(), 1);
        assert_eq!(news[0].id, second.id);
        assert_eq!(news[0].author_name, "writer");

        let _ = first;
        Ok(())
    }

    #[sqlx::test]
    async fn update_keeps_author(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let author = author(&state).await?;
        let article = state
            .create_article(author, "title", "text", Category::Works)
            .await?;

        let updated = state
            .update_article(article.id, "new title", "new text", Category::Review)
            .await?;
        assert_eq!(updated.author_id, author);
        assert_eq!(updated.title, "new title");
        assert_eq!(updated.category, Category::Review);
        Ok(())
    }

    #[sqlx::test]
    async fn delete_cascades_comments(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let author = author(&state).await?;
        let article = state
            .create_article(author, "title", "text", Category::Works)
            .await?;
        state
            .create_comment(article.id, "guest", "nice article")
            .await?;
        state
            .create_comment(article.id, "another guest", "agreed")
            .await?;

        state.delete_article(article.id).await?;

        assert!(state.get_article(article.id).await?.is_none());
        assert!(state.comments_for_article(article.id).await?.is_empty());
        Ok(())
    }

    #[sqlx::test]
    async fn empty_title_rejected(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let author = author(&state).await?;
        let result = state
            .create_article(author, "  ", "text", Category::Works)
            .await;
        assert!(matches!(result, Err(AppError::InvalidQuery(_))));
        Ok(())
    }
}
