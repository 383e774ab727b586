use axum::body::Body;
use axum::response::{IntoResponse, Response};

use crate::db::{Category, FullArticle, User};
use crate::traits::RequestBody;
use crate::{AppError, AppState};

/// `GET /articles/`: every article, newest first.
#[derive(serde::Deserialize)]
pub struct ArticleListPage {}

pub struct ArticleListPageResponse {
    user: Option<User>,
    category: Option<Category>,
    articles: Vec<FullArticle>,
}

impl RequestBody for ArticleListPage {
    type Response = ArticleListPageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        Ok(ArticleListPageResponse {
            user,
            category: None,
            articles: state.list_articles().await?,
        })
    }
}

/// `GET /articles/{category}/`: one category's articles.
#[derive(derive_more::From)]
pub struct CategoryPage {
    pub category: String,
}

impl RequestBody for CategoryPage {
    type Response = ArticleListPageResponse;

    async fn request(
        self,
        state: AppState,
        user: Option<User>,
    ) -> Result<Self::Response, AppError> {
        let category: Category = self.category.parse()?;
        Ok(ArticleListPageResponse {
            user,
            category: Some(category),
            articles: state.list_articles_in(category).await?,
        })
    }
}

impl IntoResponse for ArticleListPageResponse {
    fn into_response(self) -> Response<Body> {
        crate::templates::render_html_template(
            "articles.html",
            &self.user,
            serde_json::json!({
                "heading": match self.category {
                    Some(category) => category.label(),
                    None => "All articles",
                },
                "articles": self.articles,
                "categories": Category::ALL.map(|c| {
                    serde_json::json!({ "slug": c.slug(), "label": c.label() })
                }),
            }),
        )
    }
}
