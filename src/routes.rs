use crate::traits::RequestBody;
use crate::{api, html, AppState};

pub(crate) fn router() -> axum::Router<AppState> {
    use axum::routing::{delete, get, post, put};

    axum::Router::new()
        // Pages
        .route("/", get(html::home::HomePage::as_handler_query))
        .route("/about/", get(html::about::AboutPage::as_handler_query))
        .route(
            "/articles/",
            get(html::articles::ArticleListPage::as_handler_query),
        )
        .route(
            "/articles/{category}/",
            get(html::articles::CategoryPage::as_handler_path::<String>),
        )
        .route(
            "/news/{id}/",
            get(html::article::ArticleDetailPage::as_handler_path::<i64>),
        )
        .route(
            "/news/{id}/comment/",
            post(html::article::AddCommentRequest::as_form_handler_path::<
                i64,
                html::article::AddCommentForm,
            >),
        )
        .route(
            "/create-article/",
            get(html::create_article::CreateArticlePage::as_handler_query)
                .post(html::create_article::CreateArticleRequest::as_form_handler),
        )
        .route(
            "/edit-article/{id}/",
            get(html::edit_article::EditArticlePage::as_handler_path::<i64>).post(
                html::edit_article::EditArticleRequest::as_form_handler_path::<
                    i64,
                    html::edit_article::EditArticleForm,
                >,
            ),
        )
        .route(
            "/delete-article/{id}/",
            post(html::edit_article::DeleteArticlePageRequest::as_handler_path::<i64>),
        )
        .route(
            "/feedback/",
            get(html::feedback::FeedbackPage::as_handler_query)
                .post(html::feedback::FeedbackRequest::as_form_handler),
        )
        // Browser auth
        .route(
            "/sign-in/",
            get(html::sign_in::SignInPage::as_handler_query)
                .post(html::sign_in::SignInRequest::as_form_handler),
        )
        .route(
            "/register/",
            get(html::register::RegisterPage::as_handler_query)
                .post(html::register::RegisterPageRequest::as_form_handler),
        )
        .route("/sign-out/", get(html::sign_out::sign_out))
        // API: auth
        .route(
            "/api/auth/register",
            post(api::auth::RegisterRequest::as_json_handler),
        )
        .route(
            "/api/auth/login",
            post(api::auth::LoginRequest::as_json_handler),
        )
        .route(
            "/api/auth/logout",
            post(api::auth::LogoutRequest::as_json_handler),
        )
        .route(
            "/api/auth/token/refresh",
            post(api::auth::RefreshTokenRequest::as_json_handler),
        )
        .route(
            "/api/auth/token/verify",
            get(api::auth::VerifyTokenRequest::as_json_handler_get),
        )
        .route(
            "/api/auth/profile",
            get(api::auth::ProfileRequest::as_json_handler_get),
        )
        // API: articles
        .route(
            "/api/articles/",
            get(api::articles::ListArticlesRequest::as_json_handler_get),
        )
        .route(
            "/api/articles/create/",
            post(api::articles::CreateArticleRequest::as_json_handler),
        )
        .route(
            "/api/articles/{id}/",
            get(api::articles::GetArticleRequest::as_json_handler_path::<i64>),
        )
        .route(
            "/api/articles/{id}/update/",
            put(api::articles::UpdateArticleRequest::as_json_handler_path_body::<
                i64,
                api::articles::UpdateArticleBody,
            >),
        )
        .route(
            "/api/articles/{id}/delete/",
            delete(api::articles::DeleteArticleRequest::as_json_handler_path::<i64>),
        )
        // API: comments
        .route(
            "/api/articles/{id}/comments/",
            get(api::comments::ListCommentsRequest::as_json_handler_path::<i64>),
        )
        .route(
            "/api/articles/{id}/comments/create/",
            post(api::comments::CreateCommentRequest::as_json_handler_path_body::<
                i64,
                api::comments::CreateCommentBody,
            >),
        )
        .route(
            "/api/comments/{id}/delete/",
            delete(api::comments::DeleteCommentRequest::as_json_handler_path::<i64>),
        )
}
