use axum::body::Body;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

pub type AppResult<T = ()> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    SqlError(sqlx::Error),
    PasswordHashError(argon2::password_hash::Error),

    // 400
    UsernameTaken,
    EmailTaken,
    PasswordsDoNotMatch,
    InvalidQuery(String),

    // 401
    NotLoggedIn,
    InvalidToken,
    TokenExpired,
    InvalidCredentials,

    // 403
    NotAuthorized,

    // 404
    UserDoesNotExist,
    ArticleDoesNotExist,
    CommentDoesNotExist,

    Other(String),
}

impl AppError {
    pub fn message(&self) -> String {
        match self {
            Self::SqlError(err) => format!("Internal SQL error: {err}"),
            Self::PasswordHashError(err) => format!("Internal password hashing error: {err}"),

            Self::UsernameTaken => "A user with that username already exists".to_string(),
            Self::EmailTaken => "A user with that email already exists".to_string(),
            Self::PasswordsDoNotMatch => "Passwords do not match".to_string(),
            Self::InvalidQuery(msg) => msg.to_string(),

            Self::NotLoggedIn => "Not signed in".to_string(),
            Self::InvalidToken => "Invalid token".to_string(),
            Self::TokenExpired => "Token has expired".to_string(),
            Self::InvalidCredentials => "Incorrect username or password".to_string(),

            Self::NotAuthorized => "You do not have permission to do this".to_string(),

            Self::UserDoesNotExist => "User does not exist".to_string(),
            Self::ArticleDoesNotExist => "Article does not exist".to_string(),
            Self::CommentDoesNotExist => "Comment does not exist".to_string(),

            Self::Other(msg) => msg.to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::SqlError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PasswordHashError(_) => StatusCode::INTERNAL_SERVER_ERROR,

            Self::UsernameTaken
            | Self::EmailTaken
            | Self::PasswordsDoNotMatch
            | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,

            Self::NotLoggedIn
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,

            Self::NotAuthorized => StatusCode::FORBIDDEN,

            Self::UserDoesNotExist | Self::ArticleDoesNotExist | Self::CommentDoesNotExist => {
                StatusCode::NOT_FOUND
            }

            Self::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API error envelope: `{"error": <message>}` with the matching status code.
/// Page handlers render an error template instead; see
/// [`crate::traits::page_response`].
impl IntoResponse for AppError {
    fn into_response(self) -> Response<Body> {
        if self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self.message(), "internal error");
        }
        (
            self.status_code(),
            Json(serde_json::json!({ "error": self.message() })),
        )
            .into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> AppError {
        AppError::SqlError(err)
    }
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> AppError {
        AppError::PasswordHashError(err)
    }
}
