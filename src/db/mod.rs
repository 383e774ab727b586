pub mod article;
pub mod category;
pub mod comment;
pub mod profile;
mod setup;
pub mod token;
pub mod user;

pub use article::{Article, ArticleId, FullArticle};
pub use category::Category;
pub use comment::{Comment, CommentId, FullComment};
pub use profile::{Profile, ProfileId};
pub use token::TokenStatus;
pub use user::{PublicUser, User, UserId};
