pub mod about;
pub mod article;
pub mod articles;
pub mod create_article;
pub mod edit_article;
pub mod feedback;
pub mod home;
pub mod register;
pub mod sign_in;
pub mod sign_out;
