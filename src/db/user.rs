use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::AppState;

/// Maximum length of a username.
const MAX_USERNAME_LEN: usize = 100;
/// Minimum length of a password.
const MIN_PASSWORD_LEN: usize = 6;

id_struct!(UserId, User);

#[derive(sqlx::FromRow, Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created: DateTime<Utc>,
}

/// View of a user that is safe to serialize into responses.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub created: DateTime<Utc>,
}

impl User {
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            created: self.created,
        }
    }

    /// Username sanitized for direct inclusion in HTML.
    pub fn html_name(&self) -> String {
        ammonia::clean_text(&self.username)
    }

    /// Data for the signed-in header in page templates.
    pub fn to_header_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "username": self.html_name(),
            "elevated": self.is_staff || self.is_superuser,
        })
    }

    pub fn hash_password(password: &str) -> Result<String, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(password.as_bytes(), &salt)?
            .to_string())
    }

    pub fn verify_password(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}

fn validate_new_user(username: &str, email: &str, password: &str) -> Result<(), AppError> {
    if username.is_empty() || username.len() > MAX_USERNAME_LEN {
        return Err(AppError::InvalidQuery("invalid username".to_string()));
    }
    if !email.contains('@') {
        return Err(AppError::InvalidQuery("invalid email address".to_string()));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::InvalidQuery(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

impl AppState {
    pub async fn get_user(&self, id: UserId) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM UserAccount WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_user_from_username(&self, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM UserAccount WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn get_user_from_email(&self, email: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM UserAccount WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    /// Creates a user and their profile row.
    ///
    /// Duplicate usernames and emails are rejected before anything is
    /// written, and the unique constraints back that up under races.
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        validate_new_user(username, email, password)?;

        if self.get_user_from_username(username).await?.is_some() {
            return Err(AppError::UsernameTaken);
        }
        if self.get_user_from_email(email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let password_hash = User::hash_password(password)?;
        let now = Utc::now();

        let mut tx = self.pool.begin().await?;
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO UserAccount (username, email, password_hash, created)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                if db.message().contains("username") {
                    AppError::UsernameTaken
                } else {
                    AppError::EmailTaken
                }
            }
            _ => AppError::SqlError(e),
        })?;

        // The profile row is created here, as an explicit step of
        // registration; there is no hook that does it on insert.
        sqlx::query("INSERT INTO UserProfile (user_id, created) VALUES (?, ?)")
            .bind(user.id)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(user)
    }

    /// Checks credentials and returns the user, or 401.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = self
            .get_user_from_username(username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;
        if user.verify_password(password) {
            Ok(user)
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;

    #[sqlx::test]
    async fn duplicate_username_and_email_rejected(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        state
            .register_user("bob", "bob@example.com", "secret1")
            .await?;

        let dup_username = state
            .register_user("bob", "other@example.com", "secret1")
            .await;
        assert!(matches!(dup_username, Err(AppError::UsernameTaken)));

        let dup_email = state
            .register_user("carol", "bob@example.com", "secret1")
            .await;
        assert!(matches!(dup_email, Err(AppError::EmailTaken)));

        // neither failed attempt created a row
        assert!(state.get_user_from_username("carol").await?.is_none());
        assert!(state
            .get_user_from_email("other@example.com")
            .await?
            .is_none());
        Ok(())
    }

    #[sqlx::test]
    async fn registration_creates_profile(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let user = state
            .register_user("bob", "bob@example.com", "secret1")
            .await?;
        let profile = state.get_profile(user.id).await?;
        assert!(profile.is_some());
        Ok(())
    }

    #[sqlx::test]
    async fn authenticate_checks_password(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        state
            .register_user("bob", "bob@example.com", "secret1")
            .await?;

        assert!(state.authenticate("bob", "secret1").await.is_ok());
        assert!(matches!(
            state.authenticate("bob", "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            state.authenticate("nobody", "secret1").await,
            Err(AppError::InvalidCredentials)
        ));
        Ok(())
    }

    #[sqlx::test]
    async fn short_password_rejected(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let result = state.register_user("bob", "bob@example.com", "abc").await;
        assert!(matches!(result, Err(AppError::InvalidQuery(_))));
        Ok(())
    }
}
