use chrono::{DateTime, Utc};

use crate::db::User;
use crate::error::{AppError, AppResult};
use crate::jwt::{self, TokenKind};
use crate::AppState;

/// The status of a refresh token, including the user it belongs to if it is
/// valid. Page sessions carry a refresh token in a cookie; the API sends one
/// in request bodies for refresh and logout.
#[derive(Debug, Default, Clone)]
pub enum TokenStatus {
    /// No token was given.
    #[default]
    None,
    /// The token is valid and the user is signed in.
    Valid(User),
    /// The token has expired.
    Expired,
    /// The token is not recognized, or was revoked.
    Unknown,
}

impl AppState {
    /// Returns the status of a refresh token.
    pub async fn token_status(&self, token: Option<&str>) -> AppResult<TokenStatus> {
        let Some(token) = token else {
            return Ok(TokenStatus::None);
        };

        let claims = match jwt::verify(token, TokenKind::Refresh) {
            Ok(claims) => claims,
            Err(AppError::TokenExpired) => return Ok(TokenStatus::Expired),
            Err(_) => return Ok(TokenStatus::Unknown),
        };

        if self.is_token_revoked(&claims.jti).await? {
            return Ok(TokenStatus::Unknown);
        }

        let Some(user) = self.get_user(claims.sub).await? else {
            return Ok(TokenStatus::Unknown);
        };

        Ok(TokenStatus::Valid(user))
    }

    /// Issues a new access token for a valid, unrevoked refresh token.
    pub async fn refresh_access_token(&self, refresh: &str) -> Result<String, AppError> {
        let claims = jwt::verify(refresh, TokenKind::Refresh)?;
        if self.is_token_revoked(&claims.jti).await? {
            return Err(AppError::InvalidToken);
        }
        if self.get_user(claims.sub).await?.is_none() {
            return Err(AppError::InvalidToken);
        }
        jwt::sign(claims.sub, TokenKind::Access)
    }

    /// Revokes a refresh token so it can no longer be used for refresh or
    /// page sessions. Invalid tokens are rejected; already-revoked tokens are
    /// accepted again without complaint.
    pub async fn revoke_token(&self, refresh: &str) -> Result<(), AppError> {
        let claims = jwt::verify(refresh, TokenKind::Refresh)?;
        self.purge_revoked_tokens().await?;
        let expiry = DateTime::<Utc>::from_timestamp(claims.exp, 0)
            .ok_or_else(|| AppError::Other("token expiry out of range".to_string()))?;
        sqlx::query("INSERT OR IGNORE INTO RevokedToken (jti, expiry) VALUES (?, ?)")
            .bind(&claims.jti)
            .bind(expiry)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn is_token_revoked(&self, jti: &str) -> sqlx::Result<bool> {
        let row = sqlx::query("SELECT jti FROM RevokedToken WHERE jti = ?")
            .bind(jti)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Removes blacklist rows whose tokens have expired on their own. Runs
    /// on every revocation, so the table stays bounded by the number of
    /// tokens revoked within one refresh lifetime.
    pub async fn purge_revoked_tokens(&self) -> AppResult {
        sqlx::query("DELETE FROM RevokedToken WHERE expiry < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeDelta;
    use sqlx::SqlitePool;

    use super::*;

    #[sqlx::test]
    async fn revoked_token_cannot_refresh(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let user = state
            .register_user("bob", "bob@example.com", "secret1")
            .await?;
        let pair = jwt::issue(user.id)?;

        // works once
        state.refresh_access_token(&pair.refresh).await?;

        state.revoke_token(&pair.refresh).await?;
        let result = state.refresh_access_token(&pair.refresh).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));

        // revoking again is a no-op, not an error
        state.revoke_token(&pair.refresh).await?;
        Ok(())
    }

    #[sqlx::test]
    async fn expired_refresh_token_cannot_refresh(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let user = state
            .register_user("bob", "bob@example.com", "secret1")
            .await?;
        let stale = jwt::sign_with_lifetime(user.id, TokenKind::Refresh, -TimeDelta::minutes(2))?;

        assert!(matches!(
            state.refresh_access_token(&stale).await,
            Err(AppError::TokenExpired)
        ));
        assert!(matches!(
            state.token_status(Some(&stale)).await?,
            TokenStatus::Expired
        ));
        Ok(())
    }

    #[sqlx::test]
    async fn revocation_purges_dead_blacklist_rows(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let user = state
            .register_user("bob", "bob@example.com", "secret1")
            .await?;

        // a blacklist row whose token has long since expired on its own
        sqlx::query("INSERT INTO RevokedToken (jti, expiry) VALUES (?, ?)")
            .bind("long-dead")
            .bind(Utc::now() - TimeDelta::days(1))
            .execute(&state.pool)
            .await?;
        assert!(state.is_token_revoked("long-dead").await?);

        let pair = jwt::issue(user.id)?;
        state.revoke_token(&pair.refresh).await?;

        assert!(!state.is_token_revoked("long-dead").await?);
        let claims = jwt::verify(&pair.refresh, TokenKind::Refresh)?;
        assert!(state.is_token_revoked(&claims.jti).await?);
        Ok(())
    }

    #[sqlx::test]
    async fn token_status_flavors(pool: SqlitePool) -> Result<(), AppError> {
        let state = AppState { pool };
        let user = state
            .register_user("bob", "bob@example.com", "secret1")
            .await?;
        let pair = jwt::issue(user.id)?;

        assert!(matches!(state.token_status(None).await?, TokenStatus::None));
        assert!(matches!(
            state.token_status(Some("garbage")).await?,
            TokenStatus::Unknown
        ));
        // an access token is not a session token
        assert!(matches!(
            state.token_status(Some(&pair.access)).await?,
            TokenStatus::Unknown
        ));
        match state.token_status(Some(&pair.refresh)).await? {
            TokenStatus::Valid(u) => assert_eq!(u.id, user.id),
            other => panic!("expected valid token, got {other:?}"),
        }

        state.revoke_token(&pair.refresh).await?;
        assert!(matches!(
            state.token_status(Some(&pair.refresh)).await?,
            TokenStatus::Unknown
        ));
        Ok(())
    }
}
