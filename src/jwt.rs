//! Signing and verification of bearer tokens.
//!
//! Tokens are ordinary JWTs carrying the user id, an expiry and a unique
//! token id (`jti`). Access and refresh tokens differ only in lifetime and a
//! kind discriminator, so one can never stand in for the other. Revocation of
//! refresh tokens is persistent and lives in [`crate::db::token`].

use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::UserId;
use crate::error::AppError;

/// How long an access token is valid for.
pub const ACCESS_DURATION: TimeDelta = TimeDelta::minutes(15);
/// How long a refresh token is valid for.
pub const REFRESH_DURATION: TimeDelta = TimeDelta::days(30);
/// Number of characters in a token id.
const JTI_LENGTH: usize = 16;

lazy_static! {
    static ref ENCODING_KEY: EncodingKey = EncodingKey::from_secret(crate::env::JWT_SECRET.as_bytes());
    static ref DECODING_KEY: DecodingKey = DecodingKey::from_secret(crate::env::JWT_SECRET.as_bytes());
}

#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    /// User the token was issued to.
    pub sub: UserId,
    /// Expiry, as a Unix timestamp.
    pub exp: i64,
    /// Issue time, as a Unix timestamp.
    pub iat: i64,
    /// Unique token id, so individual refresh tokens can be revoked.
    pub jti: String,
    pub kind: TokenKind,
}

/// Access + refresh token pair issued at registration and login.
#[derive(Serialize, Debug, Clone)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Signs a single token of the given kind.
pub fn sign(user_id: UserId, kind: TokenKind) -> Result<String, AppError> {
    let duration = match kind {
        TokenKind::Access => ACCESS_DURATION,
        TokenKind::Refresh => REFRESH_DURATION,
    };
    sign_with_lifetime(user_id, kind, duration)
}

/// Signs a token expiring `duration` from now. A non-positive duration
/// produces a token that is already expired.
pub(crate) fn sign_with_lifetime(
    user_id: UserId,
    kind: TokenKind,
    duration: TimeDelta,
) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + duration).timestamp(),
        iat: now.timestamp(),
        jti: crate::util::random_token_string(JTI_LENGTH),
        kind,
    };
    jsonwebtoken::encode(&Header::default(), &claims, &ENCODING_KEY)
        .map_err(|e| AppError::Other(format!("could not sign token: {e}")))
}

/// Issues a fresh access + refresh pair for a user.
pub fn issue(user_id: UserId) -> Result<TokenPair, AppError> {
    Ok(TokenPair {
        access: sign(user_id, TokenKind::Access)?,
        refresh: sign(user_id, TokenKind::Refresh)?,
    })
}

/// Verifies a token's signature, expiry and kind.
pub fn verify(token: &str, kind: TokenKind) -> Result<Claims, AppError> {
    let data = jsonwebtoken::decode::<Claims>(token, &DECODING_KEY, &Validation::default())
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;
    if data.claims.kind != kind {
        return Err(AppError::InvalidToken);
    }
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_pair_verifies() -> Result<(), AppError> {
        let pair = issue(UserId(7))?;
        let access = verify(&pair.access, TokenKind::Access)?;
        let refresh = verify(&pair.refresh, TokenKind::Refresh)?;
        assert_eq!(access.sub, UserId(7));
        assert_eq!(refresh.sub, UserId(7));
        assert_ne!(access.jti, refresh.jti);
        Ok(())
    }

    #[test]
    fn kinds_do_not_interchange() {
        let pair = issue(UserId(1)).unwrap();
        assert!(verify(&pair.access, TokenKind::Refresh).is_err());
        assert!(verify(&pair.refresh, TokenKind::Access).is_err());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        // two minutes in the past clears the default 60-second leeway
        let stale =
            sign_with_lifetime(UserId(1), TokenKind::Refresh, -TimeDelta::minutes(2)).unwrap();
        assert!(matches!(
            verify(&stale, TokenKind::Refresh),
            Err(AppError::TokenExpired)
        ));
    }

    #[test]
    fn garbage_is_invalid() {
        assert!(matches!(
            verify("not-a-token", TokenKind::Access),
            Err(AppError::InvalidToken)
        ));
    }
}
