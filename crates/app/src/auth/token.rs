//! Signed session tokens.
//!
//! A login issues an access token and a refresh token that share one
//! identifier (`jti`). Revoking that identifier ends both.

use std::fmt::{self, Debug, Display, Formatter};

use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::{Error as JwtError, ErrorKind as JwtErrorKind},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroize;

use crate::domain::accounts::records::UserUuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        })
    }
}

/// Signed token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User the token was issued to.
    pub sub: Uuid,

    /// Session identifier shared by the access/refresh pair.
    pub jti: Uuid,

    pub kind: TokenKind,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    #[must_use]
    pub fn user_uuid(&self) -> UserUuid {
        UserUuid::from_uuid(self.sub)
    }

    /// Expiry as a timestamp; out-of-range values clamp to the maximum.
    #[must_use]
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_second(self.exp).unwrap_or(Timestamp::MAX)
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("token lifetime is out of range")]
    Lifetime(#[source] jiff::Error),

    #[error("token could not be signed")]
    Encode(#[source] JwtError),

    #[error("token has expired")]
    Expired,

    #[error("token is invalid")]
    Invalid(#[source] JwtError),

    #[error("expected a {expected} token")]
    WrongKind { expected: TokenKind },
}

/// HMAC signing secret. Zeroed on drop.
#[derive(Clone)]
pub struct JwtSecret(Vec<u8>);

impl JwtSecret {
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self(secret.into())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for JwtSecret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl Debug for JwtSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("JwtSecret([redacted])")
    }
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub token_uuid: Uuid,
    pub access: String,
    pub refresh: String,
}

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    secret: JwtSecret,
    access_ttl: SignedDuration,
    refresh_ttl: SignedDuration,
}

impl TokenIssuer {
    #[must_use]
    pub const fn new(
        secret: JwtSecret,
        access_ttl: SignedDuration,
        refresh_ttl: SignedDuration,
    ) -> Self {
        Self {
            secret,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Issue a new session for `user`.
    ///
    /// # Errors
    ///
    /// Returns an error if a lifetime overflows or signing fails.
    pub fn issue_pair(&self, user: UserUuid, now: Timestamp) -> Result<IssuedTokens, TokenError> {
        let token_uuid = Uuid::now_v7();

        let access = self.sign(user.into_uuid(), token_uuid, TokenKind::Access, now)?;
        let refresh = self.sign(user.into_uuid(), token_uuid, TokenKind::Refresh, now)?;

        Ok(IssuedTokens {
            token_uuid,
            access,
            refresh,
        })
    }

    /// Issue a new access token in the session a refresh token belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the lifetime overflows or signing fails.
    pub fn issue_access(&self, refresh: &Claims, now: Timestamp) -> Result<String, TokenError> {
        self.sign(refresh.sub, refresh.jti, TokenKind::Access, now)
    }

    /// Check signature, expiry and kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, forged, expired, or of the other kind.
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|error| match error.kind() {
            JwtErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid(error),
        })?;

        if data.claims.kind != expected {
            return Err(TokenError::WrongKind { expected });
        }

        Ok(data.claims)
    }

    fn sign(
        &self,
        sub: Uuid,
        jti: Uuid,
        kind: TokenKind,
        now: Timestamp,
    ) -> Result<String, TokenError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };

        let expires_at = now.checked_add(ttl).map_err(TokenError::Lifetime)?;

        let claims = Claims {
            sub,
            jti,
            kind,
            iat: now.as_second(),
            exp: expires_at.as_second(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(TokenError::Encode)
    }
}
