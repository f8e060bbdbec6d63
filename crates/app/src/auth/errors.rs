//! Auth service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{
    auth::{PasswordError, TokenError},
    validation::FieldErrors,
};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The presented token failed verification.
    #[error("invalid token")]
    InvalidToken(#[source] TokenError),

    /// The session was logged out.
    #[error("token has been revoked")]
    Revoked,

    /// The refresh token belongs to a different user than the caller.
    #[error("token does not belong to the caller")]
    TokenMismatch,

    /// The token's user no longer exists.
    #[error("user not found")]
    UnknownUser,

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("password is incorrect")]
    WrongPassword,

    #[error("invalid input: {0}")]
    Validation(FieldErrors),

    #[error("token issuance failed")]
    Issue(#[source] TokenError),

    #[error("password processing failed")]
    Password(#[from] PasswordError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for AuthServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
