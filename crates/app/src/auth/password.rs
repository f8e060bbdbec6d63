//! Password hashing.

use thiserror::Error;
use tokio::task::{self, JoinError};

use crate::validation::FieldErrors;

/// Shortest password accepted at registration or password change.
pub const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password hashing failed")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("password hashing task failed")]
    Task(#[from] JoinError),
}

/// bcrypt hasher. Work runs on the blocking pool so request threads stay free.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    #[must_use]
    pub const fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password.
    ///
    /// # Errors
    ///
    /// Returns an error if bcrypt rejects the cost or the blocking task panics.
    pub async fn hash(&self, password: String) -> Result<String, PasswordError> {
        let cost = self.cost;

        let hash = task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;

        Ok(hash)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored hash is malformed or the blocking task panics.
    pub async fn verify(&self, password: String, hash: String) -> Result<bool, PasswordError> {
        let matches = task::spawn_blocking(move || bcrypt::verify(password, &hash)).await??;

        Ok(matches)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

pub(crate) fn check_password_strength(errors: &mut FieldErrors, field: &'static str, password: &str) {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(
            field,
            format!("Ensure this field has at least {MIN_PASSWORD_CHARS} characters."),
        );
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    const TEST_COST: u32 = 4;

    #[tokio::test]
    async fn hashed_password_verifies() -> TestResult {
        let hasher = PasswordHasher::new(TEST_COST);

        let hash = hasher.hash("hunter22".to_string()).await?;

        assert_ne!(hash, "hunter22", "hash must not be the plaintext");
        assert!(hasher.verify("hunter22".to_string(), hash.clone()).await?);
        assert!(!hasher.verify("hunter23".to_string(), hash).await?);

        Ok(())
    }

    #[tokio::test]
    async fn malformed_hash_is_an_error() {
        let hasher = PasswordHasher::new(TEST_COST);

        let result = hasher
            .verify("hunter22".to_string(), "not-a-hash".to_string())
            .await;

        assert!(
            matches!(result, Err(PasswordError::Hash(_))),
            "expected Hash error, got {result:?}"
        );
    }

    #[test]
    fn short_passwords_are_rejected() {
        let mut errors = FieldErrors::new();

        check_password_strength(&mut errors, "password", "12345");
        assert!(errors.has("password"), "five characters is too short");

        let mut errors = FieldErrors::new();

        check_password_strength(&mut errors, "password", "123456");
        assert!(errors.is_empty(), "six characters is enough");
    }
}
