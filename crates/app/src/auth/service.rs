//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::{
    auth::{
        AuthServiceError, Credentials, IssuedTokens, PasswordChange, PasswordHasher, Principal,
        TokenIssuer, TokenKind, repository::PgAuthRepository,
    },
    domain::accounts::records::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    tokens: TokenIssuer,
    passwords: PasswordHasher,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, tokens: TokenIssuer, passwords: PasswordHasher) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            tokens,
            passwords,
        }
    }

    async fn check_password(&self, user: UserUuid, password: &str) -> Result<(), AuthServiceError> {
        let hash = self
            .repository
            .find_password_hash(user)
            .await?
            .ok_or(AuthServiceError::UnknownUser)?;

        if self.passwords.verify(password.to_string(), hash).await? {
            Ok(())
        } else {
            Err(AuthServiceError::WrongPassword)
        }
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError> {
        let claims = self
            .tokens
            .verify(bearer_token, TokenKind::Access)
            .map_err(AuthServiceError::InvalidToken)?;

        let session = self
            .repository
            .find_session(claims.user_uuid(), claims.jti)
            .await?
            .ok_or(AuthServiceError::UnknownUser)?;

        if session.revoked {
            return Err(AuthServiceError::Revoked);
        }

        Ok(Principal::from_user(claims.user_uuid(), session.is_staff))
    }

    async fn login(&self, credentials: Credentials) -> Result<IssuedTokens, AuthServiceError> {
        let login = self
            .repository
            .find_login(&credentials.username)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !self
            .passwords
            .verify(credentials.password, login.password_hash)
            .await?
        {
            return Err(AuthServiceError::InvalidCredentials);
        }

        let user = UserUuid::from_uuid(login.uuid);

        let tokens = self
            .tokens
            .issue_pair(user, Timestamp::now())
            .map_err(AuthServiceError::Issue)?;

        debug!(user_uuid = %user, token_uuid = %tokens.token_uuid, "issued session");

        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthServiceError> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(AuthServiceError::InvalidToken)?;

        let session = self
            .repository
            .find_session(claims.user_uuid(), claims.jti)
            .await?
            .ok_or(AuthServiceError::UnknownUser)?;

        if session.revoked {
            return Err(AuthServiceError::Revoked);
        }

        self.tokens
            .issue_access(&claims, Timestamp::now())
            .map_err(AuthServiceError::Issue)
    }

    async fn logout(&self, principal: Principal, refresh_token: &str) -> Result<(), AuthServiceError> {
        let claims = self
            .tokens
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(AuthServiceError::InvalidToken)?;

        if claims.user_uuid() != principal.user_uuid() {
            return Err(AuthServiceError::TokenMismatch);
        }

        let revoked = self
            .repository
            .revoke_token(claims.jti, claims.user_uuid(), claims.expires_at())
            .await?;

        if !revoked {
            return Err(AuthServiceError::Revoked);
        }

        // Housekeeping only; logout already succeeded.
        if let Err(error) = self
            .repository
            .purge_expired_revocations(Timestamp::now())
            .await
        {
            warn!(%error, "failed to purge expired revocations");
        }

        Ok(())
    }

    async fn change_password(
        &self,
        principal: Principal,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError> {
        change.validate().map_err(AuthServiceError::Validation)?;

        let user = principal.user_uuid();

        self.check_password(user, &change.old_password).await?;

        let hash = self.passwords.hash(change.new_password).await?;

        if self.repository.update_password_hash(user, &hash).await? == 0 {
            return Err(AuthServiceError::UnknownUser);
        }

        Ok(())
    }

    async fn delete_account(&self, principal: Principal, password: &str) -> Result<(), AuthServiceError> {
        let user = principal.user_uuid();

        self.check_password(user, password).await?;

        if self.repository.delete_user(user).await? == 0 {
            return Err(AuthServiceError::UnknownUser);
        }

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve an access token to the principal it was issued to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<Principal, AuthServiceError>;

    /// Exchange credentials for a new session.
    async fn login(&self, credentials: Credentials) -> Result<IssuedTokens, AuthServiceError>;

    /// Issue a new access token from a live refresh token.
    async fn refresh(&self, refresh_token: &str) -> Result<String, AuthServiceError>;

    /// Revoke the session a refresh token belongs to.
    async fn logout(&self, principal: Principal, refresh_token: &str) -> Result<(), AuthServiceError>;

    async fn change_password(
        &self,
        principal: Principal,
        change: PasswordChange,
    ) -> Result<(), AuthServiceError>;

    /// Delete the caller's account after re-checking their password.
    async fn delete_account(&self, principal: Principal, password: &str) -> Result<(), AuthServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    #[tokio::test]
    async fn login_then_authenticate_resolves_customer() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_customer("ada", "hunter22").await;

        let tokens = ctx
            .auth
            .login(Credentials {
                username: "ada".to_string(),
                password: "hunter22".to_string(),
            })
            .await?;

        let principal = ctx.auth.authenticate_bearer(&tokens.access).await?;

        assert_eq!(principal.user_uuid(), user);
        assert!(!principal.is_administrator());

        Ok(())
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let ctx = TestContext::new().await;
        ctx.create_customer("ada", "hunter22").await;

        let result = ctx
            .auth
            .login(Credentials {
                username: "ada".to_string(),
                password: "hunter23".to_string(),
            })
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::InvalidCredentials)),
            "expected InvalidCredentials, got {result:?}"
        );
    }

    #[tokio::test]
    async fn logout_revokes_access_and_refresh() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_customer("ada", "hunter22").await;

        let tokens = ctx
            .auth
            .login(Credentials {
                username: "ada".to_string(),
                password: "hunter22".to_string(),
            })
            .await?;

        let principal = ctx.auth.authenticate_bearer(&tokens.access).await?;

        ctx.auth.logout(principal, &tokens.refresh).await?;

        let access = ctx.auth.authenticate_bearer(&tokens.access).await;
        let refresh = ctx.auth.refresh(&tokens.refresh).await;
        let again = ctx.auth.logout(principal, &tokens.refresh).await;

        assert!(
            matches!(access, Err(AuthServiceError::Revoked)),
            "expected Revoked access, got {access:?}"
        );
        assert!(
            matches!(refresh, Err(AuthServiceError::Revoked)),
            "expected Revoked refresh, got {refresh:?}"
        );
        assert!(
            matches!(again, Err(AuthServiceError::Revoked)),
            "expected second logout to fail, got {again:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn logout_with_someone_elses_token_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let ada = ctx.create_customer("ada", "hunter22").await;
        ctx.create_customer("bob", "hunter22").await;

        let bobs = ctx
            .auth
            .login(Credentials {
                username: "bob".to_string(),
                password: "hunter22".to_string(),
            })
            .await?;

        let result = ctx
            .auth
            .logout(Principal::from_user(ada, false), &bobs.refresh)
            .await;

        assert!(
            matches!(result, Err(AuthServiceError::TokenMismatch)),
            "expected TokenMismatch, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn change_password_requires_old_password() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_customer("ada", "hunter22").await;
        let principal = Principal::from_user(user, false);

        let wrong = ctx
            .auth
            .change_password(
                principal,
                PasswordChange {
                    old_password: "nope-nope".to_string(),
                    new_password: "new-secret".to_string(),
                    confirm_password: "new-secret".to_string(),
                },
            )
            .await;

        assert!(
            matches!(wrong, Err(AuthServiceError::WrongPassword)),
            "expected WrongPassword, got {wrong:?}"
        );

        ctx.auth
            .change_password(
                principal,
                PasswordChange {
                    old_password: "hunter22".to_string(),
                    new_password: "new-secret".to_string(),
                    confirm_password: "new-secret".to_string(),
                },
            )
            .await?;

        ctx.auth
            .login(Credentials {
                username: "ada".to_string(),
                password: "new-secret".to_string(),
            })
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn deleted_account_cannot_authenticate() -> TestResult {
        let ctx = TestContext::new().await;
        let user = ctx.create_customer("ada", "hunter22").await;

        let tokens = ctx
            .auth
            .login(Credentials {
                username: "ada".to_string(),
                password: "hunter22".to_string(),
            })
            .await?;

        ctx.auth
            .delete_account(Principal::from_user(user, false), "hunter22")
            .await?;

        let result = ctx.auth.authenticate_bearer(&tokens.access).await;

        assert!(
            matches!(result, Err(AuthServiceError::UnknownUser)),
            "expected UnknownUser, got {result:?}"
        );

        Ok(())
    }
}
