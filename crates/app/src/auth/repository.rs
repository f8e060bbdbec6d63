//! Auth repository.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::accounts::records::UserUuid;

const FIND_SESSION_SQL: &str = include_str!("sql/find_session.sql");
const FIND_LOGIN_SQL: &str = include_str!("sql/find_login.sql");
const FIND_PASSWORD_HASH_SQL: &str = include_str!("sql/find_password_hash.sql");
const UPDATE_PASSWORD_HASH_SQL: &str = include_str!("sql/update_password_hash.sql");
const DELETE_USER_SQL: &str = include_str!("sql/delete_user.sql");
const REVOKE_TOKEN_SQL: &str = include_str!("sql/revoke_token.sql");
const PURGE_EXPIRED_REVOCATIONS_SQL: &str = include_str!("sql/purge_expired_revocations.sql");

/// Role and revocation state of the session behind a token.
#[derive(Debug, Clone, Copy, FromRow)]
pub(crate) struct SessionRow {
    pub is_staff: bool,
    pub revoked: bool,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct LoginRow {
    pub uuid: Uuid,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_session(
        &self,
        user: UserUuid,
        token_uuid: Uuid,
    ) -> Result<Option<SessionRow>, sqlx::Error> {
        query_as::<_, SessionRow>(FIND_SESSION_SQL)
            .bind(user.into_uuid())
            .bind(token_uuid)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn find_login(&self, username: &str) -> Result<Option<LoginRow>, sqlx::Error> {
        query_as::<_, LoginRow>(FIND_LOGIN_SQL)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn find_password_hash(
        &self,
        user: UserUuid,
    ) -> Result<Option<String>, sqlx::Error> {
        query_scalar::<_, String>(FIND_PASSWORD_HASH_SQL)
            .bind(user.into_uuid())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn update_password_hash(
        &self,
        user: UserUuid,
        password_hash: &str,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_PASSWORD_HASH_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_user(&self, user: UserUuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_USER_SQL)
            .bind(user.into_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Record a revoked session. Returns `false` when it was already revoked.
    pub(crate) async fn revoke_token(
        &self,
        token_uuid: Uuid,
        user: UserUuid,
        expires_at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let rows_affected = query(REVOKE_TOKEN_SQL)
            .bind(token_uuid)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(expires_at))
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected > 0)
    }

    /// Drop revocations whose tokens could no longer verify anyway.
    pub(crate) async fn purge_expired_revocations(&self, now: Timestamp) -> Result<u64, sqlx::Error> {
        let rows_affected = query(PURGE_EXPIRED_REVOCATIONS_SQL)
            .bind(SqlxTimestamp::from(now))
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
