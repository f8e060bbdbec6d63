//! Accounts service.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    auth::{CustomerUuid, PasswordHasher},
    database::Db,
    domain::accounts::{
        data::{AccountRole, NewAccount},
        errors::AccountsServiceError,
        records::{LedgerEntryRecord, ProfileRecord, UserRecord, UserUuid},
        repository::{NewUserRow, PgAccountsRepository},
    },
};

#[derive(Debug, Clone)]
pub struct PgAccountsService {
    db: Db,
    repository: PgAccountsRepository,
    passwords: PasswordHasher,
}

impl PgAccountsService {
    #[must_use]
    pub fn new(db: Db, passwords: PasswordHasher) -> Self {
        Self {
            db,
            repository: PgAccountsRepository::new(),
            passwords,
        }
    }
}

#[async_trait]
impl AccountsService for PgAccountsService {
    async fn create_account(
        &self,
        account: NewAccount,
        role: AccountRole,
    ) -> Result<UserRecord, AccountsServiceError> {
        account.validate().map_err(AccountsServiceError::Validation)?;

        let NewAccount {
            uuid,
            username,
            email,
            password,
        } = account;

        let password_hash = self.passwords.hash(password).await?;

        let mut tx = self.db.begin().await?;

        let user = self
            .repository
            .create_user(
                &mut tx,
                NewUserRow {
                    uuid,
                    username: &username,
                    email: &email,
                    password_hash: &password_hash,
                    is_staff: role.is_staff(),
                },
            )
            .await?;

        self.repository
            .create_profile(&mut tx, user.uuid, role.opening_balance())
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user.uuid, is_staff = user.is_staff, "created account");

        Ok(user)
    }

    async fn get_profile(&self, user: UserUuid) -> Result<ProfileRecord, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let profile = self.repository.get_profile(&mut tx, user).await?;

        tx.commit().await?;

        Ok(profile)
    }

    async fn deposit(
        &self,
        customer: CustomerUuid,
        amount: Decimal,
    ) -> Result<Decimal, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut balance = self.repository.lock_balance(&mut tx, customer).await?;

        let entry = balance.deposit(amount)?;

        self.repository.record(&mut tx, &balance, entry).await?;

        tx.commit().await?;

        Ok(balance.available())
    }

    async fn list_transactions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<LedgerEntryRecord>, AccountsServiceError> {
        let mut tx = self.db.begin().await?;

        let entries = self.repository.list_entries(&mut tx, user).await?;

        tx.commit().await?;

        Ok(entries)
    }
}

#[automock]
#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Create a user and their profile in one transaction.
    async fn create_account(
        &self,
        account: NewAccount,
        role: AccountRole,
    ) -> Result<UserRecord, AccountsServiceError>;

    async fn get_profile(&self, user: UserUuid) -> Result<ProfileRecord, AccountsServiceError>;

    /// Credit a customer's balance. Returns the new balance.
    async fn deposit(
        &self,
        customer: CustomerUuid,
        amount: Decimal,
    ) -> Result<Decimal, AccountsServiceError>;

    /// Ledger entries for `user`, newest first.
    async fn list_transactions(
        &self,
        user: UserUuid,
    ) -> Result<Vec<LedgerEntryRecord>, AccountsServiceError>;
}
