//! Accounts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    auth::CustomerUuid,
    domain::accounts::{
        ledger::{CustomerBalance, PendingEntry},
        records::{
            LedgerEntryRecord, LedgerEntryUuid, ProfileRecord, TransactionKind, UserRecord,
            UserUuid,
        },
    },
};

const CREATE_USER_SQL: &str = include_str!("sql/create_user.sql");
const CREATE_PROFILE_SQL: &str = include_str!("sql/create_profile.sql");
const GET_PROFILE_SQL: &str = include_str!("sql/get_profile.sql");
const LOCK_BALANCE_SQL: &str = include_str!("sql/lock_balance.sql");
const UPDATE_BALANCE_SQL: &str = include_str!("sql/update_balance.sql");
const CREATE_ENTRY_SQL: &str = include_str!("sql/create_entry.sql");
const LIST_ENTRIES_SQL: &str = include_str!("sql/list_entries.sql");

/// Columns for a new `users` row.
#[derive(Debug, Clone)]
pub(crate) struct NewUserRow<'a> {
    pub uuid: UserUuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_staff: bool,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAccountsRepository;

impl PgAccountsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: NewUserRow<'_>,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.uuid.into_uuid())
            .bind(user.username)
            .bind(user.email)
            .bind(user.password_hash)
            .bind(user.is_staff)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        balance: Option<Decimal>,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_PROFILE_SQL)
            .bind(user.into_uuid())
            .bind(balance)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<ProfileRecord, sqlx::Error> {
        query_as::<Postgres, ProfileRecord>(GET_PROFILE_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Read a customer's balance and hold its row lock until the transaction ends.
    pub(crate) async fn lock_balance(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<CustomerBalance, sqlx::Error> {
        let amount = query_scalar::<Postgres, Option<Decimal>>(LOCK_BALANCE_SQL)
            .bind(customer.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(CustomerBalance::new(customer, amount))
    }

    /// Persist a changed balance together with the entry describing the change.
    pub(crate) async fn record(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        balance: &CustomerBalance,
        entry: PendingEntry,
    ) -> Result<LedgerEntryRecord, sqlx::Error> {
        let user = balance.customer().user();

        query(UPDATE_BALANCE_SQL)
            .bind(user.into_uuid())
            .bind(balance.amount())
            .execute(&mut **tx)
            .await?;

        query_as::<Postgres, LedgerEntryRecord>(CREATE_ENTRY_SQL)
            .bind(LedgerEntryUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(entry.amount)
            .bind(entry.kind.as_str())
            .bind(entry.description)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<LedgerEntryRecord>, sqlx::Error> {
        query_as::<Postgres, LedgerEntryRecord>(LIST_ENTRIES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            is_staff: row.try_get("is_staff")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProfileRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let user = UserRecord::from_row(row)?;

        // Administrators never carry a balance, whatever the column says.
        let balance = if user.is_staff {
            None
        } else {
            row.try_get::<Option<Decimal>, _>("balance")?
        };

        Ok(Self { user, balance })
    }
}

impl<'r> FromRow<'r, PgRow> for LedgerEntryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let kind = row
            .try_get::<&str, _>("transaction_type")?
            .parse::<TransactionKind>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "transaction_type".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: LedgerEntryUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            amount: row.try_get("amount")?,
            kind,
            description: row.try_get("description")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
