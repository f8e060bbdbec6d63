//! Account Records

use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::uuids::TypedUuid;

/// User UUID
pub type UserUuid = TypedUuid<UserRecord>;

/// User Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A user with their spendable balance. Administrators have none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub user: UserRecord,
    pub balance: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Refund,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "DEPOSIT",
            Self::Withdrawal => "WITHDRAWAL",
            Self::Refund => "REFUND",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown transaction type '{0}'")]
pub struct UnknownTransactionKind(String);

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "DEPOSIT" => Ok(Self::Deposit),
            "WITHDRAWAL" => Ok(Self::Withdrawal),
            "REFUND" => Ok(Self::Refund),
            other => Err(UnknownTransactionKind(other.to_string())),
        }
    }
}

/// Ledger Entry UUID
pub type LedgerEntryUuid = TypedUuid<LedgerEntryRecord>;

/// One balance mutation. Withdrawals carry a negative amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntryRecord {
    pub uuid: LedgerEntryUuid,
    pub user_uuid: UserUuid,
    pub amount: Decimal,
    pub kind: TransactionKind,
    pub description: String,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_kind_parses_stored_values() {
        for kind in [
            TransactionKind::Deposit,
            TransactionKind::Withdrawal,
            TransactionKind::Refund,
        ] {
            assert_eq!(kind.as_str().parse::<TransactionKind>().ok(), Some(kind));
        }

        assert!("deposit".parse::<TransactionKind>().is_err());
    }
}
