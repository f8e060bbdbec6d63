//! Balance ledger.
//!
//! Every balance change yields a [`PendingEntry`] that the caller appends to
//! the transaction log in the same database transaction as the balance write.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    auth::CustomerUuid,
    domain::{accounts::records::TransactionKind, money::fits_column},
};

pub const DEPOSIT_DESCRIPTION: &str = "Funds deposited";
pub const WITHDRAWAL_DESCRIPTION: &str = "Order payment";
pub const REFUND_DESCRIPTION: &str = "Order refund";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("amount must be greater than zero")]
    NonPositiveAmount,

    #[error("account has no balance")]
    NoBalance,

    #[error("insufficient balance: {balance} available, {required} required")]
    InsufficientFunds { balance: Decimal, required: Decimal },

    #[error("amount too large: {balance} held, {amount} added")]
    AmountTooLarge { balance: Decimal, amount: Decimal },
}

/// A transaction-log row produced by a balance change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
}

/// A customer's balance as read under lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerBalance {
    customer: CustomerUuid,
    amount: Option<Decimal>,
}

impl CustomerBalance {
    #[must_use]
    pub const fn new(customer: CustomerUuid, amount: Option<Decimal>) -> Self {
        Self { customer, amount }
    }

    #[must_use]
    pub const fn customer(&self) -> CustomerUuid {
        self.customer
    }

    /// Stored balance; `None` only for legacy rows that never had one.
    #[must_use]
    pub const fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    /// Balance with an unset value read as zero.
    #[must_use]
    pub fn available(&self) -> Decimal {
        self.amount.unwrap_or(Decimal::ZERO)
    }

    /// # Errors
    ///
    /// Returns [`LedgerError::NonPositiveAmount`] unless `amount > 0`, and
    /// [`LedgerError::AmountTooLarge`] when the new balance would not fit the
    /// balance column.
    pub fn deposit(&mut self, amount: Decimal) -> Result<PendingEntry, LedgerError> {
        self.credit(amount, TransactionKind::Deposit, DEPOSIT_DESCRIPTION.to_string())
    }

    /// # Errors
    ///
    /// Returns an error when `amount` is not positive, the balance is unset,
    /// or the balance is below `amount`. The balance is unchanged on error.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<PendingEntry, LedgerError> {
        ensure_positive(amount)?;

        let balance = self.amount.ok_or(LedgerError::NoBalance)?;

        if balance < amount {
            return Err(LedgerError::InsufficientFunds {
                balance,
                required: amount,
            });
        }

        self.amount = Some(balance - amount);

        Ok(PendingEntry {
            kind: TransactionKind::Withdrawal,
            amount: -amount,
            description: WITHDRAWAL_DESCRIPTION.to_string(),
        })
    }

    /// # Errors
    ///
    /// Same as [`Self::deposit`].
    pub fn refund(
        &mut self,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Result<PendingEntry, LedgerError> {
        self.credit(amount, TransactionKind::Refund, description.into())
    }

    fn credit(
        &mut self,
        amount: Decimal,
        kind: TransactionKind,
        description: String,
    ) -> Result<PendingEntry, LedgerError> {
        ensure_positive(amount)?;

        let balance = self.available();

        let credited = balance
            .checked_add(amount)
            .filter(|credited| fits_column(*credited))
            .ok_or(LedgerError::AmountTooLarge { balance, amount })?;

        self.amount = Some(credited);

        Ok(PendingEntry {
            kind,
            amount,
            description,
        })
    }
}

fn ensure_positive(amount: Decimal) -> Result<(), LedgerError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(LedgerError::NonPositiveAmount)
    }
}
