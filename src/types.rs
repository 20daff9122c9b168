//! Core types and data structures for the reconciliation engine

use bigdecimal::BigDecimal;
use chrono::{DateTime, Days, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::record::TransactionRecord;

/// Kind of money movement, as understood by the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money leaving an owned account towards the outside world
    Withdrawal,
    /// Money entering an owned account from the outside world
    Deposit,
    /// Money moving between two owned accounts
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::Deposit => "deposit",
            TransactionKind::Transfer => "transfer",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account types known to the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Bank accounts and other owned balances
    Asset,
    /// The ledger's catch-all cash account (usually without an account number)
    Cash,
    /// Expense counterparties
    Expense,
    /// Revenue counterparties
    Revenue,
    /// Loans, credit cards and other debts
    Liability,
}

impl AccountType {
    /// Whether accounts of this type take part in reconciliation
    pub fn is_reconcilable(&self) -> bool {
        matches!(self, AccountType::Asset | AccountType::Cash)
    }
}

/// Account metadata as reported by the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerAccount {
    /// Ledger-internal identifier
    pub id: String,
    /// Human-readable account name
    pub name: String,
    /// Type of account (Asset, Cash, etc.)
    pub account_type: AccountType,
    /// Bank account number, if the ledger knows it
    pub account_number: Option<String>,
    /// IBAN, if the ledger knows it
    pub iban: Option<String>,
}

impl LedgerAccount {
    /// Create a new ledger account
    pub fn new(
        id: String,
        name: String,
        account_type: AccountType,
        account_number: Option<String>,
    ) -> Self {
        Self {
            id,
            name,
            account_type,
            account_number,
            iban: None,
        }
    }

    /// Attach an IBAN to the account
    pub fn with_iban(mut self, iban: String) -> Self {
        self.iban = Some(iban);
        self
    }
}

/// One split of an existing ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSplit {
    pub kind: TransactionKind,
    pub timestamp: DateTime<FixedOffset>,
    pub amount: BigDecimal,
    pub description: String,
    pub source_name: String,
    pub destination_name: String,
}

/// Account as exposed by the bank
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankAccount {
    pub number: String,
    pub label: String,
}

/// One raw operation as listed by the bank for a single account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOperation {
    /// Operation date, in the bank's textual format
    pub date: String,
    /// Signed amount: negative for money leaving the account
    pub amount: BigDecimal,
    /// Free-text label
    pub label: String,
}

/// Record ready to be created in the ledger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLedgerTransaction {
    pub kind: TransactionKind,
    pub timestamp: DateTime<FixedOffset>,
    /// Unsigned amount
    pub amount: BigDecimal,
    pub description: String,
    pub source_id: Option<String>,
    pub destination_id: Option<String>,
}

/// Inclusive range of calendar days that a reconciliation pass covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window covering the `days` days up to and including `today`
    pub fn last_days(days: u32, today: NaiveDate) -> ReconcileResult<Self> {
        let start = today
            .checked_sub_days(Days::new(u64::from(days)))
            .ok_or_else(|| {
                ReconcileError::Config(format!(
                    "a window of {} days before {} is out of the calendar range",
                    days, today
                ))
            })?;
        Ok(Self { start, end: today })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Errors that can occur during reconciliation
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Ambiguous transfer: {probe} has {} candidate counterparts", .candidates.len())]
    AmbiguousTransfer {
        probe: Box<TransactionRecord>,
        candidates: Vec<TransactionRecord>,
    },
    #[error("Inconsistent transfer legs: {first} and {second}")]
    InconsistentTransferLegs {
        first: Box<TransactionRecord>,
        second: Box<TransactionRecord>,
    },
    #[error("Unresolvable account: {0}")]
    UnresolvableAccount(String),
    #[error("Invalid timestamp '{input}': {reason}")]
    InvalidTimestamp { input: String, reason: String },
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn day(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_window_is_inclusive() {
        let window = DateWindow::last_days(7, day(2024, 9, 10)).unwrap();

        assert_eq!(window.start, day(2024, 9, 3));
        assert!(window.contains(day(2024, 9, 3)));
        assert!(window.contains(day(2024, 9, 10)));
        assert!(!window.contains(day(2024, 9, 2)));
        assert!(!window.contains(day(2024, 9, 11)));
    }

    #[test]
    fn test_window_out_of_calendar_range_is_an_error() {
        let result = DateWindow::last_days(4_000_000_000, day(2024, 9, 10));
        assert!(matches!(result, Err(ReconcileError::Config(_))));
    }
}
