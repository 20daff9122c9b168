//! Conversion of raw bank operations into transaction records

use bigdecimal::BigDecimal;

use crate::config::ReconcileConfig;
use crate::normalize::AccountDirectory;
use crate::record::{parse_timestamp, TransactionRecord};
use crate::types::*;
use crate::utils::validate_account_number;

/// Bank accounts that the ledger also knows about, by account number
pub fn matching_accounts(
    accounts: Vec<BankAccount>,
    directory: &AccountDirectory,
) -> Vec<BankAccount> {
    accounts
        .into_iter()
        .filter(|account| directory.contains_number(&account.number))
        .collect()
}

/// Normalize one operation observed on `account`.
///
/// A negative amount is money leaving the account (withdrawal), anything
/// else is money coming in (deposit).
pub fn normalize_operation(
    account: &BankAccount,
    operation: &RawOperation,
    config: &ReconcileConfig,
) -> ReconcileResult<TransactionRecord> {
    validate_account_number(&account.number)?;
    let timestamp = parse_timestamp(&operation.date, &config.bank_date_format, config.timezone)?;

    let record = if operation.amount < BigDecimal::from(0) {
        TransactionRecord::withdrawal(
            account.number.clone(),
            timestamp,
            operation.label.clone(),
            operation.amount.clone(),
        )
    } else {
        TransactionRecord::deposit(
            account.number.clone(),
            timestamp,
            operation.label.clone(),
            operation.amount.clone(),
        )
    };
    Ok(record)
}

/// Normalize every operation of one account, in bank order
pub fn normalize_operations(
    account: &BankAccount,
    operations: &[RawOperation],
    config: &ReconcileConfig,
) -> ReconcileResult<Vec<TransactionRecord>> {
    operations
        .iter()
        .map(|operation| normalize_operation(account, operation, config))
        .collect()
}
