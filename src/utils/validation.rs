//! Validation utilities

use crate::config::MAX_PERIOD_DAYS;
use crate::types::*;

/// Validate that a similarity ratio lies in `(0.0, 1.0]`
pub fn validate_similarity_ratio(ratio: f64) -> ReconcileResult<()> {
    if !(ratio > 0.0 && ratio <= 1.0) {
        return Err(ReconcileError::Config(format!(
            "Similarity ratio must be in (0, 1], got {}",
            ratio
        )));
    }
    Ok(())
}

/// Validate the length of the reconciliation window
pub fn validate_period_days(days: u32) -> ReconcileResult<()> {
    if days == 0 {
        return Err(ReconcileError::Config(
            "Reconciliation period must cover at least one day".to_string(),
        ));
    }
    if days > MAX_PERIOD_DAYS {
        return Err(ReconcileError::Config(format!(
            "Reconciliation period cannot exceed {} days, got {}",
            MAX_PERIOD_DAYS, days
        )));
    }
    Ok(())
}

/// Validate that an account identifier is usable
pub fn validate_account_number(account_number: &str) -> ReconcileResult<()> {
    if account_number.trim().is_empty() {
        return Err(ReconcileError::InvalidRecord(
            "Account number cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validate the two ends of a transfer
pub fn validate_transfer_accounts(origin: &str, destination: &str) -> ReconcileResult<()> {
    validate_account_number(origin)?;
    validate_account_number(destination)?;

    if origin == destination {
        return Err(ReconcileError::InvalidRecord(format!(
            "Transfer origin and destination are the same account '{}'",
            origin
        )));
    }
    Ok(())
}
