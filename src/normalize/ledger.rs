//! Conversion between ledger transactions and transaction records

use chrono_tz::Tz;
use tracing::debug;

use crate::normalize::AccountDirectory;
use crate::record::{normalize_timestamp, TransactionRecord};
use crate::types::*;

/// Normalize one existing ledger split.
///
/// The source account must be known; a split whose destination is not a
/// reconcilable account (an expense or revenue counterparty) carries nothing
/// the bank could report twice and is skipped with `Ok(None)`.
pub fn normalize_split(
    split: &LedgerSplit,
    directory: &AccountDirectory,
    tz: Tz,
) -> ReconcileResult<Option<TransactionRecord>> {
    let source = directory.by_name(&split.source_name).ok_or_else(|| {
        ReconcileError::UnresolvableAccount(format!(
            "source account '{}' of ledger transaction '{}'",
            split.source_name, split.description
        ))
    })?;

    let Some(destination) = directory.by_name(&split.destination_name) else {
        debug!(
            destination = %split.destination_name,
            description = %split.description,
            "Skipping ledger transaction with unknown destination account"
        );
        return Ok(None);
    };

    let origin_account = source.account_number.clone();
    let destination_account = destination.account_number.clone();
    let found_account = origin_account
        .clone()
        .or_else(|| destination_account.clone())
        .ok_or_else(|| {
            ReconcileError::UnresolvableAccount(format!(
                "neither '{}' nor '{}' has an account number",
                source.name, destination.name
            ))
        })?;

    Ok(Some(TransactionRecord::new(
        found_account,
        origin_account,
        destination_account,
        normalize_timestamp(&split.timestamp, tz),
        split.description.clone(),
        split.amount.clone(),
        split.kind,
    )))
}

/// Normalize every split, dropping those with an unknown destination
pub fn normalize_splits(
    splits: &[LedgerSplit],
    directory: &AccountDirectory,
    tz: Tz,
) -> ReconcileResult<Vec<TransactionRecord>> {
    let mut records = Vec::with_capacity(splits.len());
    for split in splits {
        if let Some(record) = normalize_split(split, directory, tz)? {
            records.push(record);
        }
    }
    Ok(records)
}

/// Map a finalized record back to the ledger's creation shape.
///
/// Account numbers are turned into ledger account ids. When both ends
/// resolve to the same ledger account, the source is dropped so the ledger
/// does not see a self-transfer.
pub fn to_new_transaction(
    record: &TransactionRecord,
    directory: &AccountDirectory,
) -> NewLedgerTransaction {
    let mut source = directory.by_optional_number(record.origin_account.as_deref());
    let destination = directory.by_optional_number(record.destination_account.as_deref());

    if let (Some(s), Some(d)) = (source, destination) {
        if s.id == d.id {
            source = None;
        }
    }

    NewLedgerTransaction {
        kind: record.kind,
        timestamp: record.timestamp.fixed_offset(),
        amount: record.amount.abs(),
        description: record.description.clone(),
        source_id: source.map(|account| account.id.clone()),
        destination_id: destination.map(|account| account.id.clone()),
    }
}

pub fn to_new_transactions(
    records: &[TransactionRecord],
    directory: &AccountDirectory,
) -> Vec<NewLedgerTransaction> {
    records
        .iter()
        .map(|record| to_new_transaction(record, directory))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, TimeZone};
    use chrono_tz::Europe::Berlin;

    fn directory() -> AccountDirectory {
        AccountDirectory::new(vec![
            LedgerAccount::new(
                "1".to_string(),
                "Checking".to_string(),
                AccountType::Asset,
                Some("0001".to_string()),
            ),
            LedgerAccount::new(
                "2".to_string(),
                "Savings".to_string(),
                AccountType::Asset,
                Some("0002".to_string()),
            ),
            LedgerAccount::new("3".to_string(), "Cash".to_string(), AccountType::Cash, None),
        ])
    }

    fn split(kind: TransactionKind, source: &str, destination: &str) -> LedgerSplit {
        LedgerSplit {
            kind,
            timestamp: DateTime::parse_from_rfc3339("2024-04-10T00:00:00+02:00").unwrap(),
            amount: BigDecimal::from(30),
            description: "Movement".to_string(),
            source_name: source.to_string(),
            destination_name: destination.to_string(),
        }
    }

    fn normalize(
        kind: TransactionKind,
        source: &str,
        destination: &str,
    ) -> ReconcileResult<Option<TransactionRecord>> {
        normalize_split(&split(kind, source, destination), &directory(), Berlin)
    }

    #[test]
    fn test_transfer_split() {
        let record = normalize(TransactionKind::Transfer, "Checking", "Savings")
            .unwrap()
            .unwrap();

        assert_eq!(record.found_account, "0001");
        assert_eq!(record.origin_account.as_deref(), Some("0001"));
        assert_eq!(record.destination_account.as_deref(), Some("0002"));
        assert_eq!(record.timestamp, Berlin.with_ymd_and_hms(2024, 4, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_withdrawal_to_cash_has_no_destination_number() {
        let record = normalize(TransactionKind::Withdrawal, "Checking", "Cash")
            .unwrap()
            .unwrap();

        assert_eq!(record.origin_account.as_deref(), Some("0001"));
        assert_eq!(record.destination_account, None);
    }

    #[test]
    fn test_deposit_from_cash_is_found_on_destination() {
        let record = normalize(TransactionKind::Deposit, "Cash", "Savings")
            .unwrap()
            .unwrap();

        assert_eq!(record.found_account, "0002");
        assert_eq!(record.origin_account, None);
    }

    #[test]
    fn test_unknown_destination_is_skipped() {
        let splits = vec![
            split(TransactionKind::Withdrawal, "Checking", "Supermarket"),
            split(TransactionKind::Transfer, "Checking", "Savings"),
        ];

        let records = normalize_splits(&splits, &directory(), Berlin).unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_transfer());
    }

    #[test]
    fn test_unknown_source_is_fatal() {
        let result = normalize(TransactionKind::Deposit, "Employer", "Checking");
        assert!(matches!(result, Err(ReconcileError::UnresolvableAccount(_))));
    }

    #[test]
    fn test_cash_to_cash_is_unresolvable() {
        let result = normalize(TransactionKind::Transfer, "Cash", "Cash");
        assert!(matches!(result, Err(ReconcileError::UnresolvableAccount(_))));
    }

    #[test]
    fn test_new_transaction_maps_numbers_to_ids() {
        let record = TransactionRecord::transfer(
            "0001".to_string(),
            "0001".to_string(),
            "0002".to_string(),
            Berlin.with_ymd_and_hms(2024, 4, 10, 9, 0, 0).unwrap(),
            "Savings".to_string(),
            BigDecimal::from(100),
        )
        .unwrap();

        let new = to_new_transaction(&record, &directory());

        assert_eq!(new.kind, TransactionKind::Transfer);
        assert_eq!(new.source_id.as_deref(), Some("1"));
        assert_eq!(new.destination_id.as_deref(), Some("2"));
        assert_eq!(new.amount, BigDecimal::from(100));
        assert_eq!(
            new.timestamp,
            DateTime::parse_from_rfc3339("2024-04-10T09:00:00+02:00").unwrap()
        );
    }

    #[test]
    fn test_new_transaction_for_unknown_counterparty() {
        let record = TransactionRecord::withdrawal(
            "0001".to_string(),
            Berlin.with_ymd_and_hms(2024, 4, 10, 9, 0, 0).unwrap(),
            "Bakery".to_string(),
            BigDecimal::from(-3),
        );

        let new = to_new_transaction(&record, &directory());
        assert_eq!(new.source_id.as_deref(), Some("1"));
        assert_eq!(new.destination_id, None);
        assert_eq!(new.amount, BigDecimal::from(3));
    }

    #[test]
    fn test_same_account_on_both_ends_drops_source() {
        let mut record = TransactionRecord::deposit(
            "0001".to_string(),
            Berlin.with_ymd_and_hms(2024, 4, 10, 9, 0, 0).unwrap(),
            "Correction".to_string(),
            BigDecimal::from(5),
        );
        record.origin_account = Some("0001".to_string());

        let new = to_new_transaction(&record, &directory());
        assert_eq!(new.source_id, None);
        assert_eq!(new.destination_id.as_deref(), Some("1"));
    }
}
