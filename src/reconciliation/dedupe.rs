//! Removal of records already present in the ledger

use tracing::{info, instrument};

use crate::record::TransactionRecord;

/// Remove from `candidates` one exact match per record of `reference`.
///
/// This is multiset subtraction: a record that appears twice in the
/// candidates but once in the reference keeps one occurrence. The removed
/// records are returned in removal order.
#[instrument(skip_all, fields(reference = reference.len(), candidates = candidates.len()))]
pub fn dedupe(
    reference: &[TransactionRecord],
    candidates: &mut Vec<TransactionRecord>,
) -> Vec<TransactionRecord> {
    let mut removed = Vec::new();

    for record in reference {
        if let Some(position) = candidates.iter().position(|candidate| candidate == record) {
            info!(
                duplicate = %record,
                "Found duplicate, removing it from the records to add"
            );
            removed.push(candidates.remove(position));
        }
    }

    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;
    use bigdecimal::BigDecimal;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    fn record(description: &str, amount: i64) -> TransactionRecord {
        TransactionRecord::withdrawal(
            "FR76-0001".to_string(),
            Berlin.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap(),
            description.to_string(),
            BigDecimal::from(amount),
        )
    }

    #[test]
    fn test_existing_record_is_removed() {
        let t1 = record("Electricity", 80);
        let t2 = record("Water", 25);
        let mut candidates = vec![t1.clone(), t2.clone()];

        let removed = dedupe(&[t1.clone()], &mut candidates);

        assert_eq!(candidates, vec![t2]);
        assert_eq!(removed, vec![t1]);
    }

    #[test]
    fn test_one_removal_per_reference_occurrence() {
        let t1 = record("Parking", 3);
        let mut candidates = vec![t1.clone(), t1.clone(), t1.clone()];

        dedupe(&[t1.clone()], &mut candidates);
        assert_eq!(candidates.len(), 2);

        dedupe(&[t1.clone(), t1.clone(), t1.clone()], &mut candidates);
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_no_match_is_silent() {
        let mut candidates = vec![record("Books", 30)];

        let removed = dedupe(&[record("Books", 31)], &mut candidates);

        assert!(removed.is_empty());
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_kind_difference_prevents_removal() {
        let existing = record("Savings", 100);
        let mut transfer = existing.clone();
        transfer.kind = TransactionKind::Transfer;
        let mut candidates = vec![transfer];

        assert!(dedupe(&[existing], &mut candidates).is_empty());
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_empty_inputs() {
        let mut candidates = Vec::new();
        assert!(dedupe(&[record("Tax", 1)], &mut candidates).is_empty());

        let mut candidates = vec![record("Tax", 1)];
        assert!(dedupe(&[], &mut candidates).is_empty());
        assert_eq!(candidates.len(), 1);
    }
}
