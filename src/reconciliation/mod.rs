//! Reconciliation of bank records against the ledger
//!
//! A pass first collapses internal transfers among the bank records, then
//! strips every record the ledger already holds. What remains is new.

pub mod dedupe;
pub mod reconciler;
pub mod transfer;

pub use dedupe::*;
pub use reconciler::*;
pub use transfer::*;

use tracing::info;

use crate::config::ReconcileConfig;
use crate::record::TransactionRecord;
use crate::types::*;

/// Result of reconciling one pair of record sets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    /// Bank records missing from the ledger, ready for insertion
    pub to_insert: Vec<TransactionRecord>,
    /// Transfers detected among the bank records
    pub transfers: TransferReport,
    /// Bank records dropped because the ledger already has them
    pub duplicates: Vec<TransactionRecord>,
}

/// Resolve transfers among `bank_records`, then remove those already in
/// `ledger_records`
pub fn reconcile(
    ledger_records: &[TransactionRecord],
    bank_records: Vec<TransactionRecord>,
    config: &ReconcileConfig,
) -> ReconcileResult<ReconcileOutcome> {
    let mut to_insert = bank_records;

    let transfers = TransferResolver::new(config.similarity_ratio).resolve(&mut to_insert)?;
    let duplicates = dedupe(ledger_records, &mut to_insert);

    info!(
        transfers = transfers.len(),
        duplicates = duplicates.len(),
        remaining = to_insert.len(),
        "Reconciliation pass complete"
    );

    Ok(ReconcileOutcome {
        to_insert,
        transfers,
        duplicates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::TimeZone;
    use chrono_tz::Europe::Berlin;

    #[test]
    fn test_recorded_transfer_is_not_inserted_again() {
        let date = Berlin.with_ymd_and_hms(2024, 8, 1, 0, 0, 0).unwrap();
        let amount = BigDecimal::from(200);
        let out = TransactionRecord::withdrawal("X".into(), date, "Epargne".into(), amount.clone());
        let inbound = TransactionRecord::deposit("Y".into(), date, "Epargne".into(), amount);
        let rent =
            TransactionRecord::withdrawal("X".into(), date, "Loyer".into(), BigDecimal::from(900));
        let ledger = vec![TransactionRecord::transfer(
            "X".to_string(),
            "X".to_string(),
            "Y".to_string(),
            date,
            "Epargne".to_string(),
            BigDecimal::from(200),
        )
        .unwrap()];

        let bank = vec![out, inbound, rent.clone()];
        let outcome = reconcile(&ledger, bank, &ReconcileConfig::default()).unwrap();

        assert_eq!(outcome.transfers.len(), 1);
        assert_eq!(outcome.duplicates.len(), 1);
        assert_eq!(outcome.to_insert, vec![rent]);
    }
}
