//! Detection of internal transfers observed from both sides

use tracing::{info, instrument, warn};

use crate::config::DEFAULT_SIMILARITY_RATIO;
use crate::record::{MatchPolicy, Matcher, TransactionRecord};
use crate::types::*;

/// Where each record stands while merge decisions are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    /// Still eligible as probe, candidate or peer
    Pending,
    /// Already a transfer before this pass; left alone
    Settled,
    /// Kept, and absorbs the leg at the given index
    Keeps(usize),
    /// Folded into another record; dropped from the output
    Absorbed,
}

/// Outcome of a transfer resolution pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransferReport {
    /// The merged transfer records, in input order
    pub transfers: Vec<TransactionRecord>,
    /// The legs that were folded into them, in the same order
    pub absorbed: Vec<TransactionRecord>,
}

impl TransferReport {
    pub fn len(&self) -> usize {
        self.transfers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty()
    }
}

/// Collapses pairs of one-sided records that are the two legs of a single
/// internal transfer into one TRANSFER record.
///
/// Two records are legs of the same transfer when they were observed on
/// different accounts and share timestamp, amount and a similar description
/// (destination is not compared). When a record has several such
/// counterparts, the match is only accepted if the record's own account
/// shows the same number of similar records, i.e. the same transfer was
/// legitimately made several times. Otherwise resolution fails.
///
/// Decisions are all taken before any record is modified, so a failed pass
/// leaves the input untouched.
#[derive(Debug, Clone, Copy)]
pub struct TransferResolver {
    matcher: Matcher,
}

impl Default for TransferResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_RATIO)
    }
}

impl TransferResolver {
    pub fn new(similarity_ratio: f64) -> Self {
        Self {
            matcher: Matcher::new(MatchPolicy::transfer(similarity_ratio)),
        }
    }

    /// Merge transfer legs in `records`, removing the absorbed legs
    #[instrument(name = "resolve_transfers", skip_all, fields(records = records.len()))]
    pub fn resolve(&self, records: &mut Vec<TransactionRecord>) -> ReconcileResult<TransferReport> {
        let slots = self.plan(records)?;
        Ok(Self::apply(records, slots))
    }

    /// Decide every merge against the unmodified records
    fn plan(&self, records: &[TransactionRecord]) -> ReconcileResult<Vec<Slot>> {
        let mut slots: Vec<Slot> = records
            .iter()
            .map(|r| if r.is_transfer() { Slot::Settled } else { Slot::Pending })
            .collect();

        for index in 0..records.len() {
            if slots[index] != Slot::Pending {
                continue;
            }
            let probe = &records[index];

            let matches: Vec<usize> = (0..records.len())
                .filter(|&other| {
                    slots[other] == Slot::Pending
                        && records[other].found_account != probe.found_account
                        && self.matcher.is_match(probe, &records[other])
                })
                .collect();

            let Some(&counterpart) = matches.first() else {
                continue;
            };

            if matches.len() > 1 {
                // The probe counts among its own peers
                let peers = (0..records.len())
                    .filter(|&other| {
                        slots[other] == Slot::Pending
                            && records[other].found_account == probe.found_account
                            && self.matcher.is_match(probe, &records[other])
                    })
                    .count();

                if peers != matches.len() {
                    return Err(ReconcileError::AmbiguousTransfer {
                        probe: Box::new(probe.clone()),
                        candidates: matches.iter().map(|&m| records[m].clone()).collect(),
                    });
                }

                warn!(
                    record = %probe,
                    candidates = matches.len(),
                    "Several transfer counterparts found; \
                     same transfer repeated on '{}', taking the first",
                    probe.found_account
                );
            }

            let leg = &records[counterpart];
            if !probe.is_opposite_leg(leg) {
                return Err(ReconcileError::InconsistentTransferLegs {
                    first: Box::new(probe.clone()),
                    second: Box::new(leg.clone()),
                });
            }

            slots[index] = Slot::Keeps(counterpart);
            slots[counterpart] = Slot::Absorbed;
        }

        Ok(slots)
    }

    /// Fold absorbed legs into their keepers and drop them
    fn apply(records: &mut Vec<TransactionRecord>, slots: Vec<Slot>) -> TransferReport {
        let mut report = TransferReport::default();

        for (index, slot) in slots.iter().enumerate() {
            if let Slot::Keeps(counterpart) = *slot {
                let leg = records[counterpart].clone();
                records[index].absorb_leg(&leg);
                info!(
                    transfer = %records[index],
                    "Found transfer {} -> {}",
                    records[index].origin_account.as_deref().unwrap_or("?"),
                    records[index].destination_account.as_deref().unwrap_or("?")
                );
                report.transfers.push(records[index].clone());
                report.absorbed.push(leg);
            }
        }

        let resolved = std::mem::take(records);
        *records = resolved
            .into_iter()
            .zip(slots)
            .filter(|(_, slot)| *slot != Slot::Absorbed)
            .map(|(record, _)| record)
            .collect();

        report
    }
}

/// Resolve transfers with the default similarity ratio
pub fn resolve_transfers(records: &mut Vec<TransactionRecord>) -> ReconcileResult<TransferReport> {
    TransferResolver::default().resolve(records)
}
