//! Exact and fuzzy matching between transaction records

use crate::record::TransactionRecord;
use crate::utils::similarity::sequence_ratio;

/// How strictly two records have to agree to be considered the same event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchPolicy {
    /// Minimum description similarity; `None` requires identical descriptions
    pub similarity_ratio: Option<f64>,
    /// Skip the destination-account comparison
    pub ignore_destination: bool,
}

impl MatchPolicy {
    /// Identical description and destination
    pub fn exact() -> Self {
        Self {
            similarity_ratio: None,
            ignore_destination: false,
        }
    }

    /// Policy used to pair the two legs of a transfer
    pub fn transfer(similarity_ratio: f64) -> Self {
        Self {
            similarity_ratio: Some(similarity_ratio),
            ignore_destination: true,
        }
    }
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self::exact()
    }
}

/// Similarity predicate bound to a [`MatchPolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct Matcher {
    policy: MatchPolicy,
}

impl Matcher {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Same timestamp and amount, matching description and (unless ignored)
    /// the same destination account
    pub fn is_match(&self, probe: &TransactionRecord, candidate: &TransactionRecord) -> bool {
        if probe.timestamp != candidate.timestamp || probe.amount != candidate.amount {
            return false;
        }

        let description_matches = match self.policy.similarity_ratio {
            Some(ratio) => sequence_ratio(&probe.description, &candidate.description) >= ratio,
            None => probe.description == candidate.description,
        };
        if !description_matches {
            return false;
        }

        self.policy.ignore_destination || probe.destination_account == candidate.destination_account
    }

    /// Every candidate matching `probe`, in candidate order
    pub fn find<'a, I>(
        &self,
        probe: &TransactionRecord,
        candidates: I,
    ) -> Vec<&'a TransactionRecord>
    where
        I: IntoIterator<Item = &'a TransactionRecord>,
    {
        candidates
            .into_iter()
            .filter(|candidate| self.is_match(probe, candidate))
            .collect()
    }
}

/// Every candidate similar to `probe` under the given ratio and destination rule
pub fn find_similar<'a, I>(
    probe: &TransactionRecord,
    candidates: I,
    similarity_ratio: Option<f64>,
    ignore_destination: bool,
) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    Matcher::new(MatchPolicy {
        similarity_ratio,
        ignore_destination,
    })
    .find(probe, candidates)
}

/// Every candidate structurally equal to `probe`, in candidate order
pub fn find_exact<'a, I>(probe: &TransactionRecord, candidates: I) -> Vec<&'a TransactionRecord>
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    candidates
        .into_iter()
        .filter(|candidate| *candidate == probe)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, TimeZone};
    use chrono_tz::{Europe::Berlin, Tz};

    fn date(day: u32) -> DateTime<Tz> {
        Berlin.with_ymd_and_hms(2024, 5, day, 0, 0, 0).unwrap()
    }

    fn withdrawal(account: &str, day: u32, description: &str, amount: i64) -> TransactionRecord {
        TransactionRecord::withdrawal(
            account.to_string(),
            date(day),
            description.to_string(),
            BigDecimal::from(amount),
        )
    }

    fn deposit(account: &str, day: u32, description: &str, amount: i64) -> TransactionRecord {
        TransactionRecord::deposit(
            account.to_string(),
            date(day),
            description.to_string(),
            BigDecimal::from(amount),
        )
    }

    #[test]
    fn test_find_exact_on_self() {
        let record = withdrawal("X", 1, "Coffee", 4);
        let candidates = vec![record.clone()];

        assert_eq!(find_exact(&record, &candidates), vec![&candidates[0]]);
        assert!(find_exact(&record, &Vec::<TransactionRecord>::new()).is_empty());
    }

    #[test]
    fn test_find_exact_keeps_candidate_order_and_multiplicity() {
        let record = withdrawal("X", 1, "Coffee", 4);
        let candidates = vec![
            record.clone(),
            withdrawal("X", 2, "Coffee", 4),
            record.clone(),
        ];

        let found = find_exact(&record, &candidates);
        assert_eq!(found.len(), 2);
        assert!(std::ptr::eq(found[0], &candidates[0]));
        assert!(std::ptr::eq(found[1], &candidates[2]));
    }

    #[test]
    fn test_similar_requires_same_timestamp_and_amount() {
        let probe = withdrawal("X", 1, "Transfer to savings", 100);
        let candidates = vec![
            deposit("Y", 2, "Transfer to savings", 100),
            deposit("Y", 1, "Transfer to savings", 101),
        ];

        assert!(find_similar(&probe, &candidates, Some(0.9), true).is_empty());
    }

    #[test]
    fn test_similar_tolerates_small_description_differences() {
        let probe = withdrawal("X", 1, "VIREMENT EPARGNE 0042", 100);
        let candidates = vec![deposit("Y", 1, "VIREMENT EPARGNE 0043", 100)];

        assert_eq!(find_similar(&probe, &candidates, Some(0.9), true).len(), 1);
        assert!(find_similar(&probe, &candidates, None, true).is_empty());
    }

    #[test]
    fn test_similar_checks_destination_unless_ignored() {
        let probe = withdrawal("X", 1, "Savings", 100);
        let candidates = vec![deposit("Y", 1, "Savings", 100)];

        assert!(find_similar(&probe, &candidates, Some(0.9), false).is_empty());
        assert_eq!(find_similar(&probe, &candidates, Some(0.9), true).len(), 1);
    }

    #[test]
    fn test_unset_ratio_matches_exact_on_compared_fields() {
        let probe = withdrawal("X", 1, "Insurance", 60);
        let candidates = vec![
            withdrawal("Z", 1, "Insurance", 60),
            withdrawal("X", 1, "Insurance ", 60),
        ];

        // Origin is not compared, descriptions must be identical
        let similar = find_similar(&probe, &candidates, None, false);
        assert_eq!(similar.len(), 1);
        assert!(std::ptr::eq(similar[0], &candidates[0]));
        assert!(find_exact(&probe, &candidates).is_empty());

        let same = vec![probe.clone()];
        assert_eq!(find_similar(&probe, &same, None, false), find_exact(&probe, &same));
    }

    #[test]
    fn test_matcher_policy_presets() {
        assert_eq!(Matcher::default().policy(), MatchPolicy::exact());
        let transfer = MatchPolicy::transfer(0.9);
        assert_eq!(transfer.similarity_ratio, Some(0.9));
        assert!(transfer.ignore_destination);
    }
}
