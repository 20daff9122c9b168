//! Canonical transaction record shared by the ledger and bank sides

use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::types::*;

/// One money movement, normalized so that records from different sources
/// can be compared.
///
/// The amount is always non-negative: direction is carried by which of
/// `origin_account` / `destination_account` is populated and by `kind`.
///
/// Equality and hashing cover origin, destination, timestamp, description,
/// amount and kind. `found_account` only says where the record was observed
/// and takes no part in equality.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    /// Account on which the record was observed
    pub found_account: String,
    /// Paying account, if known
    pub origin_account: Option<String>,
    /// Receiving account, if known
    pub destination_account: Option<String>,
    /// Point in time, expressed in the reconciliation timezone
    pub timestamp: DateTime<Tz>,
    /// Free-text label from the source system
    pub description: String,
    /// Non-negative magnitude
    pub amount: BigDecimal,
    pub kind: TransactionKind,
}

impl TransactionRecord {
    /// Create a record from its raw parts. The sign of `amount` is discarded.
    pub fn new(
        found_account: String,
        origin_account: Option<String>,
        destination_account: Option<String>,
        timestamp: DateTime<Tz>,
        description: String,
        amount: BigDecimal,
        kind: TransactionKind,
    ) -> Self {
        Self {
            found_account,
            origin_account,
            destination_account,
            timestamp,
            description,
            amount: amount.abs(),
            kind,
        }
    }

    /// Money leaving `account`, as observed on that account
    pub fn withdrawal(
        account: String,
        timestamp: DateTime<Tz>,
        description: String,
        amount: BigDecimal,
    ) -> Self {
        Self::new(
            account.clone(),
            Some(account),
            None,
            timestamp,
            description,
            amount,
            TransactionKind::Withdrawal,
        )
    }

    /// Money entering `account`, as observed on that account
    pub fn deposit(
        account: String,
        timestamp: DateTime<Tz>,
        description: String,
        amount: BigDecimal,
    ) -> Self {
        Self::new(
            account.clone(),
            None,
            Some(account),
            timestamp,
            description,
            amount,
            TransactionKind::Deposit,
        )
    }

    /// Transfer between two distinct owned accounts
    pub fn transfer(
        found_account: String,
        origin_account: String,
        destination_account: String,
        timestamp: DateTime<Tz>,
        description: String,
        amount: BigDecimal,
    ) -> ReconcileResult<Self> {
        crate::utils::validate_transfer_accounts(&origin_account, &destination_account)?;
        Ok(Self::new(
            found_account,
            Some(origin_account),
            Some(destination_account),
            timestamp,
            description,
            amount,
            TransactionKind::Transfer,
        ))
    }

    pub fn is_transfer(&self) -> bool {
        self.kind == TransactionKind::Transfer
    }

    /// Whether `self` and `other` can be the two opposite legs of one
    /// transfer: one leg supplies the origin, the other the destination, and
    /// the merged record moves money between two different accounts.
    pub fn is_opposite_leg(&self, other: &TransactionRecord) -> bool {
        if self.origin_account.is_some() && other.origin_account.is_some() {
            return false;
        }
        if self.destination_account.is_some() && other.destination_account.is_some() {
            return false;
        }

        let origin = self.origin_account.as_ref().or(other.origin_account.as_ref());
        let destination = self
            .destination_account
            .as_ref()
            .or(other.destination_account.as_ref());
        match (origin, destination) {
            (Some(origin), Some(destination)) => origin != destination,
            _ => false,
        }
    }

    /// Fold the opposite leg `other` into this record, turning it into a
    /// transfer. Callers check [`is_opposite_leg`](Self::is_opposite_leg)
    /// first.
    pub fn absorb_leg(&mut self, other: &TransactionRecord) {
        if self.origin_account.is_none() {
            self.origin_account = other.origin_account.clone();
        }
        if self.destination_account.is_none() {
            self.destination_account = other.destination_account.clone();
        }
        self.amount = self.amount.abs();
        self.kind = TransactionKind::Transfer;
    }
}

impl PartialEq for TransactionRecord {
    fn eq(&self, other: &Self) -> bool {
        self.origin_account == other.origin_account
            && self.destination_account == other.destination_account
            && self.timestamp == other.timestamp
            && self.description == other.description
            && self.amount == other.amount
            && self.kind == other.kind
    }
}

impl Eq for TransactionRecord {}

impl Hash for TransactionRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.origin_account.hash(state);
        self.destination_account.hash(state);
        self.timestamp.hash(state);
        self.description.hash(state);
        self.amount.hash(state);
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} -> {}, amount {}, date {}, description '{}'",
            self.kind,
            self.origin_account.as_deref().unwrap_or("?"),
            self.destination_account.as_deref().unwrap_or("?"),
            self.amount,
            self.timestamp.to_rfc3339(),
            self.description
        )
    }
}

/// Parse a wall-clock timestamp written in `format` and place it in `tz`
pub fn parse_timestamp(input: &str, format: &str, tz: Tz) -> ReconcileResult<DateTime<Tz>> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), format).map_err(|e| {
        ReconcileError::InvalidTimestamp {
            input: input.to_string(),
            reason: e.to_string(),
        }
    })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| ReconcileError::InvalidTimestamp {
            input: input.to_string(),
            reason: format!("local time does not exist in {}", tz.name()),
        })
}

/// Express a zone-aware timestamp in `tz`; the instant is unchanged
pub fn normalize_timestamp<Z: TimeZone>(timestamp: &DateTime<Z>, tz: Tz) -> DateTime<Tz> {
    timestamp.with_timezone(&tz)
}
