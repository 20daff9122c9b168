//! Mapping between source-specific data and transaction records

pub mod account;
pub mod bank;
pub mod ledger;

pub use account::*;
pub use ledger::{normalize_split, normalize_splits, to_new_transaction, to_new_transactions};
