//! # Bank Reconcile
//!
//! Reconciles the transactions fetched from a bank against those already
//! recorded in an accounting ledger, producing the minimal set of new
//! transactions to insert.
//!
//! ## Features
//!
//! - **Canonical records**: one comparable, hashable representation for both sides
//! - **Exact and fuzzy matching**: gestalt similarity on descriptions
//! - **Transfer detection**: the two legs of an internal transfer become one record
//! - **Deduplication**: records the ledger already holds are dropped, one per occurrence
//! - **Collaborator abstraction**: ledger and bank access through async traits
//!
//! ## Quick Start
//!
//! ```rust
//! use bank_reconcile::{reconcile, ReconcileConfig, TransactionRecord};
//! use bigdecimal::BigDecimal;
//! use chrono::TimeZone;
//! use chrono_tz::Europe::Berlin;
//!
//! let date = Berlin.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
//! let amount = BigDecimal::from(50);
//! let bank = vec![
//!     TransactionRecord::withdrawal("0001".into(), date, "Savings".into(), amount.clone()),
//!     TransactionRecord::deposit("0002".into(), date, "Savings".into(), amount),
//! ];
//!
//! let outcome = reconcile(&[], bank, &ReconcileConfig::default()).unwrap();
//! assert_eq!(outcome.to_insert.len(), 1);
//! assert!(outcome.to_insert[0].is_transfer());
//! ```

pub mod config;
pub mod normalize;
pub mod reconciliation;
pub mod record;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::*;
pub use reconciliation::*;
pub use record::*;
pub use traits::*;
pub use types::*;
