//! Canonical transaction records and the predicates that compare them

pub mod matcher;
pub mod transaction;

pub use matcher::*;
pub use transaction::*;
