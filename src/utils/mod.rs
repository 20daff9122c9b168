//! Utility modules

pub mod memory_storage;
pub mod similarity;
pub mod validation;

pub use memory_storage::*;
pub use similarity::*;
pub use validation::*;
