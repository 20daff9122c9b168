//! Traits for the ledger and bank collaborators

use async_trait::async_trait;

use crate::types::*;

/// Access to the accounting ledger
///
/// This trait allows the reconciliation engine to work with any ledger
/// (a bookkeeping server's HTTP API, a local database, in-memory data, etc.)
/// by implementing these methods.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// List every account known to the ledger
    async fn list_accounts(&self) -> ReconcileResult<Vec<LedgerAccount>>;

    /// List the transaction splits touching `account` within `window`
    async fn list_transactions(
        &self,
        account: &LedgerAccount,
        window: &DateWindow,
    ) -> ReconcileResult<Vec<LedgerSplit>>;

    /// Create one new transaction
    async fn create_transaction(
        &mut self,
        transaction: &NewLedgerTransaction,
    ) -> ReconcileResult<()>;
}

/// Access to the bank
#[async_trait]
pub trait BankClient: Send + Sync {
    /// List the accounts visible to the authenticated user
    async fn list_accounts(&self) -> ReconcileResult<Vec<BankAccount>>;

    /// List the operations of `account` within `window`
    async fn list_operations(
        &self,
        account: &BankAccount,
        window: &DateWindow,
    ) -> ReconcileResult<Vec<RawOperation>>;
}
