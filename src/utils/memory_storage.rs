//! In-memory ledger and bank implementations for testing

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use crate::config::DEFAULT_BANK_DATE_FORMAT;
use crate::traits::*;
use crate::types::*;

/// Name the ledger gives to an unknown counterparty
pub const UNNAMED_ACCOUNT: &str = "(no name)";

/// Transaction held by [`MemoryLedger`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredTransaction {
    pub id: Uuid,
    pub split: LedgerSplit,
}

fn read<T>(lock: &RwLock<T>) -> ReconcileResult<RwLockReadGuard<'_, T>> {
    lock.read()
        .map_err(|_| ReconcileError::Collaborator("memory storage lock poisoned".to_string()))
}

fn write<T>(lock: &RwLock<T>) -> ReconcileResult<RwLockWriteGuard<'_, T>> {
    lock.write()
        .map_err(|_| ReconcileError::Collaborator("memory storage lock poisoned".to_string()))
}

/// In-memory ledger for testing and development
///
/// Clones share the same data, so a test can keep a handle while the
/// reconciler owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    accounts: Arc<RwLock<Vec<LedgerAccount>>>,
    transactions: Arc<RwLock<Vec<StoredTransaction>>>,
    reject_creates: Arc<RwLock<bool>>,
}

impl MemoryLedger {
    /// Create a new, empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_account(&self, account: LedgerAccount) -> ReconcileResult<()> {
        write(&self.accounts)?.push(account);
        Ok(())
    }

    /// Store an existing transaction
    pub fn add_transaction(&self, split: LedgerSplit) -> ReconcileResult<Uuid> {
        let id = Uuid::new_v4();
        write(&self.transactions)?.push(StoredTransaction { id, split });
        Ok(id)
    }

    /// All stored transactions, in insertion order
    pub fn transactions(&self) -> ReconcileResult<Vec<StoredTransaction>> {
        Ok(read(&self.transactions)?.clone())
    }

    /// Make every subsequent creation fail
    pub fn reject_creates(&self, reject: bool) -> ReconcileResult<()> {
        *write(&self.reject_creates)? = reject;
        Ok(())
    }

    /// Ledger-side name for an account id; unknown ends go to the cash account
    fn account_name(&self, id: Option<&str>) -> ReconcileResult<String> {
        let accounts = read(&self.accounts)?;
        let account = match id {
            Some(id) => accounts.iter().find(|account| account.id == id),
            None => accounts
                .iter()
                .find(|account| account.account_type == AccountType::Cash),
        };

        match (account, id) {
            (Some(account), _) => Ok(account.name.clone()),
            (None, None) => Ok(UNNAMED_ACCOUNT.to_string()),
            (None, Some(id)) => Err(ReconcileError::Collaborator(format!(
                "account id '{}' does not exist",
                id
            ))),
        }
    }
}

#[async_trait]
impl LedgerClient for MemoryLedger {
    async fn list_accounts(&self) -> ReconcileResult<Vec<LedgerAccount>> {
        Ok(read(&self.accounts)?.clone())
    }

    async fn list_transactions(
        &self,
        account: &LedgerAccount,
        window: &DateWindow,
    ) -> ReconcileResult<Vec<LedgerSplit>> {
        let transactions = read(&self.transactions)?;
        let filtered: Vec<LedgerSplit> = transactions
            .iter()
            .map(|stored| &stored.split)
            .filter(|split| {
                // Check if transaction affects the account
                let affects_account =
                    split.source_name == account.name || split.destination_name == account.name;
                affects_account && window.contains(split.timestamp.date_naive())
            })
            .cloned()
            .collect();
        Ok(filtered)
    }

    async fn create_transaction(
        &mut self,
        transaction: &NewLedgerTransaction,
    ) -> ReconcileResult<()> {
        if *read(&self.reject_creates)? {
            return Err(ReconcileError::Collaborator(format!(
                "creation rejected for '{}'",
                transaction.description
            )));
        }

        let split = LedgerSplit {
            kind: transaction.kind,
            timestamp: transaction.timestamp,
            amount: transaction.amount.clone(),
            description: transaction.description.clone(),
            source_name: self.account_name(transaction.source_id.as_deref())?,
            destination_name: self.account_name(transaction.destination_id.as_deref())?,
        };
        self.add_transaction(split)?;
        Ok(())
    }
}

/// In-memory bank for testing and development
///
/// Operation dates stay in the bank's textual format and are parsed with
/// `date_format` only to apply the listing window. An operation whose date
/// does not parse is always listed so that normalization reports it.
#[derive(Debug, Clone)]
pub struct MemoryBank {
    accounts: Arc<RwLock<Vec<BankAccount>>>,
    operations: Arc<RwLock<HashMap<String, Vec<RawOperation>>>>,
    date_format: String,
}

impl Default for MemoryBank {
    fn default() -> Self {
        Self {
            accounts: Arc::default(),
            operations: Arc::default(),
            date_format: DEFAULT_BANK_DATE_FORMAT.to_string(),
        }
    }
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `format` to read operation dates
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    fn in_window(&self, operation: &RawOperation, window: &DateWindow) -> bool {
        NaiveDateTime::parse_from_str(operation.date.trim(), &self.date_format)
            .map(|date| window.contains(date.date()))
            .unwrap_or(true)
    }

    pub fn add_account(&self, account: BankAccount) -> ReconcileResult<()> {
        write(&self.accounts)?.push(account);
        Ok(())
    }

    pub fn add_operation(
        &self,
        account_number: &str,
        operation: RawOperation,
    ) -> ReconcileResult<()> {
        write(&self.operations)?
            .entry(account_number.to_string())
            .or_default()
            .push(operation);
        Ok(())
    }
}

#[async_trait]
impl BankClient for MemoryBank {
    async fn list_accounts(&self) -> ReconcileResult<Vec<BankAccount>> {
        Ok(read(&self.accounts)?.clone())
    }

    async fn list_operations(
        &self,
        account: &BankAccount,
        window: &DateWindow,
    ) -> ReconcileResult<Vec<RawOperation>> {
        let operations = read(&self.operations)?;
        Ok(operations
            .get(&account.number)
            .map(|ops| {
                ops.iter()
                    .filter(|operation| self.in_window(operation, window))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}
