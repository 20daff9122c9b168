//! Reconciler that coordinates the ledger, the bank and the engine

use chrono::{NaiveDate, Utc};
use tracing::{error, info, instrument};

use crate::config::ReconcileConfig;
use crate::normalize::{self, bank, AccountDirectory};
use crate::reconciliation::{reconcile, ReconcileOutcome};
use crate::record::TransactionRecord;
use crate::traits::*;
use crate::types::*;

/// Everything a pass would write, computed without writing it
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    pub window: DateWindow,
    pub outcome: ReconcileOutcome,
    /// `outcome.to_insert` in the ledger's creation shape, same order
    pub transactions: Vec<NewLedgerTransaction>,
}

/// Summary of a completed pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub transfers: usize,
    pub duplicates: usize,
    pub created: usize,
    pub failed: usize,
}

/// Main reconciler that runs one pass between a ledger and a bank
pub struct Reconciler<L: LedgerClient, B: BankClient> {
    ledger: L,
    bank: B,
    config: ReconcileConfig,
}

impl<L: LedgerClient, B: BankClient> Reconciler<L, B> {
    /// Create a new reconciler with default settings
    pub fn new(ledger: L, bank: B) -> Self {
        Self {
            ledger,
            bank,
            config: ReconcileConfig::default(),
        }
    }

    /// Create a new reconciler with custom settings
    pub fn with_config(ledger: L, bank: B, config: ReconcileConfig) -> ReconcileResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger,
            bank,
            config,
        })
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Window of `period_days` days ending on `today`
    pub fn window(&self, today: NaiveDate) -> ReconcileResult<DateWindow> {
        DateWindow::last_days(self.config.period_days, today)
    }

    /// Today's date in the reconciliation timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.config.timezone).date_naive()
    }

    /// Compute what a pass ending on `today` would create
    #[instrument(skip(self))]
    pub async fn plan(&self, today: NaiveDate) -> ReconcileResult<ReconcilePlan> {
        let window = self.window(today)?;
        let directory = AccountDirectory::new(self.ledger.list_accounts().await?);
        info!(
            "Reconcilable ledger accounts: {:?}",
            directory.accounts().iter().map(|a| a.name.as_str()).collect::<Vec<_>>()
        );

        let ledger_records = self.fetch_ledger_records(&directory, &window).await?;
        let bank_records = self.fetch_bank_records(&directory, &window).await?;

        let outcome = reconcile(&ledger_records, bank_records, &self.config)?;
        let transactions = normalize::to_new_transactions(&outcome.to_insert, &directory);

        Ok(ReconcilePlan {
            window,
            outcome,
            transactions,
        })
    }

    /// Run a full pass ending on `today` and create the missing records.
    ///
    /// A failed creation is logged and counted; the remaining records are
    /// still created.
    pub async fn run_on(&mut self, today: NaiveDate) -> ReconcileResult<ReconcileReport> {
        info!("Starting new import process");
        let plan = self.plan(today).await?;

        let mut report = ReconcileReport {
            transfers: plan.outcome.transfers.len(),
            duplicates: plan.outcome.duplicates.len(),
            ..ReconcileReport::default()
        };

        for transaction in &plan.transactions {
            match self.ledger.create_transaction(transaction).await {
                Ok(()) => {
                    info!(
                        description = %transaction.description,
                        amount = %transaction.amount,
                        "Stored new transaction"
                    );
                    report.created += 1;
                }
                Err(e) => {
                    error!(
                        description = %transaction.description,
                        "Failed to store transaction: {}",
                        e
                    );
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }

    /// Run a full pass ending today
    pub async fn run(&mut self) -> ReconcileResult<ReconcileReport> {
        let today = self.today();
        self.run_on(today).await
    }

    async fn fetch_ledger_records(
        &self,
        directory: &AccountDirectory,
        window: &DateWindow,
    ) -> ReconcileResult<Vec<TransactionRecord>> {
        let mut records = Vec::new();
        for account in directory.fetchable() {
            let splits = self.ledger.list_transactions(&account, window).await?;
            records.extend(normalize::normalize_splits(&splits, directory, self.config.timezone)?);
        }
        Ok(records)
    }

    async fn fetch_bank_records(
        &self,
        directory: &AccountDirectory,
        window: &DateWindow,
    ) -> ReconcileResult<Vec<TransactionRecord>> {
        let accounts = bank::matching_accounts(self.bank.list_accounts().await?, directory);

        let mut records = Vec::new();
        for account in &accounts {
            let operations = self.bank.list_operations(account, window).await?;
            records.extend(bank::normalize_operations(account, &operations, &self.config)?);
        }
        Ok(records)
    }
}
