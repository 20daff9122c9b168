//! Reconciliation pass over in-memory ledger and bank data

use bank_reconcile::utils::{MemoryBank, MemoryLedger};
use bank_reconcile::{
    AccountType, BankAccount, LedgerAccount, LedgerSplit, RawOperation, ReconcileConfig,
    Reconciler, TransactionKind,
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate};
use std::io::stderr;
use std::str::FromStr;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, Layer};

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry().with(terminal_log).init();
}

fn operation(
    date: &str,
    amount: &str,
    label: &str,
) -> Result<RawOperation, Box<dyn std::error::Error>> {
    Ok(RawOperation {
        date: date.to_string(),
        amount: BigDecimal::from_str(amount)?,
        label: label.to_string(),
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    setup_logging(LevelFilter::INFO);

    let config = ReconcileConfig::default().with_env_overrides()?;

    // 1. The ledger knows two bank accounts and a cash account
    let ledger = MemoryLedger::new();
    ledger.add_account(LedgerAccount::new(
        "1".to_string(),
        "Checking".to_string(),
        AccountType::Asset,
        Some("00012345".to_string()),
    ))?;
    ledger.add_account(LedgerAccount::new(
        "2".to_string(),
        "Savings".to_string(),
        AccountType::Asset,
        Some("00067890".to_string()),
    ))?;
    ledger.add_account(LedgerAccount::new(
        "3".to_string(),
        "Cash".to_string(),
        AccountType::Cash,
        None,
    ))?;

    // The rent was already entered by hand
    ledger.add_transaction(LedgerSplit {
        kind: TransactionKind::Withdrawal,
        timestamp: DateTime::parse_from_rfc3339("2024-10-01T00:00:00+02:00")?,
        amount: BigDecimal::from(850),
        description: "PRLV LOYER OCTOBRE".to_string(),
        source_name: "Checking".to_string(),
        destination_name: "Cash".to_string(),
    })?;

    // 2. What the bank reports for the same period
    let bank = MemoryBank::new();
    bank.add_account(BankAccount {
        number: "00012345".to_string(),
        label: "Compte courant".to_string(),
    })?;
    bank.add_account(BankAccount {
        number: "00067890".to_string(),
        label: "Livret A".to_string(),
    })?;
    bank.add_operation(
        "00012345",
        operation("Oct 01, 2024, 12:00:00 AM", "-850", "PRLV LOYER OCTOBRE")?,
    )?;
    bank.add_operation(
        "00012345",
        operation("Oct 03, 2024, 12:00:00 AM", "-200", "VIR EPARGNE MENSUEL")?,
    )?;
    bank.add_operation(
        "00012345",
        operation("Oct 04, 2024, 12:00:00 AM", "-37.90", "CB PHARMACIE")?,
    )?;
    bank.add_operation(
        "00067890",
        operation("Oct 03, 2024, 12:00:00 AM", "200", "VIR EPARGNE MENSUEL")?,
    )?;

    // 3. Reconcile
    let mut reconciler = Reconciler::with_config(ledger.clone(), bank, config)?;
    let today = NaiveDate::from_ymd_opt(2024, 10, 5).ok_or("invalid date")?;

    let plan = reconciler.plan(today).await?;
    println!("Window: {} .. {}", plan.window.start, plan.window.end);
    for record in &plan.outcome.to_insert {
        println!("  + {}", record);
    }

    let report = reconciler.run_on(today).await?;
    println!(
        "Transfers: {}, duplicates: {}, created: {}, failed: {}",
        report.transfers, report.duplicates, report.created, report.failed
    );

    for stored in ledger.transactions()? {
        println!(
            "  {} [{}] {} -> {}: {} ({})",
            stored.id,
            stored.split.kind,
            stored.split.source_name,
            stored.split.destination_name,
            stored.split.amount,
            stored.split.description
        );
    }

    Ok(())
}
