//! Reconciliation settings

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::types::*;
use crate::utils::validation::{validate_period_days, validate_similarity_ratio};

/// Minimum description similarity for two records to be transfer legs
pub const DEFAULT_SIMILARITY_RATIO: f64 = 0.9;

/// Date format used by the bank for operation dates
pub const DEFAULT_BANK_DATE_FORMAT: &str = "%b %d, %Y, %I:%M:%S %p";

/// Number of days fetched from both sides when nothing else is configured
pub const DEFAULT_PERIOD_DAYS: u32 = 30;

/// Longest window accepted, about a century
pub const MAX_PERIOD_DAYS: u32 = 36_525;

pub const PERIOD_DAYS_ENV: &str = "GET_TRANSACTIONS_PERIOD_DAYS";
pub const SIMILARITY_RATIO_ENV: &str = "RECONCILE_SIMILARITY_RATIO";
pub const TIMEZONE_ENV: &str = "RECONCILE_TIMEZONE";

/// Settings for one reconciliation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Minimum description similarity used for transfer detection
    pub similarity_ratio: f64,
    /// Civil timezone every timestamp is expressed in
    pub timezone: Tz,
    /// `chrono` format of the bank's operation dates
    pub bank_date_format: String,
    /// How many days back both sides are fetched
    pub period_days: u32,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            similarity_ratio: DEFAULT_SIMILARITY_RATIO,
            timezone: chrono_tz::Europe::Berlin,
            bank_date_format: DEFAULT_BANK_DATE_FORMAT.to_string(),
            period_days: DEFAULT_PERIOD_DAYS,
        }
    }
}

impl ReconcileConfig {
    /// Parse settings from TOML; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> ReconcileResult<Self> {
        let config: Self =
            toml::from_str(input).map_err(|e| ReconcileError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> ReconcileResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup (the environment in production)
    pub fn with_overrides<F>(mut self, lookup: F) -> ReconcileResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(days) = lookup(PERIOD_DAYS_ENV) {
            self.period_days = days.trim().parse().map_err(|_| {
                ReconcileError::Config(format!(
                    "{} is not a number of days: '{}'",
                    PERIOD_DAYS_ENV, days
                ))
            })?;
        }

        if let Some(ratio) = lookup(SIMILARITY_RATIO_ENV) {
            self.similarity_ratio = ratio.trim().parse().map_err(|_| {
                ReconcileError::Config(format!(
                    "{} is not a ratio: '{}'",
                    SIMILARITY_RATIO_ENV, ratio
                ))
            })?;
        }

        if let Some(zone) = lookup(TIMEZONE_ENV) {
            self.timezone = zone.trim().parse().map_err(|_| {
                ReconcileError::Config(format!(
                    "{} is not a known timezone: '{}'",
                    TIMEZONE_ENV, zone
                ))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> ReconcileResult<()> {
        validate_similarity_ratio(self.similarity_ratio)?;
        validate_period_days(self.period_days)?;

        if self.bank_date_format.trim().is_empty() {
            return Err(ReconcileError::Config(
                "Bank date format cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
