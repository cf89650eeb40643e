// 🔧 Ledger configuration - start-up settings for a conversation ledger

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings a ledger is created with. Loaded from JSON or defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Capital posted at initialization (Cash debit, Owner's Capital credit).
    #[serde(default = "LedgerConfig::default_opening_capital")]
    pub opening_capital: Decimal,

    /// Currency symbol used in replies and reports.
    #[serde(default = "LedgerConfig::default_currency")]
    pub currency: String,
}

impl LedgerConfig {
    /// Load settings from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    fn default_opening_capital() -> Decimal {
        Decimal::new(100_000, 2) // 1000.00
    }

    fn default_currency() -> String {
        "$".to_string()
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        LedgerConfig {
            opening_capital: Self::default_opening_capital(),
            currency: Self::default_currency(),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
