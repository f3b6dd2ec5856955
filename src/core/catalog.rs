//! Static currency metadata used to decorate conversion results.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::debug;

const BUILTIN_CATALOG: &str = include_str!("../../assets/currencies.json");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: String,
    pub name: String,
    pub symbol: String,
    /// Flag asset key, e.g. `eu` for `https://flagcdn.com/w40/eu.png`.
    pub flag: String,
}

#[derive(Debug, Clone)]
pub struct CurrencyCatalog {
    currencies: Vec<CurrencyInfo>,
}

impl CurrencyCatalog {
    /// The catalog bundled with the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG).context("Failed to parse built-in currency catalog")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read currency catalog: {}", path.as_ref().display())
        })?;
        Self::from_json(&content).with_context(|| {
            format!("Failed to parse currency catalog: {}", path.as_ref().display())
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let currencies: Vec<CurrencyInfo> = serde_json::from_str(json)?;
        Self::new(currencies)
    }

    pub fn new(currencies: Vec<CurrencyInfo>) -> Result<Self> {
        let mut seen = HashSet::new();
        for currency in &currencies {
            if currency.code.is_empty() {
                bail!("Currency entry with empty code: {}", currency.name);
            }
            if !seen.insert(currency.code.as_str()) {
                bail!("Duplicate currency code in catalog: {}", currency.code);
            }
        }
        debug!(count = currencies.len(), "Loaded currency catalog");
        Ok(Self { currencies })
    }

    /// Exact, case-sensitive code match.
    pub fn lookup(&self, code: &str) -> Option<&CurrencyInfo> {
        self.currencies.iter().find(|c| c.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.lookup(code).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyInfo> {
        self.currencies.iter()
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }
}
