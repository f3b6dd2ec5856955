//! Conversion orchestration: rate lookup, rounding, catalog decoration and
//! history append.
//!
//! Several conversions may be in flight at once. Each one is tagged with a
//! sequence number when it starts; every successful conversion is appended
//! to the history, but the "currently shown" result only moves forward, so a
//! slow response never replaces the result of a newer request.

use crate::core::catalog::{CurrencyCatalog, CurrencyInfo};
use crate::core::currency::CurrencyRateProvider;
use crate::core::error::{Error, Result};
use crate::core::history::{HistoryEntry, HistoryStore};
use crate::core::money;
use chrono::Local;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub base: String,
    /// Empty when nothing has been selected yet.
    pub target: String,
    pub amount: f64,
}

impl ConversionRequest {
    pub fn new(base: &str, target: &str, amount: f64) -> Self {
        Self {
            base: base.to_string(),
            target: target.to_string(),
            amount,
        }
    }
}

/// A completed conversion and the history entry it produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub sequence: u64,
    pub base: String,
    pub amount: f64,
    pub rate: f64,
    pub entry: HistoryEntry,
}

pub struct Converter {
    provider: Arc<dyn CurrencyRateProvider>,
    catalog: Arc<CurrencyCatalog>,
    history: Arc<Mutex<HistoryStore>>,
    last_sequence: AtomicU64,
    shown: Mutex<Option<Conversion>>,
}

impl Converter {
    pub fn new(
        provider: Arc<dyn CurrencyRateProvider>,
        catalog: Arc<CurrencyCatalog>,
        history: Arc<Mutex<HistoryStore>>,
    ) -> Self {
        Self {
            provider,
            catalog,
            history,
            last_sequence: AtomicU64::new(0),
            shown: Mutex::new(None),
        }
    }

    pub fn catalog(&self) -> &CurrencyCatalog {
        &self.catalog
    }

    /// Shared handle to the history; re-read it after a conversion to render
    /// the current log.
    pub fn history(&self) -> Arc<Mutex<HistoryStore>> {
        Arc::clone(&self.history)
    }

    /// The result of the newest completed request.
    pub async fn latest(&self) -> Option<Conversion> {
        self.shown.lock().await.clone()
    }

    /// Runs one conversion.
    ///
    /// Returns `Ok(None)` without contacting the provider when no target is
    /// selected. On any failure the history is left untouched.
    pub async fn convert(&self, request: &ConversionRequest) -> Result<Option<Conversion>> {
        if request.target.is_empty() {
            debug!("No target currency selected, skipping conversion");
            return Ok(None);
        }
        if request.base.is_empty() {
            return Err(Error::InvalidRequest("base currency is empty".to_string()));
        }
        money::validate_amount(request.amount)?;

        let sequence = self.last_sequence.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(
            sequence,
            base = %request.base,
            target = %request.target,
            amount = request.amount,
            "Requesting conversion"
        );

        let rate = match self
            .provider
            .get_rate(&request.base, &request.target)
            .await
        {
            Ok(rate) => rate,
            Err(e) => {
                warn!(sequence, error = %e, "Conversion failed");
                return Err(e);
            }
        };

        let result = money::convert_amount(request.amount, rate)?;
        let currency = self.lookup_target(&request.target)?;
        let entry = HistoryEntry::new(money::format_amount(result), currency, &Local::now());

        self.history.lock().await.append(entry.clone())?;

        let conversion = Conversion {
            sequence,
            base: request.base.clone(),
            amount: request.amount,
            rate,
            entry,
        };
        self.show(&conversion).await;
        info!(
            sequence,
            result = %conversion.entry.result,
            code = %conversion.entry.code,
            "Conversion completed"
        );
        Ok(Some(conversion))
    }

    fn lookup_target(&self, code: &str) -> Result<&CurrencyInfo> {
        match self.catalog.lookup(code) {
            Some(currency) => Ok(currency),
            // The selection is validated against this same catalog, so a miss
            // is a programming error.
            None if cfg!(debug_assertions) => panic!("{code} is not in the currency catalog"),
            None => Err(Error::UnknownCurrency(code.to_string())),
        }
    }

    async fn show(&self, conversion: &Conversion) {
        let mut shown = self.shown.lock().await;
        match shown.as_ref() {
            Some(current) if current.sequence > conversion.sequence => {
                debug!(
                    stale = conversion.sequence,
                    current = current.sequence,
                    "Discarding result of an older request"
                );
            }
            _ => *shown = Some(conversion.clone()),
        }
    }
}
