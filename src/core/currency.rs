//! Currency conversion abstractions

use crate::core::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait CurrencyRateProvider: Send + Sync {
    /// Returns the multiplier `rate` such that `to_amount = from_amount * rate`.
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64>;
}
