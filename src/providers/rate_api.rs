use super::util::{is_transient, with_retry};
use crate::core::currency::CurrencyRateProvider;
use crate::core::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Client for a rate API answering
/// `GET /convert?base_currency=USD&currencies=EUR` with `{"data": {"EUR": 0.92}}`.
pub struct RateApiProvider {
    base_url: String,
    api_key: Option<String>,
    retries: usize,
}

impl RateApiProvider {
    pub fn new(base_url: &str) -> Self {
        RateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            retries: 0,
        }
    }

    /// Sends `apikey=<key>` with every request.
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Allows one extra attempt, without delay, when the server cannot be
    /// reached or answers with a 5xx status.
    pub fn with_retry(mut self, retry: bool) -> Self {
        self.retries = usize::from(retry);
        self
    }

    fn convert_url(&self, from: &str, to: &str) -> Result<Url> {
        let mut params = vec![("base_currency", from), ("currencies", to)];
        if let Some(key) = &self.api_key {
            params.push(("apikey", key.as_str()));
        }
        Url::parse_with_params(&format!("{}/convert", self.base_url), &params)
            .map_err(|e| Error::InvalidRequest(format!("Invalid rate API URL {}: {e}", self.base_url)))
    }
}

#[derive(Debug, Deserialize)]
struct ConvertResponse {
    data: HashMap<String, f64>,
}

#[async_trait]
impl CurrencyRateProvider for RateApiProvider {
    #[instrument(name = "RateApiFetch", skip(self))]
    async fn get_rate(&self, from: &str, to: &str) -> Result<f64> {
        let pair = format!("{from}->{to}");
        let url = self.convert_url(from, to)?;
        debug!("Requesting currency rate from {}", self.base_url);

        let client = reqwest::Client::builder()
            .user_agent("fxconv/1.0")
            .build()
            .map_err(|e| Error::NetworkFailure(format!("Failed to build HTTP client: {e}")))?;

        let response = with_retry(
            || async {
                client
                    .get(url.as_str())
                    .send()
                    .await?
                    .error_for_status()
            },
            self.retries,
            is_transient,
        )
        .await
        .map_err(|e| match e.status() {
            Some(status) => {
                Error::NetworkFailure(format!("HTTP error: {status} for currency pair: {pair}"))
            }
            None => Error::NetworkFailure(format!("Request error: {e} for currency pair: {pair}")),
        })?;

        let text = response.text().await.map_err(|e| {
            Error::NetworkFailure(format!("Failed to read response for {pair}: {e}"))
        })?;

        let data: ConvertResponse = serde_json::from_str(&text).map_err(|e| {
            warn!(response = %text, "Unexpected rate API payload");
            Error::InvalidResponse(format!("Failed to parse JSON response for {pair}: {e}"))
        })?;

        let rate = data.data.get(to).copied().ok_or_else(|| {
            Error::InvalidResponse(format!("No rate data found for currency pair: {pair}"))
        })?;

        if !rate.is_finite() || rate <= 0.0 {
            return Err(Error::InvalidResponse(format!(
                "Unusable rate {rate} for currency pair: {pair}"
            )));
        }

        debug!(rate, "Received currency rate");
        Ok(rate)
    }
}
