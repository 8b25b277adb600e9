//! Remote rate providers
//!
//! A [`RateSource`] fetches a full rate table against a base currency.
//! Any non-success status or malformed payload is reported as
//! [`FxError::RateFetch`]; the refresh layer substitutes the fallback
//! table so conversion keeps working offline.

use crate::currency::Currency;
use crate::error::{FxError, Result};
use crate::rates::table::{RateOrigin, RateTable};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.frankfurter.app";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for remote rate providers
pub trait RateSource: Send + Sync {
    /// Fetch the current rates for every supported currency against `base`
    fn fetch_rates(&self, base: Currency) -> impl Future<Output = Result<RateTable>> + Send;

    /// Get the source name
    fn name(&self) -> &str;
}

/// Expected provider payload: `{"rates": {"EUR": 0.92, ...}}`
#[derive(Debug, Deserialize)]
struct RatesPayload {
    rates: HashMap<String, f64>,
}

/// HTTP rate provider (`GET /latest?from=<BASE>`)
pub struct HttpRateSource {
    client: Client,
    base_url: String,
}

impl HttpRateSource {
    /// Create a source against the default provider endpoint
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a source against a custom endpoint (used by tests and
    /// alternative providers with the same payload shape)
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| FxError::RateFetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn parse_payload(base: Currency, payload: RatesPayload) -> Result<RateTable> {
        let mut rates = HashMap::new();
        for (code, rate) in payload.rates {
            // Providers quote more currencies than we support; extras are
            // dropped, missing supported codes fail table validation below.
            if let Ok(currency) = Currency::from_code(&code) {
                rates.insert(currency, rate);
            }
        }
        RateTable::new(base, rates, Utc::now(), RateOrigin::Live)
    }
}

impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base: Currency) -> Result<RateTable> {
        let url = format!("{}/latest?from={}", self.base_url, base);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FxError::RateFetch(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(FxError::RateFetch(format!(
                "provider returned error status: {}",
                response.status()
            )));
        }

        let payload: RatesPayload = response
            .json()
            .await
            .map_err(|e| FxError::RateFetch(format!("malformed payload: {}", e)))?;

        Self::parse_payload(base, payload)
    }

    fn name(&self) -> &str {
        "http"
    }
}

/// Fixed-table source for tests and offline use
pub struct StaticRateSource {
    table: RateTable,
}

impl StaticRateSource {
    pub fn new(table: RateTable) -> Self {
        Self { table }
    }
}

impl RateSource for StaticRateSource {
    async fn fetch_rates(&self, base: Currency) -> Result<RateTable> {
        if self.table.base() != base {
            return Err(FxError::RateFetch(format!(
                "static source holds {} rates, requested {}",
                self.table.base(),
                base
            )));
        }
        Ok(self.table.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_with_all_rates() -> RatesPayload {
        let rates = Currency::all()
            .iter()
            .filter(|c| **c != Currency::USD)
            .enumerate()
            .map(|(i, c)| (c.code().to_string(), 0.5 + i as f64))
            .collect();
        RatesPayload { rates }
    }

    #[test]
    fn test_parse_payload_full() {
        let table = HttpRateSource::parse_payload(Currency::USD, payload_with_all_rates()).unwrap();
        assert_eq!(table.base(), Currency::USD);
        assert_eq!(table.rate(Currency::USD).unwrap(), 1.0);
        assert!(!table.is_stale());
    }

    #[test]
    fn test_parse_payload_ignores_unknown_codes() {
        let mut payload = payload_with_all_rates();
        payload.rates.insert("ISK".to_string(), 140.0);
        payload.rates.insert("XAU".to_string(), 0.0005);

        let table = HttpRateSource::parse_payload(Currency::USD, payload).unwrap();
        assert_eq!(table.base(), Currency::USD);
    }

    #[test]
    fn test_parse_payload_missing_supported_code() {
        let mut payload = payload_with_all_rates();
        payload.rates.remove("JPY");

        let result = HttpRateSource::parse_payload(Currency::USD, payload);
        assert!(matches!(result, Err(FxError::RateFetch(_))));
    }

    #[tokio::test]
    async fn test_static_source_returns_table() {
        let source = StaticRateSource::new(RateTable::fallback(Currency::USD));
        let table = source.fetch_rates(Currency::USD).await.unwrap();
        assert_eq!(table.base(), Currency::USD);
    }

    #[tokio::test]
    async fn test_static_source_rejects_other_base() {
        let source = StaticRateSource::new(RateTable::fallback(Currency::USD));
        assert!(source.fetch_rates(Currency::EUR).await.is_err());
    }

    #[tokio::test]
    async fn test_http_source_unreachable_host() {
        let source = HttpRateSource::with_base_url("http://127.0.0.1:1").unwrap();
        let result = source.fetch_rates(Currency::USD).await;
        assert!(matches!(result, Err(FxError::RateFetch(_))));
    }
}
