//! Exchange rate table
//!
//! All rates are stored relative to a single base currency: the entry
//! for currency X is the value of 1 unit of the base expressed in X.
//! A table is an immutable snapshot; a refresh builds a new table and
//! the holder swaps it wholesale.

use crate::currency::Currency;
use crate::error::{FxError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Where a rate table came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateOrigin {
    /// Fetched from the remote provider
    Live,
    /// Built-in static defaults, used when the provider is unavailable
    Fallback,
}

/// Snapshot of exchange rates against one base currency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    base: Currency,
    rates: HashMap<Currency, f64>,
    fetched_at: DateTime<Utc>,
    origin: RateOrigin,
}

/// Static fallback rates against USD, used when the live fetch fails
const FALLBACK_USD_RATES: &[(Currency, f64)] = &[
    (Currency::USD, 1.0),
    (Currency::EUR, 0.92),
    (Currency::GBP, 0.79),
    (Currency::JPY, 149.50),
    (Currency::CAD, 1.36),
    (Currency::AUD, 1.52),
    (Currency::CHF, 0.88),
    (Currency::CNY, 7.15),
    (Currency::BRL, 5.15),
    (Currency::MXN, 18.50),
    (Currency::INR, 83.25),
    (Currency::RUB, 95.80),
    (Currency::ZAR, 19.25),
    (Currency::TRY, 28.75),
    (Currency::KRW, 1325.50),
];

impl RateTable {
    /// Build a validated table from provider data
    ///
    /// Requires a positive, finite rate for every supported currency and
    /// a rate of exactly 1 for the base. A payload missing any supported
    /// currency is rejected: refresh replaces the table wholesale, so a
    /// partial payload cannot be merged into an older snapshot.
    pub fn new(
        base: Currency,
        mut rates: HashMap<Currency, f64>,
        fetched_at: DateTime<Utc>,
        origin: RateOrigin,
    ) -> Result<Self> {
        // Providers usually omit the base from the payload
        rates.entry(base).or_insert(1.0);

        for currency in Currency::all() {
            match rates.get(currency) {
                Some(rate) if rate.is_finite() && *rate > 0.0 => {}
                Some(rate) => {
                    return Err(FxError::RateFetch(format!(
                        "rate for {} must be positive, got {}",
                        currency, rate
                    )))
                }
                None => {
                    return Err(FxError::RateFetch(format!(
                        "payload missing rate for {}",
                        currency
                    )))
                }
            }
        }

        let base_rate = rates[&base];
        if (base_rate - 1.0).abs() > f64::EPSILON {
            return Err(FxError::RateFetch(format!(
                "base {} rate must be 1, got {}",
                base, base_rate
            )));
        }

        Ok(Self {
            base,
            rates,
            fetched_at,
            origin,
        })
    }

    /// Built-in fallback table (rates against USD)
    ///
    /// For a non-USD base the seeded rates are rebased by dividing
    /// through the base's USD rate, preserving all cross rates.
    pub fn fallback(base: Currency) -> Self {
        let usd_rates: HashMap<Currency, f64> = FALLBACK_USD_RATES.iter().copied().collect();
        let base_in_usd = usd_rates[&base];
        let rates = usd_rates
            .into_iter()
            .map(|(currency, rate)| (currency, rate / base_in_usd))
            .collect();

        Self {
            base,
            rates,
            fetched_at: Utc::now(),
            origin: RateOrigin::Fallback,
        }
    }

    /// The currency all rates are expressed against
    pub fn base(&self) -> Currency {
        self.base
    }

    /// Rate of 1 base unit in the given currency
    pub fn rate(&self, currency: Currency) -> Result<f64> {
        self.rates
            .get(&currency)
            .copied()
            .ok_or_else(|| FxError::MissingRate(currency.to_string()))
    }

    /// When this table was fetched or constructed
    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Origin of this table
    pub fn origin(&self) -> RateOrigin {
        self.origin
    }

    /// True when the table holds fallback defaults rather than live data
    pub fn is_stale(&self) -> bool {
        self.origin == RateOrigin::Fallback
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::fallback(Currency::USD)
    }
}
