//! Pure currency conversion
//!
//! Stateless computation over a [`RateTable`]. Rates are stored against
//! one base currency B, so the pair rate resolves as:
//!
//! - same currency: 1
//! - from == B: `table[to]`
//! - to == B: `1 / table[from]`
//! - cross pair: `table[to] / table[from]`
//!
//! Results keep full precision; rounding to display digits happens in
//! the formatting helpers only.

use crate::currency::Currency;
use crate::error::{FxError, Result};
use crate::rates::table::RateTable;

/// Fraction digits used when formatting amounts
pub const AMOUNT_DISPLAY_DIGITS: usize = 2;
/// Fraction digits used when formatting unit rates
pub const RATE_DISPLAY_DIGITS: usize = 4;

/// Result of a conversion: the pair rate applied and the full-precision
/// converted amount
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub rate: f64,
    pub converted_amount: f64,
}

impl Conversion {
    /// Converted amount rounded for display (2 fraction digits)
    pub fn display_amount(&self) -> String {
        format!("{:.1$}", self.converted_amount, AMOUNT_DISPLAY_DIGITS)
    }

    /// Unit rate rounded for display (4 fraction digits)
    pub fn display_rate(&self) -> String {
        format!("{:.1$}", self.rate, RATE_DISPLAY_DIGITS)
    }
}

/// Resolve the exchange rate for a currency pair from a base-relative table
pub fn resolve_rate(from: Currency, to: Currency, table: &RateTable) -> Result<f64> {
    if from == to {
        return Ok(1.0);
    }

    let base = table.base();
    if from == base {
        return table.rate(to);
    }
    if to == base {
        return Ok(1.0 / table.rate(from)?);
    }
    Ok(table.rate(to)? / table.rate(from)?)
}

/// Convert `amount` of `from` into `to` using `table`
///
/// The amount must be finite and strictly positive; anything else is an
/// input error, never coerced. Pure: no state is touched.
pub fn convert(amount: f64, from: Currency, to: Currency, table: &RateTable) -> Result<Conversion> {
    if !amount.is_finite() {
        return Err(FxError::InvalidAmount(format!(
            "amount must be a finite number, got {}",
            amount
        )));
    }
    if amount <= 0.0 {
        return Err(FxError::InvalidAmount(format!(
            "amount must be positive, got {}",
            amount
        )));
    }

    let rate = resolve_rate(from, to, table)?;
    Ok(Conversion {
        rate,
        converted_amount: amount * rate,
    })
}
