//! # fxcalc
//!
//! A currency conversion core: base-relative rate resolution, coalesced
//! rate refresh with a static fallback, and a bounded, persisted
//! conversion history with filtering and CSV export. Presentation is an
//! external collaborator; this crate exposes no rendering.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fxcalc::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> fxcalc::error::Result<()> {
//! let source = HttpRateSource::new()?;
//! let ledger = HistoryLedger::with_store(Box::new(JsonFileStore::new(
//!     fxcalc::history::DEFAULT_HISTORY_FILE,
//! )))?;
//! let mut converter = Converter::new(source, Currency::USD, ledger, Settings::default());
//!
//! converter.refresh_rates().await;
//! let record = converter.convert_and_record(100.0, Currency::USD, Currency::EUR)?;
//! println!("rate {} -> {}", record.rate, record.converted_amount);
//! # Ok(())
//! # }
//! ```

pub mod convert;
pub mod currency;
pub mod engine;
pub mod error;
pub mod history;
pub mod rates;
pub mod settings;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::convert::Conversion;
    pub use crate::currency::Currency;
    pub use crate::engine::Converter;
    pub use crate::error::{FxError, Result};
    pub use crate::history::{
        ConversionRecord, CurrencyFilter, HistoryLedger, HistoryStore, JsonFileStore, MemoryStore,
        TimeWindow,
    };
    pub use crate::rates::{
        HttpRateSource, RateOrigin, RateRefresher, RateSource, RateTable, RefreshOutcome,
        StaticRateSource,
    };
    pub use crate::settings::Settings;
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_lib_compile() {
        // Smoke test to ensure library compiles
    }
}
