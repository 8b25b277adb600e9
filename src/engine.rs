//! Converter facade
//!
//! The entire surface the presentation layer talks to: conversions,
//! rate refresh, history, settings, and the currency list. Nothing in
//! here renders anything.

use crate::convert::{self, Conversion};
use crate::currency::Currency;
use crate::error::Result;
use crate::history::{ConversionRecord, CurrencyFilter, HistoryLedger, TimeWindow};
use crate::rates::refresh::{RateRefresher, RefreshOutcome};
use crate::rates::source::RateSource;
use crate::rates::table::RateTable;
use crate::settings::Settings;
use chrono::Utc;
use std::sync::{Arc, RwLock};
use tokio::task::JoinHandle;

/// Currency converter core
///
/// Owns the shared rate table (swapped atomically by the refresher),
/// the bounded history ledger, and the user settings.
pub struct Converter<S: RateSource> {
    refresher: Arc<RateRefresher<S>>,
    table: Arc<RwLock<RateTable>>,
    ledger: HistoryLedger,
    settings: Settings,
    refresh_task: Option<JoinHandle<()>>,
}

impl<S: RateSource + 'static> Converter<S> {
    /// Create a converter seeded with the fallback table for `base`
    pub fn new(source: S, base: Currency, ledger: HistoryLedger, settings: Settings) -> Self {
        let refresher = Arc::new(RateRefresher::new(source, base));
        let table = refresher.table_handle();
        Self {
            refresher,
            table,
            ledger,
            settings,
            refresh_task: None,
        }
    }

    /// Supported currency reference data
    pub fn currencies(&self) -> &'static [Currency] {
        Currency::all()
    }

    /// Snapshot of the current rate table
    pub fn rate_table(&self) -> RateTable {
        self.table.read().unwrap().clone()
    }

    /// Convert without recording history
    pub fn convert(&self, amount: f64, from: Currency, to: Currency) -> Result<Conversion> {
        let table = self.table.read().unwrap();
        convert::convert(amount, from, to, &table)
    }

    /// Convert and append a record to the history ledger
    ///
    /// Validation failures return before the ledger is touched, so a
    /// failed attempt never leaves a partial entry.
    pub fn convert_and_record(
        &mut self,
        amount: f64,
        from: Currency,
        to: Currency,
    ) -> Result<ConversionRecord> {
        let conversion = self.convert(amount, from, to)?;
        self.ledger.record(
            from,
            to,
            amount,
            conversion.rate,
            conversion.converted_amount,
            Utc::now(),
        )
    }

    /// Refresh the rate table now (manual trigger or reconnect event)
    ///
    /// Coalesces with any refresh already in flight.
    pub async fn refresh_rates(&self) -> RefreshOutcome {
        self.refresher.refresh().await
    }

    /// Start the periodic refresh task per the current settings
    ///
    /// No-op when auto-update is disabled or a task is already running.
    pub fn start_auto_refresh(&mut self) {
        if !self.settings.auto_update || self.refresh_task.is_some() {
            return;
        }
        let task = Arc::clone(&self.refresher).spawn_periodic(self.settings.refresh_interval());
        self.refresh_task = Some(task);
    }

    /// Stop the periodic refresh task
    pub fn stop_auto_refresh(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }

    /// Query the history ledger; never mutates it
    pub fn history(&self, currency: CurrencyFilter, window: TimeWindow) -> Vec<&ConversionRecord> {
        self.ledger.filter(currency, window)
    }

    /// Export the full history as CSV
    pub fn export_history_csv(&self) -> Result<String> {
        self.ledger.export_csv()
    }

    /// Clear the history and persist the empty state
    pub fn clear_history(&mut self) -> Result<()> {
        self.ledger.clear()
    }

    pub fn ledger(&self) -> &HistoryLedger {
        &self.ledger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings record
    ///
    /// Restarts the periodic refresh task when one is running so the
    /// new interval and auto-update flag take effect.
    pub fn apply_settings(&mut self, settings: Settings) {
        let was_running = self.refresh_task.is_some();
        self.settings = settings;
        if was_running {
            self.stop_auto_refresh();
            self.start_auto_refresh();
        }
    }
}

impl<S: RateSource> Drop for Converter<S> {
    fn drop(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.abort();
        }
    }
}
