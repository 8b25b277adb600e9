//! Conversion history ledger
//!
//! A bounded, newest-first sequence of immutable [`ConversionRecord`]s
//! with currency/time-window filtering, CSV export, and persistence
//! through a [`HistoryStore`]. The full sequence is persisted after
//! every mutation; records are destroyed only by cap eviction or an
//! explicit clear.

use crate::currency::Currency;
use crate::error::{FxError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Mutex;

/// Maximum number of records the ledger retains
pub const HISTORY_CAP: usize = 50;

/// Well-known file name for the persisted history record
pub const DEFAULT_HISTORY_FILE: &str = "conversion_history.json";

/// A completed conversion, immutable after creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionRecord {
    /// Monotonic id, derived from the creation timestamp
    pub id: i64,
    pub from: Currency,
    pub to: Currency,
    pub source_amount: f64,
    pub rate: f64,
    pub converted_amount: f64,
    pub timestamp: DateTime<Utc>,
}

/// Currency predicate for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyFilter {
    /// Match every record
    All,
    /// Match records where the currency appears on either side
    Only(Currency),
}

impl CurrencyFilter {
    fn matches(&self, record: &ConversionRecord) -> bool {
        match self {
            CurrencyFilter::All => true,
            CurrencyFilter::Only(c) => record.from == *c || record.to == *c,
        }
    }
}

/// Time predicate for history queries, measured from "now" at call time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    AllTime,
    Last24Hours,
    Last7Days,
    Last30Days,
}

impl TimeWindow {
    fn cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            TimeWindow::AllTime => None,
            TimeWindow::Last24Hours => Some(now - Duration::hours(24)),
            TimeWindow::Last7Days => Some(now - Duration::days(7)),
            TimeWindow::Last30Days => Some(now - Duration::days(30)),
        }
    }

    fn matches(&self, record: &ConversionRecord, now: DateTime<Utc>) -> bool {
        match self.cutoff(now) {
            None => true,
            Some(cutoff) => record.timestamp >= cutoff,
        }
    }
}

/// Durable storage for the history sequence
pub trait HistoryStore: Send + Sync {
    /// Load the persisted sequence (newest first); empty when absent
    fn load(&self) -> Result<Vec<ConversionRecord>>;

    /// Replace the persisted sequence wholesale
    fn save(&self, records: &[ConversionRecord]) -> Result<()>;
}

/// JSON file store under a well-known path
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl HistoryStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ConversionRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read_to_string(&self.path)?;
        let records = serde_json::from_str(&data)?;
        Ok(records)
    }

    fn save(&self, records: &[ConversionRecord]) -> Result<()> {
        let data = serde_json::to_string(records)?;
        std::fs::write(&self.path, data)?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ConversionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn load(&self) -> Result<Vec<ConversionRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn save(&self, records: &[ConversionRecord]) -> Result<()> {
        *self.records.lock().unwrap() = records.to_vec();
        Ok(())
    }
}

/// Bounded, persisted ledger of past conversions (newest first)
pub struct HistoryLedger {
    records: VecDeque<ConversionRecord>,
    cap: usize,
    last_id: i64,
    store: Box<dyn HistoryStore>,
}

impl HistoryLedger {
    /// Load the ledger from a store
    ///
    /// Sequences longer than the cap (e.g. written by an older build
    /// with a larger cap) are truncated to the newest entries.
    pub fn with_store(store: Box<dyn HistoryStore>) -> Result<Self> {
        let mut records: VecDeque<ConversionRecord> = store.load()?.into();
        records.truncate(HISTORY_CAP);
        let last_id = records.iter().map(|r| r.id).max().unwrap_or(0);

        Ok(Self {
            records,
            cap: HISTORY_CAP,
            last_id,
            store,
        })
    }

    /// Ephemeral ledger backed by an in-memory store
    pub fn in_memory() -> Self {
        Self::with_store(Box::new(MemoryStore::new())).expect("memory store load cannot fail")
    }

    /// Build and append a record for a completed conversion
    ///
    /// Ids stay strictly monotonic: the millisecond timestamp is bumped
    /// past the last issued id when two conversions land in the same
    /// millisecond.
    pub fn record(
        &mut self,
        from: Currency,
        to: Currency,
        source_amount: f64,
        rate: f64,
        converted_amount: f64,
        timestamp: DateTime<Utc>,
    ) -> Result<ConversionRecord> {
        let id = timestamp.timestamp_millis().max(self.last_id + 1);
        let record = ConversionRecord {
            id,
            from,
            to,
            source_amount,
            rate,
            converted_amount,
            timestamp,
        };
        self.append(record.clone())?;
        Ok(record)
    }

    /// Insert a record at the front, evicting the oldest past the cap,
    /// then persist the full sequence
    pub fn append(&mut self, record: ConversionRecord) -> Result<()> {
        self.last_id = self.last_id.max(record.id);
        self.records.push_front(record);
        while self.records.len() > self.cap {
            self.records.pop_back();
        }
        self.persist()
    }

    /// Filtered view of the ledger, newest first; never mutates
    pub fn filter(&self, currency: CurrencyFilter, window: TimeWindow) -> Vec<&ConversionRecord> {
        self.filter_at(currency, window, Utc::now())
    }

    /// Like [`filter`](Self::filter) with an explicit "now" for the
    /// time window
    pub fn filter_at(
        &self,
        currency: CurrencyFilter,
        window: TimeWindow,
        now: DateTime<Utc>,
    ) -> Vec<&ConversionRecord> {
        self.records
            .iter()
            .filter(|r| currency.matches(r) && window.matches(r, now))
            .collect()
    }

    /// Empty the ledger and persist the empty state
    pub fn clear(&mut self) -> Result<()> {
        self.records.clear();
        self.persist()
    }

    /// Export the full ledger as CSV, newest first, full precision
    ///
    /// Fails with [`FxError::EmptyExport`] when there is nothing to
    /// export rather than emitting a header-only file.
    pub fn export_csv(&self) -> Result<String> {
        if self.records.is_empty() {
            return Err(FxError::EmptyExport);
        }

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "Date",
                "Time",
                "From Currency",
                "To Currency",
                "Amount",
                "Rate",
                "Converted Amount",
            ])
            .map_err(|e| FxError::Storage(format!("CSV write failed: {}", e)))?;

        for record in &self.records {
            writer
                .write_record([
                    record.timestamp.format("%Y-%m-%d").to_string(),
                    record.timestamp.format("%H:%M:%S").to_string(),
                    record.from.code().to_string(),
                    record.to.code().to_string(),
                    record.source_amount.to_string(),
                    record.rate.to_string(),
                    record.converted_amount.to_string(),
                ])
                .map_err(|e| FxError::Storage(format!("CSV write failed: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| FxError::Storage(format!("CSV write failed: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| FxError::Storage(format!("CSV not UTF-8: {}", e)))
    }

    /// All records, newest first
    pub fn records(&self) -> impl Iterator<Item = &ConversionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    fn persist(&self) -> Result<()> {
        let snapshot: Vec<ConversionRecord> = self.records.iter().cloned().collect();
        self.store.save(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record_at(id: i64, from: Currency, to: Currency, ts: DateTime<Utc>) -> ConversionRecord {
        ConversionRecord {
            id,
            from,
            to,
            source_amount: 100.0,
            rate: 0.92,
            converted_amount: 92.0,
            timestamp: ts,
        }
    }

    #[test]
    fn test_append_newest_first() {
        let mut ledger = HistoryLedger::in_memory();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        ledger
            .append(record_at(1, Currency::USD, Currency::EUR, t0))
            .unwrap();
        ledger
            .append(record_at(2, Currency::GBP, Currency::JPY, t0))
            .unwrap();

        let records: Vec<_> = ledger.records().collect();
        assert_eq!(records[0].id, 2);
        assert_eq!(records[1].id, 1);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut ledger = HistoryLedger::in_memory();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        for i in 0..(HISTORY_CAP as i64 + 10) {
            ledger
                .append(record_at(i + 1, Currency::USD, Currency::EUR, t0))
                .unwrap();
        }

        assert_eq!(ledger.len(), HISTORY_CAP);
        // Oldest ids (1..=10) were evicted from the tail
        let ids: Vec<i64> = ledger.records().map(|r| r.id).collect();
        assert_eq!(ids[0], HISTORY_CAP as i64 + 10);
        assert_eq!(*ids.last().unwrap(), 11);
    }

    #[test]
    fn test_record_ids_strictly_monotonic() {
        let mut ledger = HistoryLedger::in_memory();
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        // Same-millisecond conversions still get distinct increasing ids
        let a = ledger
            .record(Currency::USD, Currency::EUR, 100.0, 0.92, 92.0, ts)
            .unwrap();
        let b = ledger
            .record(Currency::USD, Currency::EUR, 100.0, 0.92, 92.0, ts)
            .unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_filter_all_returns_everything_in_order() {
        let mut ledger = HistoryLedger::in_memory();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        for i in 0..5 {
            ledger
                .append(record_at(i + 1, Currency::USD, Currency::EUR, t0))
                .unwrap();
        }

        let all = ledger.filter_at(CurrencyFilter::All, TimeWindow::AllTime, t0);
        assert_eq!(all.len(), 5);
        let ids: Vec<i64> = all.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_filter_by_currency_matches_either_side() {
        let mut ledger = HistoryLedger::in_memory();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        ledger
            .append(record_at(1, Currency::USD, Currency::EUR, t0))
            .unwrap();
        ledger
            .append(record_at(2, Currency::EUR, Currency::JPY, t0))
            .unwrap();
        ledger
            .append(record_at(3, Currency::GBP, Currency::JPY, t0))
            .unwrap();

        let eur = ledger.filter_at(CurrencyFilter::Only(Currency::EUR), TimeWindow::AllTime, t0);
        assert_eq!(eur.len(), 2);
        assert!(eur.iter().all(|r| r.from == Currency::EUR || r.to == Currency::EUR));
    }

    #[test]
    fn test_filter_by_time_window() {
        let mut ledger = HistoryLedger::in_memory();
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();

        ledger
            .append(record_at(1, Currency::USD, Currency::EUR, now - Duration::days(40)))
            .unwrap();
        ledger
            .append(record_at(2, Currency::USD, Currency::EUR, now - Duration::days(10)))
            .unwrap();
        ledger
            .append(record_at(3, Currency::USD, Currency::EUR, now - Duration::hours(3)))
            .unwrap();

        let day = ledger.filter_at(CurrencyFilter::All, TimeWindow::Last24Hours, now);
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].id, 3);

        let month = ledger.filter_at(CurrencyFilter::All, TimeWindow::Last30Days, now);
        assert_eq!(month.len(), 2);

        let week = ledger.filter_at(CurrencyFilter::All, TimeWindow::Last7Days, now);
        assert_eq!(week.len(), 1);

        let all = ledger.filter_at(CurrencyFilter::All, TimeWindow::AllTime, now);
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_filter_does_not_mutate() {
        let mut ledger = HistoryLedger::in_memory();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        ledger
            .append(record_at(1, Currency::USD, Currency::EUR, t0))
            .unwrap();

        let _ = ledger.filter_at(CurrencyFilter::Only(Currency::JPY), TimeWindow::Last24Hours, t0);
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_clear_persists_empty_state() {
        let mut ledger = HistoryLedger::in_memory();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        ledger
            .append(record_at(1, Currency::USD, Currency::EUR, t0))
            .unwrap();

        ledger.clear().unwrap();
        assert!(ledger.is_empty());
        assert_eq!(ledger.store.load().unwrap().len(), 0);
    }

    #[test]
    fn test_export_empty_ledger_fails() {
        let ledger = HistoryLedger::in_memory();
        assert!(matches!(ledger.export_csv(), Err(FxError::EmptyExport)));
    }

    #[test]
    fn test_export_csv_shape() {
        let mut ledger = HistoryLedger::in_memory();
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 30, 0).unwrap();
        ledger
            .append(record_at(1, Currency::USD, Currency::EUR, t0))
            .unwrap();
        ledger
            .append(record_at(2, Currency::EUR, Currency::JPY, t0))
            .unwrap();

        let csv = ledger.export_csv().unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Date,Time,From Currency"));
        // Ledger order: newest first
        assert!(lines[1].contains("EUR,JPY"));
        assert!(lines[2].contains("USD,EUR"));
        assert!(lines[1].contains("2024-01-01"));
        assert!(lines[1].contains("10:30:00"));
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_HISTORY_FILE);
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();

        {
            let store = Box::new(JsonFileStore::new(&path));
            let mut ledger = HistoryLedger::with_store(store).unwrap();
            ledger
                .append(record_at(7, Currency::GBP, Currency::BRL, t0))
                .unwrap();
        }

        // Reload from the same file
        let store = Box::new(JsonFileStore::new(&path));
        let ledger = HistoryLedger::with_store(store).unwrap();
        assert_eq!(ledger.len(), 1);
        let record = ledger.records().next().unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.from, Currency::GBP);
        assert_eq!(record.to, Currency::BRL);
    }

    #[test]
    fn test_json_file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_truncates_over_cap() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let store = MemoryStore::new();
        let oversized: Vec<ConversionRecord> = (0..80)
            .map(|i| record_at(80 - i, Currency::USD, Currency::EUR, t0))
            .collect();
        store.save(&oversized).unwrap();

        let ledger = HistoryLedger::with_store(Box::new(store)).unwrap();
        assert_eq!(ledger.len(), HISTORY_CAP);
        // Newest-first head preserved
        assert_eq!(ledger.records().next().unwrap().id, 80);
    }
}
