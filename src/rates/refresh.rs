//! Coalesced rate refresh
//!
//! All refresh triggers (manual, periodic timer, connectivity regained)
//! funnel through [`RateRefresher::refresh`]. An atomic in-flight flag
//! coalesces concurrent requests, and an install sequence number drops
//! a result that arrives for a superseded request, so a slow fetch can
//! never overwrite a newer table. A failed fetch installs the built-in
//! fallback table instead of surfacing an error; conversion keeps
//! working offline against stale data.

use crate::currency::Currency;
use crate::rates::source::RateSource;
use crate::rates::table::{RateOrigin, RateTable};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Default interval between periodic refreshes
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(300);

/// What a call to [`RateRefresher::refresh`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A new table was installed (live or fallback)
    Installed(RateOrigin),
    /// Another refresh was already in flight; this call did nothing
    Coalesced,
    /// The fetched table was superseded by a later install and dropped
    Superseded,
}

/// Clears the in-flight flag when the refresh future completes or is
/// dropped mid-fetch (e.g. the periodic task gets aborted), so a
/// cancelled request can never leave refreshes coalescing forever.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Drives refreshes of a shared [`RateTable`]
pub struct RateRefresher<S: RateSource> {
    source: S,
    base: Currency,
    table: Arc<RwLock<RateTable>>,
    in_flight: AtomicBool,
    install_seq: AtomicU64,
}

impl<S: RateSource> RateRefresher<S> {
    /// Create a refresher seeded with the fallback table for `base`
    pub fn new(source: S, base: Currency) -> Self {
        Self {
            source,
            base,
            table: Arc::new(RwLock::new(RateTable::fallback(base))),
            in_flight: AtomicBool::new(false),
            install_seq: AtomicU64::new(0),
        }
    }

    /// Shared handle to the current table
    ///
    /// Readers are never blocked by an in-flight refresh; installation
    /// is a single write under the lock.
    pub fn table_handle(&self) -> Arc<RwLock<RateTable>> {
        Arc::clone(&self.table)
    }

    /// Snapshot of the current table
    pub fn current(&self) -> RateTable {
        self.table.read().unwrap().clone()
    }

    /// Fetch fresh rates and swap the shared table
    ///
    /// Returns [`RefreshOutcome::Coalesced`] without touching the
    /// network when a refresh is already outstanding.
    pub async fn refresh(&self) -> RefreshOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            log::debug!("rate refresh already in flight, coalescing");
            return RefreshOutcome::Coalesced;
        }
        let _in_flight = InFlightGuard(&self.in_flight);

        let seq_at_start = self.install_seq.load(Ordering::SeqCst);

        let table = match self.source.fetch_rates(self.base).await {
            Ok(table) => table,
            Err(e) => {
                log::warn!(
                    "rate fetch from {} failed ({}), installing fallback table",
                    self.source.name(),
                    e
                );
                RateTable::fallback(self.base)
            }
        };

        // A result for a request that started before the latest install
        // must not replace the newer table.
        let outcome = if self
            .install_seq
            .compare_exchange(seq_at_start, seq_at_start + 1, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            let origin = table.origin();
            *self.table.write().unwrap() = table;
            log::info!("installed {:?} rate table for base {}", origin, self.base);
            RefreshOutcome::Installed(origin)
        } else {
            log::debug!("dropping superseded rate fetch result");
            RefreshOutcome::Superseded
        };

        outcome
    }

    /// Spawn a periodic refresh task
    ///
    /// The first tick fires immediately, giving an initial fetch at
    /// startup; subsequent ticks follow `interval`.
    pub fn spawn_periodic(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()>
    where
        S: 'static,
    {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.refresh().await;
            }
        })
    }
}
