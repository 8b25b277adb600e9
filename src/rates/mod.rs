//! Exchange rate system
//!
//! # Components
//!
//! - **table**: immutable rate snapshots against one base currency
//! - **source**: remote providers ([`RateSource`] trait, HTTP impl)
//! - **refresh**: coalesced refresh of a shared table with fallback

pub mod refresh;
pub mod source;
pub mod table;

pub use refresh::{RateRefresher, RefreshOutcome, DEFAULT_REFRESH_INTERVAL};
pub use source::{HttpRateSource, RateSource, StaticRateSource};
pub use table::{RateOrigin, RateTable};
