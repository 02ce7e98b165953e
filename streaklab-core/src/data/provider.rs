//! Price source trait and structured error types.
//!
//! The PriceSource trait abstracts over where adjusted prices come from (Yahoo
//! Finance, CSV files, synthetic random walks, in-memory fixtures) so the
//! screening and backtest runners never know which one they are talking to.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{PriceSeries, SeriesError};

/// Structured error types for price retrieval.
///
/// Every variant is recoverable at the batch level: the runner records it as a
/// skip reason for that instrument and moves on.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("No data found for: {instrument}")]
    NoData { instrument: String },

    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("I/O error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("malformed price data for {instrument}: {message}")]
    Malformed { instrument: String, message: String },

    #[error("invalid series: {0}")]
    Series(#[from] SeriesError),

    #[error("data error: {0}")]
    Other(String),
}

impl DataError {
    pub fn no_data(instrument: &str) -> Self {
        DataError::NoData {
            instrument: instrument.to_string(),
        }
    }
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    CsvImport,
    Synthetic,
    InMemory,
}

/// Result of a successful fetch for a single instrument.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub instrument: String,
    pub series: PriceSeries,
    pub source: DataSource,
}

/// Anything that can produce adjusted daily prices for an instrument.
///
/// Implementations return only points inside the inclusive `[start, end]`
/// range, ordered by date. An instrument or range with no points is reported
/// as [`DataError::NoData`] rather than an empty series.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError>;
}

impl<T: PriceSource + ?Sized> PriceSource for Box<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        (**self).fetch(instrument, start, end)
    }
}
