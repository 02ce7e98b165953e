//! Per-instrument skip reasons.
//!
//! A batch never fails because one instrument did: fetch and statistics errors
//! are converted into a [`SkipReason`] and recorded in the report next to the
//! instruments that did evaluate.

use serde::{Deserialize, Serialize};
use streaklab_core::data::DataError;
use streaklab_core::StreakError;
use thiserror::Error;

/// Why an instrument produced no result.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum SkipReason {
    /// The source returned nothing usable for the instrument/window.
    #[error("No data found for: {0}")]
    DataUnavailable(String),

    /// The source failed (network, parse, I/O).
    #[error("fetch failed: {0}")]
    FetchFailed(String),

    #[error("insufficient data: {0} usable price points, need at least 2")]
    InsufficientData(usize),

    /// Even a one-day streak is rarer than the threshold, so there is no
    /// rolling window to trade.
    #[error("no tradable streak length: continuation drops below the threshold after one day")]
    NoSignalWindow,

    #[error("statistics error: {0}")]
    Statistics(String),
}

impl From<DataError> for SkipReason {
    fn from(e: DataError) -> Self {
        match e {
            DataError::NoData { instrument } => SkipReason::DataUnavailable(instrument),
            other => SkipReason::FetchFailed(other.to_string()),
        }
    }
}

impl From<StreakError> for SkipReason {
    fn from(e: StreakError) -> Self {
        match e {
            StreakError::InsufficientData { points } => SkipReason::InsufficientData(points),
            other => SkipReason::Statistics(other.to_string()),
        }
    }
}

/// Which fetch window a skip happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Screen,
    Training,
    Test,
}

/// An instrument left out of a report, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedInstrument {
    pub instrument: String,
    pub window: WindowKind,
    pub reason: SkipReason,
}
