//! StreakLab Core — domain types, direction series, streak statistics, price sources.
//!
//! This crate contains the statistical heart of the streak screener:
//! - Domain types (price points, directions, trade sides)
//! - Direction series with stale-close deduplication
//! - Streak extraction, empirical distribution with hole filling
//! - Continuation probability and the tail curve behind it
//! - Price sources (Yahoo Finance, CSV, synthetic, in-memory)

pub mod data;
pub mod domain;
pub mod series;
pub mod streaks;

pub use domain::{Direction, PricePoint, PriceSeries, Side, ZeroReturnPolicy};
pub use series::{DirectionPoint, DirectionSeries};
pub use streaks::{
    continuation_probability, extract_streaks, Continuation, StreakDistribution, StreakError,
    StreakProfile, Streaks, TailCurve,
};
