//! Streak statistics: extraction, distribution estimation, continuation.
//!
//! [`StreakProfile::from_prices`] runs the whole chain for one price series:
//! prices → direction labels → streak lengths → distribution → continuation.

pub mod continuation;
pub mod distribution;
pub mod extract;

pub use continuation::{continuation_probability, Continuation, TailCurve};
pub use distribution::StreakDistribution;
pub use extract::{extract_streaks, Streaks};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Direction, PriceSeries, ZeroReturnPolicy};
use crate::series::DirectionSeries;

/// Errors from streak statistics.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StreakError {
    #[error("insufficient data: {points} usable price points, need at least 2")]
    InsufficientData { points: usize },

    #[error("no streak lengths to estimate a distribution from")]
    EmptyDistribution,

    #[error("probabilities must be non-negative and sum to 1 (got {sum})")]
    InvalidDistribution { sum: f64 },

    #[error("current streak must be at least 1")]
    InvalidCurrentStreak,
}

/// Everything learned about one instrument from one price window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakProfile {
    pub streaks: Streaks,
    pub distribution: StreakDistribution,
    pub continuation: Continuation,
}

impl StreakProfile {
    pub fn from_prices(
        prices: &PriceSeries,
        policy: ZeroReturnPolicy,
    ) -> Result<Self, StreakError> {
        if prices.len() < 2 {
            return Err(StreakError::InsufficientData {
                points: prices.len(),
            });
        }
        let directions = DirectionSeries::from_prices(prices, policy);
        Self::from_directions(&directions).map_err(|e| match e {
            StreakError::InsufficientData { .. } => StreakError::InsufficientData {
                points: prices.len(),
            },
            other => other,
        })
    }

    pub fn from_directions(directions: &DirectionSeries) -> Result<Self, StreakError> {
        let streaks = extract_streaks(directions.directions())?;
        let distribution = StreakDistribution::estimate(&streaks.lengths)?;
        let continuation = continuation_probability(&distribution, streaks.current)?;
        log::debug!(
            "{} streaks, longest {}, current {} {} (continuation {:.4})",
            streaks.lengths.len(),
            distribution.max_len(),
            streaks.current,
            streaks.current_direction,
            continuation.probability
        );
        Ok(Self {
            streaks,
            distribution,
            continuation,
        })
    }

    pub fn current_streak(&self) -> usize {
        self.streaks.current
    }

    pub fn current_direction(&self) -> Direction {
        self.streaks.current_direction
    }

    pub fn continuation_probability(&self) -> f64 {
        self.continuation.probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;
    use chrono::NaiveDate;

    fn prices(values: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        PriceSeries::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &p)| PricePoint::new(start + chrono::Duration::days(i as i64), p))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn profile_chains_every_stage() {
        // up up up down down up
        let p = prices(&[100.0, 101.0, 102.0, 103.0, 102.0, 101.0, 102.5]);
        let profile = StreakProfile::from_prices(&p, ZeroReturnPolicy::Down).unwrap();
        assert_eq!(profile.streaks.lengths, vec![3, 2, 1]);
        assert_eq!(profile.current_streak(), 1);
        assert_eq!(profile.current_direction(), Direction::Up);
        // every length observed once -> P(L >= 2) = 2/3
        assert!((profile.continuation_probability() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn single_price_is_insufficient() {
        let err = StreakProfile::from_prices(&prices(&[100.0]), ZeroReturnPolicy::Down).unwrap_err();
        assert_eq!(err, StreakError::InsufficientData { points: 1 });
    }

    #[test]
    fn all_flat_with_skip_is_insufficient() {
        let err =
            StreakProfile::from_prices(&prices(&[100.0, 100.0, 100.0]), ZeroReturnPolicy::Skip)
                .unwrap_err();
        assert_eq!(err, StreakError::InsufficientData { points: 3 });
    }
}
