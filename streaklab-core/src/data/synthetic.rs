//! Deterministic synthetic prices for offline runs and tests.
//!
//! Weekday random walk starting at 100 with daily returns drawn uniformly from
//! `±3%`. The RNG is seeded from the BLAKE3 hash of the instrument name, so a
//! given instrument always produces the same path and different instruments
//! produce different ones.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DataError, DataSource, FetchResult, PriceSource};
use crate::domain::{PricePoint, PriceSeries};

/// Largest absolute daily return of the walk.
const MAX_DAILY_RETURN: f64 = 0.03;

/// Synthetic price source.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    /// Anchor date of the walk. Fetches of overlapping windows see the same prices.
    origin: NaiveDate,
}

impl SyntheticSource {
    pub fn new(origin: NaiveDate) -> Self {
        Self { origin }
    }

    fn rng_for(&self, instrument: &str) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(instrument.as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    fn walk(&self, instrument: &str, end: NaiveDate) -> Vec<PricePoint> {
        let mut rng = self.rng_for(instrument);
        let mut points = Vec::new();
        let mut price = 100.0_f64;
        let mut current = self.origin;

        while current <= end {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                price *= 1.0 + rng.gen_range(-MAX_DAILY_RETURN..MAX_DAILY_RETURN);
                points.push(PricePoint::new(current, price));
            }
            current += chrono::Duration::days(1);
        }
        points
    }
}

impl PriceSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let series = PriceSeries::new(self.walk(instrument, end))?.between(start, end);
        if series.is_empty() {
            return Err(DataError::no_data(instrument));
        }
        Ok(FetchResult {
            instrument: instrument.to_string(),
            series,
            source: DataSource::Synthetic,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn deterministic_per_instrument() {
        let source = SyntheticSource::new(d(2020, 1, 1));
        let a = source.fetch("SPY", d(2020, 1, 1), d(2020, 6, 30)).unwrap();
        let b = source.fetch("SPY", d(2020, 1, 1), d(2020, 6, 30)).unwrap();
        let c = source.fetch("QQQ", d(2020, 1, 1), d(2020, 6, 30)).unwrap();
        assert_eq!(a.series, b.series);
        assert_ne!(a.series, c.series);
    }

    #[test]
    fn overlapping_windows_agree() {
        let source = SyntheticSource::new(d(2020, 1, 1));
        let full = source.fetch("SPY", d(2020, 1, 1), d(2020, 12, 31)).unwrap();
        let part = source.fetch("SPY", d(2020, 7, 1), d(2020, 7, 31)).unwrap();
        assert_eq!(full.series.between(d(2020, 7, 1), d(2020, 7, 31)), part.series);
    }

    #[test]
    fn skips_weekends() {
        let source = SyntheticSource::new(d(2024, 1, 1));
        let fetched = source.fetch("SPY", d(2024, 1, 1), d(2024, 1, 14)).unwrap();
        assert_eq!(fetched.series.len(), 10);
    }

    #[test]
    fn window_before_origin_is_no_data() {
        let source = SyntheticSource::new(d(2024, 1, 1));
        assert!(source.fetch("SPY", d(2023, 1, 1), d(2023, 12, 31)).is_err());
    }
}
