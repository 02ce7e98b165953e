//! In-memory price source for tests and embedding callers.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::provider::{DataError, DataSource, FetchResult, PriceSource};
use crate::domain::PriceSeries;

/// Serves series registered up front, filtered to the requested window.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, PriceSeries>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series(mut self, instrument: &str, series: PriceSeries) -> Self {
        self.insert(instrument, series);
        self
    }

    pub fn insert(&mut self, instrument: &str, series: PriceSeries) {
        self.series.insert(instrument.to_string(), series);
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

impl PriceSource for InMemorySource {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let series = self
            .series
            .get(instrument)
            .map(|s| s.between(start, end))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| DataError::no_data(instrument))?;
        Ok(FetchResult {
            instrument: instrument.to_string(),
            series,
            source: DataSource::InMemory,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PricePoint;

    #[test]
    fn unknown_instrument_is_no_data() {
        let source = InMemorySource::new();
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let err = source.fetch("SPY", d, d).unwrap_err();
        assert_eq!(err.to_string(), "No data found for: SPY");
    }

    #[test]
    fn serves_window() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
        let series = PriceSeries::new(vec![
            PricePoint::new(d(2), 100.0),
            PricePoint::new(d(3), 101.0),
            PricePoint::new(d(4), 102.0),
        ])
        .unwrap();
        let source = InMemorySource::new().with_series("SPY", series);
        let fetched = source.fetch("SPY", d(3), d(10)).unwrap();
        assert_eq!(fetched.series.len(), 2);
        assert_eq!(fetched.source, DataSource::InMemory);
    }
}
