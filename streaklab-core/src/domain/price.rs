//! PricePoint and PriceSeries: the raw input of every streak computation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One adjusted closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        Self { date, price }
    }

    /// A usable price is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }
}

/// Errors raised while assembling a price series.
#[derive(Debug, Error, PartialEq)]
pub enum SeriesError {
    #[error("dates must be strictly increasing: {previous} is followed by {next}")]
    UnorderedDates { previous: NaiveDate, next: NaiveDate },
}

/// Date-ordered adjusted prices for a single instrument.
///
/// Dates are strictly increasing. Points with a NaN, infinite, zero or negative
/// price are dropped on construction (providers emit NaN for holidays).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, SeriesError> {
        let points: Vec<PricePoint> = points.into_iter().filter(PricePoint::is_valid).collect();
        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(SeriesError::UnorderedDates {
                    previous: pair[0].date,
                    next: pair[1].date,
                });
            }
        }
        Ok(Self { points })
    }

    /// Sort by date and keep the last price seen for each date.
    ///
    /// Used by sources whose rows may arrive out of order (CSV files).
    pub fn from_unsorted(mut points: Vec<PricePoint>) -> Self {
        points.retain(PricePoint::is_valid);
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for p in points {
            match deduped.last_mut() {
                Some(last) if last.date == p.date => *last = p,
                _ => deduped.push(p),
            }
        }
        Self { points: deduped }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Restrict to the inclusive `[start, end]` range.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            points: self
                .points
                .iter()
                .filter(|p| p.date >= start && p.date <= end)
                .copied()
                .collect(),
        }
    }
}
