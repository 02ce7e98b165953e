//! Direction series: one up/down label per trading day.
//!
//! Derivation from a price series:
//! 1. simple return `r[t] = p[t] / p[t-1] - 1` for every t >= 1
//! 2. rows whose (price, return, direction) triple repeats an earlier row are
//!    dropped, which collapses stale repeated closes
//! 3. `r > 0` is up, `r < 0` is down, `r == 0` follows the [`ZeroReturnPolicy`]

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Direction, PriceSeries, ZeroReturnPolicy};

/// A labelled trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionPoint {
    pub date: NaiveDate,
    pub price: f64,
    /// Simple return versus the previous price point.
    pub ret: f64,
    pub direction: Direction,
}

/// Ordered direction labels for one instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectionSeries {
    points: Vec<DirectionPoint>,
}

impl DirectionSeries {
    pub fn from_prices(prices: &PriceSeries, policy: ZeroReturnPolicy) -> Self {
        let mut seen: HashSet<(u64, u64, i8)> = HashSet::new();
        let mut points: Vec<DirectionPoint> = Vec::with_capacity(prices.len());

        for pair in prices.points().windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            let ret = cur.price / prev.price - 1.0;
            let raw_sign: i8 = if ret > 0.0 {
                1
            } else if ret < 0.0 {
                -1
            } else {
                0
            };

            // +0.0 and -0.0 compare equal but differ in bits
            let ret_key = if ret == 0.0 { 0.0_f64 } else { ret };
            if !seen.insert((cur.price.to_bits(), ret_key.to_bits(), raw_sign)) {
                continue;
            }

            let direction = match raw_sign {
                1 => Direction::Up,
                -1 => Direction::Down,
                _ => match policy {
                    ZeroReturnPolicy::Down => Direction::Down,
                    ZeroReturnPolicy::Skip => continue,
                    ZeroReturnPolicy::Carry => match points.last() {
                        Some(last) => last.direction,
                        None => continue,
                    },
                },
            };

            points.push(DirectionPoint {
                date: cur.date,
                price: cur.price,
                ret,
                direction,
            });
        }

        Self { points }
    }

    /// Build directly from labels, for callers that already have them.
    pub fn from_points(points: Vec<DirectionPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[DirectionPoint] {
        &self.points
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.points.iter().map(|p| p.direction)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
