//! Continuation probability: tail mass of the streak-length distribution.

use serde::{Deserialize, Serialize};

use super::{StreakDistribution, StreakError};

/// Reverse cumulative sum of a distribution.
///
/// Entry `j` holds `P(L >= max_len - j)`, so the first entry is the mass of the
/// longest bucket and the last entry is `P(L >= 1)` (1 up to rounding).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailCurve {
    reversed_cumsum: Vec<f64>,
}

impl TailCurve {
    pub fn from_distribution(dist: &StreakDistribution) -> Self {
        let mut acc = 0.0;
        let reversed_cumsum = dist
            .probabilities()
            .iter()
            .rev()
            .map(|p| {
                acc += p;
                acc
            })
            .collect();
        Self { reversed_cumsum }
    }

    /// Raw reversed cumulative sums, longest length first.
    pub fn values(&self) -> &[f64] {
        &self.reversed_cumsum
    }

    pub fn max_len(&self) -> usize {
        self.reversed_cumsum.len()
    }

    /// `P(L >= len)`. Lengths beyond the longest bucket have no precedent and
    /// return 0; `len == 0` is certain.
    pub fn at_least(&self, len: usize) -> f64 {
        if len == 0 {
            return 1.0;
        }
        let max = self.max_len();
        if len > max {
            return 0.0;
        }
        self.reversed_cumsum.get(max - len).copied().unwrap_or(0.0)
    }

    /// Largest length `K` whose tail `P(L >= K)` is still at or above
    /// `threshold`. A tail exactly equal to the threshold counts as above.
    /// Returns 0 when even `P(L >= 1)` is below the threshold.
    pub fn last_length_at_or_above(&self, threshold: f64) -> usize {
        (1..=self.max_len())
            .rev()
            .find(|&len| self.at_least(len) >= threshold)
            .unwrap_or(0)
    }
}

/// Probability that the current streak extends at least one more day, with
/// the tail curve it was read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Continuation {
    pub current_streak: usize,
    pub probability: f64,
    pub tail: TailCurve,
}

impl Continuation {
    /// True when the streak has never been this long before.
    pub fn is_unprecedented(&self) -> bool {
        self.current_streak + 1 > self.tail.max_len()
    }
}

/// `P(L >= current + 1)` under `dist`.
///
/// A current streak with no longer historical precedent yields exactly 0.
pub fn continuation_probability(
    dist: &StreakDistribution,
    current_streak: usize,
) -> Result<Continuation, StreakError> {
    if current_streak == 0 {
        return Err(StreakError::InvalidCurrentStreak);
    }
    let tail = TailCurve::from_distribution(dist);
    let probability = tail.at_least(current_streak + 1);
    Ok(Continuation {
        current_streak,
        probability,
        tail,
    })
}
