//! Empirical streak-length distribution with binomial hole filling.
//!
//! Observed lengths are counted, then every length below the maximum that was
//! never observed gets `ceil(count[len - 1] / 2)`: each extra day of a streak is
//! assumed to be roughly a coin flip. The pass runs left to right, so a
//! synthesized bucket seeds the next missing one. A missing bucket at length 1
//! has no predecessor and is filled with 0.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::StreakError;

/// Normalized probability per streak length, keys contiguous from 1 to the
/// longest observed length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreakDistribution {
    /// Count per length after hole filling (index 0 is length 1).
    counts: Vec<u64>,
    /// Lengths whose count was synthesized rather than observed.
    synthesized: Vec<usize>,
    /// Probability per length (index 0 is length 1).
    probabilities: Vec<f64>,
}

impl StreakDistribution {
    /// Estimate from observed streak lengths. Zero lengths are ignored.
    pub fn estimate(lengths: &[usize]) -> Result<Self, StreakError> {
        let mut observed: BTreeMap<usize, u64> = BTreeMap::new();
        for &len in lengths.iter().filter(|&&len| len > 0) {
            *observed.entry(len).or_insert(0) += 1;
        }

        let max_len = *observed
            .keys()
            .next_back()
            .ok_or(StreakError::EmptyDistribution)?;

        let mut counts: Vec<u64> = Vec::with_capacity(max_len);
        let mut synthesized = Vec::new();
        for len in 1..=max_len {
            let count = match observed.get(&len) {
                Some(&c) => c,
                None => {
                    synthesized.push(len);
                    let previous = counts.last().copied().unwrap_or(0);
                    previous.div_ceil(2)
                }
            };
            counts.push(count);
        }

        let total: u64 = counts.iter().sum();
        let probabilities = counts
            .iter()
            .map(|&c| c as f64 / total as f64)
            .collect();

        Ok(Self {
            counts,
            synthesized,
            probabilities,
        })
    }

    /// Build from explicit probabilities for lengths 1, 2, ...
    ///
    /// Values must be non-negative and sum to 1 within 1e-9.
    pub fn from_probabilities(probabilities: Vec<f64>) -> Result<Self, StreakError> {
        if probabilities.is_empty() {
            return Err(StreakError::EmptyDistribution);
        }
        let sum: f64 = probabilities.iter().sum();
        if probabilities.iter().any(|p| !p.is_finite() || *p < 0.0) || (sum - 1.0).abs() > 1e-9 {
            return Err(StreakError::InvalidDistribution { sum });
        }
        Ok(Self {
            counts: Vec::new(),
            synthesized: Vec::new(),
            probabilities,
        })
    }

    /// Longest streak length with a bucket.
    pub fn max_len(&self) -> usize {
        self.probabilities.len()
    }

    /// Probability of a streak of exactly `len` days; 0 outside 1..=max_len.
    pub fn probability(&self, len: usize) -> f64 {
        len.checked_sub(1)
            .and_then(|i| self.probabilities.get(i))
            .copied()
            .unwrap_or(0.0)
    }

    /// Probabilities in ascending length order (index 0 is length 1).
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Counts after hole filling, ascending. Empty when built from probabilities.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Lengths whose bucket was synthesized.
    pub fn synthesized(&self) -> &[usize] {
        &self.synthesized
    }

    /// `(length, probability)` pairs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(i, &p)| (i + 1, p))
    }
}
