//! Streak extraction: run-length encoding of a direction sequence.

use serde::{Deserialize, Serialize};

use super::StreakError;
use crate::domain::Direction;

/// Streak lengths of a direction sequence plus the still-open final streak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streaks {
    /// Every maximal run length in order. The last entry is the open streak.
    pub lengths: Vec<usize>,
    /// Length of the final, still-open streak.
    pub current: usize,
    /// Direction of the final, still-open streak.
    pub current_direction: Direction,
}

impl Streaks {
    /// Total number of labelled days covered by the streaks.
    pub fn total_days(&self) -> usize {
        self.lengths.iter().sum()
    }

    pub fn longest(&self) -> usize {
        self.lengths.iter().copied().max().unwrap_or(0)
    }
}

/// Walk the directions and emit one length per maximal run.
pub fn extract_streaks<I>(directions: I) -> Result<Streaks, StreakError>
where
    I: IntoIterator<Item = Direction>,
{
    let mut iter = directions.into_iter();
    let mut current_direction = iter.next().ok_or(StreakError::InsufficientData { points: 0 })?;
    let mut counter = 1usize;
    let mut lengths = Vec::new();

    for direction in iter {
        if direction == current_direction {
            counter += 1;
        } else {
            lengths.push(counter);
            counter = 1;
            current_direction = direction;
        }
    }
    lengths.push(counter);

    Ok(Streaks {
        lengths,
        current: counter,
        current_direction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use Direction::{Down, Up};

    #[test]
    fn reference_sequence() {
        let s = extract_streaks([Up, Up, Up, Down, Down, Up]).unwrap();
        assert_eq!(s.lengths, vec![3, 2, 1]);
        assert_eq!(s.current, 1);
        assert_eq!(s.current_direction, Up);
    }

    #[test]
    fn single_run() {
        let s = extract_streaks([Down; 4]).unwrap();
        assert_eq!(s.lengths, vec![4]);
        assert_eq!(s.current, 4);
        assert_eq!(s.current_direction, Down);
    }

    #[test]
    fn alternating_days_are_length_one() {
        let s = extract_streaks([Up, Down, Up, Down]).unwrap();
        assert_eq!(s.lengths, vec![1, 1, 1, 1]);
        assert_eq!(s.longest(), 1);
    }

    #[test]
    fn empty_input_is_insufficient() {
        let err = extract_streaks(std::iter::empty()).unwrap_err();
        assert_eq!(err, StreakError::InsufficientData { points: 0 });
    }
}
