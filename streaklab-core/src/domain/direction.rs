//! Direction labels, the zero-return labelling policy, and trade sides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Daily price movement direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// +1 for up, -1 for down.
    pub fn sign(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    /// The side a contrarian trade takes against a streak in this direction.
    pub fn contrarian(self) -> Side {
        match self {
            Direction::Up => Side::Short,
            Direction::Down => Side::Long,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// How a day with a return of exactly zero is labelled.
///
/// `Down` reproduces the historical behaviour of the screening tool, where any
/// non-positive return counts as a down day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroReturnPolicy {
    /// Label the day as down.
    #[default]
    Down,
    /// Drop the day from the direction series.
    Skip,
    /// No movement: the day repeats the previous label and extends the streak.
    Carry,
}

impl FromStr for ZeroReturnPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "down" => Ok(Self::Down),
            "skip" => Ok(Self::Skip),
            "carry" => Ok(Self::Carry),
            other => Err(format!(
                "unknown zero-return policy '{other}'. Valid: down, skip, carry"
            )),
        }
    }
}

/// Side of a contrarian entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Long,
    Short,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "long"),
            Side::Short => write!(f, "short"),
        }
    }
}
