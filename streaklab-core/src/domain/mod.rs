//! Domain types for StreakLab

pub mod direction;
pub mod price;

pub use direction::{Direction, Side, ZeroReturnPolicy};
pub use price::{PricePoint, PriceSeries, SeriesError};
