//! Price sources

pub mod csv_source;
pub mod memory;
pub mod provider;
pub mod synthetic;
pub mod yahoo;

pub use csv_source::CsvSource;
pub use memory::InMemorySource;
pub use provider::{DataError, DataSource, FetchResult, PriceSource};
pub use synthetic::SyntheticSource;
pub use yahoo::YahooProvider;
