//! CSV price source: one `{INSTRUMENT}.csv` file per instrument.
//!
//! Expected columns are `date` (YYYY-MM-DD) and `adj_close`. Yahoo-style
//! exports with `Date` / `Adj Close` headers are accepted as well; any extra
//! columns are ignored.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, DataSource, FetchResult, PriceSource};
use crate::domain::{PricePoint, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Adj Close", alias = "adjclose")]
    adj_close: Option<f64>,
}

/// Reads price files from a directory.
#[derive(Debug, Clone)]
pub struct CsvSource {
    dir: PathBuf,
}

impl CsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, instrument: &str) -> PathBuf {
        self.dir.join(format!("{instrument}.csv"))
    }

    fn read_points(instrument: &str, path: &Path) -> Result<Vec<PricePoint>, DataError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| DataError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let mut points = Vec::new();
        for (line, row) in reader.deserialize::<CsvRow>().enumerate() {
            let row = row.map_err(|e| DataError::Malformed {
                instrument: instrument.to_string(),
                message: format!("row {}: {e}", line + 1),
            })?;
            if let Some(price) = row.adj_close {
                points.push(PricePoint::new(row.date, price));
            }
        }
        Ok(points)
    }
}

impl PriceSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, DataError> {
        let path = self.path_for(instrument);
        if !path.exists() {
            return Err(DataError::no_data(instrument));
        }

        let series = PriceSeries::from_unsorted(Self::read_points(instrument, &path)?)
            .between(start, end);
        if series.is_empty() {
            return Err(DataError::no_data(instrument));
        }

        Ok(FetchResult {
            instrument: instrument.to_string(),
            series,
            source: DataSource::CsvImport,
        })
    }
}
