//! Instrument sets: the batch a screen or backtest runs over.

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Instruments as written in a config file or request body: either a list or,
/// mistakenly, a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum InstrumentArg {
    Many(Vec<String>),
    Single(String),
}

/// Ordered, de-duplicated instrument identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentSet {
    instruments: Vec<String>,
}

impl InstrumentSet {
    /// Trims identifiers, drops blanks and keeps the first of any duplicate.
    pub fn new<I, S>(instruments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut out: Vec<String> = Vec::new();
        for raw in instruments {
            let id = raw.as_ref().trim();
            if !id.is_empty() && !out.iter().any(|existing| existing == id) {
                out.push(id.to_string());
            }
        }
        Self { instruments: out }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.instruments.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.instruments
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}

impl TryFrom<InstrumentArg> for InstrumentSet {
    type Error = ConfigError;

    fn try_from(arg: InstrumentArg) -> Result<Self, Self::Error> {
        match arg {
            InstrumentArg::Many(list) => Ok(Self::new(list)),
            InstrumentArg::Single(value) => Err(ConfigError::InputShape { value }),
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for InstrumentSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedups_and_trims() {
        let set = InstrumentSet::new([" SPY", "QQQ", "SPY", "", "IWM "]);
        assert_eq!(set.as_slice(), &["SPY", "QQQ", "IWM"]);
    }

    #[test]
    fn bare_string_is_an_input_shape_error() {
        let arg: InstrumentArg = serde_json::from_str(r#""AAPL""#).unwrap();
        let err = InstrumentSet::try_from(arg).unwrap_err();
        assert!(matches!(err, ConfigError::InputShape { .. }));
    }

    #[test]
    fn list_is_accepted() {
        let arg: InstrumentArg = serde_json::from_str(r#"["AAPL","MSFT"]"#).unwrap();
        let set = InstrumentSet::try_from(arg).unwrap();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn collects_from_iterator() {
        let set: InstrumentSet = vec!["A".to_string(), "B".to_string()].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec!["A", "B"]);
    }
}
