use std::collections::BTreeMap;

use pricestat_warehouse::{ModifierStore, SeedConfig};

use crate::error::ReferenceError;

/// Multiplier applied when the reference data has no entry for an instrument.
pub const NEUTRAL_MULTIPLIER: f64 = 1.0;

/// Read access to per-instrument price multipliers.
pub trait ReferenceStore {
    /// The stored multiplier for `instrument`, or `None` when there is no entry.
    fn find_multiplier(&self, instrument: &str) -> Result<Option<f64>, ReferenceError>;

    /// The stored multiplier, falling back to [`NEUTRAL_MULTIPLIER`].
    fn get_multiplier(&self, instrument: &str) -> Result<f64, ReferenceError> {
        Ok(self
            .find_multiplier(instrument)?
            .unwrap_or(NEUTRAL_MULTIPLIER))
    }
}

impl ReferenceStore for ModifierStore {
    fn find_multiplier(&self, instrument: &str) -> Result<Option<f64>, ReferenceError> {
        self.lookup(instrument)
            .map_err(|error| ReferenceError::Lookup {
                instrument: instrument.to_owned(),
                message: error.to_string(),
            })
    }
}

/// An in-memory multiplier table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticMultipliers {
    entries: BTreeMap<String, f64>,
}

impl StaticMultipliers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, instrument: impl Into<String>, multiplier: f64) -> Self {
        self.entries.insert(instrument.into(), multiplier);
        self
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for StaticMultipliers {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(instrument, multiplier)| (instrument.into(), multiplier))
                .collect(),
        }
    }
}

impl From<&SeedConfig> for StaticMultipliers {
    fn from(seed: &SeedConfig) -> Self {
        seed.entries
            .iter()
            .map(|entry| (entry.instrument.clone(), entry.multiplier))
            .collect()
    }
}

impl ReferenceStore for StaticMultipliers {
    fn find_multiplier(&self, instrument: &str) -> Result<Option<f64>, ReferenceError> {
        Ok(self.entries.get(instrument).copied())
    }
}
