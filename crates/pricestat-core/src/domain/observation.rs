use std::collections::BTreeMap;

use time::Date;

/// One adjusted price for one business day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceObservation {
    pub date: Date,
    pub value: f64,
}

/// Observations for a single instrument, kept in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentSeries {
    observations: Vec<PriceObservation>,
}

impl InstrumentSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, date: Date, value: f64) {
        self.observations.push(PriceObservation { date, value });
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.observations.iter().map(|observation| observation.value)
    }
}

impl FromIterator<PriceObservation> for InstrumentSeries {
    fn from_iter<T: IntoIterator<Item = PriceObservation>>(iter: T) -> Self {
        Self {
            observations: iter.into_iter().collect(),
        }
    }
}

pub type SeriesByInstrument = BTreeMap<String, InstrumentSeries>;
