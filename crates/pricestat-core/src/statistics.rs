//! Per-instrument summary statistics.
//!
//! Each instrument name maps to exactly one [`StatisticRule`]:
//!
//! | Instrument | Rule |
//! |------------|------|
//! | `INSTRUMENT1` | mean of all values |
//! | `INSTRUMENT2` | mean of values dated November 2014 |
//! | `INSTRUMENT3` | median of all values, only for more than one observation |
//! | anything else | sum of the 10 newest values |

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::Serialize;
use time::Month;

use crate::domain::{InstrumentSeries, PriceObservation, SeriesByInstrument};
use crate::error::StatisticsError;

/// How many of the newest observations the default rule adds up.
pub const NEWEST_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatisticRule {
    Mean,
    November2014Mean,
    Median,
    NewestSum,
}

impl StatisticRule {
    pub fn for_instrument(instrument: &str) -> Self {
        match instrument {
            "INSTRUMENT1" => Self::Mean,
            "INSTRUMENT2" => Self::November2014Mean,
            "INSTRUMENT3" => Self::Median,
            _ => Self::NewestSum,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::November2014Mean => "november_2014_mean",
            Self::Median => "median",
            Self::NewestSum => "newest_sum",
        }
    }

    /// Apply the rule. `Ok(None)` means the rule deliberately produces no value.
    pub fn apply(
        self,
        instrument: &str,
        series: &InstrumentSeries,
    ) -> Result<Option<f64>, StatisticsError> {
        let empty = || StatisticsError::EmptyInput {
            instrument: instrument.to_owned(),
            rule: self,
        };

        match self {
            Self::Mean => mean(series.values()).map(Some).ok_or_else(empty),
            Self::November2014Mean => mean(
                series
                    .observations()
                    .iter()
                    .filter(|observation| {
                        observation.date.year() == 2014
                            && observation.date.month() == Month::November
                    })
                    .map(|observation| observation.value),
            )
            .map(Some)
            .ok_or_else(empty),
            Self::Median => {
                if series.len() > 1 {
                    Ok(median(series.values().collect()))
                } else {
                    Ok(None)
                }
            }
            Self::NewestSum => Ok(Some(newest_sum(series.observations(), NEWEST_WINDOW))),
        }
    }
}

impl Display for StatisticRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatisticValue {
    pub rule: StatisticRule,
    pub value: f64,
}

/// One computed value per instrument. Instruments whose rule yields nothing are absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Summary {
    results: BTreeMap<String, StatisticValue>,
}

impl Summary {
    pub fn get(&self, instrument: &str) -> Option<f64> {
        self.results.get(instrument).map(|result| result.value)
    }

    pub fn contains(&self, instrument: &str) -> bool {
        self.results.contains_key(instrument)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatisticValue)> {
        self.results
            .iter()
            .map(|(instrument, result)| (instrument.as_str(), result))
    }
}

/// Compute the statistic for every instrument.
///
/// Fails on the first rule that has no data to work with; no partial summary is returned.
pub fn summarize(series_by_instrument: &SeriesByInstrument) -> Result<Summary, StatisticsError> {
    let mut summary = Summary::default();
    for (instrument, series) in series_by_instrument {
        let rule = StatisticRule::for_instrument(instrument);
        if let Some(value) = rule.apply(instrument, series)? {
            summary
                .results
                .insert(instrument.clone(), StatisticValue { rule, value });
        }
    }
    Ok(summary)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        Some(values[mid])
    } else {
        Some((values[mid - 1] + values[mid]) / 2.0)
    }
}

fn newest_sum(observations: &[PriceObservation], window: usize) -> f64 {
    let mut newest_first = observations.to_vec();
    // Stable: equal dates keep their input order.
    newest_first.sort_by(|left, right| right.date.cmp(&left.date));
    newest_first
        .iter()
        .take(window)
        .map(|observation| observation.value)
        .sum()
}
