//! Multiplier adjustment, business-day filtering and grouping by instrument.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{is_business_day, parse_trade_date, InstrumentSeries, SeriesByInstrument};
use crate::error::{CoreError, ParseError};
use crate::parser::{RawRecord, RecordReader};
use crate::reference::ReferenceStore;

/// Counters describing what happened to each input record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub records_read: usize,
    pub retained: usize,
    pub skipped_malformed_date: usize,
    pub skipped_weekend: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ingestion {
    pub series: SeriesByInstrument,
    pub report: IngestReport,
}

/// Adjust, filter and group `records`.
///
/// The first [`ParseError`] ends ingestion and is returned as is. Records whose
/// date cannot be parsed, or which fall on a weekend, are dropped and counted.
pub fn ingest<I, S>(records: I, store: &S) -> Result<Ingestion, CoreError>
where
    I: IntoIterator<Item = Result<RawRecord, ParseError>>,
    S: ReferenceStore + ?Sized,
{
    let mut ingestion = Ingestion::default();

    for record in records {
        let record = record?;
        ingestion.report.records_read += 1;

        let value = record.value * store.get_multiplier(&record.instrument)?;

        let Some(date) = parse_trade_date(&record.date) else {
            debug!(line = record.line, date = %record.date, "skipping record with malformed date");
            ingestion.report.skipped_malformed_date += 1;
            continue;
        };

        if !is_business_day(date) {
            debug!(line = record.line, %date, "skipping weekend record");
            ingestion.report.skipped_weekend += 1;
            continue;
        }

        ingestion
            .series
            .entry(record.instrument)
            .or_insert_with(InstrumentSeries::new)
            .push(date, value);
        ingestion.report.retained += 1;
    }

    info!(
        records_read = ingestion.report.records_read,
        retained = ingestion.report.retained,
        instruments = ingestion.series.len(),
        "ingestion complete"
    );
    Ok(ingestion)
}

/// Read and ingest the price file at `path`.
///
/// The file is opened for this call only and closed on every return path.
pub fn ingest_file<S>(path: &Path, store: &S) -> Result<Ingestion, CoreError>
where
    S: ReferenceStore + ?Sized,
{
    let records = RecordReader::open(path)?;
    ingest(records, store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReferenceError;
    use crate::reference::StaticMultipliers;
    use time::macros::date;

    fn rows(items: &[(&str, &str, f64)]) -> Vec<Result<RawRecord, ParseError>> {
        items
            .iter()
            .map(|(name, date, value)| Ok(RawRecord::new(*name, *date, *value)))
            .collect()
    }

    #[test]
    fn applies_multiplier_and_drops_weekends() {
        let store = StaticMultipliers::new().with_entry("INSTRUMENT1", 1.5);
        let ingestion = ingest(
            rows(&[
                ("INSTRUMENT1", "05-Nov-2014", 100.0),
                ("INSTRUMENT1", "06-Nov-2014", 200.0),
                ("INSTRUMENT1", "08-Nov-2014", 300.0),
            ]),
            &store,
        )
        .expect("ingest");

        let series = &ingestion.series["INSTRUMENT1"];
        assert_eq!(series.values().collect::<Vec<_>>(), vec![150.0, 300.0]);
        assert_eq!(series.observations()[0].date, date!(2014 - 11 - 05));
        assert_eq!(ingestion.report.skipped_weekend, 1);
        assert_eq!(ingestion.report.retained, 2);
    }

    #[test]
    fn malformed_dates_are_skipped_not_fatal() {
        let ingestion = ingest(
            rows(&[
                ("A", "5-Nov-2014", 1.0),
                ("A", "05-Nov-2014", 2.0),
                ("B", "garbage", 3.0),
            ]),
            &StaticMultipliers::new(),
        )
        .expect("ingest");

        assert_eq!(ingestion.series.len(), 1);
        assert_eq!(ingestion.series["A"].values().collect::<Vec<_>>(), vec![2.0]);
        assert!(!ingestion.series.contains_key("B"));
        assert_eq!(ingestion.report.skipped_malformed_date, 2);
        assert_eq!(ingestion.report.records_read, 3);
    }

    #[test]
    fn keeps_input_order_within_an_instrument() {
        let ingestion = ingest(
            rows(&[
                ("A", "07-Nov-2014", 3.0),
                ("B", "05-Nov-2014", 9.0),
                ("A", "05-Nov-2014", 1.0),
                ("A", "06-Nov-2014", 2.0),
            ]),
            &StaticMultipliers::new(),
        )
        .expect("ingest");

        assert_eq!(
            ingestion.series["A"].values().collect::<Vec<_>>(),
            vec![3.0, 1.0, 2.0]
        );
    }

    #[test]
    fn parse_error_stops_ingestion() {
        let records = vec![
            Ok(RawRecord::new("A", "05-Nov-2014", 1.0)),
            Err(ParseError::FieldCount { line: 2, found: 1 }),
            Ok(RawRecord::new("A", "06-Nov-2014", 2.0)),
        ];
        let error = ingest(records, &StaticMultipliers::new()).expect_err("must fail");
        assert!(matches!(
            error,
            CoreError::Parse(ParseError::FieldCount { line: 2, .. })
        ));
    }

    struct FailingStore;

    impl ReferenceStore for FailingStore {
        fn find_multiplier(&self, instrument: &str) -> Result<Option<f64>, ReferenceError> {
            Err(ReferenceError::Lookup {
                instrument: instrument.to_owned(),
                message: String::from("store unavailable"),
            })
        }
    }

    #[test]
    fn reference_failures_propagate() {
        let error = ingest(rows(&[("A", "05-Nov-2014", 1.0)]), &FailingStore)
            .expect_err("must fail");
        assert!(matches!(error, CoreError::Reference(_)));
    }

    /// Resolves every instrument through `get_multiplier` with its own fallback.
    struct FlatFallbackStore;

    impl ReferenceStore for FlatFallbackStore {
        fn find_multiplier(&self, _instrument: &str) -> Result<Option<f64>, ReferenceError> {
            Ok(None)
        }

        fn get_multiplier(&self, _instrument: &str) -> Result<f64, ReferenceError> {
            Ok(2.0)
        }
    }

    #[test]
    fn multiplier_comes_from_get_multiplier() {
        let ingestion = ingest(rows(&[("A", "05-Nov-2014", 10.0)]), &FlatFallbackStore)
            .expect("ingest");
        assert_eq!(ingestion.series["A"].values().collect::<Vec<_>>(), vec![20.0]);
    }
}
