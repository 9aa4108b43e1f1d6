//! Instrument price statistics.
//!
//! This crate contains:
//! - The `name,DD-Mon-YYYY,value` record parser
//! - The ingestion pipeline (multiplier adjustment, business-day filter, grouping)
//! - The per-instrument statistics engine
//! - The reference-store capability used for multiplier lookups

pub mod domain;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod reference;
pub mod run;
pub mod statistics;

pub use domain::{
    is_business_day, parse_trade_date, InstrumentSeries, PriceObservation, SeriesByInstrument,
};
pub use error::{CoreError, ParseError, ReferenceError, StatisticsError};
pub use parser::{RawRecord, RecordReader};
pub use pipeline::{ingest, ingest_file, IngestReport, Ingestion};
pub use pricestat_warehouse::{
    ModifierStore, MultiplierEntry, SeedConfig, SeedPolicy, StoreConfig, WarehouseError,
};
pub use reference::{ReferenceStore, StaticMultipliers, NEUTRAL_MULTIPLIER};
pub use run::{run_file, RunReport};
pub use statistics::{summarize, StatisticRule, StatisticValue, Summary, NEWEST_WINDOW};
