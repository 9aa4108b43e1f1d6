use thiserror::Error;

use crate::statistics::StatisticRule;

/// A record that cannot be turned into `(instrument, date, value)`.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: expected 3 fields (name,date,value), found {found}")]
    FieldCount { line: u64, found: usize },

    #[error("line {line}: value '{value}' is not a number")]
    InvalidValue { line: u64, value: String },

    #[error("line {line}: cannot read input: {source}")]
    Read {
        line: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StatisticsError {
    #[error("instrument '{instrument}': rule {rule} needs at least one observation")]
    EmptyInput {
        instrument: String,
        rule: StatisticRule,
    },
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("multiplier lookup failed for '{instrument}': {message}")]
    Lookup { instrument: String, message: String },
}

/// Top-level error type for a pricing run.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Statistics(#[from] StatisticsError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
