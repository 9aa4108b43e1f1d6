//! Line-oriented reader for `name,date,value` price records.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::ParseError;

/// One input line before any adjustment or date handling.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub line: u64,
    pub instrument: String,
    pub date: String,
    pub value: f64,
}

impl RawRecord {
    pub fn new(instrument: impl Into<String>, date: impl Into<String>, value: f64) -> Self {
        Self {
            line: 0,
            instrument: instrument.into(),
            date: date.into(),
            value,
        }
    }
}

/// Lazily yields one item per physical input line, in input order.
///
/// Each line is split as a single CSV record. Dates are passed through untouched.
/// A blank line, a line with the wrong number of fields or a non-numeric value
/// yields a [`ParseError`]; callers are expected to stop there.
pub struct RecordReader<R: Read> {
    lines: Lines<BufReader<R>>,
    splitter: ReaderBuilder,
    line: u64,
}

impl RecordReader<File> {
    /// Open `path` for a fresh pass over its records.
    pub fn open(path: &Path) -> Result<Self, std::io::Error> {
        Ok(Self::from_reader(File::open(path)?))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let mut splitter = ReaderBuilder::new();
        splitter.has_headers(false).flexible(true);
        Self {
            lines: BufReader::new(reader).lines(),
            splitter,
            line: 0,
        }
    }

    fn split_line(&self, text: &str) -> Result<StringRecord, ParseError> {
        let mut record = StringRecord::new();
        self.splitter
            .from_reader(text.as_bytes())
            .read_record(&mut record)?;
        Ok(record)
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<RawRecord, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        self.line += 1;
        let line = self.line;

        let text = match text {
            Ok(text) => text,
            Err(source) => return Some(Err(ParseError::Read { line, source })),
        };
        if text.is_empty() {
            return Some(Err(ParseError::FieldCount { line, found: 0 }));
        }

        Some(
            self.split_line(&text)
                .and_then(|record| parse_record(line, &record)),
        )
    }
}

fn parse_record(line: u64, record: &StringRecord) -> Result<RawRecord, ParseError> {
    if record.len() != 3 {
        return Err(ParseError::FieldCount {
            line,
            found: record.len(),
        });
    }

    let raw_value = &record[2];
    let value = raw_value
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidValue {
            line,
            value: raw_value.to_owned(),
        })?;

    Ok(RawRecord {
        line,
        instrument: record[0].to_owned(),
        date: record[1].to_owned(),
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(input: &str) -> Vec<Result<RawRecord, ParseError>> {
        RecordReader::from_reader(input.as_bytes()).collect()
    }

    #[test]
    fn yields_records_in_file_order() {
        let records = read_all("INSTRUMENT1,05-Nov-2014,100\nXYZ,01-Jan-2015,5.25\n")
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .expect("valid input");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].instrument, "INSTRUMENT1");
        assert_eq!(records[0].date, "05-Nov-2014");
        assert_eq!(records[0].value, 100.0);
        assert_eq!(records[0].line, 1);
        assert_eq!(records[1].instrument, "XYZ");
        assert_eq!(records[1].value, 5.25);
        assert_eq!(records[1].line, 2);
    }

    #[test]
    fn does_not_validate_dates() {
        let records = read_all("A,not-a-date,1\n");
        let record = records[0].as_ref().expect("date is not checked here");
        assert_eq!(record.date, "not-a-date");
    }

    #[test]
    fn rejects_wrong_field_count() {
        let records = read_all("A,05-Nov-2014\n");
        assert!(matches!(
            records[0],
            Err(ParseError::FieldCount { line: 1, found: 2 })
        ));

        let records = read_all("A,05-Nov-2014,1,extra\n");
        assert!(matches!(
            records[0],
            Err(ParseError::FieldCount { found: 4, .. })
        ));
    }

    #[test]
    fn rejects_non_numeric_value() {
        let records = read_all("A,05-Nov-2014,1.0\nB,05-Nov-2014,abc\n");
        assert!(records[0].is_ok());
        match &records[1] {
            Err(ParseError::InvalidValue { line, value }) => {
                assert_eq!(*line, 2);
                assert_eq!(value, "abc");
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn value_tolerates_surrounding_whitespace() {
        let records = read_all("A,05-Nov-2014, 12.5 \n");
        assert_eq!(records[0].as_ref().expect("valid").value, 12.5);
    }

    #[test]
    fn quoted_names_keep_their_text() {
        let records = read_all("\"INSTRUMENT1\",05-Nov-2014,3\n");
        assert_eq!(records[0].as_ref().expect("valid").instrument, "INSTRUMENT1");
    }

    #[test]
    fn blank_line_is_a_field_count_error_on_its_own_line() {
        let records = read_all("A,05-Nov-2014,1\n\nB,05-Nov-2014,2\n");

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_ref().expect("first line").line, 1);
        assert!(matches!(
            records[1],
            Err(ParseError::FieldCount { line: 2, found: 0 })
        ));
        let third = records[2].as_ref().expect("third line");
        assert_eq!(third.instrument, "B");
        assert_eq!(third.line, 3);
    }

    #[test]
    fn trailing_blank_line_is_reported() {
        let records = read_all("A,05-Nov-2014,1\n\n");
        assert_eq!(records.len(), 2);
        assert!(matches!(
            records[1],
            Err(ParseError::FieldCount { line: 2, found: 0 })
        ));
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let records = read_all("A,05-Nov-2014,1\r\nB,06-Nov-2014,2\r\n");
        let second = records[1].as_ref().expect("valid");
        assert_eq!(second.date, "06-Nov-2014");
        assert_eq!(second.value, 2.0);
    }

    #[test]
    fn invalid_utf8_is_a_read_error() {
        let records: Vec<_> = RecordReader::from_reader(&b"A,05-Nov-2014,\xff\n"[..]).collect();
        assert!(matches!(records[0], Err(ParseError::Read { line: 1, .. })));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(read_all("").is_empty());
    }
}
