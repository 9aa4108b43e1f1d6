use std::path::Path;

use serde::Serialize;

use crate::error::CoreError;
use crate::pipeline::{ingest_file, IngestReport};
use crate::reference::ReferenceStore;
use crate::statistics::{summarize, Summary};

/// Everything a completed run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunReport {
    pub statistics: Summary,
    pub ingest: IngestReport,
}

/// Parse, ingest and summarize the price file at `input`.
///
/// Nothing is returned unless every stage succeeds.
pub fn run_file<S>(input: &Path, store: &S) -> Result<RunReport, CoreError>
where
    S: ReferenceStore + ?Sized,
{
    let ingestion = ingest_file(input, store)?;
    let statistics = summarize(&ingestion.series)?;
    Ok(RunReport {
        statistics,
        ingest: ingestion.report,
    })
}
