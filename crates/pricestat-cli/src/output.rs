use std::io::Write;

use pricestat_core::RunReport;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render<W: Write>(
    report: &RunReport,
    format: OutputFormat,
    pretty: bool,
    out: &mut W,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            if pretty {
                serde_json::to_writer_pretty(&mut *out, report)?;
            } else {
                serde_json::to_writer(&mut *out, report)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Table => render_table(report, out)?,
    }

    Ok(())
}

fn render_table<W: Write>(report: &RunReport, out: &mut W) -> Result<(), CliError> {
    let width = report
        .statistics
        .iter()
        .map(|(instrument, _)| instrument.len())
        .max()
        .unwrap_or(0)
        .max("instrument".len());

    writeln!(out, "{:<width$}  {:<18}  value", "instrument", "rule")?;
    for (instrument, result) in report.statistics.iter() {
        writeln!(
            out,
            "{:<width$}  {:<18}  {}",
            instrument,
            result.rule.as_str(),
            result.value
        )?;
    }

    let ingest = &report.ingest;
    writeln!(out)?;
    writeln!(out, "records_read          : {}", ingest.records_read)?;
    writeln!(out, "retained              : {}", ingest.retained)?;
    writeln!(out, "skipped_malformed_date: {}", ingest.skipped_malformed_date)?;
    writeln!(out, "skipped_weekend       : {}", ingest.skipped_weekend)?;

    Ok(())
}
