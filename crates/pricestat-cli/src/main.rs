mod cli;
mod error;
mod logging;
mod output;

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use pricestat_core::{run_file, ModifierStore, StoreConfig};

use crate::cli::Cli;
use crate::error::CliError;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(failure) => ExitCode::from(report_failure(&failure, &mut io::stderr().lock())),
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let store = ModifierStore::open(
        StoreConfig::new(cli.db.clone()),
        cli.seed_policy(),
        &cli.seed_config(),
    )?;

    let report = run_file(cli.input.as_path(), &store)?;
    drop(store);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    output::render(&report, cli.format, cli.pretty, &mut out)?;
    out.flush()?;
    Ok(())
}

/// Write the one-line failure message and return the matching exit code.
fn report_failure<W: Write>(failure: &CliError, out: &mut W) -> u8 {
    let _ = writeln!(out, "error: {failure}");
    failure.exit_code()
}
