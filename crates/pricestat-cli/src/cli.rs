//! CLI argument definitions for pricestat.
//!
//! ```bash
//! # Summarize prices, reusing an existing modifier store
//! pricestat prices.csv modifiers.duckdb
//!
//! # Reset the store to its seed entries first
//! pricestat prices.csv modifiers.duckdb overwrite
//!
//! # Seed custom multipliers and print a table
//! pricestat prices.csv modifiers.duckdb --overwrite --seed INSTRUMENT1=1.5 --seed XYZ=2 --format table
//! ```

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pricestat_core::{MultiplierEntry, SeedConfig, SeedPolicy};

/// Per-instrument price statistics from a CSV of daily observations.
#[derive(Debug, Parser)]
#[command(
    name = "pricestat",
    author,
    version,
    about = "Per-instrument price statistics",
    long_about = "Reads `name,DD-Mon-YYYY,value` rows, scales each value by the instrument's \
multiplier from a DuckDB reference store, keeps business days only and prints one statistic \
per instrument."
)]
pub struct Cli {
    /// CSV file with `name,DD-Mon-YYYY,value` rows.
    pub input: PathBuf,

    /// DuckDB file holding instrument price multipliers.
    pub db: PathBuf,

    /// The word `overwrite` resets and reseeds the store; anything else reuses it.
    #[arg(value_name = "OVERWRITE")]
    pub mode: Option<String>,

    /// Same as passing `overwrite` positionally.
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Seed entry written when the store is created or reset. Repeatable.
    ///
    /// Replaces the built-in `INSTRUMENT1=1.5` seed when given.
    #[arg(long = "seed", value_name = "NAME=MULTIPLIER", value_parser = parse_seed_entry)]
    pub seed: Vec<MultiplierEntry>,

    /// Output format for results.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

impl Cli {
    pub fn seed_policy(&self) -> SeedPolicy {
        let positional = self
            .mode
            .as_deref()
            .is_some_and(|mode| mode.eq_ignore_ascii_case("overwrite"));
        SeedPolicy::from_overwrite(self.overwrite || positional)
    }

    pub fn seed_config(&self) -> SeedConfig {
        if self.seed.is_empty() {
            SeedConfig::default()
        } else {
            SeedConfig {
                entries: self.seed.clone(),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

fn parse_seed_entry(raw: &str) -> Result<MultiplierEntry, String> {
    let (name, multiplier) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=MULTIPLIER, got '{raw}'"))?;
    if name.is_empty() {
        return Err(String::from("instrument name cannot be empty"));
    }
    let multiplier = multiplier
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("multiplier '{multiplier}' is not a number"))?;
    if !multiplier.is_finite() {
        return Err(format!("multiplier '{multiplier}' must be finite"));
    }
    Ok(MultiplierEntry::new(name, multiplier))
}
