//! Reference data for pricestat: per-instrument price multipliers stored in `DuckDB`.

pub mod duckdb;
pub mod migrations;

use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::{params, Connection};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

pub use self::duckdb::{ConnectionGuard, ConnectionManager};
pub use self::migrations::MODIFIER_TABLE;

#[derive(Debug, Error)]
pub enum WarehouseError {
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid seed entry '{instrument}': {reason}")]
    InvalidSeed { instrument: String, reason: String },
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub max_pool_size: usize,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            max_pool_size: 2,
        }
    }
}

/// What to do with a database file that already exists when the store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeedPolicy {
    /// Open the existing file as is. A missing file is created and seeded.
    #[default]
    ReuseExisting,
    /// Delete any existing file, then create and seed a fresh one.
    Reset,
}

impl SeedPolicy {
    pub const fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            Self::Reset
        } else {
            Self::ReuseExisting
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplierEntry {
    pub instrument: String,
    pub multiplier: f64,
}

impl MultiplierEntry {
    pub fn new(instrument: impl Into<String>, multiplier: f64) -> Self {
        Self {
            instrument: instrument.into(),
            multiplier,
        }
    }
}

/// Baseline rows written into a freshly created store.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedConfig {
    pub entries: Vec<MultiplierEntry>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            entries: vec![MultiplierEntry::new("INSTRUMENT1", 1.5)],
        }
    }
}

impl SeedConfig {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), WarehouseError> {
        for entry in &self.entries {
            if entry.instrument.is_empty() {
                return Err(WarehouseError::InvalidSeed {
                    instrument: entry.instrument.clone(),
                    reason: String::from("instrument name cannot be empty"),
                });
            }
            if !entry.multiplier.is_finite() {
                return Err(WarehouseError::InvalidSeed {
                    instrument: entry.instrument.clone(),
                    reason: format!("multiplier {} is not finite", entry.multiplier),
                });
            }
        }
        Ok(())
    }
}

/// Instrument name to multiplier lookups backed by a `DuckDB` file.
#[derive(Debug)]
pub struct ModifierStore {
    manager: ConnectionManager,
}

impl ModifierStore {
    /// Open the store at `config.db_path`, seeding it according to `policy`.
    ///
    /// Seeding happens when the file did not exist yet or when `policy` is
    /// [`SeedPolicy::Reset`]. An existing file opened with
    /// [`SeedPolicy::ReuseExisting`] keeps its rows untouched.
    pub fn open(
        config: StoreConfig,
        policy: SeedPolicy,
        seed: &SeedConfig,
    ) -> Result<Self, WarehouseError> {
        seed.validate()?;

        let existed = config.db_path.exists();
        if existed && policy == SeedPolicy::Reset {
            remove_database_files(config.db_path.as_path())?;
        }
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = ConnectionManager::open(config.db_path.clone(), config.max_pool_size)?;
        let store = Self { manager };
        store.initialize()?;

        if !existed || policy == SeedPolicy::Reset {
            store.seed(seed)?;
        } else {
            debug!(path = %config.db_path.display(), "reusing existing modifier store");
        }

        info!(path = %config.db_path.display(), ?policy, "modifier store ready");
        Ok(store)
    }

    /// A throwaway store that lives only as long as the returned value.
    pub fn open_in_memory(seed: &SeedConfig) -> Result<Self, WarehouseError> {
        seed.validate()?;
        let store = Self {
            manager: ConnectionManager::open_in_memory(1)?,
        };
        store.initialize()?;
        store.seed(seed)?;
        Ok(store)
    }

    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire()?;
        let applied = migrations::apply_migrations(&connection)?;
        if applied > 0 {
            debug!(applied, "applied modifier store migrations");
        }
        Ok(())
    }

    pub fn db_path(&self) -> Option<&Path> {
        self.manager.db_path()
    }

    /// Write the seed entries, replacing existing multipliers with the same name.
    pub fn seed(&self, seed: &SeedConfig) -> Result<usize, WarehouseError> {
        seed.validate()?;
        let connection = self.manager.acquire()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<usize, WarehouseError> {
            for entry in &seed.entries {
                upsert_entry(&connection, entry)?;
            }
            Ok(seed.entries.len())
        })();

        let written = finalize_transaction(&connection, result)?;
        info!(entries = written, "seeded modifier store");
        Ok(written)
    }

    pub fn upsert(&self, entry: &MultiplierEntry) -> Result<(), WarehouseError> {
        SeedConfig {
            entries: vec![entry.clone()],
        }
        .validate()?;
        let connection = self.manager.acquire()?;
        upsert_entry(&connection, entry)
    }

    /// The stored multiplier for `instrument`, if there is one.
    pub fn lookup(&self, instrument: &str) -> Result<Option<f64>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let sql = format!("SELECT multiplier FROM {MODIFIER_TABLE} WHERE name = ?");
        let mut statement = connection.prepare(sql.as_str())?;
        let mut rows = statement.query(params![instrument])?;
        let multiplier = match rows.next()? {
            Some(row) => Some(row.get::<_, f64>(0)?),
            None => None,
        };
        Ok(multiplier)
    }

    pub fn entries(&self) -> Result<Vec<MultiplierEntry>, WarehouseError> {
        let connection = self.manager.acquire()?;
        let sql = format!("SELECT name, multiplier FROM {MODIFIER_TABLE} ORDER BY name");
        let mut statement = connection.prepare(sql.as_str())?;
        let entries = statement
            .query_map([], |row| {
                Ok(MultiplierEntry {
                    instrument: row.get(0)?,
                    multiplier: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }
}

fn upsert_entry(connection: &Connection, entry: &MultiplierEntry) -> Result<(), WarehouseError> {
    let sql = format!(
        "INSERT OR REPLACE INTO {MODIFIER_TABLE} (name, multiplier, updated_at) \
         VALUES (?, ?, CURRENT_TIMESTAMP)"
    );
    connection.execute(
        sql.as_str(),
        params![entry.instrument.as_str(), entry.multiplier],
    )?;
    Ok(())
}

fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn remove_database_files(db_path: &Path) -> Result<(), std::io::Error> {
    fs::remove_file(db_path)?;

    let mut wal = db_path.as_os_str().to_owned();
    wal.push(".wal");
    let wal = PathBuf::from(wal);
    if wal.exists() {
        fs::remove_file(wal)?;
    }
    Ok(())
}
