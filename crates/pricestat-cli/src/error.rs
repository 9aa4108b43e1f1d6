use thiserror::Error;

use pricestat_core::{CoreError, WarehouseError};

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("modifier store: {0}")]
    Store(#[from] WarehouseError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Core(CoreError::Parse(_)) => 3,
            Self::Core(CoreError::Statistics(_)) => 4,
            Self::Core(CoreError::Reference(_) | CoreError::Io(_))
            | Self::Store(_)
            | Self::Serialization(_)
            | Self::Io(_) => 10,
        }
    }
}
