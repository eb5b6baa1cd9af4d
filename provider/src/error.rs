use std::{io, path::PathBuf, time::SystemTimeError};

use thiserror::Error;

/// Failures surfaced by the player record store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file could not be opened.
    #[error("player database at {path} is unavailable")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },
    /// The data directory could not be created.
    #[error("cannot prepare data directory {path}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The schema script could not be read.
    #[error("cannot read schema script {path}")]
    Schema {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// A statement failed to execute.
    #[error("database statement failed")]
    IoFailure(#[source] sqlx::Error),
    /// The system clock reads earlier than the Unix epoch.
    #[error("system clock is before the Unix epoch")]
    Clock(#[source] SystemTimeError),
    /// The player is already registered.
    #[error("player '{0}' is already registered")]
    DuplicateRecord(String),
    /// The store has been closed.
    #[error("player store used after close")]
    UseAfterClose,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => StoreError::UseAfterClose,
            other => StoreError::IoFailure(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_closed_maps_to_use_after_close() {
        assert!(matches!(StoreError::from(sqlx::Error::PoolClosed), StoreError::UseAfterClose));
        assert!(matches!(StoreError::from(sqlx::Error::RowNotFound), StoreError::IoFailure(_)));
    }

    #[test]
    fn test_clock_error_keeps_source() {
        use std::error::Error;
        use std::time::{Duration, UNIX_EPOCH};

        let source = UNIX_EPOCH
            .duration_since(UNIX_EPOCH + Duration::from_secs(1))
            .unwrap_err();
        let err = StoreError::Clock(source);

        assert_eq!(err.to_string(), "system clock is before the Unix epoch");
        assert!(err.source().is_some());
    }
}
