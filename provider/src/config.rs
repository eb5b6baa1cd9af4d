use std::{
    env,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::StoreError;

pub const DATABASE_FILE: &str = "players.db";
pub const DEFAULT_DATA_DIR: &str = "plugins/SimpleAuth";
pub const DATA_DIR_ENV: &str = "SIMPLEAUTH_DATA_DIR";
pub const SCHEMA_PATH_ENV: &str = "SIMPLEAUTH_SCHEMA_PATH";

const BUNDLED_SCHEMA: &str = include_str!("../../resources/sqlite3.sql");

/// Where the store keeps its database and which schema seeds a fresh one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    /// Schema script run on first use. The bundled script is used when unset.
    pub schema_path: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_DATA_DIR)
    }
}

impl StoreConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            schema_path: None,
        }
    }

    pub fn with_schema_path(mut self, schema_path: impl Into<PathBuf>) -> Self {
        self.schema_path = Some(schema_path.into());
        self
    }

    /// Reads `SIMPLEAUTH_DATA_DIR` and `SIMPLEAUTH_SCHEMA_PATH`.
    pub fn from_env() -> Self {
        let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        let schema_path = env::var(SCHEMA_PATH_ENV).ok().filter(|value| !value.trim().is_empty());

        StoreConfig {
            data_dir: PathBuf::from(data_dir),
            schema_path: schema_path.map(PathBuf::from),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    pub async fn load_schema(&self) -> Result<String, StoreError> {
        match &self.schema_path {
            Some(path) => {
                debug!(path = %path.display(), "loading schema script");
                read_schema(path).await
            }
            None => Ok(bundled_schema().to_string()),
        }
    }
}

/// The `players` table definition shipped with the crate.
pub fn bundled_schema() -> &'static str {
    BUNDLED_SCHEMA
}

async fn read_schema(path: &Path) -> Result<String, StoreError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Schema {
            path: path.to_path_buf(),
            source,
        })
}
