use std::path::{Path, PathBuf};

use simpleauth_common::{time, PlayerData, PlayerIdentity, PlayerUpdate};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Encode, Executor, FromRow, Sqlite, SqlitePool, Type,
};
use tracing::{debug, info, warn};

use crate::{config::StoreConfig, error::StoreError};

/// SQLite-backed registration records, one row per player.
///
/// Clones share the same pool: closing one closes all of them.
#[derive(Clone)]
pub struct PlayerRecordStore {
    pool: SqlitePool,
    path: Option<PathBuf>,
}

#[derive(Debug, FromRow)]
struct PlayerRow {
    name: String,
    registerdate: i64,
    logindate: i64,
    lastip: Option<String>,
    hash: String,
    ip: String,
    cid: i64,
    skinhash: String,
    pin: Option<i64>,
}

impl PlayerRecordStore {
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        PlayerRecordStore { pool, path: None }
    }

    /// Backing file, when the store was opened from a [`StoreConfig`].
    pub fn database_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }

    /// Opens `players.db` in the configured data directory.
    ///
    /// A missing file is created and seeded with the schema script. An existing
    /// file is opened as-is; its schema is never touched.
    pub async fn open(config: &StoreConfig) -> Result<Self, StoreError> {
        let path = config.database_path();

        if path.exists() {
            info!(path = %path.display(), "DB: Opening existing player database");
            let pool = connect(&path, false).await?;
            return Ok(PlayerRecordStore { pool, path: Some(path) });
        }

        // Read the schema before anything lands on disk.
        let schema = config.load_schema().await?;

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(|source| StoreError::DataDir {
                path: config.data_dir.clone(),
                source,
            })?;

        info!(path = %path.display(), "DB: Creating player database");
        let pool = connect(&path, true).await?;
        let store = PlayerRecordStore { pool, path: Some(path) };

        if let Err(err) = store.initialize(&schema).await {
            warn!(error = %err, "DB: Schema script failed, removing half-initialized database");
            store.pool.close().await;
            if let Some(path) = &store.path {
                if let Err(remove_err) = tokio::fs::remove_file(path).await {
                    warn!(
                        path = %path.display(),
                        error = %remove_err,
                        "DB: Could not remove half-initialized database, next open will skip the schema"
                    );
                }
            }
            return Err(err);
        }

        Ok(store)
    }

    /// Runs a schema script against the pool.
    pub async fn initialize(&self, schema: &str) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.pool.execute(schema).await?;
        debug!("DB: Schema initialized");
        Ok(())
    }

    pub async fn get_player(&self, player: &PlayerIdentity) -> Result<Option<PlayerData>, StoreError> {
        self.ensure_open()?;
        let name = player.normalized_name();
        debug!(%name, "DB: Querying player");

        let row = sqlx::query_as::<_, PlayerRow>(
            "SELECT name, registerdate, logindate, lastip, hash, ip, cid, skinhash, pin
             FROM players WHERE name = ?"
        )
        .bind(&name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) if row.name == name => Ok(Some(row.into_data())),
            Some(row) => {
                warn!(%name, found = %row.name, "DB: Lookup returned a different player, ignoring");
                Ok(None)
            }
            None => {
                debug!(%name, "DB: No player found");
                Ok(None)
            }
        }
    }

    pub async fn is_player_registered(&self, player: &PlayerIdentity) -> Result<bool, StoreError> {
        Ok(self.get_player(player).await?.is_some())
    }

    /// Deletes the player's row. Unknown names are ignored.
    pub async fn unregister_player(&self, player: &PlayerIdentity) -> Result<(), StoreError> {
        self.ensure_open()?;
        let name = player.normalized_name();

        let result = sqlx::query("DELETE FROM players WHERE name = ?")
            .bind(&name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() > 0 {
            info!(%name, "DB: Player unregistered");
        } else {
            debug!(%name, "DB: Nothing to unregister");
        }
        Ok(())
    }

    /// Inserts a complete record for a new player and returns it.
    ///
    /// Offline identities are stored with sentinel session fields.
    pub async fn register_player(
        &self,
        player: &PlayerIdentity,
        hash: &str,
    ) -> Result<PlayerData, StoreError> {
        self.ensure_open()?;
        let name = player.normalized_name();
        let session = player.session_fields();
        let now = time::unix_now().map_err(|err| {
            warn!(error = %err, "DB: System clock is before the Unix epoch");
            StoreError::Clock(err)
        })?;

        let data = PlayerData {
            register_date: now,
            login_date: now,
            last_ip: None,
            hash: hash.to_string(),
            ip: session.ip,
            cid: session.cid,
            skin_hash: session.skin_hash,
            pin: None,
        };

        info!(%name, online = player.is_online(), "DB: Inserting player");

        let result = sqlx::query(
            "INSERT INTO players (name, registerdate, logindate, lastip, hash, ip, cid, skinhash, pin)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        )
        .bind(&name)
        .bind(data.register_date)
        .bind(data.login_date)
        .bind(&data.last_ip)
        .bind(&data.hash)
        .bind(&data.ip)
        .bind(data.cid)
        .bind(&data.skin_hash)
        .bind(data.pin)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(data),
            Err(sqlx::Error::Database(err)) if is_duplicate(&*err) => {
                warn!(%name, "DB: Player already registered");
                Err(StoreError::DuplicateRecord(name))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Rewrites every mutable column. Unknown names are ignored.
    pub async fn save_player(&self, player: &PlayerIdentity, data: &PlayerData) -> Result<(), StoreError> {
        self.ensure_open()?;
        let name = player.normalized_name();

        let result = sqlx::query(
            "UPDATE players SET registerdate = ?, logindate = ?, lastip = ?, hash = ?, ip = ?, cid = ?, skinhash = ?, pin = ?
             WHERE name = ?"
        )
        .bind(data.register_date)
        .bind(data.login_date)
        .bind(&data.last_ip)
        .bind(&data.hash)
        .bind(&data.ip)
        .bind(data.cid)
        .bind(&data.skin_hash)
        .bind(data.pin)
        .bind(&name)
        .execute(&self.pool)
        .await?;

        debug!(%name, rows = result.rows_affected(), "DB: Player saved");
        Ok(())
    }

    /// Applies each provided field with its own statement.
    ///
    /// A `pin` of zero is written and then immediately cleared, so the stored
    /// PIN ends up null.
    pub async fn update_player(&self, player: &PlayerIdentity, update: &PlayerUpdate) -> Result<(), StoreError> {
        self.ensure_open()?;
        let name = player.normalized_name();

        if update.is_empty() {
            debug!(%name, "DB: Empty update, nothing to write");
            return Ok(());
        }

        if let Some(last_ip) = &update.last_ip {
            self.update_column("lastip", &name, last_ip.clone()).await?;
        }
        if let Some(login_date) = update.login_date {
            self.update_column("logindate", &name, login_date).await?;
        }
        if let Some(cid) = update.cid {
            self.update_column("cid", &name, cid).await?;
        }
        if let Some(ip) = &update.ip {
            self.update_column("ip", &name, ip.clone()).await?;
        }
        if let Some(skin_hash) = &update.skin_hash {
            self.update_column("skinhash", &name, skin_hash.clone()).await?;
        }
        if let Some(pin) = update.pin {
            self.update_column("pin", &name, pin).await?;
        }
        if update.pin == Some(0) {
            self.update_column("pin", &name, None::<i64>).await?;
        }

        Ok(())
    }

    /// Closes the pool. Every later call fails with [`StoreError::UseAfterClose`].
    pub async fn close(&self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.pool.close().await;
        info!("DB: Player database closed");
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            return Err(StoreError::UseAfterClose);
        }
        Ok(())
    }

    async fn update_column<T>(&self, column: &'static str, name: &str, value: T) -> Result<u64, StoreError>
    where
        T: for<'q> Encode<'q, Sqlite> + Type<Sqlite> + Send + 'static,
    {
        let sql = format!("UPDATE players SET {column} = ? WHERE name = ?");
        let result = sqlx::query(&sql)
            .bind(value)
            .bind(name)
            .execute(&self.pool)
            .await?;

        let rows = result.rows_affected();
        if rows == 0 {
            debug!(%name, column, "DB: Update matched no player");
        }
        Ok(rows)
    }
}

async fn connect(path: &Path, create: bool) -> Result<SqlitePool, StoreError> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(create);

    // One connection: statements run strictly in call order.
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|source| StoreError::StorageUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

fn is_duplicate(err: &dyn sqlx::error::DatabaseError) -> bool {
    err.is_unique_violation() || err.message().contains("UNIQUE constraint failed")
}

impl PlayerRow {
    fn into_data(self) -> PlayerData {
        PlayerData {
            register_date: self.registerdate,
            login_date: self.logindate,
            last_ip: self.lastip,
            hash: self.hash,
            ip: self.ip,
            cid: self.cid,
            skin_hash: self.skinhash,
            pin: self.pin,
        }
    }
}
