//! Per-operation connection resolution: remote Postgres when configured and
//! reachable, otherwise the local SQLite file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use thiserror::Error;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::{debug, warn};

use crate::config::Config;
use crate::migrator::Migrator;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("local store '{path}' unavailable: {source}")]
    Local {
        path: PathBuf,
        #[source]
        source: DbErr,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Remote,
    Local,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Remote => "postgres",
            Backend::Local => "sqlite",
        }
    }
}

/// An open, single-use connection. Release it when the operation is done.
#[derive(Debug)]
pub struct Handle {
    conn: DatabaseConnection,
    backend: Backend,
}

impl Handle {
    pub fn conn(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }

    pub async fn release(self) {
        if let Err(e) = self.conn.close().await {
            warn!(backend = self.backend.as_str(), "Failed to close connection: {}", e);
        }
    }
}

pub struct Connector {
    remote_url: Option<String>,
    local_path: PathBuf,
    connect_timeout: Duration,
    remote_schema: OnceCell<()>,
    local_schema: OnceCell<()>,
    ledger_writes: Mutex<()>,
}

impl Connector {
    pub fn new(remote_url: Option<String>, sslmode: &str, local_path: impl Into<PathBuf>) -> Self {
        Self {
            remote_url: remote_url.map(|url| with_sslmode(&url, sslmode)),
            local_path: local_path.into(),
            connect_timeout: Duration::from_secs(crate::config::DEFAULT_CONNECT_TIMEOUT_SECS),
            remote_schema: OnceCell::new(),
            local_schema: OnceCell::new(),
            ledger_writes: Mutex::new(()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.database_url.clone(),
            &config.db_sslmode,
            config.sqlite_path.clone(),
        )
        .with_connect_timeout(config.db_connect_timeout)
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    /// Serializes read-then-insert sequences on the reading ledger. Only
    /// writers sharing this connector are ordered.
    pub async fn lock_ledger(&self) -> MutexGuard<'_, ()> {
        self.ledger_writes.lock().await
    }

    /// Opens a handle for one logical operation. Remote failures are logged and
    /// fall through to the local store; only a local failure is returned.
    pub async fn acquire(&self) -> Result<Handle, StorageError> {
        if let Some(url) = &self.remote_url {
            match self.open_remote(url).await {
                Ok(conn) => {
                    return Ok(Handle {
                        conn,
                        backend: Backend::Remote,
                    })
                }
                Err(e) => {
                    warn!("Postgres unavailable, falling back to SQLite: {}", e);
                    crate::metrics::increment_storage_fallbacks();
                }
            }
        }

        let conn = self
            .open_local()
            .await
            .map_err(|source| StorageError::Local {
                path: self.local_path.clone(),
                source,
            })?;
        Ok(Handle {
            conn,
            backend: Backend::Local,
        })
    }

    async fn open_remote(&self, url: &str) -> Result<DatabaseConnection, DbErr> {
        let conn = Database::connect(self.options(url)).await?;
        if let Err(e) = ensure_schema(&self.remote_schema, &conn).await {
            let _ = conn.close().await;
            return Err(e);
        }
        Ok(conn)
    }

    async fn open_local(&self) -> Result<DatabaseConnection, DbErr> {
        let url = format!("sqlite://{}?mode=rwc", self.local_path.display());
        let conn = Database::connect(self.options(&url)).await?;
        if let Err(e) = ensure_schema(&self.local_schema, &conn).await {
            let _ = conn.close().await;
            return Err(e);
        }
        Ok(conn)
    }

    fn options(&self, url: &str) -> ConnectOptions {
        let mut opt = ConnectOptions::new(url.to_owned());
        opt.max_connections(1)
            .min_connections(0)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.connect_timeout)
            .sqlx_logging(false);
        opt
    }
}

async fn ensure_schema(cell: &OnceCell<()>, conn: &DatabaseConnection) -> Result<(), DbErr> {
    cell.get_or_try_init(|| async {
        debug!(backend = ?conn.get_database_backend(), "Running migrations");
        Migrator::up(conn, None).await
    })
    .await
    .map(|_| ())
}

/// Appends `sslmode` unless the URL already pins one.
fn with_sslmode(url: &str, sslmode: &str) -> String {
    if url.contains("sslmode=") {
        url.to_string()
    } else if url.contains('?') {
        format!("{}&sslmode={}", url, sslmode)
    } else {
        format!("{}?sslmode={}", url, sslmode)
    }
}
