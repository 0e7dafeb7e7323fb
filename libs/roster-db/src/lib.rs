#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Roster database layer.
//!
//! This crate owns everything the roster module needs from the database side
//! that is not specific to members or teams:
//!
//! - [`DbHandle`]: engine detection from the DSN, a pooled `SQLx` connection
//!   wrapped in a `SeaORM` [`DatabaseConnection`]
//! - [`config::DbConfig`]: serde-friendly connection settings, meant to be
//!   extracted from a layered `figment` configuration by the binary
//! - [`paging`]: offset/limit page requests, page results, the total-count
//!   optimizer and a small pager that runs them against any `SeaORM` entity
//!
//! # Features
//! - `sqlite` (default), `pg`: enable the corresponding `SQLx` backend
//!
//! # Example
//! ```rust,no_run
//! use roster_db::{ConnectOpts, DbHandle};
//!
//! # async fn demo() -> roster_db::Result<()> {
//! let db = DbHandle::connect("sqlite::memory:", ConnectOpts::default()).await?;
//! assert_eq!(db.engine(), roster_db::DbEngine::Sqlite);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(
    not(any(feature = "pg", feature = "sqlite")),
    allow(unused_imports, unused_variables, dead_code, unreachable_code)
)]

pub mod config;
pub mod paging;

#[cfg(any(feature = "pg", feature = "sqlite"))]
mod pool_opts;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use config::DbConfig;

use std::time::Duration;

#[cfg(any(feature = "pg", feature = "sqlite"))]
use pool_opts::pool_options;

#[cfg(feature = "pg")]
use sea_orm::SqlxPostgresConnector;
#[cfg(feature = "sqlite")]
use sea_orm::SqlxSqliteConnector;
#[cfg(feature = "pg")]
use sea_orm::sqlx::Postgres;
#[cfg(feature = "sqlite")]
use sea_orm::sqlx::Sqlite;
#[cfg(feature = "sqlite")]
use sea_orm::sqlx::sqlite::SqliteConnectOptions;

use sea_orm::DatabaseConnection;
use thiserror::Error;

/// Library-local result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Typed error for the DB handle and helpers.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Unknown DSN: {0}")]
    UnknownDsn(String),

    #[error("Feature not enabled: {0}")]
    FeatureDisabled(&'static str),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[cfg(any(feature = "pg", feature = "sqlite"))]
    #[error(transparent)]
    Sqlx(#[from] sea_orm::sqlx::Error),

    #[error(transparent)]
    Sea(#[from] sea_orm::DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DbEngine {
    Postgres,
    Sqlite,
}

/// Connection options.
/// Covers the common sqlx pool knobs; each driver applies the subset it supports.
#[derive(Clone, Debug)]
pub struct ConnectOpts {
    /// Maximum number of connections in the pool.
    pub max_conns: Option<u32>,
    /// Minimum number of connections in the pool.
    pub min_conns: Option<u32>,
    /// Timeout to acquire a connection from the pool.
    pub acquire_timeout: Option<Duration>,
    /// Idle timeout before a connection is closed.
    pub idle_timeout: Option<Duration>,
    /// For `SQLite` file DSNs, create parent directories if missing.
    pub create_sqlite_dirs: bool,
}

impl Default for ConnectOpts {
    fn default() -> Self {
        Self {
            max_conns: Some(10),
            min_conns: None,
            acquire_timeout: Some(Duration::from_secs(30)),
            idle_timeout: None,
            create_sqlite_dirs: true,
        }
    }
}

/// Main handle.
#[derive(Debug, Clone)]
pub struct DbHandle {
    engine: DbEngine,
    dsn: String,
    sea: DatabaseConnection,
}

#[cfg(feature = "sqlite")]
const DEFAULT_SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

impl DbHandle {
    /// Detect engine by DSN.
    ///
    /// Note: we only check scheme prefixes and don't mutate the tail (credentials etc.).
    ///
    /// # Errors
    /// Returns `DbError::UnknownDsn` if the DSN scheme is not recognized.
    pub fn detect(dsn: &str) -> Result<DbEngine> {
        // Trim only leading spaces/newlines to be forgiving with env files.
        let s = dsn.trim_start();

        if s.starts_with("postgres://") || s.starts_with("postgresql://") {
            Ok(DbEngine::Postgres)
        } else if s.starts_with("sqlite:") {
            Ok(DbEngine::Sqlite)
        } else {
            Err(DbError::UnknownDsn(redact_credentials_in_dsn(Some(dsn))))
        }
    }

    /// Connect and build handle.
    ///
    /// In-memory `SQLite` DSNs are pinned to a single long-lived connection,
    /// since every new connection would open its own empty database.
    ///
    /// # Errors
    /// Returns an error if the connection fails or the DSN is invalid.
    pub async fn connect(dsn: &str, opts: ConnectOpts) -> Result<Self> {
        let engine = Self::detect(dsn)?;
        tracing::debug!(
            engine = ?engine,
            dsn = %redact_credentials_in_dsn(Some(dsn)),
            "connecting to database"
        );
        match engine {
            #[cfg(feature = "pg")]
            DbEngine::Postgres => {
                let pool = pool_options::<Postgres>(&opts).connect(dsn).await?;
                let sea = SqlxPostgresConnector::from_sqlx_postgres_pool(pool);
                Ok(Self {
                    engine,
                    dsn: dsn.to_owned(),
                    sea,
                })
            }
            #[cfg(not(feature = "pg"))]
            DbEngine::Postgres => Err(DbError::FeatureDisabled("PostgreSQL feature not enabled")),
            #[cfg(feature = "sqlite")]
            DbEngine::Sqlite => {
                use std::str::FromStr;

                let is_memory = sqlite::is_memory_dsn(dsn);
                if !is_memory && opts.create_sqlite_dirs {
                    sqlite::prepare_sqlite_dir(dsn)?;
                }

                let connect = SqliteConnectOptions::from_str(dsn)?
                    .create_if_missing(true)
                    .foreign_keys(true)
                    .busy_timeout(DEFAULT_SQLITE_BUSY_TIMEOUT);

                let mut o = pool_options::<Sqlite>(&opts);
                if is_memory {
                    o = o
                        .max_connections(1)
                        .min_connections(1)
                        .idle_timeout(None)
                        .max_lifetime(None);
                }

                let pool = o.connect_with(connect).await?;
                let sea = SqlxSqliteConnector::from_sqlx_sqlite_pool(pool);

                Ok(Self {
                    engine,
                    dsn: dsn.to_owned(),
                    sea,
                })
            }
            #[cfg(not(feature = "sqlite"))]
            DbEngine::Sqlite => Err(DbError::FeatureDisabled("SQLite feature not enabled")),
        }
    }

    /// Graceful pool close. (Dropping the handle also closes it; this just makes it explicit.)
    ///
    /// # Errors
    /// Returns an error if the underlying pool reports a failure while closing.
    pub async fn close(self) -> Result<()> {
        self.sea.close().await?;
        Ok(())
    }

    /// Get the backend.
    #[must_use]
    pub fn engine(&self) -> DbEngine {
        self.engine
    }

    /// Get the DSN used for this connection.
    #[must_use]
    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    /// `SeaORM` connection shared by repositories.
    #[must_use]
    pub fn conn(&self) -> &DatabaseConnection {
        &self.sea
    }
}

/// Replace the password part of a DSN with `***` so it can be logged.
#[must_use]
pub fn redact_credentials_in_dsn(dsn: Option<&str>) -> String {
    match dsn {
        Some(dsn) if dsn.contains('@') => {
            if let Ok(mut parsed) = url::Url::parse(dsn) {
                if parsed.password().is_some() {
                    let _ = parsed.set_password(Some("***"));
                }
                parsed.to_string()
            } else {
                "***".to_owned()
            }
        }
        Some(dsn) => dsn.to_owned(),
        None => "none".to_owned(),
    }
}

// ===================== tests =====================
