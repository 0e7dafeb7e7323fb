//! Serde-facing database configuration.
//!
//! The binary extracts [`DbConfig`] from its layered configuration; this crate
//! only defines the shape and turns it into a live [`DbHandle`].

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{ConnectOpts, DbError, DbHandle, Result};

/// Database section of the application configuration.
///
/// ```yaml
/// database:
///   dsn: "sqlite://data/roster.db"
///   max_conns: 5
///   acquire_timeout: "10s"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DbConfig {
    pub dsn: String,
    pub max_conns: Option<u32>,
    pub min_conns: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub acquire_timeout: Option<Duration>,
    #[serde(with = "humantime_serde")]
    pub idle_timeout: Option<Duration>,
    pub create_sqlite_dirs: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        let opts = ConnectOpts::default();
        Self {
            dsn: "sqlite::memory:".to_owned(),
            max_conns: opts.max_conns,
            min_conns: opts.min_conns,
            acquire_timeout: opts.acquire_timeout,
            idle_timeout: opts.idle_timeout,
            create_sqlite_dirs: opts.create_sqlite_dirs,
        }
    }
}

impl DbConfig {
    /// Check the configuration without touching the database.
    ///
    /// # Errors
    /// Returns `DbError::InvalidConfig` for an empty DSN or an inverted pool range,
    /// and `DbError::UnknownDsn` for an unsupported scheme.
    pub fn validate(&self) -> Result<()> {
        if self.dsn.trim().is_empty() {
            return Err(DbError::InvalidConfig("database.dsn must not be empty".into()));
        }
        if let (Some(min), Some(max)) = (self.min_conns, self.max_conns)
            && min > max
        {
            return Err(DbError::InvalidConfig(format!(
                "database.min_conns ({min}) exceeds database.max_conns ({max})"
            )));
        }
        DbHandle::detect(&self.dsn)?;
        Ok(())
    }

    #[must_use]
    pub fn connect_opts(&self) -> ConnectOpts {
        ConnectOpts {
            max_conns: self.max_conns,
            min_conns: self.min_conns,
            acquire_timeout: self.acquire_timeout,
            idle_timeout: self.idle_timeout,
            create_sqlite_dirs: self.create_sqlite_dirs,
        }
    }

    /// Validate and open a connection pool.
    ///
    /// # Errors
    /// Returns a validation error or any connection error from the driver.
    pub async fn connect(&self) -> Result<DbHandle> {
        self.validate()?;
        DbHandle::connect(&self.dsn, self.connect_opts()).await
    }
}
