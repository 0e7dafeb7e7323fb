//! Layered application configuration.
//!
//! Sources, lowest priority first:
//! 1. built-in defaults
//! 2. the YAML file passed with `--config`
//! 3. `ROSTER__*` environment variables (`ROSTER__DATABASE__DSN` → `database.dsn`)
//! 4. command line overrides

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use roster::PagingConfig;
use roster_db::DbConfig;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "ROSTER__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Emit JSON lines instead of the human readable format.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            json: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub database: DbConfig,
    pub logging: LoggingConfig,
    pub paging: PagingConfig,
}

/// Command line values that take precedence over every other source.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dsn: Option<String>,
    pub verbose: u8,
}

impl AppConfig {
    /// Defaults, then the YAML file, then the environment.
    #[must_use]
    pub fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));
        if let Some(path) = path {
            figment = figment.merge(Yaml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// # Errors
    /// Fails when a source cannot be parsed or a value has the wrong shape.
    pub fn from_figment(figment: &Figment) -> Result<Self> {
        figment
            .extract()
            .context("failed to parse configuration (yaml/env)")
    }

    /// Load every layer below the command line.
    ///
    /// # Errors
    /// Fails when `path` is given but is not a file, or when extraction fails.
    pub fn load_layered(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path
            && !path.is_file()
        {
            anyhow::bail!("config file does not exist: {}", path.display());
        }
        Self::from_figment(&Self::figment(path))
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(dsn) = &cli.dsn {
            self.database.dsn.clone_from(dsn);
        }
        match cli.verbose {
            0 => {}
            1 => "info".clone_into(&mut self.logging.level),
            2 => "debug".clone_into(&mut self.logging.level),
            _ => "trace".clone_into(&mut self.logging.level),
        }
    }

    /// # Errors
    /// Fails on an invalid database or paging section.
    pub fn validate(&self) -> Result<()> {
        self.database
            .validate()
            .context("invalid database section")?;
        self.paging.validate().context("invalid paging section")?;
        Ok(())
    }

    /// # Errors
    /// Fails if the configuration cannot be serialized.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).context("failed to serialize configuration")
    }
}
