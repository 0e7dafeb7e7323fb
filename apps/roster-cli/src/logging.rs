//! Tracing subscriber setup.
//!
//! Logs go to stderr so stdout stays machine readable.

use anyhow::{Context, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LoggingConfig;

/// `RUST_LOG` if set, otherwise the configured level.
fn env_filter(cfg: &LoggingConfig) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(&cfg.level)
            .with_context(|| format!("invalid logging.level: {}", cfg.level))
    })
}

/// # Errors
/// Fails on a malformed filter directive or when a global subscriber is
/// already installed.
pub fn init_logging(cfg: &LoggingConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(env_filter(cfg)?);
    let installed = if cfg.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()
    };
    installed.context("failed to install tracing subscriber")
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn bad_level_is_reported() {
        let cfg = LoggingConfig {
            level: "roster=loud".to_owned(),
            json: false,
        };
        if std::env::var_os("RUST_LOG").is_none() {
            let err = env_filter(&cfg).unwrap_err().to_string();
            assert!(err.contains("logging.level"), "{err}");
        }
    }

    #[test]
    fn module_directives_are_accepted() {
        let cfg = LoggingConfig {
            level: "warn,roster=debug".to_owned(),
            json: true,
        };
        assert!(env_filter(&cfg).is_ok());
    }
}
