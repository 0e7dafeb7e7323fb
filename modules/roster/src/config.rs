//! Roster module configuration.

use serde::{Deserialize, Serialize};

use crate::domain::error::RosterError;

/// Page size settings, read from the `paging` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagingConfig {
    /// Page size used when the caller does not pass one.
    pub default_page_size: u64,
    /// Largest page size accepted; larger requests are rejected.
    pub max_page_size: u64,
}

impl Default for PagingConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 1000,
        }
    }
}

impl PagingConfig {
    /// # Errors
    /// `RosterError::InvalidArgument` when a size is zero or the default exceeds the maximum.
    pub fn validate(&self) -> Result<(), RosterError> {
        if self.default_page_size == 0 || self.max_page_size == 0 {
            return Err(RosterError::invalid_argument(
                "paging sizes must be positive",
            ));
        }
        if self.default_page_size > self.max_page_size {
            return Err(RosterError::invalid_argument(format!(
                "default_page_size {} exceeds max_page_size {}",
                self.default_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}
