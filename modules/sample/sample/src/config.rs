use chrono::{FixedOffset, Local, Offset};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::service::ServiceConfig;

/// Configuration for the sample module.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleConfig {
    /// Page size used when a search does not specify `limit`.
    pub default_limit: u64,

    /// Page start used when a search does not specify `offset`.
    pub default_offset: u64,

    /// Offset at which birthdays are pinned to midnight, e.g. `+09:00`.
    /// Falls back to the host's current local offset.
    pub utc_offset: Option<String>,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            default_offset: 0,
            utc_offset: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sample.default_limit must be at least 1")]
    ZeroDefaultLimit,

    #[error("invalid sample.utc_offset {value:?}: {source}")]
    InvalidUtcOffset {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}

impl SampleConfig {
    /// # Errors
    /// Returns [`ConfigError::InvalidUtcOffset`] if `utc_offset` is set but
    /// is not a `±HH:MM` offset.
    pub fn zone(&self) -> Result<FixedOffset, ConfigError> {
        match &self.utc_offset {
            Some(value) => value
                .parse::<FixedOffset>()
                .map_err(|source| ConfigError::InvalidUtcOffset {
                    value: value.clone(),
                    source,
                }),
            None => Ok(Local::now().offset().fix()),
        }
    }

    /// # Errors
    /// Returns [`ConfigError`] if any field is out of range.
    pub fn service_config(&self) -> Result<ServiceConfig, ConfigError> {
        if self.default_limit == 0 {
            return Err(ConfigError::ZeroDefaultLimit);
        }
        Ok(ServiceConfig {
            default_limit: self.default_limit,
            default_offset: self.default_offset,
            zone: self.zone()?,
        })
    }
}
