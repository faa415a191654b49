//! Exchange configuration.
//!
//! The receive bound is the only knob: a response is read with a single
//! `read` into a buffer of `max_receive_size` bytes, and anything the peer
//! sends beyond that is never seen.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default receive bound, in bytes.
pub const DEFAULT_MAX_RECEIVE_SIZE: usize = 65536;

/// Largest accepted receive bound (64 MiB). The receive buffer is allocated
/// up front, so the bound is also the per-exchange memory cost.
pub const MAX_RECEIVE_SIZE_LIMIT: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExchangeConfig {
    /// Upper bound for the single receive of an exchange.
    pub max_receive_size: usize,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            max_receive_size: DEFAULT_MAX_RECEIVE_SIZE,
        }
    }
}

impl ExchangeConfig {
    pub fn with_max_receive_size(max_receive_size: usize) -> Self {
        Self { max_receive_size }
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: ExchangeConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_receive_size == 0 {
            return Err(ConfigError::ZeroReceiveSize);
        }
        if self.max_receive_size > MAX_RECEIVE_SIZE_LIMIT {
            return Err(ConfigError::ReceiveSizeTooLarge(self.max_receive_size));
        }
        Ok(())
    }
}
