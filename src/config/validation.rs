//! Configuration validation.
//!
//! Serde handles syntax; this module checks semantics and reports every
//! problem it finds, not just the first.

use std::fmt;

use crate::config::schema::{WalletConfig, TRANSFER_GAS_LIMIT};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.network.endpoints.is_empty() {
        errors.push(ValidationError::new(
            "network.endpoints",
            "at least one endpoint is required",
        ));
    }
    for (i, endpoint) in config.network.endpoints.iter().enumerate() {
        if let Err(e) = endpoint.parse::<url::Url>() {
            errors.push(ValidationError::new(
                format!("network.endpoints[{}]", i),
                format!("invalid URL '{}': {}", endpoint, e),
            ));
        }
    }
    if config.network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.rpc_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.polling.interval_ms == 0 {
        errors.push(ValidationError::new(
            "polling.interval_ms",
            "must be greater than 0",
        ));
    }
    if config.transfer.gas_limit < TRANSFER_GAS_LIMIT {
        errors.push(ValidationError::new(
            "transfer.gas_limit",
            format!("must be at least {}", TRANSFER_GAS_LIMIT),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
