//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, validity window > 0)
//! - Check the base URL override parses
//!
//! Returns all validation errors, not just the first. The API key is not
//! checked here: it may still arrive from the environment, and the gateway
//! rejects a missing key when it is constructed.

use crate::config::schema::WalletConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &WalletConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.gateway.request_timeout_secs == 0 {
        errors.push(ValidationError {
            field: "gateway.request_timeout_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    match &config.gateway.base_url {
        Some(base) => {
            if let Err(e) = url::Url::parse(base) {
                errors.push(ValidationError {
                    field: "gateway.base_url",
                    message: format!("invalid URL '{}': {}", base, e),
                });
            }
        }
        None => {
            if config.gateway.domain.trim().is_empty() {
                errors.push(ValidationError {
                    field: "gateway.domain",
                    message: "must not be empty".to_string(),
                });
            }
        }
    }

    if config.transfer.fee_limit_sun == 0 || config.transfer.fee_limit_sun > i64::MAX as u64 {
        errors.push(ValidationError {
            field: "transfer.fee_limit_sun",
            message: "must be between 1 and i64::MAX".to_string(),
        });
    }

    if config.transfer.expiration_secs == 0 {
        errors.push(ValidationError {
            field: "transfer.expiration_secs",
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
