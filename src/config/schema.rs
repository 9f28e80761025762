//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Environment variable holding the TronGrid API key.
pub const API_KEY_ENV_VAR: &str = "TRONGRID_API_KEY";

/// Root configuration for the wallet client.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WalletConfig {
    /// Remote API access.
    pub gateway: GatewayConfig,

    /// Transaction construction parameters.
    pub transfer: TransferConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl WalletConfig {
    /// Fill the API key from `TRONGRID_API_KEY` when it is set.
    ///
    /// The environment wins over the file so keys can stay out of config files.
    pub fn apply_env(mut self) -> Self {
        if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
            if !key.trim().is_empty() {
                self.gateway.api_key = Some(key);
            }
        }
        self
    }
}

/// TronGrid gateway configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// API key sent as `TRON-PRO-API-KEY`. Required.
    pub api_key: Option<String>,

    /// Domain the network subdomain is prepended to.
    pub domain: String,

    /// Full base URL replacing `https://{subdomain}.{domain}` (private deployments).
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            domain: "trongrid.io".to_string(),
            base_url: None,
            request_timeout_secs: 30,
        }
    }
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("domain", &self.domain)
            .field("base_url", &self.base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Transaction construction configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TransferConfig {
    /// Energy fee cap for TRC-20 calls, in sun.
    pub fee_limit_sun: u64,

    /// Transaction validity window after the anchoring block, in seconds.
    pub expiration_secs: u64,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            fee_limit_sun: 100_000_000,
            expiration_secs: 60,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
