//! Chain-specific types and error definitions.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::U256;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export GatewayConfig from config module to avoid duplication
pub use crate::config::schema::GatewayConfig;

/// Errors that can occur during wallet and chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Required configuration (the API credential) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote API reported a failure or returned a malformed payload.
    #[error("Remote API error: {0}")]
    RemoteApi(String),

    /// HTTP layer failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Requested amount does not leave headroom below the available balance.
    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: U256, available: U256 },

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Address is not a valid base58check TRON address.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Amount could not be parsed or does not fit the target encoding.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Result type for chain operations.
pub type ChainResult<T> = Result<T, ChainError>;

/// Network selector, mapped to a TronGrid subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    Mainnet,
    Testnet,
    /// Any other literal, used verbatim as the subdomain.
    Custom(String),
}

impl Network {
    /// API subdomain for this network.
    pub fn subdomain(&self) -> &str {
        match self {
            Network::Mainnet => "api",
            Network::Testnet => "api.shasta",
            Network::Custom(sub) => sub,
        }
    }
}

impl FromStr for Network {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "mainnet" => Network::Mainnet,
            "testnet" => Network::Testnet,
            other => Network::Custom(other.to_string()),
        })
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Testnet => f.write_str("testnet"),
            Network::Custom(sub) => f.write_str(sub),
        }
    }
}

/// Latest block snapshot used to anchor a new transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockReference {
    /// Block id, hex encoded.
    pub hash: String,
    /// Block timestamp in milliseconds.
    pub timestamp: i64,
    pub number: u64,
}

/// Outcome of a TronGrid `/v1` call after the envelope has been inspected.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResult<T> {
    Success(T),
    Failure(String),
}

impl<T> ApiResult<T> {
    /// Convert into a chain result, mapping the failure branch to `RemoteApi`.
    pub fn into_result(self) -> ChainResult<T> {
        match self {
            ApiResult::Success(data) => Ok(data),
            ApiResult::Failure(message) => Err(ChainError::RemoteApi(message)),
        }
    }
}

/// Wire shape of `/v1` responses: `{data, success, error?}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T: Default> From<ApiEnvelope<T>> for ApiResult<T> {
    fn from(envelope: ApiEnvelope<T>) -> Self {
        if envelope.success {
            ApiResult::Success(envelope.data.unwrap_or_default())
        } else {
            ApiResult::Failure(
                envelope
                    .error
                    .unwrap_or_else(|| "request reported success: false".to_string()),
            )
        }
    }
}

/// Account record as returned by `/v1/accounts/{address}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountRecord {
    #[serde(default)]
    pub address: Option<String>,
    /// Native balance in base units; absent for accounts that never held TRX.
    #[serde(default)]
    pub balance: u64,
    /// Token balances, one single-entry map per contract.
    #[serde(default)]
    pub trc20: Vec<std::collections::HashMap<String, String>>,
}

/// Remote broadcast response, passed through as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BroadcastReceipt {
    #[serde(default)]
    pub result: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Hex-encoded diagnostic text on rejection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BroadcastReceipt {
    /// Human-readable rejection reason, decoding the hex message when possible.
    pub fn failure_reason(&self) -> String {
        let decoded = self.message.as_deref().map(|m| {
            hex::decode(m)
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_else(|| m.to_string())
        });
        match (self.code.as_deref(), decoded) {
            (Some(code), Some(msg)) => format!("{}: {}", code, msg),
            (Some(code), None) => code.to_string(),
            (None, Some(msg)) => msg,
            (None, None) => "broadcast rejected".to_string(),
        }
    }
}
