//! TronGrid HTTP client.
//!
//! # Responsibilities
//! - Build authenticated requests for the selected network
//! - Query chain state (latest block, balances, transaction history)
//! - Broadcast signed transactions
//! - Turn remote failures into typed errors
//!
//! No retries are performed; a failed call is reported as-is.

use std::time::Duration;

use alloy::primitives::U256;
use reqwest::header::HeaderValue;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::chain::address::TronAddress;
use crate::chain::types::{
    AccountRecord, ApiEnvelope, ApiResult, BlockReference, BroadcastReceipt, ChainError,
    ChainResult, GatewayConfig, Network,
};

/// Header carrying the API credential.
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

#[derive(Debug, Default, Deserialize)]
struct NowBlock {
    #[serde(rename = "blockID")]
    block_id: Option<String>,
    block_header: Option<BlockHeader>,
}

#[derive(Debug, Default, Deserialize)]
struct BlockHeader {
    raw_data: BlockHeaderRaw,
}

#[derive(Debug, Default, Deserialize)]
struct BlockHeaderRaw {
    #[serde(default)]
    number: u64,
    #[serde(default)]
    timestamp: i64,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    #[serde(rename = "Error")]
    error_upper: Option<String>,
    message: Option<String>,
}

/// TronGrid gateway.
#[derive(Clone)]
pub struct ChainGateway {
    http: reqwest::Client,
    api_key: HeaderValue,
    config: GatewayConfig,
}

impl ChainGateway {
    /// Create a new gateway.
    ///
    /// Fails with `Configuration` when no API key is configured.
    pub fn new(config: GatewayConfig) -> ChainResult<Self> {
        let key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ChainError::Configuration("TronGrid API key is not set".to_string()))?;

        let mut api_key = HeaderValue::from_str(key).map_err(|_| {
            ChainError::Configuration("TronGrid API key is not a valid header value".to_string())
        })?;
        api_key.set_sensitive(true);

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        tracing::debug!(
            domain = %config.domain,
            base_url = ?config.base_url,
            timeout_secs = config.request_timeout_secs,
            "Chain gateway initialized"
        );

        Ok(Self {
            http,
            api_key,
            config,
        })
    }

    /// Base URL for `network`.
    pub fn endpoint(&self, network: &Network) -> ChainResult<url::Url> {
        let base = match &self.config.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}", network.subdomain(), self.config.domain),
        };
        url::Url::parse(&base)
            .map_err(|e| ChainError::Configuration(format!("Invalid API endpoint '{}': {}", base, e)))
    }

    fn url(&self, network: &Network, path: &str) -> ChainResult<url::Url> {
        let base = self.endpoint(network)?;
        let full = format!("{}{}", base.as_str().trim_end_matches('/'), path);
        url::Url::parse(&full)
            .map_err(|e| ChainError::Configuration(format!("Invalid API URL '{}': {}", full, e)))
    }

    fn get(&self, network: &Network, path: &str) -> ChainResult<RequestBuilder> {
        Ok(self
            .http
            .get(self.url(network, path)?)
            .header(API_KEY_HEADER, self.api_key.clone()))
    }

    fn post(&self, network: &Network, path: &str) -> ChainResult<RequestBuilder> {
        Ok(self
            .http
            .post(self.url(network, path)?)
            .header(API_KEY_HEADER, self.api_key.clone()))
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, path: &str) -> ChainResult<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = remote_error_message(status, &body);
            tracing::warn!(path, status = status.as_u16(), error = %message, "TronGrid request failed");
            return Err(ChainError::RemoteApi(message));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(path, error = %e, "Malformed TronGrid response");
            ChainError::RemoteApi(format!("Malformed response from {}: {}", path, e))
        })
    }

    async fn fetch_v1<T>(&self, network: &Network, path: &str) -> ChainResult<T>
    where
        T: DeserializeOwned + Default,
    {
        tracing::debug!(network = %network, path, "TronGrid query");
        let envelope: ApiEnvelope<T> = self.fetch(self.get(network, path)?, path).await?;
        ApiResult::from(envelope).into_result()
    }

    /// Get the latest block as a transaction anchor.
    pub async fn get_latest_block(&self, network: &Network) -> ChainResult<BlockReference> {
        let path = "/wallet/getnowblock";
        tracing::debug!(network = %network, path, "TronGrid query");
        let block: NowBlock = self.fetch(self.post(network, path)?, path).await?;

        match (block.block_id, block.block_header) {
            (Some(hash), Some(header)) => Ok(BlockReference {
                hash,
                timestamp: header.raw_data.timestamp,
                number: header.raw_data.number,
            }),
            _ => Err(ChainError::RemoteApi(
                "Malformed latest block: missing blockID or block_header".to_string(),
            )),
        }
    }

    /// Get the account record, `None` when the chain has never seen the address.
    pub async fn get_account(
        &self,
        address: &TronAddress,
        network: &Network,
    ) -> ChainResult<Option<AccountRecord>> {
        let path = format!("/v1/accounts/{}", address);
        let accounts: Vec<AccountRecord> = self.fetch_v1(network, &path).await?;
        Ok(accounts.into_iter().next())
    }

    /// Native balance in base units; zero for unknown accounts.
    pub async fn get_account_balance(
        &self,
        address: &TronAddress,
        network: &Network,
    ) -> ChainResult<U256> {
        let balance = self
            .get_account(address, network)
            .await?
            .map(|account| U256::from(account.balance))
            .unwrap_or(U256::ZERO);
        Ok(balance)
    }

    /// Token balance for `contract` in base units; zero when the account holds none.
    ///
    /// Contract keys are matched exactly (case-sensitive).
    pub async fn get_token_balance(
        &self,
        address: &TronAddress,
        contract: &TronAddress,
        network: &Network,
    ) -> ChainResult<U256> {
        let Some(account) = self.get_account(address, network).await? else {
            return Ok(U256::ZERO);
        };
        let contract = contract.to_base58();

        match account.trc20.iter().find_map(|entry| entry.get(&contract)) {
            Some(raw) => U256::from_str_radix(raw, 10).map_err(|e| {
                ChainError::RemoteApi(format!("Malformed token balance '{}': {}", raw, e))
            }),
            None => Ok(U256::ZERO),
        }
    }

    /// Transaction history of an account, as returned by the API.
    pub async fn get_account_transactions(
        &self,
        address: &TronAddress,
        network: &Network,
    ) -> ChainResult<Vec<Value>> {
        self.fetch_v1(network, &format!("/v1/accounts/{}/transactions", address))
            .await
    }

    /// TRC-20 transfer history of an account, as returned by the API.
    pub async fn get_token_transactions(
        &self,
        address: &TronAddress,
        network: &Network,
    ) -> ChainResult<Vec<Value>> {
        self.fetch_v1(network, &format!("/v1/accounts/{}/transactions/trc20", address))
            .await
    }

    /// Broadcast a signed, hex-encoded transaction.
    pub async fn broadcast(&self, network: &Network, raw_hex: &str) -> ChainResult<BroadcastReceipt> {
        let path = "/wallet/broadcasthex";
        tracing::debug!(network = %network, path, "TronGrid broadcast");
        let request = self
            .post(network, path)?
            .json(&serde_json::json!({ "transaction": raw_hex }));
        self.fetch(request, path).await
    }

    /// Get the configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

fn remote_error_message(status: StatusCode, body: &str) -> String {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    parsed
        .error
        .or(parsed.error_upper)
        .or(parsed.message)
        .unwrap_or_else(|| format!("HTTP {}: {}", status, body))
}

impl std::fmt::Debug for ChainGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainGateway")
            .field("domain", &self.config.domain)
            .field("base_url", &self.config.base_url)
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}
