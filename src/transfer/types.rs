//! Transfer request and receipt types.

use alloy::primitives::U256;
use serde::Serialize;

use crate::chain::types::{BroadcastReceipt, Network};
use crate::chain::units::serialize_decimal;

/// Key material that must not appear in logs or `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(String);

impl SecretKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SecretKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for SecretKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKey(<redacted>)")
    }
}

/// Native coin transfer.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    pub private_key: SecretKey,
    pub to_address: String,
    /// Amount in display units, e.g. `"4.999999"`.
    pub amount: String,
    pub network: Network,
}

/// TRC-20 transfer.
#[derive(Debug, Clone)]
pub struct TokenTransferRequest {
    pub private_key: SecretKey,
    pub to_address: String,
    pub contract_address: String,
    /// Amount in display units of the token.
    pub amount: String,
    pub decimals: u8,
    pub network: Network,
    /// Funds the sender's fee with a 1 TRX transfer before the token transfer.
    pub backer_private_key: Option<SecretKey>,
}

/// Native coin drain, leaving the fixed reserve behind.
#[derive(Debug, Clone)]
pub struct DrainRequest {
    pub private_key: SecretKey,
    pub to_address: String,
    pub network: Network,
}

/// TRC-20 drain of the full token balance.
#[derive(Debug, Clone)]
pub struct TokenDrainRequest {
    pub private_key: SecretKey,
    pub to_address: String,
    pub contract_address: String,
    pub network: Network,
    pub backer_private_key: Option<SecretKey>,
}

/// Broadcast receipt plus the amount actually sent, in base units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferReceipt {
    #[serde(flatten)]
    pub receipt: BroadcastReceipt,
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: U256,
}

impl TransferReceipt {
    /// Pair a receipt with the sent amount. A remote `amount` field is
    /// dropped so the serialized receipt carries a single `amount` key.
    pub fn new(mut receipt: BroadcastReceipt, amount: U256) -> Self {
        receipt.extra.remove("amount");
        Self { receipt, amount }
    }

    pub fn txid(&self) -> Option<&str> {
        self.receipt.txid.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_key_is_redacted() {
        let request = DrainRequest {
            private_key: "deadbeef".into(),
            to_address: "T".to_string(),
            network: Network::Mainnet,
        };
        let rendered = format!("{:?}", request);
        assert!(!rendered.contains("deadbeef"));
        assert!(rendered.contains("<redacted>"));
        assert_eq!(request.private_key.expose(), "deadbeef");
    }

    #[test]
    fn test_receipt_serialization() {
        let receipt = TransferReceipt {
            receipt: BroadcastReceipt {
                result: true,
                txid: Some("abc".to_string()),
                ..Default::default()
            },
            amount: U256::from(1_000_000u64),
        };
        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["result"], true);
        assert_eq!(json["txid"], "abc");
        assert_eq!(json["amount"], "1000000");
        assert_eq!(receipt.txid(), Some("abc"));
    }

    #[test]
    fn test_remote_amount_does_not_duplicate_key() {
        let remote: BroadcastReceipt =
            serde_json::from_str(r#"{"result": true, "txid": "abc", "amount": 7, "note": "x"}"#)
                .unwrap();
        let receipt = TransferReceipt::new(remote, U256::from(42u8));

        let json = serde_json::to_string(&receipt).unwrap();
        assert_eq!(json.matches("\"amount\"").count(), 1);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["amount"], "42");
        assert_eq!(value["note"], "x");
    }
}
