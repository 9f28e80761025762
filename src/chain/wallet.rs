//! Key management and transaction signing.
//!
//! # Security
//! - Private keys and mnemonics are never logged
//! - `Debug` output only shows the address

use std::str::FromStr;

use alloy::primitives::B256;
use alloy::signers::local::PrivateKeySigner;
use alloy::signers::Signer;
use bip32::{DerivationPath, XPrv};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;

use crate::chain::address::TronAddress;
use crate::chain::types::{ChainError, ChainResult};

/// SLIP-44 coin type registered for TRON.
pub const COIN_TYPE: u32 = 195;

/// BIP44 derivation path for the account at `index`.
///
/// Every import path goes through this function so the same index always
/// yields the same path string.
pub fn derivation_path(index: u32) -> String {
    format!("m/44'/{}'/0'/0/{}", COIN_TYPE, index)
}

/// Exportable view of a wallet: what callers store and show to users.
#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletInfo {
    pub address: String,
    pub private_key: String,
    /// Only present for freshly created wallets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

impl std::fmt::Debug for WalletInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletInfo")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

/// A TRON account able to sign transactions.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
    address: TronAddress,
    mnemonic: Option<String>,
}

impl Wallet {
    /// Generate a fresh 12-word mnemonic and derive account 0.
    pub fn create() -> ChainResult<Self> {
        let mut entropy = [0u8; 16];
        OsRng.fill_bytes(&mut entropy);
        let mnemonic = bip39::Mnemonic::from_entropy(&entropy)
            .map_err(|e| ChainError::Wallet(format!("Mnemonic generation failed: {}", e)))?;

        let mut wallet = Self::from_parsed_mnemonic(&mnemonic, 0)?;
        wallet.mnemonic = Some(mnemonic.to_string());
        tracing::info!(address = %wallet.address, "Wallet created");
        Ok(wallet)
    }

    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> ChainResult<Self> {
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| ChainError::Wallet(format!("Invalid private key format: {}", e)))?;

        Ok(Self::from_signer(signer))
    }

    /// Derive the account at `index` from a BIP39 phrase.
    pub fn from_mnemonic(phrase: &str, index: u32) -> ChainResult<Self> {
        let mnemonic = bip39::Mnemonic::parse(phrase.trim())
            .map_err(|e| ChainError::Wallet(format!("Invalid mnemonic: {}", e)))?;
        Self::from_parsed_mnemonic(&mnemonic, index)
    }

    /// Derive the account at `index` from a base58 extended private key.
    ///
    /// The key is treated as the root of the BIP44 path.
    pub fn from_extended_key(extended_key: &str, index: u32) -> ChainResult<Self> {
        let root = XPrv::from_str(extended_key.trim())
            .map_err(|e| ChainError::Wallet(format!("Invalid extended key: {}", e)))?;
        Self::derive(root, index)
    }

    fn from_parsed_mnemonic(mnemonic: &bip39::Mnemonic, index: u32) -> ChainResult<Self> {
        let seed = mnemonic.to_seed("");
        let root =
            XPrv::new(seed).map_err(|e| ChainError::Wallet(format!("Invalid seed: {}", e)))?;
        Self::derive(root, index)
    }

    fn derive(root: XPrv, index: u32) -> ChainResult<Self> {
        let path = DerivationPath::from_str(&derivation_path(index))
            .map_err(|e| ChainError::Wallet(format!("Invalid derivation path: {}", e)))?;

        let mut key = root;
        for child in path.iter() {
            key = key
                .derive_child(child)
                .map_err(|e| ChainError::Wallet(format!("Derivation failed: {}", e)))?;
        }

        let secret = B256::from_slice(&key.private_key().to_bytes());
        let signer = PrivateKeySigner::from_bytes(&secret)
            .map_err(|e| ChainError::Wallet(format!("Derived key rejected: {}", e)))?;
        Ok(Self::from_signer(signer))
    }

    fn from_signer(signer: PrivateKeySigner) -> Self {
        let address = TronAddress::from_evm(signer.address());
        Self {
            signer,
            address,
            mnemonic: None,
        }
    }

    /// Get the wallet's address.
    pub fn address(&self) -> TronAddress {
        self.address
    }

    /// Hex-encoded private key, without prefix.
    pub fn private_key_hex(&self) -> String {
        hex::encode(self.signer.to_bytes())
    }

    /// Export address and key material for the caller to store.
    pub fn info(&self) -> WalletInfo {
        WalletInfo {
            address: self.address.to_base58(),
            private_key: self.private_key_hex(),
            mnemonic: self.mnemonic.clone(),
        }
    }

    /// Sign a 32-byte digest, returning the 65-byte `r || s || v` signature.
    pub async fn sign_hash(&self, hash: B256) -> ChainResult<[u8; 65]> {
        let signature = self
            .signer
            .sign_hash(&hash)
            .await
            .map_err(|e| ChainError::Wallet(format!("Signing failed: {}", e)))?;
        Ok(signature.as_bytes())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address.to_base58())
            .finish_non_exhaustive()
    }
}
