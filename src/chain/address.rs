//! TRON address encoding.
//!
//! A TRON address is the 20-byte keccak-derived account id (same as an EVM
//! address) prefixed with `0x41` and rendered as base58check.

use alloy::primitives::Address;

use crate::chain::types::{ChainError, ChainResult};

/// Version byte prepended to every mainnet and testnet account id.
pub const ADDRESS_PREFIX: u8 = 0x41;

/// Length of the raw (prefixed) address.
pub const RAW_ADDRESS_LEN: usize = 21;

/// A decoded TRON address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TronAddress([u8; RAW_ADDRESS_LEN]);

impl TronAddress {
    /// Wrap a 20-byte account id.
    pub fn from_evm(address: Address) -> Self {
        let mut raw = [0u8; RAW_ADDRESS_LEN];
        raw[0] = ADDRESS_PREFIX;
        raw[1..].copy_from_slice(address.as_slice());
        Self(raw)
    }

    /// Parse a base58check address (`T...`).
    pub fn from_base58(s: &str) -> ChainResult<Self> {
        let bytes = bs58::decode(s)
            .with_check(None)
            .into_vec()
            .map_err(|e| ChainError::InvalidAddress(format!("{}: {}", s, e)))?;
        Self::from_raw(&bytes).map_err(|_| ChainError::InvalidAddress(s.to_string()))
    }

    /// Parse the 21-byte prefixed form.
    pub fn from_raw(bytes: &[u8]) -> ChainResult<Self> {
        if bytes.len() != RAW_ADDRESS_LEN || bytes[0] != ADDRESS_PREFIX {
            return Err(ChainError::InvalidAddress(hex::encode(bytes)));
        }
        let mut raw = [0u8; RAW_ADDRESS_LEN];
        raw.copy_from_slice(bytes);
        Ok(Self(raw))
    }

    /// Prefixed bytes, as used in protobuf contract fields.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The 20-byte account id, as used in ABI-encoded call data.
    pub fn to_evm(&self) -> Address {
        Address::from_slice(&self.0[1..])
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).with_check().into_string()
    }
}

impl std::fmt::Display for TronAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl std::str::FromStr for TronAddress {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base58(s)
    }
}

/// Check whether a string is a well-formed base58check TRON address.
pub fn is_valid_address(s: &str) -> bool {
    TronAddress::from_base58(s).is_ok()
}
