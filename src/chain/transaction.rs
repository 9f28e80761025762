//! Transaction building and signing.
//!
//! # Responsibilities
//! - Build native and TRC-20 transfer transactions anchored to a block
//! - Compute the transaction id and sign it
//! - Produce the hex payload accepted by `broadcasthex`

use alloy::primitives::{B256, U256};
use alloy::sol_types::SolCall;
use prost::Message;
use sha2::{Digest, Sha256};

use crate::chain::address::TronAddress;
use crate::chain::proto::{
    Any, Contract, ContractType, Transaction, TransactionRaw, TransferContract,
    TriggerSmartContract,
};
use crate::chain::types::{BlockReference, ChainError, ChainResult};
use crate::chain::wallet::Wallet;
use crate::config::schema::TransferConfig;

alloy::sol! {
    function transfer(address to, uint256 amount) returns (bool);
}

/// A signed transaction ready for broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Hex-encoded sha256 of the raw data.
    pub txid: String,
    /// Hex-encoded protobuf `Transaction`.
    pub raw_hex: String,
}

/// Transaction builder for transfers.
#[derive(Debug, Clone)]
pub struct TxBuilder {
    fee_limit: i64,
    expiration_ms: i64,
}

impl TxBuilder {
    /// Create a new transaction builder.
    pub fn new(config: &TransferConfig) -> Self {
        Self {
            fee_limit: i64::try_from(config.fee_limit_sun).unwrap_or(i64::MAX),
            expiration_ms: i64::try_from(config.expiration_secs.saturating_mul(1000))
                .unwrap_or(i64::MAX),
        }
    }

    /// Build a native coin transfer.
    pub fn native_transfer(
        &self,
        owner: &TronAddress,
        to: &TronAddress,
        amount: U256,
        block: &BlockReference,
    ) -> ChainResult<TransactionRaw> {
        let amount = to_int64(amount)?;
        let contract = TransferContract {
            owner_address: owner.as_bytes().to_vec(),
            to_address: to.as_bytes().to_vec(),
            amount,
        };
        self.anchor(ContractType::TransferContract, contract.encode_to_vec(), 0, block)
    }

    /// Build a TRC-20 `transfer(address,uint256)` call.
    pub fn token_transfer(
        &self,
        owner: &TronAddress,
        token_contract: &TronAddress,
        to: &TronAddress,
        amount: U256,
        block: &BlockReference,
    ) -> ChainResult<TransactionRaw> {
        let data = transferCall {
            to: to.to_evm(),
            amount,
        }
        .abi_encode();
        let contract = TriggerSmartContract {
            owner_address: owner.as_bytes().to_vec(),
            contract_address: token_contract.as_bytes().to_vec(),
            call_value: 0,
            data,
        };
        self.anchor(
            ContractType::TriggerSmartContract,
            contract.encode_to_vec(),
            self.fee_limit,
            block,
        )
    }

    fn anchor(
        &self,
        kind: ContractType,
        parameter: Vec<u8>,
        fee_limit: i64,
        block: &BlockReference,
    ) -> ChainResult<TransactionRaw> {
        let (ref_block_bytes, ref_block_hash) = ref_block(block)?;
        Ok(TransactionRaw {
            ref_block_bytes,
            ref_block_hash,
            expiration: block.timestamp.saturating_add(self.expiration_ms),
            contract: vec![Contract {
                r#type: kind as i32,
                parameter: Some(Any {
                    type_url: kind.type_url().to_string(),
                    value: parameter,
                }),
            }],
            timestamp: block.timestamp,
            fee_limit,
        })
    }
}

/// `ref_block_bytes` and `ref_block_hash` for a block snapshot.
pub fn ref_block(block: &BlockReference) -> ChainResult<(Vec<u8>, Vec<u8>)> {
    let hash = hex::decode(&block.hash)
        .map_err(|e| ChainError::RemoteApi(format!("Malformed block id '{}': {}", block.hash, e)))?;
    if hash.len() != 32 {
        return Err(ChainError::RemoteApi(format!(
            "Malformed block id '{}': expected 32 bytes",
            block.hash
        )));
    }
    let number = block.number.to_be_bytes();
    Ok((number[6..8].to_vec(), hash[8..16].to_vec()))
}

/// Transaction id: sha256 of the encoded raw data.
pub fn transaction_id(raw: &TransactionRaw) -> B256 {
    B256::from_slice(&Sha256::digest(raw.encode_to_vec()))
}

/// Sign `raw` with `wallet` and encode the full transaction.
pub async fn sign(raw: TransactionRaw, wallet: &Wallet) -> ChainResult<SignedTransaction> {
    let txid = transaction_id(&raw);
    let signature = wallet.sign_hash(txid).await?;
    let tx = Transaction {
        raw_data: Some(raw),
        signature: vec![signature.to_vec()],
    };
    Ok(SignedTransaction {
        txid: hex::encode(txid),
        raw_hex: hex::encode(tx.encode_to_vec()),
    })
}

fn to_int64(amount: U256) -> ChainResult<i64> {
    u64::try_from(amount)
        .ok()
        .and_then(|v| i64::try_from(v).ok())
        .ok_or_else(|| ChainError::InvalidAmount(format!("{} exceeds int64", amount)))
}
