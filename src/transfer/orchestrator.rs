//! Balance-checked transfers.
//!
//! Every transfer runs the same strictly sequential pipeline:
//!
//! ```text
//! resolve sender → latest block → balance → guard → build → sign → broadcast
//! ```
//!
//! The guard rejects any amount that is greater than **or equal to** the
//! available balance. Nothing is broadcast unless every earlier step succeeded.

use alloy::primitives::U256;
use serde_json::Value;
use tracing::Instrument;
use uuid::Uuid;

use crate::chain::address::TronAddress;
use crate::chain::gateway::ChainGateway;
use crate::chain::transaction::{self, TxBuilder};
use crate::chain::types::{ChainError, ChainResult, Network};
use crate::chain::units::{self, AmountPair, NATIVE_DECIMALS};
use crate::chain::wallet::{Wallet, WalletInfo};
use crate::config::schema::WalletConfig;
use crate::transfer::types::{
    DrainRequest, SecretKey, TokenDrainRequest, TokenTransferRequest, TransferReceipt,
    TransferRequest,
};

/// Balance left behind by a native drain: 1 TRX.
pub const DRAIN_RESERVE_SUN: u64 = 1_000_000;

/// Native amount a backer sends to cover the sender's token transfer fee: 1 TRX.
pub const BACKER_FUNDING_SUN: u64 = 1_000_000;

/// Wallet client: address management, balance queries and transfers.
#[derive(Debug, Clone)]
pub struct TransferOrchestrator {
    gateway: ChainGateway,
    builder: TxBuilder,
}

impl TransferOrchestrator {
    /// Build the gateway and transaction builder from configuration.
    pub fn new(config: &WalletConfig) -> ChainResult<Self> {
        let gateway = ChainGateway::new(config.gateway.clone())?;
        Ok(Self::from_parts(gateway, TxBuilder::new(&config.transfer)))
    }

    pub fn from_parts(gateway: ChainGateway, builder: TxBuilder) -> Self {
        Self { gateway, builder }
    }

    pub fn gateway(&self) -> &ChainGateway {
        &self.gateway
    }

    // Addresses

    pub fn create_address() -> ChainResult<WalletInfo> {
        Ok(Wallet::create()?.info())
    }

    pub fn import_address(private_key: &str) -> ChainResult<WalletInfo> {
        Ok(Wallet::from_private_key(private_key)?.info())
    }

    pub fn import_address_from_mnemonic(mnemonic: &str, index: u32) -> ChainResult<WalletInfo> {
        Ok(Wallet::from_mnemonic(mnemonic, index)?.info())
    }

    pub fn import_address_from_extended_key(
        extended_key: &str,
        index: u32,
    ) -> ChainResult<WalletInfo> {
        Ok(Wallet::from_extended_key(extended_key, index)?.info())
    }

    // Queries

    /// Native balance; zero for addresses the chain has never seen.
    pub async fn get_balance(&self, address: &str, network: &Network) -> ChainResult<AmountPair> {
        let address = TronAddress::from_base58(address)?;
        let balance = self.gateway.get_account_balance(&address, network).await?;
        AmountPair::from_base(balance, NATIVE_DECIMALS)
    }

    /// Token balance at the caller-supplied scale; zero when not held.
    pub async fn get_token_balance(
        &self,
        address: &str,
        contract_address: &str,
        decimals: u8,
        network: &Network,
    ) -> ChainResult<AmountPair> {
        let address = TronAddress::from_base58(address)?;
        let contract = TronAddress::from_base58(contract_address)?;
        let balance = self
            .gateway
            .get_token_balance(&address, &contract, network)
            .await?;
        AmountPair::from_base(balance, decimals)
    }

    pub async fn get_transactions(&self, address: &str, network: &Network) -> ChainResult<Vec<Value>> {
        let address = TronAddress::from_base58(address)?;
        self.gateway.get_account_transactions(&address, network).await
    }

    pub async fn get_token_transactions(
        &self,
        address: &str,
        network: &Network,
    ) -> ChainResult<Vec<Value>> {
        let address = TronAddress::from_base58(address)?;
        self.gateway.get_token_transactions(&address, network).await
    }

    // Transfers

    /// Send native coin.
    pub async fn send(&self, request: &TransferRequest) -> ChainResult<TransferReceipt> {
        let span = tracing::info_span!("transfer", transfer_id = %Uuid::new_v4(), kind = "send");
        async {
            let sender = Wallet::from_private_key(request.private_key.expose())?;
            let to = TronAddress::from_base58(&request.to_address)?;
            let amount = positive(units::trx_to_sun(&request.amount)?, &request.amount)?;
            self.send_native(&sender, &to, amount, &request.network).await
        }
        .instrument(span)
        .await
    }

    /// Send TRC-20 tokens, optionally sponsored by a backer.
    pub async fn send_token(&self, request: &TokenTransferRequest) -> ChainResult<TransferReceipt> {
        let span =
            tracing::info_span!("transfer", transfer_id = %Uuid::new_v4(), kind = "send_token");
        async {
            let sender = Wallet::from_private_key(request.private_key.expose())?;
            let to = TronAddress::from_base58(&request.to_address)?;
            let contract = TronAddress::from_base58(&request.contract_address)?;
            let amount = positive(
                units::to_base_units(&request.amount, request.decimals)?,
                &request.amount,
            )?;
            let network = &request.network;

            let mut block = self.gateway.get_latest_block(network).await?;
            let balance = self
                .gateway
                .get_token_balance(&sender.address(), &contract, network)
                .await?;
            guard(amount, balance)?;

            if let Some(backer) = &request.backer_private_key {
                self.sponsor(backer, &sender.address(), network).await?;
                block = self.gateway.get_latest_block(network).await?;
            }

            let raw = self
                .builder
                .token_transfer(&sender.address(), &contract, &to, amount, &block)?;
            self.sign_and_broadcast(raw, &sender, network, amount).await
        }
        .instrument(span)
        .await
    }

    /// Send the native balance minus the fixed reserve.
    pub async fn drain(&self, request: &DrainRequest) -> ChainResult<TransferReceipt> {
        let span = tracing::info_span!("transfer", transfer_id = %Uuid::new_v4(), kind = "drain");
        async {
            let sender = Wallet::from_private_key(request.private_key.expose())?;
            let to = TronAddress::from_base58(&request.to_address)?;
            let network = &request.network;

            let block = self.gateway.get_latest_block(network).await?;
            let balance = self
                .gateway
                .get_account_balance(&sender.address(), network)
                .await?;
            let amount = drain_amount(balance)?;

            let raw = self
                .builder
                .native_transfer(&sender.address(), &to, amount, &block)?;
            self.sign_and_broadcast(raw, &sender, network, amount).await
        }
        .instrument(span)
        .await
    }

    /// Send the full token balance, optionally sponsored by a backer.
    ///
    /// The backer transfer completes before the drain is built; if it fails
    /// the drain is not attempted.
    pub async fn drain_token(&self, request: &TokenDrainRequest) -> ChainResult<TransferReceipt> {
        let span =
            tracing::info_span!("transfer", transfer_id = %Uuid::new_v4(), kind = "drain_token");
        async {
            let sender = Wallet::from_private_key(request.private_key.expose())?;
            let to = TronAddress::from_base58(&request.to_address)?;
            let contract = TronAddress::from_base58(&request.contract_address)?;
            let network = &request.network;

            let balance = self
                .gateway
                .get_token_balance(&sender.address(), &contract, network)
                .await?;
            if balance.is_zero() {
                return Err(ChainError::InsufficientBalance {
                    requested: balance,
                    available: balance,
                });
            }

            if let Some(backer) = &request.backer_private_key {
                self.sponsor(backer, &sender.address(), network).await?;
            }

            let block = self.gateway.get_latest_block(network).await?;
            let raw = self
                .builder
                .token_transfer(&sender.address(), &contract, &to, balance, &block)?;
            self.sign_and_broadcast(raw, &sender, network, balance).await
        }
        .instrument(span)
        .await
    }

    async fn send_native(
        &self,
        sender: &Wallet,
        to: &TronAddress,
        amount: U256,
        network: &Network,
    ) -> ChainResult<TransferReceipt> {
        let block = self.gateway.get_latest_block(network).await?;
        let balance = self
            .gateway
            .get_account_balance(&sender.address(), network)
            .await?;
        guard(amount, balance)?;

        let raw = self
            .builder
            .native_transfer(&sender.address(), to, amount, &block)?;
        self.sign_and_broadcast(raw, sender, network, amount).await
    }

    /// Fund `recipient` with 1 TRX from the backer so it can pay for a token transfer.
    async fn sponsor(
        &self,
        backer_key: &SecretKey,
        recipient: &TronAddress,
        network: &Network,
    ) -> ChainResult<TransferReceipt> {
        let backer = Wallet::from_private_key(backer_key.expose())?;
        tracing::info!(
            backer = %backer.address(),
            recipient = %recipient,
            amount = BACKER_FUNDING_SUN,
            "Sponsoring transfer fee"
        );
        self.send_native(&backer, recipient, U256::from(BACKER_FUNDING_SUN), network)
            .await
    }

    async fn sign_and_broadcast(
        &self,
        raw: crate::chain::proto::TransactionRaw,
        sender: &Wallet,
        network: &Network,
        amount: U256,
    ) -> ChainResult<TransferReceipt> {
        let signed = transaction::sign(raw, sender).await?;
        let receipt = self.gateway.broadcast(network, &signed.raw_hex).await?;

        if !receipt.result {
            let reason = receipt.failure_reason();
            tracing::warn!(txid = %signed.txid, error = %reason, "Broadcast rejected");
            return Err(ChainError::RemoteApi(reason));
        }

        tracing::info!(
            from = %sender.address(),
            txid = %signed.txid,
            amount = %amount,
            network = %network,
            "Transaction broadcast"
        );
        Ok(TransferReceipt::new(receipt, amount))
    }
}

/// Reject amounts that floor to zero base units.
fn positive(amount: U256, display: &str) -> ChainResult<U256> {
    if amount.is_zero() {
        return Err(ChainError::InvalidAmount(format!(
            "'{}' is zero in base units",
            display
        )));
    }
    Ok(amount)
}

/// Reject amounts that would not leave headroom below the balance.
pub fn guard(amount: U256, balance: U256) -> ChainResult<()> {
    if amount >= balance {
        return Err(ChainError::InsufficientBalance {
            requested: amount,
            available: balance,
        });
    }
    Ok(())
}

/// Native drain amount: balance minus the reserve, rejected when nothing is left.
pub fn drain_amount(balance: U256) -> ChainResult<U256> {
    let reserve = U256::from(DRAIN_RESERVE_SUN);
    if balance <= reserve {
        return Err(ChainError::InsufficientBalance {
            requested: reserve,
            available: balance,
        });
    }
    Ok(balance - reserve)
}
