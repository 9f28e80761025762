//! TRON wallet client library.
//!
//! Derives addresses, queries balances and history through TronGrid, and
//! submits balance-checked TRX and TRC-20 transfers.

pub mod chain;
pub mod config;
pub mod observability;
pub mod transfer;

pub use chain::{AmountPair, ChainError, ChainResult, Network, TronAddress, Wallet, WalletInfo};
pub use config::WalletConfig;
pub use transfer::{
    DrainRequest, SecretKey, TokenDrainRequest, TokenTransferRequest, TransferOrchestrator,
    TransferReceipt, TransferRequest,
};
