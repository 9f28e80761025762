//! TRON chain integration.
//!
//! # Data Flow
//! ```text
//! private key / mnemonic / xprv
//!     → wallet.rs (derivation, signing)
//!     → gateway.rs (TronGrid: block, balances, history, broadcast)
//!     → transaction.rs (build, sign, hex-encode)
//!     → units.rs (display ↔ base units)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or mnemonics
//! - API key travels only inside `GatewayConfig`

pub mod address;
pub mod gateway;
pub mod proto;
pub mod transaction;
pub mod types;
pub mod units;
pub mod wallet;

pub use address::TronAddress;
pub use gateway::ChainGateway;
pub use types::{BlockReference, BroadcastReceipt, ChainError, ChainResult, Network};
pub use units::AmountPair;
pub use wallet::{Wallet, WalletInfo};
