//! Transfer orchestration.
//!
//! # Data Flow
//! ```text
//! TransferRequest / TokenTransferRequest / DrainRequest / TokenDrainRequest
//!     → orchestrator.rs (resolve sender, snapshot block, guard balance)
//!     → chain::transaction (build, sign)
//!     → chain::gateway (broadcast)
//!     → TransferReceipt (remote receipt + amount sent)
//! ```
//!
//! # Invariants
//! - Never spend an amount greater than or equal to the queried balance
//! - Block, balance and broadcast calls are awaited one after another
//! - Backer sponsorship completes before the sponsored transfer is built

pub mod orchestrator;
pub mod types;

pub use orchestrator::TransferOrchestrator;
pub use types::{
    DrainRequest, SecretKey, TokenDrainRequest, TokenTransferRequest, TransferReceipt,
    TransferRequest,
};
