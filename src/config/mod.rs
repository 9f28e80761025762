//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → TRONGRID_API_KEY environment override
//!     → validation.rs (semantic checks)
//!     → WalletConfig (validated, immutable)
//!     → passed explicitly to the gateway and transaction builder
//! ```
//!
//! # Design Decisions
//! - No global state: the API key travels inside `GatewayConfig`
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_with_env, ConfigError};
pub use schema::{GatewayConfig, ObservabilityConfig, TransferConfig, WalletConfig};
