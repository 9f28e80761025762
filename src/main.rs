//! TRON wallet command line.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI args + config file + TRONGRID_API_KEY
//!        │
//!        ▼
//!   ┌──────────────────────────────────────────────────────┐
//!   │               TransferOrchestrator                   │
//!   │                                                      │
//!   │  ┌──────────┐  ┌───────────┐  ┌──────────────────┐   │
//!   │  │  wallet  │  │   units   │  │   transaction    │   │
//!   │  │ (keys)   │  │ (decimal) │  │ (build + sign)   │   │
//!   │  └──────────┘  └───────────┘  └──────────────────┘   │
//!   │                      │                               │
//!   │                      ▼                               │
//!   │              ┌──────────────┐                        │
//!   │              │   gateway    │────────────────────────┼──▶ TronGrid
//!   │              └──────────────┘                        │
//!   └──────────────────────────────────────────────────────┘
//!        │
//!        ▼
//!   JSON on stdout
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use tron_wallet::config::load_with_env;
use tron_wallet::observability::logging;
use tron_wallet::{
    DrainRequest, Network, SecretKey, TokenDrainRequest, TokenTransferRequest,
    TransferOrchestrator, TransferRequest,
};

#[derive(Parser)]
#[command(name = "tron-wallet")]
#[command(about = "Balance-checked TRX and TRC-20 transfers via TronGrid", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// mainnet, testnet, or a TronGrid subdomain.
    #[arg(short, long, default_value = "mainnet")]
    network: Network,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new mnemonic and its first address
    Create,
    /// Derive the address of a private key
    Import {
        #[arg(long)]
        private_key: String,
    },
    /// Derive an address from a mnemonic
    ImportMnemonic {
        #[arg(long)]
        mnemonic: String,
        #[arg(long, default_value_t = 0)]
        index: u32,
    },
    /// Derive an address from an extended private key
    ImportXprv {
        #[arg(long)]
        key: String,
        #[arg(long, default_value_t = 0)]
        index: u32,
    },
    /// Native balance of an address
    Balance {
        #[arg(long)]
        address: String,
    },
    /// Token balance of an address
    TokenBalance {
        #[arg(long)]
        address: String,
        #[arg(long)]
        contract: String,
        #[arg(long, default_value_t = 6)]
        decimals: u8,
    },
    /// Transaction history
    Transactions {
        #[arg(long)]
        address: String,
    },
    /// TRC-20 transfer history
    TokenTransactions {
        #[arg(long)]
        address: String,
    },
    /// Send TRX
    Send {
        #[arg(long)]
        private_key: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        amount: String,
    },
    /// Send TRC-20 tokens
    SendToken {
        #[arg(long)]
        private_key: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        contract: String,
        #[arg(long)]
        amount: String,
        #[arg(long, default_value_t = 6)]
        decimals: u8,
        #[arg(long)]
        backer_key: Option<String>,
    },
    /// Send all TRX except a 1 TRX reserve
    Drain {
        #[arg(long)]
        private_key: String,
        #[arg(long)]
        to: String,
    },
    /// Send the full token balance
    DrainToken {
        #[arg(long)]
        private_key: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        contract: String,
        #[arg(long)]
        backer_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_with_env(cli.config.as_deref())?;
    logging::init(&config.observability);

    let network = cli.network;

    // Key handling needs no gateway, so no API key is required for it.
    match &cli.command {
        Commands::Create => return print_json(&TransferOrchestrator::create_address()?),
        Commands::Import { private_key } => {
            return print_json(&TransferOrchestrator::import_address(private_key)?)
        }
        Commands::ImportMnemonic { mnemonic, index } => {
            return print_json(&TransferOrchestrator::import_address_from_mnemonic(
                mnemonic, *index,
            )?)
        }
        Commands::ImportXprv { key, index } => {
            return print_json(&TransferOrchestrator::import_address_from_extended_key(
                key, *index,
            )?)
        }
        _ => {}
    }

    let wallet = TransferOrchestrator::new(&config)?;

    match cli.command {
        Commands::Balance { address } => print_json(&wallet.get_balance(&address, &network).await?),
        Commands::TokenBalance {
            address,
            contract,
            decimals,
        } => print_json(
            &wallet
                .get_token_balance(&address, &contract, decimals, &network)
                .await?,
        ),
        Commands::Transactions { address } => {
            print_json(&wallet.get_transactions(&address, &network).await?)
        }
        Commands::TokenTransactions { address } => {
            print_json(&wallet.get_token_transactions(&address, &network).await?)
        }
        Commands::Send {
            private_key,
            to,
            amount,
        } => {
            let request = TransferRequest {
                private_key: SecretKey::new(private_key),
                to_address: to,
                amount,
                network,
            };
            print_json(&wallet.send(&request).await?)
        }
        Commands::SendToken {
            private_key,
            to,
            contract,
            amount,
            decimals,
            backer_key,
        } => {
            let request = TokenTransferRequest {
                private_key: SecretKey::new(private_key),
                to_address: to,
                contract_address: contract,
                amount,
                decimals,
                network,
                backer_private_key: backer_key.map(SecretKey::from),
            };
            print_json(&wallet.send_token(&request).await?)
        }
        Commands::Drain { private_key, to } => {
            let request = DrainRequest {
                private_key: SecretKey::new(private_key),
                to_address: to,
                network,
            };
            print_json(&wallet.drain(&request).await?)
        }
        Commands::DrainToken {
            private_key,
            to,
            contract,
            backer_key,
        } => {
            let request = TokenDrainRequest {
                private_key: SecretKey::new(private_key),
                to_address: to,
                contract_address: contract,
                network,
                backer_private_key: backer_key.map(SecretKey::from),
            };
            print_json(&wallet.drain_token(&request).await?)
        }
        Commands::Create
        | Commands::Import { .. }
        | Commands::ImportMnemonic { .. }
        | Commands::ImportXprv { .. } => Ok(()),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
