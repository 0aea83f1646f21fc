//! Configuration management for the booking client.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Call `dotenvy::dotenv()` first to pick up a local `.env` file.

use crate::loader::LoadStrategy;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Contract address of a fresh local dev node's first deployment
pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

/// Default JSON-RPC endpoint
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `BOOKING_CONTRACT_ADDRESS` is not a 20-byte hex address
    #[error("invalid contract address `{0}`")]
    InvalidContractAddress(String),
}

/// Where wallet and contract live
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// JSON-RPC node, local private key
    #[default]
    Rpc,
    /// In-process ledger seeded with demo events
    Memory,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rpc" => Ok(Self::Rpc),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown backend `{other}`")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend selection
    pub backend: Backend,
    /// Node and contract
    pub chain: ChainConfig,
    /// Signer
    pub wallet: WalletConfig,
    /// Event list loading
    pub loader: LoaderConfig,
    /// In-memory backend
    pub memory: MemoryConfig,
}

/// Node and contract configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint
    pub rpc_url: String,
    /// Deployed `EventBooking` address
    pub contract_address: String,
    /// Expected chain id, checked when binding
    pub chain_id: Option<u64>,
}

/// Signer configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Hex private key. Without one there is no wallet.
    #[serde(skip_serializing, default)]
    pub private_key: Option<String>,
}

impl fmt::Debug for WalletConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletConfig")
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Events read at once (1 = sequential)
    pub read_concurrency: usize,
}

/// In-memory backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Connect as a regular user instead of the contract owner
    pub guest: bool,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key/value source.
    ///
    /// Missing or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            backend: lookup("BOOKING_BACKEND")
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            chain: ChainConfig {
                rpc_url: lookup("BOOKING_RPC_URL")
                    .unwrap_or_else(|| DEFAULT_RPC_URL.to_string()),
                contract_address: lookup("BOOKING_CONTRACT_ADDRESS")
                    .unwrap_or_else(|| DEFAULT_CONTRACT_ADDRESS.to_string()),
                chain_id: lookup("BOOKING_CHAIN_ID").and_then(|s| s.parse().ok()),
            },
            wallet: WalletConfig {
                private_key: lookup("BOOKING_PRIVATE_KEY").filter(|key| !key.trim().is_empty()),
            },
            loader: LoaderConfig {
                read_concurrency: lookup("BOOKING_READ_CONCURRENCY")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1),
            },
            memory: MemoryConfig {
                guest: lookup("BOOKING_MEMORY_GUEST")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(false),
            },
        }
    }

    /// Parsed contract address.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidContractAddress`] if the configured value is not
    /// a 20-byte hex address.
    pub fn contract_address(&self) -> Result<Address, ConfigError> {
        self.chain
            .contract_address
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidContractAddress(self.chain.contract_address.clone()))
    }

    /// Loader strategy for the configured concurrency
    #[must_use]
    pub fn load_strategy(&self) -> LoadStrategy {
        LoadStrategy::from_concurrency(self.loader.read_concurrency)
    }
}
