//! Wallet boundary: account access and signer-backed contract handles

use crate::contract::{ContractError, ContractHandle};
use alloy::primitives::Address;
use async_trait::async_trait;
use thiserror::Error;

pub mod local;
pub mod memory;

pub use local::LocalKeyWallet;
pub use memory::MemoryWallet;

/// Wallet failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// The user or the wallet refused account access
    #[error("account access denied: {0}")]
    AccessDenied(String),

    /// Access granted but no account exposed
    #[error("wallet exposes no account")]
    NoAccounts,

    /// The wallet cannot sign for this account
    #[error("wallet cannot sign for {0}")]
    UnknownAccount(Address),

    /// The node is on another chain than configured
    #[error("wrong network: expected chain id {expected}, node reports {actual}")]
    WrongNetwork {
        /// Configured chain id
        expected: u64,
        /// Chain id reported by the node
        actual: u64,
    },

    /// RPC endpoint could not be parsed
    #[error("invalid RPC url `{0}`")]
    InvalidRpcUrl(String),

    /// Private key could not be parsed
    #[error("invalid private key")]
    InvalidKey,

    /// Talking to the node failed
    #[error("transport error: {0}")]
    Transport(String),

    /// No contract at the requested address
    #[error("no EventBooking contract at {0}")]
    UnknownContract(Address),

    /// Reading from the bound contract failed
    #[error(transparent)]
    Contract(#[from] ContractError),
}

/// Source of accounts and signers
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask for account access. The first account is the active one.
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError>;

    /// Bind the contract at `contract` to a signer for `account`
    async fn bind(&self, contract: Address, account: Address)
    -> Result<ContractHandle, WalletError>;
}
