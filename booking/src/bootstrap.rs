//! Building the environment from configuration

use crate::app::BookingEnvironment;
use crate::config::{Backend, Config, ConfigError};
use crate::contract::MemoryLedger;
use crate::wallet::{LocalKeyWallet, MemoryWallet, WalletError, WalletProvider};
use alloy::primitives::{Address, address};
use seatbook_core::environment::SystemClock;
use std::sync::Arc;
use thiserror::Error;

/// Account that owns the demo ledger
pub const DEMO_OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

/// Regular account of the demo ledger
pub const DEMO_GUEST: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");

/// Startup failures
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Bad configuration value
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Wallet could not be created
    #[error(transparent)]
    Wallet(#[from] WalletError),
}

/// Ledger with a full event, an event the guest already holds, and an open one
#[must_use]
pub fn demo_ledger(contract_address: Address) -> MemoryLedger {
    let ledger = MemoryLedger::new(contract_address, DEMO_OWNER);
    ledger.seed_event("Concert", 10, 10);
    let workshop = ledger.seed_event("Workshop", 5, 2);
    ledger.seed_event("Conférence Rust", 120, 37);
    ledger.seed_reservation(DEMO_GUEST, workshop);
    ledger
}

/// Environment for the configured backend.
///
/// The RPC backend without a private key has no wallet: connecting then
/// shows the wallet-unavailable notice.
///
/// # Errors
///
/// Invalid contract address, private key or RPC url.
pub fn environment(config: &Config) -> Result<BookingEnvironment, BootstrapError> {
    let contract_address = config.contract_address()?;

    let wallet: Option<Arc<dyn WalletProvider>> = match config.backend {
        Backend::Rpc => match &config.wallet.private_key {
            Some(key) => Some(Arc::new(LocalKeyWallet::new(
                key,
                &config.chain.rpc_url,
                config.chain.chain_id,
            )?)),
            None => {
                tracing::warn!("BOOKING_PRIVATE_KEY is not set, no wallet available");
                None
            },
        },
        Backend::Memory => {
            let account = if config.memory.guest { DEMO_GUEST } else { DEMO_OWNER };
            tracing::info!(%account, "Using in-memory demo ledger");
            Some(Arc::new(MemoryWallet::new(
                demo_ledger(contract_address),
                vec![account],
            )))
        },
    };

    Ok(BookingEnvironment::new(
        wallet,
        contract_address,
        config.load_strategy(),
        Arc::new(SystemClock),
    ))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    #[test]
    fn test_rpc_without_key_has_no_wallet() {
        let env = environment(&Config::from_lookup(|_| None)).unwrap();
        assert!(env.wallet.is_none());
    }

    #[tokio::test]
    async fn test_memory_backend_exposes_demo_account() {
        let config = Config::from_lookup(|key| match key {
            "BOOKING_BACKEND" => Some("memory".to_string()),
            "BOOKING_MEMORY_GUEST" => Some("true".to_string()),
            _ => None,
        });
        let env = environment(&config).unwrap();

        let accounts = env.wallet.unwrap().request_accounts().await.unwrap();
        assert_eq!(accounts, vec![DEMO_GUEST]);
    }

    #[test]
    fn test_bad_key_is_reported() {
        let config = Config::from_lookup(|key| {
            (key == "BOOKING_PRIVATE_KEY").then(|| "0x12".to_string())
        });
        assert!(matches!(
            environment(&config),
            Err(BootstrapError::Wallet(WalletError::InvalidKey))
        ));
    }
}
