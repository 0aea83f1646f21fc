//! Wallet over a [`MemoryLedger`]

use super::{WalletError, WalletProvider};
use crate::contract::{ContractHandle, MemoryLedger};
use alloy::primitives::Address;
use async_trait::async_trait;
use std::sync::{Arc, Mutex, PoisonError};

/// Exposes a fixed list of accounts and signs for any of them
#[derive(Clone, Debug)]
pub struct MemoryWallet {
    ledger: MemoryLedger,
    accounts: Arc<Mutex<Vec<Address>>>,
    denied: bool,
}

impl MemoryWallet {
    /// Wallet exposing `accounts`, first one active
    #[must_use]
    pub fn new(ledger: MemoryLedger, accounts: Vec<Address>) -> Self {
        Self {
            ledger,
            accounts: Arc::new(Mutex::new(accounts)),
            denied: false,
        }
    }

    /// Wallet whose user rejects every access request
    #[must_use]
    pub fn denying(ledger: MemoryLedger) -> Self {
        Self {
            denied: true,
            ..Self::new(ledger, Vec::new())
        }
    }

    /// Replace the exposed accounts, as a user switching accounts would
    pub fn switch_accounts(&self, accounts: Vec<Address>) {
        *self.accounts.lock().unwrap_or_else(PoisonError::into_inner) = accounts;
    }

    /// The ledger this wallet signs against
    #[must_use]
    pub const fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }
}

#[async_trait]
impl WalletProvider for MemoryWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        if self.denied {
            return Err(WalletError::AccessDenied(
                "user rejected the request".to_string(),
            ));
        }
        Ok(self
            .accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn bind(
        &self,
        contract: Address,
        account: Address,
    ) -> Result<ContractHandle, WalletError> {
        if contract != self.ledger.address() {
            return Err(WalletError::UnknownContract(contract));
        }
        Ok(ContractHandle::new(self.ledger.contract_for(account)))
    }
}
