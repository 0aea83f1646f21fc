//! Binding a wallet account to the contract

use crate::contract::ContractHandle;
use crate::wallet::{WalletError, WalletProvider};
use alloy::primitives::Address;

/// The connected account, its contract handle, and the contract owner
#[derive(Clone, Debug)]
pub struct Session {
    /// Active account
    pub account: Address,
    /// Contract owner, read once at connection
    pub owner: Address,
    /// Contract bound to the account's signer
    pub contract: ContractHandle,
}

impl Session {
    /// Whether the active account owns the contract.
    ///
    /// Only decides what the page offers. The contract enforces ownership on
    /// `createEvent` regardless of what the client shows.
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.account == self.owner
    }
}

/// Request accounts, bind the contract and read its owner.
///
/// `preferred` selects an account among those the wallet exposes, falling
/// back to the first one.
///
/// # Errors
///
/// Access refused, no account exposed, binding failure, or a failed
/// `owner()` read.
#[tracing::instrument(skip(wallet))]
pub async fn bind_session(
    wallet: &dyn WalletProvider,
    contract_address: Address,
    preferred: Option<Address>,
) -> Result<Session, WalletError> {
    let accounts = wallet.request_accounts().await?;
    let account = preferred
        .filter(|account| accounts.contains(account))
        .or_else(|| accounts.first().copied())
        .ok_or(WalletError::NoAccounts)?;

    let contract = wallet.bind(contract_address, account).await?;
    let owner = contract.owner().await?;

    Ok(Session {
        account,
        owner,
        contract,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::contract::{ContractError, MemoryLedger};
    use crate::wallet::MemoryWallet;
    use alloy::primitives::address;

    const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const GUEST: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    #[tokio::test]
    async fn test_binds_first_account() {
        let ledger = MemoryLedger::new(CONTRACT, OWNER);
        let wallet = MemoryWallet::new(ledger, vec![GUEST, OWNER]);

        let session = bind_session(&wallet, CONTRACT, None).await.unwrap();
        assert_eq!(session.account, GUEST);
        assert_eq!(session.owner, OWNER);
        assert!(!session.is_owner());
        assert_eq!(session.contract.address(), CONTRACT);
    }

    #[tokio::test]
    async fn test_preferred_account_when_exposed() {
        let ledger = MemoryLedger::new(CONTRACT, OWNER);
        let wallet = MemoryWallet::new(ledger, vec![GUEST, OWNER]);

        let session = bind_session(&wallet, CONTRACT, Some(OWNER)).await.unwrap();
        assert!(session.is_owner());

        let unknown = address!("3C44CdDdB6a900fa2b585dd299e03d12FA4293BC");
        let session = bind_session(&wallet, CONTRACT, Some(unknown)).await.unwrap();
        assert_eq!(session.account, GUEST);
    }

    #[tokio::test]
    async fn test_owner_check_ignores_address_case() {
        let lower: Address = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266".parse().unwrap();
        let ledger = MemoryLedger::new(CONTRACT, OWNER);
        let wallet = MemoryWallet::new(ledger, vec![lower]);

        assert!(bind_session(&wallet, CONTRACT, None).await.unwrap().is_owner());
    }

    #[tokio::test]
    async fn test_failures() {
        let ledger = MemoryLedger::new(CONTRACT, OWNER);

        let denied = MemoryWallet::denying(ledger.clone());
        assert!(matches!(
            bind_session(&denied, CONTRACT, None).await,
            Err(WalletError::AccessDenied(_))
        ));

        let empty = MemoryWallet::new(ledger.clone(), Vec::new());
        assert!(matches!(
            bind_session(&empty, CONTRACT, None).await,
            Err(WalletError::NoAccounts)
        ));

        let wallet = MemoryWallet::new(ledger.clone(), vec![GUEST]);
        assert!(matches!(
            bind_session(&wallet, Address::ZERO, None).await,
            Err(WalletError::UnknownContract(_))
        ));

        ledger.fail_reads(Some("node unreachable"));
        assert!(matches!(
            bind_session(&wallet, CONTRACT, None).await,
            Err(WalletError::Contract(ContractError::Read { method: "owner", .. }))
        ));
    }
}
