//! Wallet backed by a local private key and an HTTP JSON-RPC node

use super::{WalletError, WalletProvider};
use crate::contract::{AlloyBookingContract, ContractHandle};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use alloy::transports::http::reqwest::Url;
use async_trait::async_trait;
use std::fmt;

/// One account, signed locally, sent through `rpc_url`
#[derive(Clone)]
pub struct LocalKeyWallet {
    signer: PrivateKeySigner,
    rpc_url: Url,
    expected_chain_id: Option<u64>,
}

impl LocalKeyWallet {
    /// Parse the key and endpoint.
    ///
    /// # Errors
    ///
    /// [`WalletError::InvalidKey`] or [`WalletError::InvalidRpcUrl`].
    pub fn new(
        private_key: &str,
        rpc_url: &str,
        expected_chain_id: Option<u64>,
    ) -> Result<Self, WalletError> {
        let signer = private_key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|_| WalletError::InvalidKey)?;
        let rpc_url = rpc_url
            .parse::<Url>()
            .map_err(|_| WalletError::InvalidRpcUrl(rpc_url.to_string()))?;

        Ok(Self {
            signer,
            rpc_url,
            expected_chain_id,
        })
    }

    /// The signing account
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for LocalKeyWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalKeyWallet")
            .field("address", &self.signer.address())
            .field("rpc_url", &self.rpc_url.as_str())
            .field("expected_chain_id", &self.expected_chain_id)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletProvider for LocalKeyWallet {
    async fn request_accounts(&self) -> Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    async fn bind(
        &self,
        contract: Address,
        account: Address,
    ) -> Result<ContractHandle, WalletError> {
        if account != self.signer.address() {
            return Err(WalletError::UnknownAccount(account));
        }

        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::from(self.signer.clone()))
            .connect_http(self.rpc_url.clone())
            .erased();

        if let Some(expected) = self.expected_chain_id {
            let actual = provider
                .get_chain_id()
                .await
                .map_err(|e| WalletError::Transport(e.to_string()))?;
            if actual != expected {
                return Err(WalletError::WrongNetwork { expected, actual });
            }
        }

        tracing::debug!(%contract, %account, rpc_url = %self.rpc_url, "Contract bound to local signer");
        Ok(ContractHandle::new(AlloyBookingContract::new(contract, provider)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;

    // Well-known development key (first account of a local dev node)
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_exposes_signer_account() {
        let wallet = LocalKeyWallet::new(DEV_KEY, "http://127.0.0.1:8545", None).unwrap();
        let accounts = wallet.request_accounts().await.unwrap();
        assert_eq!(accounts, vec![wallet.address()]);
        assert_eq!(
            wallet.address().to_string(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_rejects_bad_inputs() {
        assert_eq!(
            LocalKeyWallet::new("not-a-key", "http://127.0.0.1:8545", None).unwrap_err(),
            WalletError::InvalidKey
        );
        assert!(matches!(
            LocalKeyWallet::new(DEV_KEY, "not a url", None).unwrap_err(),
            WalletError::InvalidRpcUrl(_)
        ));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = LocalKeyWallet::new(DEV_KEY, "http://127.0.0.1:8545", Some(31_337)).unwrap();
        let debug = format!("{wallet:?}");
        assert!(!debug.contains("ac0974bec39a17e3"));
        assert!(debug.contains("31337"));
    }

    #[tokio::test]
    async fn test_bind_refuses_foreign_account() {
        let wallet = LocalKeyWallet::new(DEV_KEY, "http://127.0.0.1:8545", None).unwrap();
        let err = wallet.bind(Address::ZERO, Address::ZERO).await.unwrap_err();
        assert_eq!(err, WalletError::UnknownAccount(Address::ZERO));
    }
}
