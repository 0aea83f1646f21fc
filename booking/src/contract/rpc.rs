//! JSON-RPC implementation of [`BookingContract`] over alloy

use super::{BookingContract, ContractError, RawEvent, TxConfirmation};
use crate::types::EventId;
use alloy::network::Ethereum;
use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, PendingTransactionBuilder};
use alloy::sol;
use alloy::sol_types::{Revert, SolError};
use async_trait::async_trait;

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface EventBooking {
        function owner() external view returns (address);
        function eventCount() external view returns (uint256);
        function events(uint256 index) external view returns (string name, uint256 capacity, uint256 registered);
        function reservations(address user, uint256 index) external view returns (bool);
        function reserve(uint256 eventId) external;
        function createEvent(string name, uint256 capacity) external;
    }
}

/// `EventBooking` deployed at a fixed address, called through a signing provider
#[derive(Clone)]
pub struct AlloyBookingContract {
    instance: EventBooking::EventBookingInstance<DynProvider>,
}

impl AlloyBookingContract {
    /// Bind the contract at `address` to `provider`
    #[must_use]
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self {
            instance: EventBooking::new(address, provider),
        }
    }

    async fn confirm(
        method: &'static str,
        pending: PendingTransactionBuilder<Ethereum>,
    ) -> Result<TxConfirmation, ContractError> {
        let submitted = *pending.tx_hash();
        tracing::debug!(method, tx_hash = %submitted, "Transaction submitted, waiting for receipt");

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ContractError::Transaction {
                method,
                reason: None,
                message: e.to_string(),
            })?;

        if !receipt.status() {
            return Err(ContractError::Reverted {
                tx_hash: receipt.transaction_hash,
            });
        }

        Ok(TxConfirmation {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
        })
    }
}

fn read_error(method: &'static str, error: &alloy::contract::Error) -> ContractError {
    ContractError::Read {
        method,
        message: error.to_string(),
    }
}

fn transaction_error(method: &'static str, error: &alloy::contract::Error) -> ContractError {
    ContractError::Transaction {
        method,
        reason: revert_reason(error),
        message: error.to_string(),
    }
}

/// Revert reason carried by a failed call: the ABI-encoded `Error(string)`
/// payload when present, otherwise the node's error message.
fn revert_reason(error: &alloy::contract::Error) -> Option<String> {
    if let Some(data) = error.as_revert_data() {
        if let Ok(revert) = Revert::abi_decode(&data) {
            return Some(revert.reason);
        }
    }

    match error {
        alloy::contract::Error::TransportError(rpc) => rpc
            .as_error_resp()
            .map(|payload| clean_reason(&payload.message)),
        _ => None,
    }
}

/// Strip the prefixes nodes put in front of a revert reason
fn clean_reason(message: &str) -> String {
    const PREFIXES: [&str; 2] = [
        "execution reverted: ",
        "VM Exception while processing transaction: reverted with reason string ",
    ];

    PREFIXES
        .iter()
        .find_map(|prefix| message.strip_prefix(prefix))
        .map_or(message, |reason| reason.trim_matches('\''))
        .to_string()
}

#[async_trait]
impl BookingContract for AlloyBookingContract {
    fn address(&self) -> Address {
        *self.instance.address()
    }

    async fn owner(&self) -> Result<Address, ContractError> {
        self.instance
            .owner()
            .call()
            .await
            .map_err(|e| read_error("owner", &e))
    }

    async fn event_count(&self) -> Result<U256, ContractError> {
        self.instance
            .eventCount()
            .call()
            .await
            .map_err(|e| read_error("eventCount", &e))
    }

    async fn event(&self, index: u64) -> Result<RawEvent, ContractError> {
        let event = self
            .instance
            .events(U256::from(index))
            .call()
            .await
            .map_err(|e| read_error("events", &e))?;

        Ok(RawEvent {
            name: event.name,
            capacity: event.capacity,
            registered: event.registered,
        })
    }

    async fn is_reserved(&self, user: Address, index: u64) -> Result<bool, ContractError> {
        self.instance
            .reservations(user, U256::from(index))
            .call()
            .await
            .map_err(|e| read_error("reservations", &e))
    }

    async fn reserve(&self, event_id: EventId) -> Result<TxConfirmation, ContractError> {
        let pending = self
            .instance
            .reserve(U256::from(event_id.index()))
            .send()
            .await
            .map_err(|e| transaction_error("reserve", &e))?;

        Self::confirm("reserve", pending).await
    }

    async fn create_event(
        &self,
        name: &str,
        capacity: u64,
    ) -> Result<TxConfirmation, ContractError> {
        let pending = self
            .instance
            .createEvent(name.to_string(), U256::from(capacity))
            .send()
            .await
            .map_err(|e| transaction_error("createEvent", &e))?;

        Self::confirm("createEvent", pending).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_reason_strips_node_prefixes() {
        assert_eq!(
            clean_reason("execution reverted: Already reserved"),
            "Already reserved"
        );
        assert_eq!(
            clean_reason(
                "VM Exception while processing transaction: reverted with reason string 'Event is full'"
            ),
            "Event is full"
        );
        assert_eq!(clean_reason("nonce too low"), "nonce too low");
    }

    #[test]
    fn test_revert_reason_absent_for_local_errors() {
        assert_eq!(revert_reason(&alloy::contract::Error::UnknownFunction("x".into())), None);
    }
}
