//! The `EventBooking` contract boundary
//!
//! All business rules (capacity, one seat per account, owner-only creation)
//! live in the contract. This module only describes how the client talks to
//! it: [`BookingContract`] is implemented over JSON-RPC by
//! [`AlloyBookingContract`] and in memory by [`InMemoryBookingContract`].

use crate::types::EventId;
use alloy::primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

pub mod memory;
pub mod rpc;

pub use memory::{InMemoryBookingContract, LedgerStats, MemoryLedger};
pub use rpc::AlloyBookingContract;

/// Event tuple exactly as the contract returns it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawEvent {
    /// Display name
    pub name: String,
    /// Total seats
    pub capacity: U256,
    /// Seats already taken
    pub registered: U256,
}

/// A mined, successful transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxConfirmation {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block the transaction was included in, when the node reports it
    pub block_number: Option<u64>,
}

/// Contract call failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// A view call failed
    #[error("read `{method}` failed: {message}")]
    Read {
        /// Contract method
        method: &'static str,
        /// Transport or node message
        message: String,
    },

    /// A transaction could not be submitted or confirmed
    #[error("transaction `{method}` failed: {message}")]
    Transaction {
        /// Contract method
        method: &'static str,
        /// Revert reason reported by the node, if any
        reason: Option<String>,
        /// Full error message
        message: String,
    },

    /// The transaction was mined with a failed status
    ///
    /// Receipts carry no revert data, so no reason is available here. The
    /// user sees this message as is. Reverts the node reports while
    /// estimating or sending arrive as [`ContractError::Transaction`] with
    /// their reason instead.
    #[error("transaction {tx_hash} reverted")]
    Reverted {
        /// Transaction hash
        tx_hash: TxHash,
    },

    /// A returned value does not fit the client's types
    #[error("`{field}` value {value} does not fit in 64 bits")]
    Decode {
        /// Returned field
        field: &'static str,
        /// Value received
        value: U256,
    },
}

impl ContractError {
    /// Message shown to the user: the node's revert reason when there is
    /// one, the error's own message otherwise.
    #[must_use]
    pub fn user_reason(&self) -> String {
        match self {
            Self::Transaction {
                reason: Some(reason),
                ..
            } => reason.clone(),
            other => other.to_string(),
        }
    }
}

/// Calls the client makes on the `EventBooking` contract
///
/// Transactions resolve only once a receipt is available.
#[async_trait]
pub trait BookingContract: Send + Sync {
    /// Deployed address
    fn address(&self) -> Address;

    /// `owner()`
    async fn owner(&self) -> Result<Address, ContractError>;

    /// `eventCount()`
    async fn event_count(&self) -> Result<U256, ContractError>;

    /// `events(index)`
    async fn event(&self, index: u64) -> Result<RawEvent, ContractError>;

    /// `reservations(user, index)`
    async fn is_reserved(&self, user: Address, index: u64) -> Result<bool, ContractError>;

    /// `reserve(id)`, signed by the bound account
    async fn reserve(&self, event_id: EventId) -> Result<TxConfirmation, ContractError>;

    /// `createEvent(name, capacity)`, signed by the bound account
    async fn create_event(
        &self,
        name: &str,
        capacity: u64,
    ) -> Result<TxConfirmation, ContractError>;
}

/// Shared handle to a contract bound to a signer
#[derive(Clone)]
pub struct ContractHandle(Arc<dyn BookingContract>);

impl ContractHandle {
    /// Wrap a contract implementation
    pub fn new(contract: impl BookingContract + 'static) -> Self {
        Self(Arc::new(contract))
    }
}

impl Deref for ContractHandle {
    type Target = dyn BookingContract;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContractHandle")
            .field(&self.0.address())
            .finish()
    }
}
