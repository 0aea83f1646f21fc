//! In-memory `EventBooking` for tests and the offline demo
//!
//! [`MemoryLedger`] holds the contract storage and enforces the same rules
//! the deployed contract does. Each [`InMemoryBookingContract`] is a view of
//! the ledger signed by one caller.

use super::{BookingContract, ContractError, RawEvent, TxConfirmation};
use crate::types::EventId;
use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Calls received by the ledger, for assertions in tests
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LedgerStats {
    /// `eventCount()` calls
    pub count_reads: usize,
    /// `events(i)` calls
    pub event_reads: usize,
    /// `reservations(user, i)` calls
    pub reservation_reads: usize,
    /// `reserve(id)` calls, successful or not
    pub reserve_calls: usize,
    /// `createEvent(..)` calls, successful or not
    pub create_calls: usize,
}

#[derive(Debug)]
struct StoredEvent {
    name: String,
    capacity: u64,
    registered: u64,
}

#[derive(Debug)]
struct Ledger {
    owner: Address,
    events: Vec<StoredEvent>,
    reservations: HashSet<(Address, u64)>,
    stats: LedgerStats,
    failing_reads: Option<String>,
    transactions: u64,
}

impl Ledger {
    fn check_reads(&self, method: &'static str) -> Result<(), ContractError> {
        match &self.failing_reads {
            Some(message) => Err(ContractError::Read {
                method,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn mine(&mut self) -> TxConfirmation {
        self.transactions += 1;
        TxConfirmation {
            tx_hash: B256::left_padding_from(&self.transactions.to_be_bytes()),
            block_number: Some(self.transactions),
        }
    }
}

fn revert(method: &'static str, reason: &str) -> ContractError {
    ContractError::Transaction {
        method,
        reason: Some(reason.to_string()),
        message: format!("execution reverted: {reason}"),
    }
}

/// Contract storage shared by every caller
#[derive(Clone, Debug)]
pub struct MemoryLedger {
    address: Address,
    inner: Arc<Mutex<Ledger>>,
}

impl MemoryLedger {
    /// Empty ledger deployed at `address` and owned by `owner`
    #[must_use]
    pub fn new(address: Address, owner: Address) -> Self {
        Self {
            address,
            inner: Arc::new(Mutex::new(Ledger {
                owner,
                events: Vec::new(),
                reservations: HashSet::new(),
                stats: LedgerStats::default(),
                failing_reads: None,
                transactions: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Ledger> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deployed address
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Contract owner
    #[must_use]
    pub fn owner(&self) -> Address {
        self.lock().owner
    }

    /// Add an event directly to storage, bypassing the owner check
    pub fn seed_event(&self, name: impl Into<String>, capacity: u64, registered: u64) -> EventId {
        let mut ledger = self.lock();
        ledger.events.push(StoredEvent {
            name: name.into(),
            capacity,
            registered,
        });
        EventId::new((ledger.events.len() - 1) as u64)
    }

    /// Record a reservation directly in storage without touching the count
    pub fn seed_reservation(&self, user: Address, event_id: EventId) {
        self.lock().reservations.insert((user, event_id.index()));
    }

    /// Make every view call fail with `message`, or succeed again with `None`
    pub fn fail_reads(&self, message: Option<&str>) {
        self.lock().failing_reads = message.map(str::to_string);
    }

    /// Calls received so far
    #[must_use]
    pub fn stats(&self) -> LedgerStats {
        self.lock().stats
    }

    /// Registered count of an event, if it exists
    #[must_use]
    pub fn registered(&self, event_id: EventId) -> Option<u64> {
        usize::try_from(event_id.index())
            .ok()
            .and_then(|index| self.lock().events.get(index).map(|e| e.registered))
    }

    /// Number of events in storage
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.lock().events.len()
    }

    /// Contract view signed by `caller`
    #[must_use]
    pub fn contract_for(&self, caller: Address) -> InMemoryBookingContract {
        InMemoryBookingContract {
            ledger: self.clone(),
            caller,
        }
    }
}

/// [`BookingContract`] over a [`MemoryLedger`], acting as `caller`
#[derive(Clone, Debug)]
pub struct InMemoryBookingContract {
    ledger: MemoryLedger,
    caller: Address,
}

impl InMemoryBookingContract {
    /// The signing account
    #[must_use]
    pub const fn caller(&self) -> Address {
        self.caller
    }
}

#[async_trait]
impl BookingContract for InMemoryBookingContract {
    fn address(&self) -> Address {
        self.ledger.address
    }

    async fn owner(&self) -> Result<Address, ContractError> {
        let ledger = self.ledger.lock();
        ledger.check_reads("owner")?;
        Ok(ledger.owner)
    }

    async fn event_count(&self) -> Result<U256, ContractError> {
        let mut ledger = self.ledger.lock();
        ledger.stats.count_reads += 1;
        ledger.check_reads("eventCount")?;
        Ok(U256::from(ledger.events.len()))
    }

    async fn event(&self, index: u64) -> Result<RawEvent, ContractError> {
        let mut ledger = self.ledger.lock();
        ledger.stats.event_reads += 1;
        ledger.check_reads("events")?;

        let event = usize::try_from(index)
            .ok()
            .and_then(|i| ledger.events.get(i))
            .ok_or_else(|| ContractError::Read {
                method: "events",
                message: format!("index {index} out of bounds"),
            })?;

        Ok(RawEvent {
            name: event.name.clone(),
            capacity: U256::from(event.capacity),
            registered: U256::from(event.registered),
        })
    }

    async fn is_reserved(&self, user: Address, index: u64) -> Result<bool, ContractError> {
        let mut ledger = self.ledger.lock();
        ledger.stats.reservation_reads += 1;
        ledger.check_reads("reservations")?;
        Ok(ledger.reservations.contains(&(user, index)))
    }

    async fn reserve(&self, event_id: EventId) -> Result<TxConfirmation, ContractError> {
        let mut ledger = self.ledger.lock();
        ledger.stats.reserve_calls += 1;

        let index = event_id.index();
        let Some(slot) = usize::try_from(index).ok().filter(|i| *i < ledger.events.len()) else {
            return Err(revert("reserve", "Event does not exist"));
        };
        if ledger.reservations.contains(&(self.caller, index)) {
            return Err(revert("reserve", "Already reserved"));
        }
        let event = &mut ledger.events[slot];
        if event.registered >= event.capacity {
            return Err(revert("reserve", "Event is full"));
        }

        event.registered += 1;
        ledger.reservations.insert((self.caller, index));
        Ok(ledger.mine())
    }

    async fn create_event(
        &self,
        name: &str,
        capacity: u64,
    ) -> Result<TxConfirmation, ContractError> {
        let mut ledger = self.ledger.lock();
        ledger.stats.create_calls += 1;

        if self.caller != ledger.owner {
            return Err(revert("createEvent", "Only owner can create events"));
        }

        ledger.events.push(StoredEvent {
            name: name.to_string(),
            capacity,
            registered: 0,
        });
        Ok(ledger.mine())
    }
}
