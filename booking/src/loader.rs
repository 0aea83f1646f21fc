//! Reading the full event list for one account

use crate::contract::{BookingContract, ContractError};
use crate::types::{EventId, EventRecord};
use alloy::primitives::Address;
use futures::{StreamExt, TryStreamExt, stream};
use std::num::NonZeroUsize;

/// How per-event reads are issued
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStrategy {
    /// One event at a time
    #[default]
    Sequential,
    /// Up to `limit` events in flight, results kept in index order
    Concurrent {
        /// Maximum events read at once
        limit: NonZeroUsize,
    },
}

impl LoadStrategy {
    /// `1` (or `0`) reads sequentially, anything above bounds concurrent reads
    #[must_use]
    pub fn from_concurrency(concurrency: usize) -> Self {
        match NonZeroUsize::new(concurrency) {
            Some(limit) if limit.get() > 1 => Self::Concurrent { limit },
            _ => Self::Sequential,
        }
    }
}

/// Read `eventCount`, then every event with `user`'s reservation flag.
///
/// Issues exactly one `events(i)` and one `reservations(user, i)` read per
/// index. The result is in index order whatever the strategy.
///
/// # Errors
///
/// The first failed read, or a value that does not fit the client's types.
/// Nothing is returned on partial failure.
#[tracing::instrument(skip(contract), fields(contract = %contract.address()))]
pub async fn load_events(
    contract: &dyn BookingContract,
    user: Address,
    strategy: LoadStrategy,
) -> Result<Vec<EventRecord>, ContractError> {
    let raw_count = contract.event_count().await?;
    let count = u64::try_from(raw_count).map_err(|_| ContractError::Decode {
        field: "eventCount",
        value: raw_count,
    })?;
    tracing::debug!(count, "Reading events");

    let events = match strategy {
        LoadStrategy::Sequential => {
            let mut events = Vec::new();
            for index in 0..count {
                events.push(load_one(contract, user, index).await?);
            }
            events
        },
        LoadStrategy::Concurrent { limit } => {
            stream::iter(0..count)
                .map(|index| load_one(contract, user, index))
                .buffered(limit.get())
                .try_collect::<Vec<_>>()
                .await?
        },
    };

    Ok(events)
}

async fn load_one(
    contract: &dyn BookingContract,
    user: Address,
    index: u64,
) -> Result<EventRecord, ContractError> {
    let raw = contract.event(index).await?;
    let reserved = contract.is_reserved(user, index).await?;
    EventRecord::try_from_raw(EventId::new(index), raw, reserved)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code can use unwrap
mod tests {
    use super::*;
    use crate::contract::MemoryLedger;
    use alloy::primitives::address;
    use proptest::prelude::*;

    const OWNER: Address = address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const GUEST: Address = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
    const CONTRACT: Address = address!("5FbDB2315678afecb367f032d93F642f64180aa3");

    fn concert_and_workshop() -> MemoryLedger {
        let ledger = MemoryLedger::new(CONTRACT, OWNER);
        ledger.seed_event("Concert", 10, 10);
        let workshop = ledger.seed_event("Workshop", 5, 2);
        ledger.seed_reservation(GUEST, workshop);
        ledger
    }

    #[tokio::test]
    async fn test_loads_events_with_reservation_flags() {
        let ledger = concert_and_workshop();
        let contract = ledger.contract_for(GUEST);

        let events = load_events(&contract, GUEST, LoadStrategy::Sequential)
            .await
            .unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, "Concert");
        assert!(!events[0].reserved_by_current_user);
        assert_eq!(events[0].availability().label(), "Complet");
        assert_eq!(events[1].name, "Workshop");
        assert!(events[1].reserved_by_current_user);
        assert_eq!(events[1].availability().label(), "Déjà réservé");
    }

    #[tokio::test]
    async fn test_flags_are_per_user() {
        let ledger = concert_and_workshop();
        let contract = ledger.contract_for(OWNER);

        let events = load_events(&contract, OWNER, LoadStrategy::Sequential)
            .await
            .unwrap();
        assert!(events.iter().all(|e| !e.reserved_by_current_user));
    }

    #[tokio::test]
    async fn test_empty_contract_reads_only_the_count() {
        let ledger = MemoryLedger::new(CONTRACT, OWNER);
        let contract = ledger.contract_for(GUEST);

        let events = load_events(&contract, GUEST, LoadStrategy::Sequential)
            .await
            .unwrap();

        assert!(events.is_empty());
        let stats = ledger.stats();
        assert_eq!(stats.count_reads, 1);
        assert_eq!(stats.event_reads, 0);
        assert_eq!(stats.reservation_reads, 0);
    }

    #[tokio::test]
    async fn test_read_failure_returns_error() {
        let ledger = concert_and_workshop();
        ledger.fail_reads(Some("node unreachable"));

        let result = load_events(&ledger.contract_for(GUEST), GUEST, LoadStrategy::Sequential).await;
        assert!(matches!(result, Err(ContractError::Read { .. })));
    }

    #[test]
    fn test_strategy_from_concurrency() {
        assert_eq!(LoadStrategy::from_concurrency(0), LoadStrategy::Sequential);
        assert_eq!(LoadStrategy::from_concurrency(1), LoadStrategy::Sequential);
        assert_eq!(
            LoadStrategy::from_concurrency(4),
            LoadStrategy::Concurrent {
                limit: NonZeroUsize::new(4).unwrap()
            }
        );
    }

    proptest! {
        #[test]
        fn prop_one_detail_and_one_flag_read_per_event(
            events in prop::collection::vec((0u64..100, 0u64..100, any::<bool>()), 0..24),
            concurrency in 1usize..6,
        ) {
            let ledger = MemoryLedger::new(CONTRACT, OWNER);
            for (i, (capacity, registered, reserved)) in events.iter().enumerate() {
                let id = ledger.seed_event(format!("event-{i}"), *capacity, *registered);
                if *reserved {
                    ledger.seed_reservation(GUEST, id);
                }
            }

            let runtime = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let loaded = runtime
                .block_on(load_events(
                    &ledger.contract_for(GUEST),
                    GUEST,
                    LoadStrategy::from_concurrency(concurrency),
                ))
                .unwrap();

            let stats = ledger.stats();
            prop_assert_eq!(stats.count_reads, 1);
            prop_assert_eq!(stats.event_reads, events.len());
            prop_assert_eq!(stats.reservation_reads, events.len());
            prop_assert_eq!(loaded.len(), events.len());

            for (i, (record, (capacity, registered, reserved))) in loaded.iter().zip(&events).enumerate() {
                prop_assert_eq!(record.id, EventId::new(i as u64));
                prop_assert_eq!(&record.name, &format!("event-{i}"));
                prop_assert_eq!(record.capacity, *capacity);
                prop_assert_eq!(record.registered, *registered);
                prop_assert_eq!(record.reserved_by_current_user, *reserved);
            }
        }
    }
}
