//! State of the booking page

use crate::session::Session;
use crate::types::{DraftEvent, EventId, EventRecord, Notice};
use chrono::{DateTime, Utc};

/// Wallet connection progress
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConnectionPhase {
    /// No session
    #[default]
    Disconnected,
    /// Waiting for the wallet and the `owner()` read
    Connecting,
    /// Session bound
    Connected,
    /// No wallet configured. Terminal.
    Unavailable,
}

/// Transaction awaiting its receipt
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PendingTransaction {
    /// `reserve(id)`
    Reserve(EventId),
    /// `createEvent(..)`
    CreateEvent,
}

/// Booking page state
#[derive(Clone, Debug, Default)]
pub struct BookingState {
    /// Connection progress
    pub phase: ConnectionPhase,
    /// Bound session, if connected
    pub session: Option<Session>,
    /// Latest bind attempt. Results from older attempts are discarded.
    pub connect_generation: u64,
    /// Last successfully loaded list, in index order
    pub events: Vec<EventRecord>,
    /// Creation form
    pub draft: DraftEvent,
    /// Modal notice
    pub notice: Option<Notice>,
    /// Transaction in flight, at most one
    pub pending_transaction: Option<PendingTransaction>,
    /// Latest load issued. Results from older loads are discarded.
    pub load_generation: u64,
    /// A load is in flight
    pub loading: bool,
    /// When the list was last replaced
    pub loaded_at: Option<DateTime<Utc>>,
}

impl BookingState {
    /// Disconnected, empty page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a session is bound
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Whether the connected account owns the contract
    #[must_use]
    pub fn is_owner(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_owner)
    }

    /// Drop the session and everything loaded for it.
    ///
    /// Bumps the load generation so a load still in flight for the old
    /// account cannot land afterwards.
    pub fn clear_session(&mut self) {
        self.phase = ConnectionPhase::Disconnected;
        self.session = None;
        self.events.clear();
        self.loading = false;
        self.loaded_at = None;
        self.load_generation += 1;
    }

    /// Event by id from the loaded list
    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&EventRecord> {
        self.events.iter().find(|event| event.id == id)
    }
}
