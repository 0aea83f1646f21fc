//! Actions for the booking page

use crate::contract::TxConfirmation;
use crate::session::Session;
use crate::types::{EventId, EventRecord};
use alloy::primitives::Address;

/// Everything that can happen to the booking page
///
/// User intents are ignored while a notice is displayed; results of effects
/// are always applied.
#[derive(Clone, Debug)]
pub enum BookingAction {
    // Session
    /// Ask the wallet for access and bind the contract (user intent)
    Connect,
    /// Binding succeeded
    Connected {
        /// Bind attempt this result belongs to
        generation: u64,
        /// Bound session
        session: Session,
    },
    /// Binding failed
    ConnectFailed {
        /// Bind attempt this failure belongs to
        generation: u64,
        /// Error message
        error: String,
    },
    /// The wallet reported a new account list
    AccountsChanged {
        /// Accounts now exposed, active first
        accounts: Vec<Address>,
    },

    // Loading
    /// Reload the event list (user intent)
    Refresh,
    /// A load completed
    EventsLoaded {
        /// Load this result belongs to
        generation: u64,
        /// Events in index order
        events: Vec<EventRecord>,
    },
    /// A load failed
    LoadFailed {
        /// Load this failure belongs to
        generation: u64,
        /// Error message
        error: String,
    },

    // Reservation
    /// Reserve a seat (user intent)
    Reserve {
        /// Event to reserve
        event_id: EventId,
    },
    /// Reservation mined
    ReservationConfirmed {
        /// Reserved event
        event_id: EventId,
        /// Mined transaction
        confirmation: TxConfirmation,
    },
    /// Reservation rejected or failed
    ReservationFailed {
        /// Event that was requested
        event_id: EventId,
        /// Reason shown to the user
        reason: String,
    },

    // Creation
    /// Edit the draft name (user intent)
    DraftNameChanged {
        /// New text
        name: String,
    },
    /// Edit the draft capacity (user intent)
    DraftCapacityChanged {
        /// New text
        capacity: String,
    },
    /// Submit the draft (user intent)
    SubmitDraft,
    /// Creation mined
    EventCreated {
        /// Name submitted
        name: String,
        /// Mined transaction
        confirmation: TxConfirmation,
    },
    /// Creation rejected or failed
    CreateFailed {
        /// Reason shown to the user
        reason: String,
    },

    // Notice
    /// Close the current notice
    DismissNotice,
}

impl BookingAction {
    /// Whether this action comes from the user rather than from an effect
    #[must_use]
    pub const fn is_user_intent(&self) -> bool {
        matches!(
            self,
            Self::Connect
                | Self::Refresh
                | Self::Reserve { .. }
                | Self::DraftNameChanged { .. }
                | Self::DraftCapacityChanged { .. }
                | Self::SubmitDraft
        )
    }
}
