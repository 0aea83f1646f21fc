//! Booking reducer.
//!
//! # Flow
//!
//! ```text
//! Connect → bind_session effect → Connected → load effect → EventsLoaded
//! Reserve → reserve() effect → ReservationConfirmed → notice + load effect
//! SubmitDraft → validate → createEvent() effect → EventCreated → clear draft + notice + load effect
//! ```

use super::actions::BookingAction;
use super::environment::BookingEnvironment;
use super::state::{BookingState, ConnectionPhase, PendingTransaction};
use crate::loader::load_events;
use crate::session::bind_session;
use crate::types::{EventId, Notice, SeatAvailability};
use alloy::primitives::Address;
use seatbook_core::effect::Effect;
use seatbook_core::reducer::Reducer;
use seatbook_core::{SmallVec, async_effect, call_effect, smallvec};

/// Shown when no wallet is installed
pub const WALLET_UNAVAILABLE: &str = "Veuillez installer MetaMask.";

/// Shown after a reservation is mined
pub const RESERVATION_SUCCESS: &str = "Réservation réussie !";

/// Shown when a non-owner submits the creation form
pub const OWNER_ONLY: &str = "Seul le propriétaire du contrat peut créer un événement.";

/// Booking page reducer
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Create a new booking reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn connect(
        state: &mut BookingState,
        env: &BookingEnvironment,
        preferred: Option<Address>,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        let Some(wallet) = env.wallet.clone() else {
            tracing::error!("No wallet available");
            state.phase = ConnectionPhase::Unavailable;
            state.notice = Some(Notice::error(WALLET_UNAVAILABLE));
            return SmallVec::new();
        };

        // A wallet switch supersedes the bind in flight; a repeated Connect does not
        if preferred.is_none() && state.phase == ConnectionPhase::Connecting {
            tracing::debug!("Connection already in progress");
            return SmallVec::new();
        }

        state.connect_generation += 1;
        state.phase = ConnectionPhase::Connecting;
        let generation = state.connect_generation;
        let contract_address = env.contract_address;

        smallvec![async_effect! {
            match bind_session(wallet.as_ref(), contract_address, preferred).await {
                Ok(session) => Some(BookingAction::Connected { generation, session }),
                Err(error) => Some(BookingAction::ConnectFailed {
                    generation,
                    error: error.to_string(),
                }),
            }
        }]
    }

    /// Issue a new load generation for the bound session
    fn load(state: &mut BookingState, env: &BookingEnvironment) -> Effect<BookingAction> {
        let Some((contract, user)) = state
            .session
            .as_ref()
            .map(|session| (session.contract.clone(), session.account))
        else {
            return Effect::None;
        };

        state.load_generation += 1;
        state.loading = true;
        let generation = state.load_generation;
        let strategy = env.load_strategy;

        async_effect! {
            match load_events(&*contract, user, strategy).await {
                Ok(events) => Some(BookingAction::EventsLoaded { generation, events }),
                Err(error) => Some(BookingAction::LoadFailed {
                    generation,
                    error: error.to_string(),
                }),
            }
        }
    }

    fn reserve(
        state: &mut BookingState,
        event_id: EventId,
    ) -> SmallVec<[Effect<BookingAction>; 4]> {
        let Some(contract) = state.session.as_ref().map(|s| s.contract.clone()) else {
            tracing::warn!(%event_id, "Reserve ignored: not connected");
            return SmallVec::new();
        };
        if let Some(pending) = state.pending_transaction {
            tracing::warn!(%event_id, ?pending, "Reserve ignored: transaction pending");
            return SmallVec::new();
        }
        let availability = state.event(event_id).map(|event| event.availability());
        if availability != Some(SeatAvailability::Available) {
            tracing::warn!(%event_id, ?availability, "Reserve ignored: event not available");
            return SmallVec::new();
        }

        tracing::info!(%event_id, "Submitting reservation");
        state.pending_transaction = Some(PendingTransaction::Reserve(event_id));

        smallvec![call_effect! {
            call: contract.reserve(event_id),
            on_success: |confirmation| BookingAction::ReservationConfirmed {
                event_id,
                confirmation,
            },
            on_error: |error| BookingAction::ReservationFailed {
                event_id,
                reason: error.user_reason(),
            }
        }]
    }

    fn submit_draft(state: &mut BookingState) -> SmallVec<[Effect<BookingAction>; 4]> {
        let Some(contract) = state.session.as_ref().map(|s| s.contract.clone()) else {
            tracing::warn!("Create ignored: not connected");
            return SmallVec::new();
        };
        if !state.is_owner() {
            tracing::warn!("Create refused: account is not the contract owner");
            state.notice = Some(Notice::error(OWNER_ONLY));
            return SmallVec::new();
        }
        if let Some(pending) = state.pending_transaction {
            tracing::warn!(?pending, "Create ignored: transaction pending");
            return SmallVec::new();
        }

        let new_event = match state.draft.validate() {
            Ok(new_event) => new_event,
            Err(error) => {
                tracing::debug!(%error, "Draft rejected");
                state.notice = Some(Notice::error(error.to_string()));
                return SmallVec::new();
            },
        };

        tracing::info!(name = %new_event.name, capacity = new_event.capacity, "Submitting event creation");
        state.pending_transaction = Some(PendingTransaction::CreateEvent);
        let name = new_event.name;
        let capacity = new_event.capacity;

        smallvec![call_effect! {
            call: contract.create_event(&name, capacity),
            on_success: |confirmation| BookingAction::EventCreated {
                name: name.clone(),
                confirmation,
            },
            on_error: |error| BookingAction::CreateFailed {
                reason: error.user_reason(),
            }
        }]
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        if action.is_user_intent() && state.notice.is_some() {
            tracing::debug!(?action, "Input ignored while a notice is displayed");
            return SmallVec::new();
        }

        match action {
            // ═══════════════════════════════════════════════════════════════════
            // Session
            // ═══════════════════════════════════════════════════════════════════
            BookingAction::Connect => Self::connect(state, env, None),

            BookingAction::Connected {
                generation,
                session,
            } => {
                if generation != state.connect_generation {
                    tracing::debug!(
                        generation,
                        latest = state.connect_generation,
                        account = %session.account,
                        "Discarding stale session"
                    );
                    return SmallVec::new();
                }
                tracing::info!(
                    account = %session.account,
                    owner = %session.owner,
                    is_owner = session.is_owner(),
                    "Wallet connected"
                );
                state.phase = ConnectionPhase::Connected;
                state.session = Some(session);
                smallvec![Self::load(state, env)]
            },

            BookingAction::ConnectFailed { generation, error } => {
                if generation != state.connect_generation {
                    tracing::debug!(generation, %error, "Discarding stale connection failure");
                    return SmallVec::new();
                }
                tracing::error!(%error, "Wallet connection failed");
                state.clear_session();
                SmallVec::new()
            },

            BookingAction::AccountsChanged { accounts } => {
                let current = state.session.as_ref().map(|s| s.account);
                match accounts.first().copied() {
                    None => {
                        tracing::info!("Wallet disconnected");
                        state.clear_session();
                        // Drop any bind still in flight too
                        state.connect_generation += 1;
                        SmallVec::new()
                    },
                    Some(account)
                        if current == Some(account)
                            && state.phase == ConnectionPhase::Connected =>
                    {
                        SmallVec::new()
                    },
                    Some(account) => {
                        tracing::info!(%account, "Active account changed");
                        Self::connect(state, env, Some(account))
                    },
                }
            },

            // ═══════════════════════════════════════════════════════════════════
            // Loading
            // ═══════════════════════════════════════════════════════════════════
            BookingAction::Refresh => {
                if state.session.is_none() {
                    tracing::warn!("Refresh ignored: not connected");
                    return SmallVec::new();
                }
                smallvec![Self::load(state, env)]
            },

            BookingAction::EventsLoaded { generation, events } => {
                if generation != state.load_generation {
                    tracing::debug!(
                        generation,
                        latest = state.load_generation,
                        "Discarding stale event list"
                    );
                    return SmallVec::new();
                }
                tracing::debug!(generation, count = events.len(), "Event list loaded");
                state.events = events;
                state.loading = false;
                state.loaded_at = Some(env.clock.now());
                SmallVec::new()
            },

            BookingAction::LoadFailed { generation, error } => {
                if generation != state.load_generation {
                    tracing::debug!(generation, %error, "Discarding stale load failure");
                    return SmallVec::new();
                }
                // Previous list stays on screen
                tracing::error!(generation, %error, "Failed to load events");
                state.loading = false;
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════════
            // Reservation
            // ═══════════════════════════════════════════════════════════════════
            BookingAction::Reserve { event_id } => Self::reserve(state, event_id),

            BookingAction::ReservationConfirmed {
                event_id,
                confirmation,
            } => {
                tracing::info!(%event_id, tx_hash = %confirmation.tx_hash, "Reservation confirmed");
                state.pending_transaction = None;
                state.notice = Some(Notice::info(RESERVATION_SUCCESS));
                smallvec![Self::load(state, env)]
            },

            BookingAction::ReservationFailed { event_id, reason } => {
                tracing::warn!(%event_id, %reason, "Reservation failed");
                state.pending_transaction = None;
                state.notice = Some(Notice::error(format!("Erreur : {reason}")));
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════════
            // Creation
            // ═══════════════════════════════════════════════════════════════════
            BookingAction::DraftNameChanged { name } => {
                state.draft.name = name;
                SmallVec::new()
            },

            BookingAction::DraftCapacityChanged { capacity } => {
                state.draft.capacity = capacity;
                SmallVec::new()
            },

            BookingAction::SubmitDraft => Self::submit_draft(state),

            BookingAction::EventCreated { name, confirmation } => {
                tracing::info!(%name, tx_hash = %confirmation.tx_hash, "Event created");
                state.pending_transaction = None;
                state.draft.clear();
                state.notice = Some(Notice::info(format!("Événement « {name} » créé !")));
                smallvec![Self::load(state, env)]
            },

            BookingAction::CreateFailed { reason } => {
                tracing::warn!(%reason, "Event creation failed");
                state.pending_transaction = None;
                state.notice = Some(Notice::error(format!("Erreur : {reason}")));
                SmallVec::new()
            },

            // ═══════════════════════════════════════════════════════════════════
            // Notice
            // ═══════════════════════════════════════════════════════════════════
            BookingAction::DismissNotice => {
                state.notice = None;
                SmallVec::new()
            },
        }
    }
}
