//! Domain types for the booking client
//!
//! Events are read from the contract on every load and never edited locally.
//! Everything the page shows about an event is derived from [`EventRecord`].

use crate::contract::{ContractError, RawEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Index of an event in the contract's `events` array
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Wrap a contract index
    #[must_use]
    pub const fn new(index: u64) -> Self {
        Self(index)
    }

    /// The contract index
    #[must_use]
    pub const fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EventId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}

/// An event as seen by the connected account
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Contract index
    pub id: EventId,
    /// Display name
    pub name: String,
    /// Total seats
    pub capacity: u64,
    /// Seats already taken
    pub registered: u64,
    /// Whether the connected account holds a seat
    pub reserved_by_current_user: bool,
}

impl EventRecord {
    /// Convert a raw contract tuple into a record.
    ///
    /// # Errors
    ///
    /// Returns [`ContractError::Decode`] if capacity or registered count does
    /// not fit in a `u64`.
    pub fn try_from_raw(
        id: EventId,
        raw: RawEvent,
        reserved_by_current_user: bool,
    ) -> Result<Self, ContractError> {
        let capacity = u64::try_from(raw.capacity).map_err(|_| ContractError::Decode {
            field: "capacity",
            value: raw.capacity,
        })?;
        let registered = u64::try_from(raw.registered).map_err(|_| ContractError::Decode {
            field: "registered",
            value: raw.registered,
        })?;

        Ok(Self {
            id,
            name: raw.name,
            capacity,
            registered,
            reserved_by_current_user,
        })
    }

    /// Seats still available. Never underflows, even if the contract reports
    /// more registrations than capacity.
    #[must_use]
    pub const fn remaining_seats(&self) -> u64 {
        self.capacity.saturating_sub(self.registered)
    }

    /// No seat left
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.registered >= self.capacity
    }

    /// What the reserve button should offer for this event
    #[must_use]
    pub const fn availability(&self) -> SeatAvailability {
        if self.reserved_by_current_user {
            SeatAvailability::AlreadyReserved
        } else if self.is_full() {
            SeatAvailability::Full
        } else {
            SeatAvailability::Available
        }
    }
}

/// Reservation state of an event for the connected account
///
/// A reservation already held takes precedence over a full event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatAvailability {
    /// The account already holds a seat
    AlreadyReserved,
    /// No seat left
    Full,
    /// A seat can be reserved
    Available,
}

impl SeatAvailability {
    /// Reserve button label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlreadyReserved => "Déjà réservé",
            Self::Full => "Complet",
            Self::Available => "Réserver",
        }
    }

    /// Whether a reservation may be submitted
    #[must_use]
    pub const fn can_reserve(self) -> bool {
        matches!(self, Self::Available)
    }
}

/// Event creation form contents, as typed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    /// Event name
    pub name: String,
    /// Capacity, not yet parsed
    pub capacity: String,
}

/// A validated creation request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEvent {
    /// Event name, trimmed
    pub name: String,
    /// Total seats
    pub capacity: u64,
}

/// Why a draft cannot be submitted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DraftError {
    /// Name or capacity left empty
    #[error("Veuillez remplir tous les champs.")]
    MissingFields,

    /// Capacity is not an unsigned integer
    #[error("Capacité invalide : {value}")]
    InvalidCapacity {
        /// What was typed
        value: String,
    },
}

impl DraftEvent {
    /// Check both fields and parse the capacity.
    ///
    /// Whitespace-only fields count as empty.
    ///
    /// # Errors
    ///
    /// [`DraftError::MissingFields`] if a field is empty,
    /// [`DraftError::InvalidCapacity`] if the capacity is not a `u64`.
    pub fn validate(&self) -> Result<NewEvent, DraftError> {
        let name = self.name.trim();
        let capacity = self.capacity.trim();
        if name.is_empty() || capacity.is_empty() {
            return Err(DraftError::MissingFields);
        }

        let capacity = capacity
            .parse::<u64>()
            .map_err(|_| DraftError::InvalidCapacity {
                value: capacity.to_string(),
            })?;

        Ok(NewEvent {
            name: name.to_string(),
            capacity,
        })
    }

    /// Reset both fields
    pub fn clear(&mut self) {
        self.name.clear();
        self.capacity.clear();
    }
}

/// Severity of a notice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    /// Confirmation
    Info,
    /// Something went wrong
    Error,
}

/// Modal message shown to the user until dismissed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Severity
    pub level: NoticeLevel,
    /// Text shown
    pub message: String,
}

impl Notice {
    /// Informational notice
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    /// Error notice
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
