//! # Seatbook
//!
//! Client for the `EventBooking` contract: list events with their remaining
//! seats, reserve one seat per event, and let the contract owner create
//! events.
//!
//! The contract holds every rule and all state. This crate binds a wallet
//! account to it, reads the event list, submits transactions and reloads the
//! list after each confirmed one. The page is a reducer driven by a
//! [`seatbook_runtime::Store`]:
//!
//! - [`session`]: wallet account → contract handle + owner
//! - [`loader`]: `eventCount` then `events(i)` / `reservations(user, i)`
//! - [`app`]: state, actions, reducer, and the [`app::PageView`] rendered to
//!   the terminal
//!
//! ## Example
//!
//! ```no_run
//! use seatbook::app::{BookingAction, BookingReducer, BookingState, BookingStore, PageView};
//! use seatbook::{bootstrap, config::Config};
//!
//! # async fn demo() -> anyhow::Result<()> {
//! let environment = bootstrap::environment(&Config::from_env())?;
//! let store = BookingStore::new(BookingState::new(), BookingReducer::new(), environment);
//!
//! store.send(BookingAction::Connect).await;
//! store.settle().await;
//! println!("{}", store.state(PageView::from_state).await);
//! # Ok(())
//! # }
//! ```

pub mod app;
pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod contract;
pub mod loader;
pub mod session;
pub mod types;
pub mod wallet;

pub use app::{BookingAction, BookingEnvironment, BookingReducer, BookingState, BookingStore};
pub use config::Config;
pub use contract::{BookingContract, ContractError, ContractHandle};
pub use session::Session;
pub use types::{DraftEvent, EventId, EventRecord, Notice, NoticeLevel, SeatAvailability};
pub use wallet::{WalletError, WalletProvider};
