//! The booking page as a reducer: state, actions, environment and view

pub mod actions;
pub mod environment;
pub mod reducer;
pub mod state;
pub mod view;


pub use actions::BookingAction;
pub use environment::BookingEnvironment;
pub use reducer::BookingReducer;
pub use state::{BookingState, ConnectionPhase, PendingTransaction};
pub use view::{CreateForm, EventCard, PageView, ReserveButton};

/// Store running the booking page
pub type BookingStore =
    seatbook_runtime::Store<BookingState, BookingAction, BookingEnvironment, BookingReducer>;
