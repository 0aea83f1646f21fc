//! # Seatbook Testing
//!
//! Testing utilities for reducers built on `seatbook-core`.
//!
//! This crate provides:
//! - [`ReducerTest`]: Given-When-Then harness for a single reducer call
//! - [`assertions`]: effect assertions
//! - [`effects::collect_actions`]: run returned effects in-line and collect the actions they produce
//! - [`FixedClock`]: deterministic time
//!
//! ## Example
//!
//! ```ignore
//! use seatbook_testing::{ReducerTest, assertions};
//!
//! ReducerTest::new(BookingReducer::new())
//!     .with_env(test_environment())
//!     .given_state(connected_state())
//!     .when_action(BookingAction::SubmitDraft)
//!     .then_state(|state| assert!(state.notice.is_some()))
//!     .then_effects(assertions::assert_no_effects)
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use seatbook_core::environment::Clock;

/// Fluent reducer testing
pub mod reducer_test;

/// Mock implementations of core environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use seatbook_testing::mocks::FixedClock;
    /// use seatbook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::UNIX_EPOCH + chrono::Duration::days(20_089))
    }
}

/// Running effects without a Store
pub mod effects {
    use seatbook_core::effect::Effect;

    /// Execute effects in-line and collect every action they produce
    ///
    /// Futures are awaited in order. Produced actions are returned, not
    /// reduced.
    pub async fn collect_actions<A, I>(effects: I) -> Vec<A>
    where
        I: IntoIterator<Item = Effect<A>>,
    {
        let mut actions = Vec::new();

        for effect in effects {
            match effect {
                Effect::None => {},
                Effect::Future(fut) => {
                    if let Some(action) = fut.await {
                        actions.push(action);
                    }
                },
            }
        }

        actions
    }
}

pub use mocks::{FixedClock, test_clock};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;
    use seatbook_core::effect::Effect;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[tokio::test]
    async fn test_collect_actions_keeps_order() {
        let effects: Vec<Effect<i32>> = vec![
            Effect::Future(Box::pin(async { Some(1) })),
            Effect::None,
            Effect::Future(Box::pin(async { None::<i32> })),
            Effect::Future(Box::pin(async { Some(4) })),
        ];

        assert_eq!(effects::collect_actions(effects).await, vec![1, 4]);
    }
}
