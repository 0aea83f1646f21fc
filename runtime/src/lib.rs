//! # Seatbook Runtime
//!
//! The Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: owns the state, runs the reducer, executes effects
//! - **Feedback loop**: a single task that feeds actions produced by effects
//!   back into the reducer, one at a time
//! - **In-flight tracking**: counts running effects and undelivered actions so
//!   callers can wait until the store is quiescent
//!
//! ## Example
//!
//! ```ignore
//! use seatbook_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//!
//! store.send(Action::Connect).await;
//! store.settle().await;
//!
//! let connected = store.state(|s| s.session.is_some()).await;
//! ```

use seatbook_core::{effect::Effect, reducer::Reducer};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::{Notify, RwLock, mpsc};

/// Metric names and descriptions recorded by the Store
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Timeout waiting for the store to settle
        #[error("Timeout waiting for the store")]
        Timeout,
    }
}

pub use error::StoreError;
pub use store::Store;

/// Counts effects that are running and actions that are queued for the reducer.
///
/// The count only reaches zero when nothing can produce another action.
#[derive(Debug, Default)]
struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    fn begin(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    fn end(&self) {
        if self.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.idle.notify_waiters();
        }
    }

    fn pending(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    async fn wait_idle(&self) {
        loop {
            // Register before checking so a concurrent `end` cannot be missed
            let notified = self.idle.notified();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// RAII guard that ends one unit of in-flight work on drop, even if the effect panics.
struct InFlightGuard(Arc<InFlight>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.end();
    }
}

/// Where effects deliver the actions they produce.
struct Feedback<A> {
    sender: mpsc::UnboundedSender<A>,
    in_flight: Arc<InFlight>,
}

impl<A> Clone for Feedback<A> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<A> Feedback<A> {
    /// Queue an action for the reducer.
    ///
    /// The action counts as in-flight until the feedback loop has reduced it.
    fn forward(&self, action: A) {
        self.in_flight.begin();
        if self.sender.send(action).is_err() {
            tracing::debug!("Store dropped, discarding action produced by effect");
            self.in_flight.end();
        }
    }
}

/// Execute an effect to completion, forwarding the action it produces.
async fn drive<A>(effect: Effect<A>, feedback: Feedback<A>) {
    match effect {
        Effect::None => {},
        Effect::Future(fut) => {
            if let Some(action) = fut.await {
                tracing::trace!("Effect::Future produced an action");
                feedback.forward(action);
            } else {
                tracing::trace!("Effect::Future completed with no action");
            }
        },
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{
        Arc, Duration, Effect, Feedback, InFlight, InFlightGuard, Instant, Reducer, RwLock,
        StoreError, Weak, drive, mpsc,
    };

    struct Inner<S, A, E, R> {
        state: RwLock<S>,
        reducer: R,
        environment: E,
        feedback: Feedback<A>,
    }

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind a `RwLock`; the reducer is the only writer)
    /// 2. Reducer (client logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution, with produced actions fed back through one loop
    ///
    /// Reducer calls never overlap. Actions sent by callers and actions
    /// produced by effects are reduced one at a time, in the order they
    /// acquire the state lock.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        inner: Arc<Inner<S, A, E, R>>,
    }

    impl<S, A, E, R> Clone for Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        fn clone(&self) -> Self {
            Self {
                inner: Arc::clone(&self.inner),
            }
        }
    }

    impl<S, A, E, R> Inner<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        async fn dispatch(&self, action: A) {
            metrics::counter!(crate::metrics::ACTIONS_TOTAL).increment(1);

            let effects = {
                let mut state = self.state.write().await;
                let start = Instant::now();
                let effects = self.reducer.reduce(&mut *state, action, &self.environment);
                metrics::histogram!(crate::metrics::REDUCER_DURATION)
                    .record(start.elapsed().as_secs_f64());
                effects
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.spawn_effect(effect);
            }
        }

        fn spawn_effect(&self, effect: Effect<A>) {
            if effect.is_noop() {
                return;
            }

            metrics::counter!(crate::metrics::EFFECTS_EXECUTED, "type" => effect.kind())
                .increment(1);

            let feedback = self.feedback.clone();
            feedback.in_flight.begin();
            let guard = InFlightGuard(Arc::clone(&feedback.in_flight));

            tokio::spawn(async move {
                let _guard = guard;
                drive(effect, feedback).await;
            });
        }
    }

    async fn feedback_loop<S, A, E, R>(
        inner: Weak<Inner<S, A, E, R>>,
        mut receiver: mpsc::UnboundedReceiver<A>,
    ) where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        while let Some(action) = receiver.recv().await {
            let Some(inner) = inner.upgrade() else {
                break;
            };

            inner.dispatch(action).await;
            inner.feedback.in_flight.end();
        }
        tracing::trace!("Store feedback loop stopped");
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
        A: Send + 'static,
        S: Send + Sync + 'static,
        E: Send + Sync + 'static,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// Spawns the feedback loop, so this must be called from within a
        /// Tokio runtime. The loop stops once the last clone of the store is
        /// dropped.
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            let (sender, receiver) = mpsc::unbounded_channel();

            let inner = Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
                feedback: Feedback {
                    sender,
                    in_flight: Arc::new(InFlight::default()),
                },
            });

            tokio::spawn(feedback_loop(Arc::downgrade(&inner), receiver));

            Self { inner }
        }

        /// Send an action to the store
        ///
        /// The reducer has run when this returns. Effects it produced are
        /// running in the background; use [`Store::settle`] to wait for them
        /// and for every action they feed back.
        #[tracing::instrument(skip_all, name = "store_send")]
        pub async fn send(&self, action: A) {
            tracing::debug!("Processing action");
            self.inner.dispatch(action).await;
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let count = store.state(|s| s.events.len()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let state = self.inner.state.read().await;
            f(&*state)
        }

        /// Wait until no effect is running and every produced action is reduced
        pub async fn settle(&self) {
            self.inner.feedback.in_flight.wait_idle().await;
        }

        /// [`Store::settle`] bounded by a timeout
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Timeout`] if work is still in flight when the
        /// timeout expires.
        pub async fn settle_with_timeout(&self, timeout: Duration) -> Result<(), StoreError> {
            tokio::time::timeout(timeout, self.settle())
                .await
                .map_err(|_| StoreError::Timeout)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use seatbook_core::{SmallVec, smallvec};

    #[derive(Debug, Clone)]
    struct TestState {
        value: i32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Increment,
        Decrement,
        NoOp,
        ProduceEffect,
        ProduceManyEffects,
        ProduceSlowEffect,
        ProduceChain { remaining: u32 },
        ProducePanickingEffect,
    }

    #[derive(Debug, Clone)]
    struct TestEnv;

    #[derive(Debug, Clone)]
    struct TestReducer;

    fn increment_later(millis: u64) -> Effect<TestAction> {
        Effect::Future(Box::pin(async move {
            tokio::time::sleep(Duration::from_millis(millis)).await;
            Some(TestAction::Increment)
        }))
    }

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> SmallVec<[Effect<Self::Action>; 4]> {
            match action {
                TestAction::Increment => {
                    state.value += 1;
                    smallvec![Effect::None]
                },
                TestAction::Decrement => {
                    state.value -= 1;
                    smallvec![Effect::None]
                },
                TestAction::NoOp => smallvec![Effect::None],
                TestAction::ProduceEffect => {
                    smallvec![Effect::Future(Box::pin(async { Some(TestAction::Increment) }))]
                },
                TestAction::ProduceManyEffects => smallvec![
                    increment_later(3),
                    increment_later(1),
                    Effect::None,
                    increment_later(2),
                ],
                TestAction::ProduceSlowEffect => smallvec![increment_later(500)],
                TestAction::ProduceChain { remaining } => {
                    state.value += 1;
                    if remaining == 0 {
                        return SmallVec::new();
                    }
                    smallvec![Effect::Future(Box::pin(async move {
                        tokio::time::sleep(Duration::from_millis(2)).await;
                        Some(TestAction::ProduceChain {
                            remaining: remaining - 1,
                        })
                    }))]
                },
                TestAction::ProducePanickingEffect => {
                    let explode = true;
                    smallvec![Effect::Future(Box::pin(async move {
                        if explode {
                            panic!("Intentional panic in effect for testing");
                        }
                        Some(TestAction::NoOp)
                    }))]
                },
            }
        }
    }

    fn store() -> Store<TestState, TestAction, TestEnv, TestReducer> {
        Store::new(TestState { value: 0 }, TestReducer, TestEnv)
    }

    #[tokio::test]
    async fn test_store_creation() {
        let store = store();
        assert_eq!(store.state(|s| s.value).await, 0);
        assert!(store.settle_with_timeout(Duration::ZERO).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_reduces_before_returning() {
        let store = store();

        store.send(TestAction::Increment).await;
        store.send(TestAction::Increment).await;
        store.send(TestAction::Decrement).await;

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_effect_none_leaves_nothing_in_flight() {
        let store = store();

        store.send(TestAction::NoOp).await;

        assert!(store.settle_with_timeout(Duration::ZERO).await.is_ok());
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_future_effect_feeds_back() {
        let store = store();

        store.send(TestAction::ProduceEffect).await;
        store
            .settle_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(store.state(|s| s.value).await, 1);
    }

    #[tokio::test]
    async fn test_every_returned_effect_runs() {
        let store = store();

        store.send(TestAction::ProduceManyEffects).await;
        store
            .settle_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(store.state(|s| s.value).await, 3);
    }

    #[tokio::test]
    async fn test_settle_waits_for_cascading_actions() {
        let store = store();

        store.send(TestAction::ProduceChain { remaining: 5 }).await;
        store
            .settle_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(store.state(|s| s.value).await, 6);
    }

    #[tokio::test]
    async fn test_settle_times_out_while_effect_runs() {
        let store = store();

        store.send(TestAction::ProduceSlowEffect).await;
        let result = store.settle_with_timeout(Duration::from_millis(10)).await;

        assert_eq!(result, Err(StoreError::Timeout));
        assert_eq!(store.state(|s| s.value).await, 0);
    }

    #[tokio::test]
    async fn test_panicking_effect_does_not_wedge_store() {
        let store = store();

        store.send(TestAction::ProducePanickingEffect).await;
        store
            .settle_with_timeout(Duration::from_secs(1))
            .await
            .unwrap();

        store.send(TestAction::Increment).await;
        assert_eq!(store.state(|s| s.value).await, 1);
    }
}
