//! Declarative macros for ergonomic effect construction
//!
//! Reducers in this workspace mostly return "call the wallet or contract, then
//! map the result to an action". These macros keep that boilerplate short.

/// Create an `Effect::Future` from an async block body
///
/// The body must evaluate to `Option<Action>`.
///
/// # Example
///
/// ```rust,ignore
/// use seatbook_core::async_effect;
///
/// async_effect! {
///     let count = contract.event_count().await.ok()?;
///     Some(BookingAction::CountRead { count })
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Future` that awaits a fallible call and maps both outcomes to actions
///
/// # Example
///
/// ```rust,ignore
/// use seatbook_core::call_effect;
///
/// call_effect! {
///     call: contract.reserve(event_id),
///     on_success: |receipt| BookingAction::ReservationConfirmed { event_id, receipt },
///     on_error: |error| BookingAction::ReservationFailed { event_id, reason: error.user_reason() }
/// }
/// ```
#[macro_export]
macro_rules! call_effect {
    (
        call: $call:expr,
        on_success: |$success_param:pat_param| $success_body:expr,
        on_error: |$error_param:pat_param| $error_body:expr
    ) => {
        $crate::effect::Effect::Future(::std::boxed::Box::pin(async move {
            match $call.await {
                Ok($success_param) => Some($success_body),
                Err($error_param) => Some($error_body),
            }
        }))
    };
}
