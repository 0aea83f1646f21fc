//! Metric names recorded by the Store.
//!
//! The runtime only records; installing a recorder or exporter is up to the
//! binary. Without one, every call is a no-op.

use ::metrics::{Unit, describe_counter, describe_histogram};

/// Counter: actions reduced (sent by callers or fed back by effects)
pub const ACTIONS_TOTAL: &str = "store.actions.total";

/// Histogram: time spent inside `Reducer::reduce`, in seconds
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Counter: effects spawned, labelled by `type`
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Register descriptions for every Store metric with the installed recorder.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(ACTIONS_TOTAL, Unit::Count, "Actions processed by the reducer");
    describe_histogram!(
        REDUCER_DURATION,
        Unit::Seconds,
        "Time spent in a single reducer call"
    );
    describe_counter!(
        EFFECTS_EXECUTED,
        Unit::Count,
        "Effects spawned by the store, by effect type"
    );
}
