use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// EventState
/// Ephemeral, in-memory counters for aggregation runs on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Entrypoints
    pub aggregations: u64,
    pub aggregation_failures: u64,

    // Engine selection
    pub hashed_runs: u64,
    pub linear_scan_runs: u64,

    // Rows and groups
    pub rows_scanned: u64,
    pub groups_emitted: u64,
    pub hash_collisions: u64,

    // Input quality
    pub malformed_keys: u64,
    pub mapper_failures: u64,
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

pub type EventReport = EventOps;

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics immutably.
pub(crate) fn with_state<R>(f: impl FnOnce(&EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&m.borrow()))
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Snapshot the counters.
pub(crate) fn report() -> EventReport {
    with_state(|m| m.ops.clone())
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}
