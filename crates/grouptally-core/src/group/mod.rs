//! Module: group
//! Responsibility: matching projected tuples against seen groups and counting.
//! Does not own: key projection or mapper invocation.
//! Boundary: single pass, INIT -> SCANNING -> DONE; `finish` consumes the engine.

mod hash;
mod hashed;
mod linear;
mod result;


use crate::project::ProjectedKey;

// re-exports
pub use hashed::HashedGrouper;
pub use linear::LinearScanGrouper;
pub use result::{AggregationResult, Group};

///
/// GroupSlot
///
/// One accumulating group: its tuple and how many records matched it.
///

#[derive(Clone, Debug)]
pub struct GroupSlot {
    pub key: ProjectedKey,
    pub count: u64,
}

impl GroupSlot {
    const fn open(key: ProjectedKey) -> Self {
        Self { key, count: 1 }
    }
}

///
/// GroupingOutcome
///
/// Groups in first-seen order plus engine counters for observability.
///

#[derive(Debug, Default)]
pub struct GroupingOutcome {
    pub groups: Vec<GroupSlot>,
    pub hash_collisions: u64,
}

///
/// Grouper
///
/// One grouping engine. Implementations must emit groups in first-seen order
/// and give each tuple to the first existing group it strictly matches.
///

pub trait Grouper {
    /// Count one projected tuple.
    fn observe(&mut self, key: ProjectedKey);

    /// Number of distinct groups seen so far.
    fn group_count(&self) -> usize;

    /// End the pass and hand back the groups.
    fn finish(self) -> GroupingOutcome;
}

/// Run one grouper over an already projected tuple sequence.
pub fn group_keys<G, I>(mut grouper: G, keys: I) -> GroupingOutcome
where
    G: Grouper,
    I: IntoIterator<Item = ProjectedKey>,
{
    for key in keys {
        grouper.observe(key);
    }

    grouper.finish()
}
