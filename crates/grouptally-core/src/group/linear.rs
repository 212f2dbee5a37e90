use crate::{
    group::{GroupSlot, Grouper, GroupingOutcome},
    project::ProjectedKey,
};

///
/// LinearScanGrouper
///
/// Reference engine: scans every seen group in first-seen order for each
/// tuple, O(n·m) over n records and m groups.
///

#[derive(Debug, Default)]
pub struct LinearScanGrouper {
    groups: Vec<GroupSlot>,
}

impl LinearScanGrouper {
    #[must_use]
    pub const fn new() -> Self {
        Self { groups: Vec::new() }
    }
}

impl Grouper for LinearScanGrouper {
    fn observe(&mut self, key: ProjectedKey) {
        match self.groups.iter_mut().find(|group| key.matches(&group.key)) {
            Some(group) => group.count += 1,
            None => self.groups.push(GroupSlot::open(key)),
        }
    }

    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn finish(self) -> GroupingOutcome {
        GroupingOutcome {
            groups: self.groups,
            hash_collisions: 0,
        }
    }
}
