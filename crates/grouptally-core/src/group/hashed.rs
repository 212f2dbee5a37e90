use crate::{
    group::{
        GroupSlot, Grouper, GroupingOutcome,
        hash::{StableHash, stable_hash_key},
    },
    project::ProjectedKey,
};
use std::collections::HashMap;

///
/// HashedGrouper
///
/// Buckets group positions by stable tuple hash while keeping groups in an
/// insertion-ordered list. Equality is re-checked inside each bucket, so a
/// hash collision never merges distinct groups.
///

#[derive(Debug, Default)]
pub struct HashedGrouper {
    groups: Vec<GroupSlot>,
    buckets: HashMap<StableHash, Vec<usize>>,
    hash_collisions: u64,
}

impl HashedGrouper {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Grouper for HashedGrouper {
    fn observe(&mut self, key: ProjectedKey) {
        // unhashable tuples match nothing, not even their own group
        let Some(hash) = stable_hash_key(&key) else {
            self.groups.push(GroupSlot::open(key));
            return;
        };

        let bucket = self.buckets.entry(hash).or_default();

        // positions are ascending, so the first hit is the first-seen match
        if let Some(&position) = bucket
            .iter()
            .find(|&&position| key.matches(&self.groups[position].key))
        {
            self.groups[position].count += 1;
            return;
        }

        if !bucket.is_empty() {
            self.hash_collisions += 1;
        }

        bucket.push(self.groups.len());
        self.groups.push(GroupSlot::open(key));
    }

    fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn finish(self) -> GroupingOutcome {
        GroupingOutcome {
            groups: self.groups,
            hash_collisions: self.hash_collisions,
        }
    }
}
