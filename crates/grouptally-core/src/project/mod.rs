//! Module: project
//! Responsibility: per-record projection of grouping keys into positional tuples.
//! Does not own: group matching, hashing, or counting.
//! Boundary: pure function of (record, key specs, mapping).


use crate::{
    config::Mapping,
    error::InternalError,
    key::KeySpec,
    record::{FieldPresence, Record},
    value::Value,
};

///
/// KeyLayout
///
/// Output field names of one aggregation in first-declared order, plus the
/// slot each key spec writes into. Keys sharing an output name share a slot,
/// so the later key overwrites the earlier value in the earlier position.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KeyLayout {
    names: Vec<String>,
    slots: Vec<usize>,
}

impl KeyLayout {
    #[must_use]
    pub fn new(keys: &[KeySpec]) -> Self {
        let mut names: Vec<String> = Vec::with_capacity(keys.len());
        let mut slots = Vec::with_capacity(keys.len());

        for key in keys {
            let slot = match names.iter().position(|name| *name == key.output) {
                Some(slot) => slot,
                None => {
                    names.push(key.output.clone());
                    names.len() - 1
                }
            };
            slots.push(slot);
        }

        Self { names, slots }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.names.len()
    }
}

///
/// ProjectedKey
///
/// One record's grouping tuple, positional over a [`KeyLayout`].
/// `None` marks an absent slot (field missing from the record).
///

#[derive(Clone, Debug)]
pub struct ProjectedKey(Vec<Option<Value>>);

impl ProjectedKey {
    #[must_use]
    pub const fn new(slots: Vec<Option<Value>>) -> Self {
        Self(slots)
    }

    #[must_use]
    pub fn slots(&self) -> &[Option<Value>] {
        &self.0
    }

    #[must_use]
    pub fn into_slots(self) -> Vec<Option<Value>> {
        self.0
    }

    /// Field-wise strict equality; absent only matches absent.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(left, right)| slot_eq(left.as_ref(), right.as_ref()))
    }

    /// Whether this tuple can ever match another tuple.
    #[must_use]
    pub fn is_self_matching(&self) -> bool {
        self.0.iter().flatten().all(Value::is_self_matching)
    }
}

fn slot_eq(left: Option<&Value>, right: Option<&Value>) -> bool {
    match (left, right) {
        (None, None) => true,
        (Some(left), Some(right)) => left.strict_eq(right),
        _ => false,
    }
}

///
/// RowProjector
///
/// Reads or derives every grouping field of one record.
///

pub struct RowProjector<'a> {
    keys: &'a [KeySpec],
    layout: &'a KeyLayout,
    mapping: &'a Mapping,
}

impl<'a> RowProjector<'a> {
    #[must_use]
    pub const fn new(keys: &'a [KeySpec], layout: &'a KeyLayout, mapping: &'a Mapping) -> Self {
        Self {
            keys,
            layout,
            mapping,
        }
    }

    /// Project one record; `row` only labels mapper failures.
    pub fn project(&self, row: usize, record: &Record) -> Result<ProjectedKey, InternalError> {
        let mut slots = vec![None; self.layout.width()];

        for (key, &slot) in self.keys.iter().zip(&self.layout.slots) {
            slots[slot] = match self.mapping.get(&key.output) {
                Some(mapper) => Some(
                    mapper
                        .apply(record)
                        .map_err(|err| InternalError::mapper_failed(row, &key.output, err))?,
                ),
                None => match record.field(&key.source) {
                    FieldPresence::Present(value) => Some(value.clone()),
                    FieldPresence::Missing => None,
                },
            };
        }

        Ok(ProjectedKey(slots))
    }
}
