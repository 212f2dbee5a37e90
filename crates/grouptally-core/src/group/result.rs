use crate::{
    group::GroupSlot,
    project::KeyLayout,
    record::{FieldPresence, Record},
    value::Value,
};
use derive_more::{Deref, IntoIterator};
use serde::{Serialize, Serializer, ser::SerializeMap};
use serde_json::Value as JsonValue;

///
/// Group
///
/// One output row: the projected key fields plus the number of records that
/// mapped to them. Absent key fields are kept as `None` and omitted from the
/// serialized form.
///

#[derive(Clone, Debug)]
pub struct Group {
    fields: Vec<(String, Option<Value>)>,
    count: u64,
}

impl Group {
    pub(crate) fn from_slot(layout: &KeyLayout, slot: GroupSlot) -> Self {
        Self {
            fields: layout
                .names()
                .iter()
                .cloned()
                .zip(slot.key.into_slots())
                .collect(),
            count: slot.count,
        }
    }

    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Look up one key field of this group.
    #[must_use]
    pub fn field(&self, name: &str) -> FieldPresence<'_> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .and_then(|(_, value)| value.as_ref())
            .map_or(FieldPresence::Missing, FieldPresence::Present)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).value()
    }

    /// Key fields in output order, absent ones included.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&Value>)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_ref()))
    }

    /// Materialize this group as a record with the count under `count_field`.
    #[must_use]
    pub fn to_record(&self, count_field: &str) -> Record {
        let mut record = self
            .fields
            .iter()
            .filter_map(|(name, value)| value.clone().map(|value| (name.clone(), value)))
            .collect::<Record>();
        record.insert(count_field, self.count);

        record
    }
}

///
/// AggregationResult
///
/// Groups in first-seen order of their key tuple.
/// Immutable once produced; serializes as a sequence of flat objects.
///

#[derive(Clone, Debug, Deref, IntoIterator)]
pub struct AggregationResult {
    #[deref]
    #[into_iterator(owned, ref)]
    groups: Vec<Group>,
    count_field: String,
}

impl AggregationResult {
    pub(crate) fn new(layout: &KeyLayout, slots: Vec<GroupSlot>, count_field: String) -> Self {
        Self {
            groups: slots
                .into_iter()
                .map(|slot| Group::from_slot(layout, slot))
                .collect(),
            count_field,
        }
    }

    #[must_use]
    pub fn count_field(&self) -> &str {
        &self.count_field
    }

    /// Sum of all group counts; equals the number of input records.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.groups.iter().map(Group::count).sum()
    }

    #[must_use]
    pub fn into_groups(self) -> Vec<Group> {
        self.groups
    }

    #[must_use]
    pub fn to_records(&self) -> Vec<Record> {
        self.groups
            .iter()
            .map(|group| group.to_record(&self.count_field))
            .collect()
    }

    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Array(self.to_records().iter().map(Record::to_json).collect())
    }
}

///
/// Serde
///

struct GroupRow<'a> {
    group: &'a Group,
    count_field: &'a str,
}

impl Serialize for GroupRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present = self
            .group
            .fields
            .iter()
            .filter_map(|(name, value)| value.as_ref().map(|value| (name, value)));

        let mut map = serializer.serialize_map(None)?;
        for (name, value) in present {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry(self.count_field, &self.group.count)?;
        map.end()
    }
}

impl Serialize for AggregationResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.groups.iter().map(|group| GroupRow {
            group,
            count_field: &self.count_field,
        }))
    }
}
