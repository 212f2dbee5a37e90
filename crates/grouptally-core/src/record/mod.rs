//! Module: record
//! Responsibility: ordered field storage for input rows and explicit field presence.
//! Does not own: key projection or grouping equality.


use crate::{error::InternalError, value::Value};
use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use serde_json::{Map, Value as JsonValue};

///
/// FieldPresence
///
/// Explicit lookup outcome; a missing field is not an error.
///

#[derive(Clone, Copy, Debug)]
pub enum FieldPresence<'a> {
    Present(&'a Value),
    Missing,
}

impl<'a> FieldPresence<'a> {
    #[must_use]
    pub const fn value(self) -> Option<&'a Value> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing => None,
        }
    }
}

///
/// Record
///
/// One input row: an ordered mapping from field name to value.
/// Setting an existing field replaces its value in place.
///

#[derive(Clone, Debug, Default)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Look up one field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> FieldPresence<'_> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map_or(FieldPresence::Missing, |(_, value)| {
                FieldPresence::Present(value)
            })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.field(name).value()
    }

    /// Set one field, returning the replaced value if the name already existed.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let name = name.into();
        let value = value.into();

        if let Some((_, slot)) = self.fields.iter_mut().find(|(field, _)| *field == name) {
            return Some(std::mem::replace(slot, value));
        }

        self.fields.push((name, value));
        None
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Build a record from one JSON object.
    pub fn from_json(value: JsonValue) -> Result<Self, InternalError> {
        match value {
            JsonValue::Object(entries) => Ok(Self::from(entries)),
            other => Err(InternalError::input_unsupported(format!(
                "record must be a JSON object, found {}",
                json_kind(&other)
            ))),
        }
    }

    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        JsonValue::Object(
            self.fields
                .iter()
                .map(|(name, value)| (name.clone(), JsonValue::from(value)))
                .collect(),
        )
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Self::new();
        for (name, value) in iter {
            record.insert(name, value);
        }

        record
    }
}

impl From<Map<String, JsonValue>> for Record {
    fn from(entries: Map<String, JsonValue>) -> Self {
        Self {
            fields: entries
                .into_iter()
                .map(|(name, value)| (name, Value::from(value)))
                .collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Map::<String, JsonValue>::deserialize(deserializer).map(Self::from)
    }
}

pub(crate) const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
