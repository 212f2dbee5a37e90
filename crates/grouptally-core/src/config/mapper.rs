use crate::{record::Record, value::Value};
use std::{collections::BTreeMap, fmt};
use thiserror::Error as ThisError;

///
/// MapperError
///
/// Failure raised by a field mapper. Any mapper failure fails the whole
/// aggregation because group identity depends on every mapped value.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("{message}")]
pub struct MapperError {
    message: String,
}

impl MapperError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The mapper needed a field the record does not carry.
    #[must_use]
    pub fn missing_field(field: &str) -> Self {
        Self::new(format!("field '{field}' is missing"))
    }

    /// The mapper found a field of the wrong kind.
    #[must_use]
    pub fn unexpected_value(field: &str, expected: &str, found: &Value) -> Self {
        Self::new(format!("field '{field}' expected {expected}, found {found:?}"))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

///
/// FieldMapper
///
/// Derives one group field from a whole record, replacing the plain lookup
/// of the key's source field.
///

pub trait FieldMapper {
    fn apply(&self, record: &Record) -> Result<Value, MapperError>;
}

///
/// FnMapper
/// Adapter for infallible closures.
///

pub struct FnMapper<F>(F);

impl<F> FieldMapper for FnMapper<F>
where
    F: Fn(&Record) -> Value,
{
    fn apply(&self, record: &Record) -> Result<Value, MapperError> {
        Ok((self.0)(record))
    }
}

///
/// TryFnMapper
/// Adapter for fallible closures.
///

pub struct TryFnMapper<F>(F);

impl<F> FieldMapper for TryFnMapper<F>
where
    F: Fn(&Record) -> Result<Value, MapperError>,
{
    fn apply(&self, record: &Record) -> Result<Value, MapperError> {
        (self.0)(record)
    }
}

///
/// Mapping
///
/// Field mappers keyed by the output field name they produce.
/// Registering twice under one name keeps the later mapper.
///

#[derive(Default)]
pub struct Mapping {
    mappers: BTreeMap<String, Box<dyn FieldMapper>>,
}

impl Mapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapper value under `output`.
    pub fn insert(&mut self, output: impl Into<String>, mapper: impl FieldMapper + 'static) {
        self.mappers.insert(output.into(), Box::new(mapper));
    }

    /// Register an infallible closure under `output`.
    pub fn insert_fn<F>(&mut self, output: impl Into<String>, f: F)
    where
        F: Fn(&Record) -> Value + 'static,
    {
        self.insert(output, FnMapper(f));
    }

    /// Register a fallible closure under `output`.
    pub fn insert_try_fn<F>(&mut self, output: impl Into<String>, f: F)
    where
        F: Fn(&Record) -> Result<Value, MapperError> + 'static,
    {
        self.insert(output, TryFnMapper(f));
    }

    #[must_use]
    pub fn get(&self, output: &str) -> Option<&dyn FieldMapper> {
        self.mappers.get(output).map(Box::as_ref)
    }

    #[must_use]
    pub fn contains(&self, output: &str) -> bool {
        self.mappers.contains_key(output)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mappers.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
