//! Core runtime for grouptally: values, records, key specs, projection,
//! grouping engines, and the `aggregate` entrypoints.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod aggregate;
pub mod config;
pub mod error;
pub mod group;
pub mod key;
pub mod obs;
pub mod project;
pub mod record;
pub mod value;

pub use aggregate::{Aggregation, aggregate, aggregate_json};
pub use error::InternalError as Error;

///
/// Prelude
///
/// Prelude contains only domain vocabulary needed to call `aggregate`.
///

pub mod prelude {
    pub use crate::{
        aggregate::{aggregate, aggregate_json},
        config::{AggregateOptions, AggregateSettings, FieldMapper, GroupingStrategy, MapperError},
        group::{AggregationResult, Group},
        record::{FieldPresence, Record},
        value::Value,
    };
}
