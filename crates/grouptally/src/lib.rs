//! ## Crate layout
//! - `core`: values, records, key specs, projection, grouping engines,
//!   errors, and observability.
//!
//! The `prelude` module carries everything needed to call [`aggregate`].
//!
//! ```ignore
//! use grouptally::prelude::*;
//!
//! let groups = aggregate(&rows, &["foo", "bar as b"], AggregateOptions::new())?;
//! ```

pub use grouptally_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{Error, aggregate, aggregate_json};

///
/// Prelude
/// Everything needed to build options, call `aggregate`, and read groups.
///

pub mod prelude {
    pub use crate::core::{
        aggregate, aggregate_json,
        config::{
            AggregateOptions, AggregateSettings, FieldMapper, GroupingStrategy, MapperError,
        },
        group::{AggregationResult, Group},
        record::{FieldPresence, Record},
        value::Value,
    };
    pub use serde::{Deserialize, Serialize};
}
