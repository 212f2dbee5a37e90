//! Module: config
//! Responsibility: caller options, serde-loadable settings, and resolution into
//! one fixed per-run configuration.
//! Does not own: mapper invocation or grouping execution.

mod mapper;


use crate::{error::InternalError, key::KeySpec, record::Record, value::Value};
use log::debug;
use serde::{Deserialize, Serialize};

// re-exports
pub use mapper::{FieldMapper, FnMapper, MapperError, Mapping, TryFnMapper};

/// Count field name used when none (or an empty one) is supplied.
pub const DEFAULT_COUNT_FIELD: &str = "count";

///
/// GroupingStrategy
///
/// Group matching engine. Both produce identical output; `LinearScan` is the
/// O(n·m) reference and `Hashed` the default.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingStrategy {
    #[default]
    Hashed,
    LinearScan,
}

///
/// AggregateSettings
///
/// Plain-data part of the options; can be loaded from JSON next to the data.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct AggregateSettings {
    pub count_field: Option<String>,
    pub strategy: GroupingStrategy,
    /// Reject malformed key descriptors instead of logging them.
    pub strict_keys: bool,
}

///
/// AggregateOptions
///
/// Caller-supplied options; anything left unset resolves to its default.
///

#[derive(Debug, Default)]
pub struct AggregateOptions {
    pub map: Mapping,
    pub settings: AggregateSettings,
}

impl AggregateOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_settings(mut self, settings: AggregateSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn map_fn<F>(mut self, output: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Value + 'static,
    {
        self.map.insert_fn(output, f);
        self
    }

    #[must_use]
    pub fn try_map_fn<F>(mut self, output: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<Value, MapperError> + 'static,
    {
        self.map.insert_try_fn(output, f);
        self
    }

    #[must_use]
    pub fn mapper(mut self, output: impl Into<String>, mapper: impl FieldMapper + 'static) -> Self {
        self.map.insert(output, mapper);
        self
    }

    #[must_use]
    pub fn count_field(mut self, name: impl Into<String>) -> Self {
        self.settings.count_field = Some(name.into());
        self
    }

    #[must_use]
    pub const fn strategy(mut self, strategy: GroupingStrategy) -> Self {
        self.settings.strategy = strategy;
        self
    }

    #[must_use]
    pub const fn strict_keys(mut self, strict: bool) -> Self {
        self.settings.strict_keys = strict;
        self
    }
}

///
/// AggregateConfig
///
/// Resolved configuration, fixed for one aggregation run.
///

#[derive(Debug)]
pub struct AggregateConfig {
    mapping: Mapping,
    count_field: String,
    strategy: GroupingStrategy,
    strict_keys: bool,
}

impl AggregateConfig {
    /// Merge options with defaults and check them against the parsed keys.
    pub fn resolve(options: AggregateOptions, keys: &[KeySpec]) -> Result<Self, InternalError> {
        let AggregateOptions { map, settings } = options;
        let count_field = settings
            .count_field
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_COUNT_FIELD.to_string());

        if let Some(key) = keys.iter().find(|key| key.output == count_field) {
            return Err(InternalError::config_conflict(format!(
                "count field '{count_field}' collides with grouping key '{}'",
                key.source
            )));
        }

        for name in map.names() {
            if !keys.iter().any(|key| key.output == name) {
                debug!("mapper '{name}' matches no grouping key output and is ignored");
            }
        }

        Ok(Self {
            mapping: map,
            count_field,
            strategy: settings.strategy,
            strict_keys: settings.strict_keys,
        })
    }

    #[must_use]
    pub const fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    #[must_use]
    pub fn count_field(&self) -> &str {
        &self.count_field
    }

    #[must_use]
    pub const fn strategy(&self) -> GroupingStrategy {
        self.strategy
    }

    #[must_use]
    pub const fn strict_keys(&self) -> bool {
        self.strict_keys
    }
}
