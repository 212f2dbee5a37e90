//! Module: aggregate
//! Responsibility: one aggregation run from descriptors to ordered groups.
//! Does not own: descriptor grammar, projection rules, or matching engines.
//! Boundary: public entrypoints `aggregate` and `aggregate_json`.

use crate::{
    config::{AggregateConfig, AggregateOptions, GroupingStrategy},
    error::InternalError,
    group::{AggregationResult, Grouper, GroupingOutcome, HashedGrouper, LinearScanGrouper},
    key::{KeySpec, parse_key_specs},
    obs::sink::{MetricsEvent, Span, record},
    project::{KeyLayout, RowProjector},
    record::{Record, json_kind},
};
use log::{debug, warn};
use serde_json::Value as JsonValue;

///
/// Aggregation
///
/// One configured aggregation over a borrowed record slice.
/// Keys and configuration are fixed at construction; `run` consumes it.
///

#[derive(Debug)]
pub struct Aggregation<'a> {
    rows: &'a [Record],
    keys: Vec<KeySpec>,
    layout: KeyLayout,
    config: AggregateConfig,
}

impl<'a> Aggregation<'a> {
    /// Parse descriptors, check them, and resolve options.
    pub fn new<S: AsRef<str>>(
        rows: &'a [Record],
        descriptors: &[S],
        options: AggregateOptions,
    ) -> Result<Self, InternalError> {
        let keys = parse_key_specs(descriptors);
        check_descriptors(descriptors, &keys, options.settings.strict_keys)?;

        let config = AggregateConfig::resolve(options, &keys)?;
        let layout = KeyLayout::new(&keys);

        Ok(Self {
            rows,
            keys,
            layout,
            config,
        })
    }

    #[must_use]
    pub fn keys(&self) -> &[KeySpec] {
        &self.keys
    }

    #[must_use]
    pub const fn config(&self) -> &AggregateConfig {
        &self.config
    }

    /// Run the single grouping pass.
    pub fn run(self) -> Result<AggregationResult, InternalError> {
        let strategy = self.config.strategy();
        let span = Span::new(strategy, self.keys.len());
        debug!(
            "aggregating {} rows by [{}] using {strategy:?}",
            self.rows.len(),
            self.layout.names().join(", ")
        );

        let outcome = match strategy {
            GroupingStrategy::Hashed => self.group_with(HashedGrouper::new()),
            GroupingStrategy::LinearScan => self.group_with(LinearScanGrouper::new()),
        };

        match outcome {
            Ok(outcome) => {
                let rows = self.rows.len() as u64;
                let groups = outcome.groups.len() as u64;
                span.finish(rows, groups, outcome.hash_collisions);
                debug!(
                    "aggregated {rows} rows into {groups} groups ({} hash collisions)",
                    outcome.hash_collisions
                );

                let Self { layout, config, .. } = self;
                Ok(AggregationResult::new(
                    &layout,
                    outcome.groups,
                    config.count_field().to_string(),
                ))
            }
            Err(err) => {
                span.fail(err.class);
                Err(err)
            }
        }
    }

    fn group_with<G: Grouper>(&self, mut grouper: G) -> Result<GroupingOutcome, InternalError> {
        let projector = RowProjector::new(&self.keys, &self.layout, self.config.mapping());

        for (row, record) in self.rows.iter().enumerate() {
            grouper.observe(projector.project(row, record)?);
        }

        Ok(grouper.finish())
    }
}

// Malformed descriptors are logged and counted; strict mode rejects them.
fn check_descriptors<S: AsRef<str>>(
    descriptors: &[S],
    keys: &[KeySpec],
    strict: bool,
) -> Result<(), InternalError> {
    for (descriptor, key) in descriptors.iter().zip(keys) {
        let Err(err) = key.validate(descriptor.as_ref()) else {
            continue;
        };

        record(MetricsEvent::MalformedKey);
        if strict {
            return Err(err.into());
        }
        warn!("{err}; grouping on it anyway");
    }

    Ok(())
}

/// Group `rows` by the key descriptors and count each group.
///
/// Groups come back in first-seen order. Empty `keys` yield a single group
/// holding the total count; empty `rows` yield no groups.
pub fn aggregate<S: AsRef<str>>(
    rows: &[Record],
    keys: &[S],
    options: AggregateOptions,
) -> Result<AggregationResult, InternalError> {
    Aggregation::new(rows, keys, options)?.run()
}

/// JSON-in, JSON-out variant of [`aggregate`].
///
/// `rows` must be an array of objects; absent key fields are omitted from
/// the output objects.
pub fn aggregate_json<S: AsRef<str>>(
    rows: &JsonValue,
    keys: &[S],
    options: AggregateOptions,
) -> Result<JsonValue, InternalError> {
    let JsonValue::Array(items) = rows else {
        return Err(InternalError::input_unsupported(format!(
            "rows must be a JSON array, found {}",
            json_kind(rows)
        )));
    };

    let records = items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::Object(entries) => Ok(Record::from(entries.clone())),
            other => Err(InternalError::input_unsupported(format!(
                "row {index} must be a JSON object, found {}",
                json_kind(other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    aggregate(&records, keys, options).map(|result| result.to_json())
}

///
/// TESTS
///
