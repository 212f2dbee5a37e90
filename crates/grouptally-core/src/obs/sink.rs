//! Metrics sink boundary.
//!
//! Aggregation logic MUST NOT touch obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.

use crate::{config::GroupingStrategy, error::ErrorClass, obs::metrics};
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    AggregateStart {
        strategy: GroupingStrategy,
        keys: usize,
    },
    AggregateFinish {
        rows: u64,
        groups: u64,
        hash_collisions: u64,
    },
    /// `class` is `None` when the run unwound instead of returning an error.
    AggregateFailed {
        class: Option<ErrorClass>,
    },
    MalformedKey,
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::AggregateStart { strategy, .. } => {
                m.ops.aggregations = m.ops.aggregations.saturating_add(1);
                match strategy {
                    GroupingStrategy::Hashed => {
                        m.ops.hashed_runs = m.ops.hashed_runs.saturating_add(1);
                    }
                    GroupingStrategy::LinearScan => {
                        m.ops.linear_scan_runs = m.ops.linear_scan_runs.saturating_add(1);
                    }
                }
            }

            MetricsEvent::AggregateFinish {
                rows,
                groups,
                hash_collisions,
            } => {
                m.ops.rows_scanned = m.ops.rows_scanned.saturating_add(rows);
                m.ops.groups_emitted = m.ops.groups_emitted.saturating_add(groups);
                m.ops.hash_collisions = m.ops.hash_collisions.saturating_add(hash_collisions);
            }

            MetricsEvent::AggregateFailed { class } => {
                m.ops.aggregation_failures = m.ops.aggregation_failures.saturating_add(1);
                if class == Some(ErrorClass::MapperFailed) {
                    m.ops.mapper_failures = m.ops.mapper_failures.saturating_add(1);
                }
            }

            MetricsEvent::MalformedKey => {
                m.ops.malformed_keys = m.ops.malformed_keys.saturating_add(1);
            }
        });
    }
}

pub(crate) const GLOBAL_METRICS_SINK: GlobalMetricsSink = GlobalMetricsSink;

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GLOBAL_METRICS_SINK.record(event),
    }
}

/// Snapshot the current thread's metrics counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all metrics counters on the current thread.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override.
/// The previous sink is restored on every exit, including unwind.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let previous = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = previous;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish events for one aggregation run.
/// A span dropped without `finish` or `fail` records a failure.

pub(crate) struct Span {
    done: bool,
}

impl Span {
    #[must_use]
    pub(crate) fn new(strategy: GroupingStrategy, keys: usize) -> Self {
        record(MetricsEvent::AggregateStart { strategy, keys });

        Self { done: false }
    }

    pub(crate) fn finish(mut self, rows: u64, groups: u64, hash_collisions: u64) {
        self.done = true;
        record(MetricsEvent::AggregateFinish {
            rows,
            groups,
            hash_collisions,
        });
    }

    pub(crate) fn fail(mut self, class: ErrorClass) {
        self.done = true;
        record(MetricsEvent::AggregateFailed { class: Some(class) });
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        if !self.done {
            self.done = true;
            record(MetricsEvent::AggregateFailed { class: None });
        }
    }
}

///
/// TESTS
///
