//! Metric names and descriptions recorded by the [`Store`](crate::Store).
//!
//! The store records through the `metrics` facade. Without an installed
//! recorder the macros are no-ops; [`install_recorder`] installs a Prometheus
//! recorder whose [`PrometheusHandle`] renders the current values.
//!
//! # Example
//!
//! ```rust,no_run
//! # fn example() -> Result<(), todos_runtime::metrics::MetricsError> {
//! let handle = todos_runtime::metrics::install_recorder()?;
//!
//! // ... send actions through a store ...
//!
//! println!("{}", handle.render());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};
pub use metrics_exporter_prometheus::PrometheusHandle;

/// Actions run through the reducer.
pub const ACTIONS_PROCESSED: &str = "store.actions.processed";

/// Actions rejected because the store was shutting down.
pub const ACTIONS_REJECTED: &str = "store.actions.rejected";

/// Effects executed, labelled by `type`.
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";

/// Time spent inside the reducer per action.
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";

/// Reducer calls are in-memory, so the buckets start well below a millisecond.
const DURATION_BUCKETS: &[f64] = &[
    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0,
];

/// Errors from setting up the metrics recorder.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build the Prometheus recorder
    #[error("Failed to build metrics recorder: {0}")]
    Build(String),
    /// A global recorder could not be installed
    #[error("Failed to install metrics recorder: {0}")]
    Install(String),
}

/// Prometheus builder with the store's histogram buckets configured.
///
/// Use [`PrometheusBuilder::build_recorder`] on the result for a recorder that
/// is not installed globally (for `metrics::with_local_recorder`).
///
/// # Errors
///
/// Returns [`MetricsError::Build`] if the bucket configuration is rejected.
pub fn prometheus_builder() -> Result<PrometheusBuilder, MetricsError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Suffix("duration_seconds".to_string()),
            DURATION_BUCKETS,
        )
        .map_err(|e| MetricsError::Build(e.to_string()))
}

/// Install a Prometheus recorder as the global recorder.
///
/// Metric descriptions are registered once the recorder is in place.
///
/// # Errors
///
/// Returns [`MetricsError::Install`] if a global recorder is already set.
pub fn install_recorder() -> Result<PrometheusHandle, MetricsError> {
    let handle = prometheus_builder()?
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_metrics();
    tracing::info!("Prometheus metrics recorder installed");

    Ok(handle)
}

/// Register descriptions for every metric the store records.
///
/// Safe to call more than once; recorders treat repeated descriptions as
/// updates.
pub fn describe_metrics() {
    describe_counter!(
        ACTIONS_PROCESSED,
        "Total number of actions processed by the reducer"
    );
    describe_counter!(
        ACTIONS_REJECTED,
        "Total number of actions rejected during shutdown"
    );
    describe_counter!(EFFECTS_EXECUTED, "Total number of effects executed");
    describe_histogram!(REDUCER_DURATION, "Time taken to execute the reducer");
}

/// Value of one series in Prometheus text output
///
/// `series` is the rendered name including labels, e.g.
/// `store_effects_executed{type="future"}`.
#[must_use]
pub fn sample(rendered: &str, series: &str) -> Option<f64> {
    rendered
        .lines()
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.rsplit_once(' '))
        .find(|(name, _)| *name == series)
        .and_then(|(_, value)| value.parse().ok())
}
