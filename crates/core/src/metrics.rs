//! Prometheus metrics for core components.

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts, Registry};

/// Pipeline step executions by step and outcome.
pub static PIPELINE_STEPS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "supportflow_pipeline_steps_total",
            "Total pipeline step executions",
        ),
        &["step", "outcome"], // outcome: "ok", "degraded", "error"
    )
    .unwrap()
});

/// External collaborator calls by service and outcome.
pub static EXTERNAL_CALLS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "supportflow_external_calls_total",
            "Total external service calls",
        ),
        &["service", "outcome"],
    )
    .unwrap()
});

/// Batch runs by outcome.
pub static BATCH_RUNS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("supportflow_batch_runs_total", "Total batch pipeline runs"),
        &["outcome"],
    )
    .unwrap()
});

/// Register all core metrics with the given registry.
pub fn register_core_metrics(registry: &Registry) {
    registry
        .register(Box::new(PIPELINE_STEPS.clone()))
        .expect("Failed to register pipeline step metrics");
    registry
        .register(Box::new(EXTERNAL_CALLS.clone()))
        .expect("Failed to register external call metrics");
    registry
        .register(Box::new(BATCH_RUNS.clone()))
        .expect("Failed to register batch run metrics");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_core_metrics() {
        let registry = Registry::new();
        register_core_metrics(&registry);

        PIPELINE_STEPS.with_label_values(&["classify", "ok"]).inc();
        let families = registry.gather();
        assert!(families
            .iter()
            .any(|f| f.get_name() == "supportflow_pipeline_steps_total"));
    }
}
