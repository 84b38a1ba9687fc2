//! Prometheus metrics endpoint support.

use once_cell::sync::Lazy;
use prometheus::{Encoder, Registry, TextEncoder};

use supportflow_core::register_core_metrics;

/// Global metrics registry with all core metrics registered.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_core_metrics(&registry);
    registry
});

/// Render the registry in the Prometheus text exposition format.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&REGISTRY.gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
