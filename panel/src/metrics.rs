//! Prometheus metrics

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Opts, Registry, TextEncoder};
use std::sync::LazyLock;

/// Global metrics registry
static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Global metrics instance
static METRICS: LazyLock<Metrics> = LazyLock::new(Metrics::new);

/// Metrics struct
pub struct Metrics {
    // Counters
    pub gateway_requests: IntCounter,
    pub auth_invalidations: IntCounter,
    pub sample_fallbacks: IntCounter,

    // Histograms
    pub request_duration: Histogram,
}

impl Metrics {
    fn new() -> Self {
        let gateway_requests = IntCounter::with_opts(Opts::new(
            "statpanel_gateway_requests_total",
            "Total number of upstream requests issued by the gateway",
        ))
        .unwrap();

        let auth_invalidations = IntCounter::with_opts(Opts::new(
            "statpanel_auth_invalidations_total",
            "Total number of sessions torn down after a credential rejection",
        ))
        .unwrap();

        let sample_fallbacks = IntCounter::with_opts(Opts::new(
            "statpanel_sample_fallbacks_total",
            "Total number of datasets served from hardcoded samples",
        ))
        .unwrap();

        let request_duration = Histogram::with_opts(HistogramOpts::new(
            "statpanel_request_duration_seconds",
            "Upstream request duration in seconds",
        ))
        .unwrap();

        // Register metrics
        REGISTRY.register(Box::new(gateway_requests.clone())).ok();
        REGISTRY.register(Box::new(auth_invalidations.clone())).ok();
        REGISTRY.register(Box::new(sample_fallbacks.clone())).ok();
        REGISTRY.register(Box::new(request_duration.clone())).ok();

        Self {
            gateway_requests,
            auth_invalidations,
            sample_fallbacks,
            request_duration,
        }
    }
}

/// Access the global metrics
pub fn global() -> &'static Metrics {
    &METRICS
}

/// Render the registry in Prometheus text exposition format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer).ok();
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_register_and_render() {
        global().gateway_requests.inc();
        let text = gather();
        assert!(text.contains("statpanel_gateway_requests_total"));
    }
}
