//! Telemetry and observability utilities

use std::sync::Arc;

#[cfg(feature = "metrics")]
use opentelemetry::{
    metrics::{Counter, Histogram, UpDownCounter},
    KeyValue,
};

/// Telemetry configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Whether telemetry is enabled
    pub enabled: bool,
    /// Service name for metrics
    pub service_name: String,
    /// Service version for metrics
    pub service_version: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: "vault-kv-sdk".to_string(),
            service_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// SDK metrics collector
#[derive(Clone)]
pub struct Metrics {
    #[cfg(feature = "metrics")]
    pub(crate) requests_total: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) request_duration: Histogram<f64>,

    #[cfg(feature = "metrics")]
    pub(crate) errors_total: Counter<u64>,

    #[cfg(feature = "metrics")]
    pub(crate) active_requests: UpDownCounter<i64>,
}

impl Metrics {
    /// Create new metrics instance
    #[cfg(feature = "metrics")]
    pub fn new(config: &TelemetryConfig) -> Self {
        use opentelemetry::global;

        let meter = global::meter(config.service_name.clone());

        let requests_total = meter
            .u64_counter("vault_kv_sdk.requests_total")
            .with_description("Total number of requests made")
            .init();

        let request_duration = meter
            .f64_histogram("vault_kv_sdk.request_duration_seconds")
            .with_description("Request duration in seconds")
            .init();

        let errors_total = meter
            .u64_counter("vault_kv_sdk.errors_total")
            .with_description("Total number of failed requests")
            .init();

        let active_requests = meter
            .i64_up_down_counter("vault_kv_sdk.active_requests")
            .with_description("Number of requests in flight")
            .init();

        Self {
            requests_total,
            request_duration,
            errors_total,
            active_requests,
        }
    }

    /// Create a no-op metrics instance when feature is disabled
    #[cfg(not(feature = "metrics"))]
    pub fn new(_config: &TelemetryConfig) -> Self {
        Self {}
    }

    /// Record a completed request. `status` is `None` for transport failures.
    #[cfg(feature = "metrics")]
    pub fn record_request(&self, operation: &str, status: Option<u16>, duration_secs: f64) {
        let status_label = status.map_or_else(|| "transport".to_string(), |s| s.to_string());
        let labels = &[
            KeyValue::new("operation", operation.to_string()),
            KeyValue::new("status", status_label.clone()),
        ];

        self.requests_total.add(1, labels);
        self.request_duration.record(duration_secs, labels);

        let error_type = match status {
            None => Some("transport"),
            Some(s) if s >= 500 => Some("server"),
            Some(s) if s >= 400 => Some("client"),
            _ => None,
        };
        if let Some(error_type) = error_type {
            self.errors_total.add(
                1,
                &[
                    KeyValue::new("type", error_type),
                    KeyValue::new("status", status_label),
                ],
            );
        }
    }

    /// Record a request (no-op when metrics disabled)
    #[cfg(not(feature = "metrics"))]
    pub fn record_request(&self, _operation: &str, _status: Option<u16>, _duration_secs: f64) {}

    /// Increment in-flight requests
    #[cfg(feature = "metrics")]
    pub fn inc_active_requests(&self) {
        self.active_requests.add(1, &[]);
    }

    /// Increment in-flight requests (no-op)
    #[cfg(not(feature = "metrics"))]
    pub fn inc_active_requests(&self) {}

    /// Decrement in-flight requests
    #[cfg(feature = "metrics")]
    pub fn dec_active_requests(&self) {
        self.active_requests.add(-1, &[]);
    }

    /// Decrement in-flight requests (no-op)
    #[cfg(not(feature = "metrics"))]
    pub fn dec_active_requests(&self) {}
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("enabled", &cfg!(feature = "metrics"))
            .finish()
    }
}

/// Global telemetry instance holder
static TELEMETRY: std::sync::OnceLock<Arc<Metrics>> = std::sync::OnceLock::new();

/// Get the shared metrics instance, creating it on first use
pub fn init_telemetry(config: &TelemetryConfig) -> Arc<Metrics> {
    TELEMETRY
        .get_or_init(|| Arc::new(Metrics::new(config)))
        .clone()
}
