use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the admin console
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Auth Metrics
    pub auth_actions_total: CounterVec,
    pub session_authenticated: Gauge,

    // User Record Metrics
    pub user_mutations_total: CounterVec,
    pub partial_failures_total: CounterVec,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total console HTTP requests").namespace("license_admin"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "Console HTTP request duration")
                .namespace("license_admin")
                .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        // Auth Metrics
        let auth_actions_total = CounterVec::new(
            Opts::new("auth_actions_total", "Login, second factor and logout attempts")
                .namespace("license_admin"),
            &["action", "outcome"],
        )?;
        registry.register(Box::new(auth_actions_total.clone()))?;

        let session_authenticated = Gauge::with_opts(
            Opts::new("session_authenticated", "1 while the operator session is fully authenticated")
                .namespace("license_admin"),
        )?;
        registry.register(Box::new(session_authenticated.clone()))?;

        // User Record Metrics
        let user_mutations_total = CounterVec::new(
            Opts::new("user_mutations_total", "User record operations by outcome")
                .namespace("license_admin"),
            &["operation", "outcome"],
        )?;
        registry.register(Box::new(user_mutations_total.clone()))?;

        let partial_failures_total = CounterVec::new(
            Opts::new(
                "partial_failures_total",
                "Two-step operations that failed after their first step",
            )
            .namespace("license_admin"),
            &["operation"],
        )?;
        registry.register(Box::new(partial_failures_total.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            auth_actions_total,
            session_authenticated,
            user_mutations_total,
            partial_failures_total,
        }))
    }

    pub fn record_auth(&self, action: &str, success: bool) {
        self.auth_actions_total
            .with_label_values(&[action, outcome(success)])
            .inc();
    }

    pub fn record_mutation(&self, operation: &str, success: bool) {
        self.user_mutations_total
            .with_label_values(&[operation, outcome(success)])
            .inc();
    }

    pub fn record_partial_failure(&self, operation: &str) {
        self.partial_failures_total.with_label_values(&[operation]).inc();
    }

    pub fn set_authenticated(&self, authenticated: bool) {
        self.session_authenticated
            .set(if authenticated { 1.0 } else { 0.0 });
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}
