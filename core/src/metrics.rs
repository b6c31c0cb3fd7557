//! Per-client request metrics.
//!
//! Every call that reaches the network records one sample in
//! `client_sdk_requests_total{method, outcome}` and one observation in
//! `client_sdk_request_duration_seconds{method}`. Each client owns its own
//! `Registry`; callers that run a `/metrics` endpoint can gather it or
//! `export()` it in text format.

use std::fmt;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::error::ApiError;
use crate::http::{HttpMethod, Outcome};

pub const REQUESTS_TOTAL: &str = "client_sdk_requests_total";
pub const REQUEST_DURATION: &str = "client_sdk_request_duration_seconds";

/// Latency buckets in seconds.
pub const LATENCY_BUCKETS: &[f64] = &[
    0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

#[derive(Clone)]
pub struct ClientMetrics {
    registry: Registry,
    requests: IntCounterVec,
    duration: HistogramVec,
}

impl ClientMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            Opts::new(REQUESTS_TOTAL, "Requests sent, by method and outcome"),
            &["method", "outcome"],
        )?;
        registry.register(Box::new(requests.clone()))?;

        let duration = HistogramVec::new(
            HistogramOpts::new(REQUEST_DURATION, "Request latency until classification")
                .buckets(LATENCY_BUCKETS.to_vec()),
            &["method"],
        )?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            requests,
            duration,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn record(&self, method: HttpMethod, outcome: &str, seconds: f64) {
        self.requests
            .with_label_values(&[method.as_str(), outcome])
            .inc();
        self.duration
            .with_label_values(&[method.as_str()])
            .observe(seconds);
    }

    /// Number of calls recorded for `method` with the given outcome label.
    pub fn request_count(&self, method: HttpMethod, outcome: &str) -> u64 {
        self.requests
            .with_label_values(&[method.as_str(), outcome])
            .get()
    }

    /// Number of latency observations for `method`.
    pub fn duration_count(&self, method: HttpMethod) -> u64 {
        self.duration
            .with_label_values(&[method.as_str()])
            .get_sample_count()
    }

    /// Prometheus text exposition of this client's metrics.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl fmt::Debug for ClientMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientMetrics")
            .field("requests", &REQUESTS_TOTAL)
            .field("duration", &REQUEST_DURATION)
            .finish()
    }
}

/// `outcome` label for a finished call.
pub fn outcome_label<T>(result: &Result<Outcome<T>, ApiError>) -> &'static str {
    match result {
        Ok(Outcome::Content(_)) => "success",
        Ok(Outcome::NoContent) => "no_content",
        Err(ApiError::Timeout(_)) => "timeout",
        Err(ApiError::Http { .. }) => "http_error",
        Err(ApiError::Network(_)) => "network_error",
        Err(ApiError::Parse(_)) => "parse_error",
        Err(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_counts_one_sample_per_call() {
        let metrics = ClientMetrics::new().unwrap();
        metrics.record(HttpMethod::Get, "success", 0.02);
        metrics.record(HttpMethod::Get, "http_error", 0.01);
        metrics.record(HttpMethod::Post, "success", 0.5);

        assert_eq!(metrics.request_count(HttpMethod::Get, "success"), 1);
        assert_eq!(metrics.request_count(HttpMethod::Get, "http_error"), 1);
        assert_eq!(metrics.request_count(HttpMethod::Delete, "success"), 0);
        assert_eq!(metrics.duration_count(HttpMethod::Get), 2);
        assert_eq!(metrics.duration_count(HttpMethod::Post), 1);
    }

    #[test]
    fn clients_do_not_share_registries() {
        let a = ClientMetrics::new().unwrap();
        let b = ClientMetrics::new().unwrap();
        a.record(HttpMethod::Put, "success", 0.1);
        assert_eq!(b.request_count(HttpMethod::Put, "success"), 0);
    }

    #[test]
    fn export_uses_text_format() {
        let metrics = ClientMetrics::new().unwrap();
        metrics.record(HttpMethod::Delete, "no_content", 0.003);
        let text = metrics.export().unwrap();
        let sample = r#"client_sdk_requests_total{method="DELETE",outcome="no_content"} 1"#;
        assert!(text.contains(sample), "{text}");
        assert!(text.contains("client_sdk_request_duration_seconds_count"));
    }

    #[test]
    fn outcome_labels() {
        let ok: Result<Outcome<()>, ApiError> = Ok(Outcome::Content(()));
        assert_eq!(outcome_label(&ok), "success");
        let empty: Result<Outcome<()>, ApiError> = Ok(Outcome::NoContent);
        assert_eq!(outcome_label(&empty), "no_content");
        let http: Result<Outcome<()>, ApiError> = Err(ApiError::Http {
            status: 500,
            body: String::new(),
        });
        assert_eq!(outcome_label(&http), "http_error");
        let timeout: Result<Outcome<()>, ApiError> =
            Err(ApiError::Timeout(std::time::Duration::from_secs(1)));
        assert_eq!(outcome_label(&timeout), "timeout");
    }
}
