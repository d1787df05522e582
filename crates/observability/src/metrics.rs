//! Prometheus metrics for the HTTP layer.
//!
//! [`HttpMetrics`] registers its collectors on a caller-provided
//! [`Registry`]; the API exposes that registry at `/metrics`.
//!
//! # Metric Specification
//!
//! - `orgbook_http_requests_total` (counter): requests accepted
//! - `orgbook_http_responses_total{class}` (counter): `2xx`..`5xx`, `other`,
//!   or `aborted` for requests dropped before producing a response
//! - `orgbook_http_requests_in_flight` (gauge)
//! - `orgbook_http_request_duration_seconds` (histogram)
//! - `orgbook_http_panics_total` (counter)

use std::time::Instant;

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

const CLASSES: [&str; 6] = ["2xx", "3xx", "4xx", "5xx", "other", "aborted"];

#[derive(Clone)]
pub struct HttpMetrics {
    requests_total: IntCounter,
    responses_total: IntCounterVec,
    in_flight: IntGauge,
    duration: Histogram,
    panics_total: IntCounter,
}

/// Point-in-time view of [`HttpMetrics`], mostly for assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_total: u64,
    pub in_flight: i64,
    pub responses_2xx: u64,
    pub responses_3xx: u64,
    pub responses_4xx: u64,
    pub responses_5xx: u64,
    pub responses_aborted: u64,
    pub panics_total: u64,
    pub timed_requests: u64,
}

impl HttpMetrics {
    /// Create the collectors and register them with `registry`.
    ///
    /// # Errors
    ///
    /// Fails if a metric with the same name is already registered.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let requests_total = IntCounter::new(
            "orgbook_http_requests_total",
            "HTTP requests accepted",
        )?;
        let responses_total = IntCounterVec::new(
            Opts::new(
                "orgbook_http_responses_total",
                "HTTP requests completed, by status class",
            ),
            &["class"],
        )?;
        let in_flight = IntGauge::new(
            "orgbook_http_requests_in_flight",
            "HTTP requests currently being served",
        )?;
        let duration = Histogram::with_opts(HistogramOpts::new(
            "orgbook_http_request_duration_seconds",
            "Time from request start to response",
        ))?;
        let panics_total = IntCounter::new(
            "orgbook_http_panics_total",
            "Handler panics turned into 500 responses",
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(responses_total.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;
        registry.register(Box::new(duration.clone()))?;
        registry.register(Box::new(panics_total.clone()))?;

        // Export every class from the start, even at zero.
        for class in CLASSES {
            responses_total.with_label_values(&[class]);
        }

        Ok(Self {
            requests_total,
            responses_total,
            in_flight,
            duration,
            panics_total,
        })
    }

    /// Record the start of a request.
    ///
    /// The in-flight gauge is released when the returned guard is dropped,
    /// whether or not [`RequestGuard::finish`] was called.
    pub fn start_request(&self) -> RequestGuard {
        self.requests_total.inc();
        self.in_flight.inc();
        RequestGuard {
            metrics: self.clone(),
            started: Instant::now(),
            finished: false,
        }
    }

    pub fn panic_caught(&self) {
        self.panics_total.inc();
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let class = |c: &str| self.responses_total.with_label_values(&[c]).get();
        MetricsSnapshot {
            requests_total: self.requests_total.get(),
            in_flight: self.in_flight.get(),
            responses_2xx: class("2xx"),
            responses_3xx: class("3xx"),
            responses_4xx: class("4xx"),
            responses_5xx: class("5xx"),
            responses_aborted: class("aborted"),
            panics_total: self.panics_total.get(),
            timed_requests: self.duration.get_sample_count(),
        }
    }
}

/// Tracks one request from [`HttpMetrics::start_request`] until drop.
pub struct RequestGuard {
    metrics: HttpMetrics,
    started: Instant,
    finished: bool,
}

impl RequestGuard {
    /// Record the final status and latency.
    pub fn finish(mut self, status: u16) {
        self.metrics
            .responses_total
            .with_label_values(&[status_class(status)])
            .inc();
        self.metrics
            .duration
            .observe(self.started.elapsed().as_secs_f64());
        self.finished = true;
    }
}

impl Drop for RequestGuard {
    fn drop(&mut self) {
        self.metrics.in_flight.dec();
        if !self.finished {
            self.metrics
                .responses_total
                .with_label_values(&["aborted"])
                .inc();
        }
    }
}

fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Render `registry` in the Prometheus text exposition format.
///
/// Returns the content type together with the encoded body.
pub fn encode_text(registry: &Registry) -> Result<(String, Vec<u8>), prometheus::Error> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok((encoder.format_type().to_owned(), buffer))
}
