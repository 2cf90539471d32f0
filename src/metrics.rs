//! Metrics instrumentation for docker-dns.
//!
//! All metrics are prefixed with `docker_dns.`

use metrics::{counter, histogram};
use std::time::Instant;

/// Record a DNS query.
pub fn record_query(record_type: &str, result: QueryResult, duration: std::time::Duration) {
    let result_str = match result {
        QueryResult::Success => "success",
        QueryResult::NxDomain => "nxdomain",
        QueryResult::ServFail => "servfail",
        QueryResult::Unsupported => "unsupported",
    };

    counter!("docker_dns.query.count", "type" => record_type.to_string(), "result" => result_str)
        .increment(1);
    histogram!("docker_dns.query.duration.seconds", "type" => record_type.to_string())
        .record(duration.as_secs_f64());
}

/// Query result type for metrics.
#[derive(Debug, Clone, Copy)]
pub enum QueryResult {
    /// Query returned a record successfully.
    Success,
    /// Domain not found (or miss configured as NXDOMAIN).
    NxDomain,
    /// Miss configured to answer SERVFAIL.
    ServFail,
    /// Record type we do not serve.
    Unsupported,
}

/// Record a Docker API failure that was downgraded to a miss.
pub fn record_backend_error(operation: &'static str) {
    counter!("docker_dns.backend.error.count", "operation" => operation).increment(1);
}

/// Helper for timing operations.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Get elapsed duration since timer start.
    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}
