//! # Server Metrics
//!
//! Request counters for the `/health` and `/metrics` endpoints. These live
//! in the server, never in the ciphers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide request counters
#[derive(Debug, Default)]
pub struct ServerMetrics {
    requests: AtomicU64,
    encodes: AtomicU64,
    decodes: AtomicU64,
    client_errors: AtomicU64,
    server_errors: AtomicU64,
}

impl ServerMetrics {
    /// Create a zeroed set of counters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count an inbound request
    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a completed cipher operation
    pub fn record_operation(&self, encrypt: bool) {
        let counter = if encrypt { &self.encodes } else { &self.decodes };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a response by its status code
    pub fn record_status(&self, status: u16) {
        match status {
            400..=499 => {
                self.client_errors.fetch_add(1, Ordering::Relaxed);
            }
            500..=599 => {
                self.server_errors.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Point-in-time copy of every counter
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.requests.load(Ordering::Relaxed),
            encodes: self.encodes.load(Ordering::Relaxed),
            decodes: self.decodes.load(Ordering::Relaxed),
            client_errors: self.client_errors.load(Ordering::Relaxed),
            server_errors: self.server_errors.load(Ordering::Relaxed),
        }
    }
}

/// Counter values at one moment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    /// Requests received
    pub requests: u64,
    /// Successful encode operations
    pub encodes: u64,
    /// Successful decode operations
    pub decodes: u64,
    /// Responses with a 4xx status
    pub client_errors: u64,
    /// Responses with a 5xx status
    pub server_errors: u64,
}

impl MetricsSnapshot {
    /// Share of requests that ended in an error, as a percentage
    #[must_use]
    pub fn error_rate_percent(&self) -> f64 {
        if self.requests == 0 {
            0.0
        } else {
            (self.client_errors + self.server_errors) as f64 / self.requests as f64 * 100.0
        }
    }

    /// Render in the Prometheus text exposition format
    #[must_use]
    pub fn to_prometheus(&self) -> String {
        format!(
            "# HELP cipher_requests_total Total HTTP requests received\n\
             # TYPE cipher_requests_total counter\n\
             cipher_requests_total {}\n\
             # HELP cipher_operations_total Cipher operations performed\n\
             # TYPE cipher_operations_total counter\n\
             cipher_operations_total{{direction=\"encode\"}} {}\n\
             cipher_operations_total{{direction=\"decode\"}} {}\n\
             # HELP cipher_errors_total Error responses sent\n\
             # TYPE cipher_errors_total counter\n\
             cipher_errors_total{{class=\"client\"}} {}\n\
             cipher_errors_total{{class=\"server\"}} {}\n",
            self.requests, self.encodes, self.decodes, self.client_errors, self.server_errors,
        )
    }
}
