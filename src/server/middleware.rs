//! # Middleware Module
//!
//! Per-request timing and completion logging.

use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Request timing and logging middleware
#[derive(Debug, Clone)]
pub struct RequestMiddleware {
    /// Request start time for latency calculation
    start_time: Option<Instant>,
}

impl RequestMiddleware {
    /// Create new request middleware instance
    #[must_use]
    pub fn new() -> Self {
        Self { start_time: None }
    }

    /// Create a middleware instance that is already timing
    #[must_use]
    pub fn started() -> Self {
        Self {
            start_time: Some(Instant::now()),
        }
    }

    /// Start timing a request
    pub fn start_timing(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Time since `start_timing`, if it was called
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|start| start.elapsed())
    }

    /// Log request completion with timing
    pub fn log_completion(&self, status_code: u16, path: &str, method: &str) {
        if let Some(elapsed) = self.elapsed() {
            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            if status_code >= 400 {
                warn!(
                    "Request completed: {} {} - {} ({:.2}ms)",
                    method, path, status_code, elapsed_ms
                );
            } else {
                info!(
                    "Request completed: {} {} - {} ({:.2}ms)",
                    method, path, status_code, elapsed_ms
                );
            }
        }
    }
}

impl Default for RequestMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_middleware_creation() {
        let middleware = RequestMiddleware::new();
        assert!(middleware.start_time.is_none());
        assert!(middleware.elapsed().is_none());
        assert!(RequestMiddleware::default().start_time.is_none());
    }

    #[test]
    fn test_timing_start() {
        let mut middleware = RequestMiddleware::new();
        middleware.start_timing();
        assert!(middleware.elapsed().is_some());
        assert!(RequestMiddleware::started().elapsed().is_some());
    }

    #[test]
    fn test_log_completion_without_timing_is_noop() {
        RequestMiddleware::new().log_completion(200, "/cipher/atbash/", "POST");
        RequestMiddleware::started().log_completion(500, "/cipher/affine/", "POST");
    }
}
