//! Shared HTTP plumbing for the provider backends

use std::thread;
use std::time::{Duration, Instant};

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::StatusCode;
use serde_json::Value;

use crate::provider::ProviderError;

/// Minimum spacing between two requests from one provider
pub const MIN_REQUEST_INTERVAL: Duration = Duration::from_millis(500);

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

pub fn build_client() -> Result<Client, ProviderError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| ProviderError::Fatal(format!("failed to build HTTP client: {}", e)))
}

/// Enforces a minimum interval between consecutive requests
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_request: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: None,
        }
    }

    /// How long the next request has to wait
    pub fn wait_time(&self, now: Instant) -> Duration {
        match self.last_request {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Block until the interval has passed, then mark a request
    pub fn pace(&mut self) {
        let wait = self.wait_time(Instant::now());
        if !wait.is_zero() {
            thread::sleep(wait);
        }
        self.last_request = Some(Instant::now());
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(MIN_REQUEST_INTERVAL)
    }
}

/// Classify an HTTP status
pub fn status_error(status: StatusCode, body: &str) -> ProviderError {
    let detail = format!("HTTP {}: {}", status.as_u16(), truncate(body, 200));
    if status == StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimited(detail)
    } else if status.is_server_error() || status == StatusCode::REQUEST_TIMEOUT {
        ProviderError::Transient(detail)
    } else {
        ProviderError::Fatal(detail)
    }
}

fn transport_error(err: reqwest::Error) -> ProviderError {
    if err.is_builder() {
        ProviderError::Fatal(err.to_string())
    } else {
        ProviderError::Transient(err.to_string())
    }
}

/// Send a prepared request and decode the JSON body
pub fn send_json(request: RequestBuilder) -> Result<Value, ProviderError> {
    let response = request.send().map_err(transport_error)?;
    let status = response.status();
    let text = response.text().map_err(transport_error)?;

    if !status.is_success() {
        return Err(status_error(status, &text));
    }

    serde_json::from_str(&text).map_err(|e| ProviderError::Transient(format!("malformed response body: {}", e)))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
