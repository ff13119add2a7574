//! Request construction and execution against the services under test.
//!
//! Design decisions:
//! - One shared `reqwest::Client` per measurement with a single overall
//!   timeout; the harness never retries
//! - Cache busting rewrites a reserved query key with a UUID v4 token so no
//!   two request URLs repeat within or across runs
//! - Elapsed time covers send through the last body byte, so latency numbers
//!   include transfer of the full image

use crate::config::TargetConfig;
use crate::error::Result;
use crate::scenario::Scenario;
use reqwest::{Client, StatusCode};
use std::time::{Duration, Instant};
use url::Url;
use uuid::Uuid;

/// Timeout for one complete request, connect through body (30 seconds)
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reserved query key rewritten with a fresh token on cache-busted requests.
/// It collides with a visible service parameter on purpose; perturbing the
/// rendered output is the accepted cost of defeating response caches.
pub const CACHE_BUST_PARAM: &str = "subtitle";

/// Build the HTTP client shared by a measurement
pub fn build_client() -> Result<Client> {
    Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
}

/// Build the request URL for a target and scenario.
///
/// Base URL and endpoint are joined with exactly one `/` regardless of how
/// either side spells its slashes. With `cache_bust` set, a UUID v4 token is
/// written under [`CACHE_BUST_PARAM`], replacing any scenario-supplied value
/// for that key.
pub fn request_url(target: &TargetConfig, scenario: &Scenario, cache_bust: bool) -> Result<Url> {
    let base = target.base_url.trim_end_matches('/');
    let endpoint = target.endpoint.trim_start_matches('/');
    let mut url = Url::parse(&format!("{base}/{endpoint}"))?;

    if !scenario.params.is_empty() || cache_bust {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &scenario.params {
            if cache_bust && key == CACHE_BUST_PARAM {
                continue;
            }
            pairs.append_pair(key, value);
        }
        if cache_bust {
            pairs.append_pair(CACHE_BUST_PARAM, &Uuid::new_v4().to_string());
        }
    }

    Ok(url)
}

/// Outcome of one GET against a target
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 200 with the body fully drained
    Success { body: Vec<u8>, elapsed: Duration },
    /// The server answered with a non-success status
    HttpError { status: u16 },
    /// Connect failure, timeout, or body-read failure
    TransportError { message: String },
}

impl FetchOutcome {
    /// True for a 200 response with a readable body
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success { .. })
    }
}

/// Issue one GET and drain the body.
///
/// Failures are logged here at `warn` level; callers only count them.
pub async fn fetch(client: &Client, url: Url) -> FetchOutcome {
    let started = Instant::now();

    let response = match client.get(url.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else if e.is_connect() {
                "failed to connect".to_string()
            } else {
                format!("request failed: {e}")
            };
            tracing::warn!("GET {} failed: {}", url, message);
            return FetchOutcome::TransportError { message };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        tracing::warn!("GET {} returned status {}", url, status.as_u16());
        return FetchOutcome::HttpError {
            status: status.as_u16(),
        };
    }

    match response.bytes().await {
        Ok(body) => FetchOutcome::Success {
            body: body.to_vec(),
            elapsed: started.elapsed(),
        },
        Err(e) => {
            let message = format!("failed to read body: {e}");
            tracing::warn!("GET {} failed: {}", url, message);
            FetchOutcome::TransportError { message }
        }
    }
}
