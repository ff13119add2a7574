//! Representative image metrics.
//!
//! One GET without cache busting: the point is the response a normal client
//! would receive, and a cache-bust token would change the rendered pixels.
//! Only the header of the body is decoded; dimensions and format do not
//! require a full pixel decode.

use crate::config::TargetConfig;
use crate::report::{round2, ImageMetrics, MetricOutcome};
use crate::request::{self, FetchOutcome};
use crate::scenario::Scenario;
use image::ImageReader;
use reqwest::Client;
use std::io::Cursor;

/// Fetches and decodes one representative response per scenario
pub struct ImageMetricsMeasurer {
    client: Client,
}

impl ImageMetricsMeasurer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Fetch the scenario image once and decode its size and shape
    pub async fn measure(
        &self,
        target: &TargetConfig,
        scenario: &Scenario,
    ) -> MetricOutcome<ImageMetrics> {
        let url = match request::request_url(target, scenario, false) {
            Ok(url) => url,
            Err(e) => return MetricOutcome::failed(format!("invalid request URL: {e}")),
        };

        let body = match request::fetch(&self.client, url).await {
            FetchOutcome::Success { body, .. } => body,
            FetchOutcome::HttpError { status } => {
                return MetricOutcome::failed(format!("image request returned status {status}"));
            }
            FetchOutcome::TransportError { message } => {
                return MetricOutcome::failed(format!("image request failed: {message}"));
            }
        };

        decode(&body)
    }
}

fn decode(body: &[u8]) -> MetricOutcome<ImageMetrics> {
    let reader = match ImageReader::new(Cursor::new(body)).with_guessed_format() {
        Ok(reader) => reader,
        Err(e) => return MetricOutcome::failed(format!("failed to probe image: {e}")),
    };

    let format = match reader.format() {
        Some(format) => format,
        None => return MetricOutcome::failed("unrecognized image format"),
    };

    let (width, height) = match reader.into_dimensions() {
        Ok(dimensions) => dimensions,
        Err(e) => return MetricOutcome::failed(format!("failed to decode image: {e}")),
    };

    let size_bytes = body.len() as u64;
    MetricOutcome::Ok(ImageMetrics {
        size_bytes,
        size_kb: round2(size_bytes as f64 / 1024.0),
        width,
        height,
        format: format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("unknown")
            .to_string(),
    })
}
