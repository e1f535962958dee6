//! Azure AI Content Understanding HTTP client.
//!
//! Analysis is asynchronous on the service side: an analyze request is
//! accepted with HTTP 202 and an `Operation-Location` header, which is then
//! polled until the operation reports `Succeeded` or `Failed`.

use crate::error::{Error, Result};
use crate::people;
use std::time::{Duration, Instant};

/// API version the analyze endpoints speak.
pub const API_VERSION: &str = "2025-05-01-preview";

/// Prebuilt analyzer that describes images.
pub const IMAGE_ANALYZER: &str = "prebuilt-imageAnalyzer";

/// Prebuilt analyzer for general documents.
pub const DOCUMENT_ANALYZER: &str = "prebuilt-documentAnalyzer";

/// Interval between status polls.
const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Budget for one analysis to finish.
const MAX_WAIT: Duration = Duration::from_secs(60);

/// Result of a people-counting analysis.
#[derive(Debug, Clone)]
pub struct PeopleReport {
    /// Number of people inferred from the description.
    pub count: u32,
    /// Description text the analyzer produced.
    pub description: String,
    /// Full analysis result as returned by the service.
    pub raw: serde_json::Value,
}

/// Client for the Content Understanding service.
pub struct Client {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// Service endpoint, without trailing slash.
    endpoint: String,
    /// Subscription key sent with every request.
    api_key: String,
    /// Interval between status polls.
    poll_interval: Duration,
    /// Budget for one analysis to finish.
    max_wait: Duration,
}

impl Client {
    /// Create a new client for the given endpoint and subscription key.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        Self {
            agent: ureq::Agent::new_with_defaults(),
            endpoint,
            api_key: api_key.into(),
            poll_interval: POLL_INTERVAL,
            max_wait: MAX_WAIT,
        }
    }

    /// Override the polling cadence (mainly for tests and impatient callers).
    #[must_use]
    pub fn with_polling(mut self, poll_interval: Duration, max_wait: Duration) -> Self {
        self.poll_interval = poll_interval;
        self.max_wait = max_wait;
        self
    }

    /// Get the normalized endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the analyze URL for an analyzer id.
    fn analyze_url(&self, analyzer: &str) -> String {
        format!(
            "{}/contentunderstanding/analyzers/{}:analyze?api-version={}",
            self.endpoint, analyzer, API_VERSION
        )
    }

    /// Analyze a file by URL with the given analyzer and wait for the result.
    pub fn analyze(&self, analyzer: &str, file_url: &str) -> Result<serde_json::Value> {
        let url = self.analyze_url(analyzer);
        let payload = serde_json::json!({ "url": file_url });

        let response = self
            .agent
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .send_json(&payload)?;

        let status = response.status().as_u16();
        if status != 202 {
            return Err(Error::AnalysisNotStarted { status });
        }

        let operation_location = response
            .headers()
            .get("Operation-Location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or(Error::MissingOperationLocation)?;

        self.poll_result(analyzer, &operation_location)
    }

    /// Poll an operation location until the analysis reaches a terminal state.
    fn poll_result(&self, analyzer: &str, operation_location: &str) -> Result<serde_json::Value> {
        let start = Instant::now();

        while start.elapsed() < self.max_wait {
            let json: serde_json::Value = self
                .agent
                .get(operation_location)
                .header("Ocp-Apim-Subscription-Key", &self.api_key)
                .call()?
                .body_mut()
                .read_json()?;

            match json["status"].as_str().unwrap_or_default() {
                "Succeeded" => return Ok(json),
                "Failed" => {
                    let message = json["error"]["message"]
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| json.to_string());
                    return Err(Error::AnalysisFailed {
                        analyzer: analyzer.to_string(),
                        message,
                    });
                }
                "Running" | "NotStarted" => std::thread::sleep(self.poll_interval),
                other => return Err(Error::UnexpectedStatus(other.to_string())),
            }
        }

        Err(Error::AnalysisTimedOut {
            analyzer: analyzer.to_string(),
            seconds: self.max_wait.as_secs(),
        })
    }

    /// Analyze an image and count the people in it.
    ///
    /// Runs the image analyzer, pulls the description text out of the
    /// result, and counts people mentions in that text.
    pub fn count_people(&self, image_url: &str) -> Result<PeopleReport> {
        let raw = self.analyze(IMAGE_ANALYZER, image_url)?;
        let description = description_from(&raw);
        let count = people::count_in_text(&description);
        Ok(PeopleReport {
            count,
            description,
            raw,
        })
    }
}

/// Pull the description text out of an analysis result.
///
/// Prefers the `Summary` field when the analyzer extracted one, otherwise
/// falls back to the markdown rendering of the content.
pub fn description_from(result: &serde_json::Value) -> String {
    let content = &result["result"]["contents"][0];

    let summary = &content["fields"]["Summary"];
    if !summary.is_null() {
        return summary["valueString"].as_str().unwrap_or_default().to_string();
    }

    content["markdown"].as_str().unwrap_or_default().to_string()
}
