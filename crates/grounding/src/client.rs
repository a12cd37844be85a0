//! HTTP client for the external grounding service

use crate::Result;
use biokg_core::GroundingCandidate;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_GROUNDING_URL: &str = "http://localhost:8001";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Client for the grounding service: free-text label in, zero or more
/// `(namespace, accession, confidence)` candidates out.
#[derive(Clone)]
pub struct GroundingClient {
    client: reqwest::Client,
    base_url: String,
}

impl GroundingClient {
    /// Create a new grounding client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: base_url.into(),
        }
    }

    /// Default client; `GROUNDING_URL` overrides the localhost default
    pub fn default_local() -> Self {
        Self::new(env_or_default("GROUNDING_URL", DEFAULT_GROUNDING_URL))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ground a label to candidate identifiers.
    ///
    /// Service failure (timeout, error status, malformed body) is not an
    /// error to the pipeline; callers treat it as zero candidates.
    #[instrument(skip(self))]
    pub async fn ground(&self, label: &str) -> Result<Vec<GroundingCandidate>> {
        let url = format!("{}/ground", self.base_url);

        let request = GroundRequest { text: label };

        let response: GroundResponse = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!(
            "Grounding `{}` returned {} candidate(s)",
            label,
            response.matches.len()
        );

        Ok(response.matches)
    }

    /// Health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);

        let response = self.client.get(&url).send().await?;

        Ok(response.status().is_success())
    }
}

// ==========================================
// REQUEST/RESPONSE TYPES
// ==========================================

#[derive(Debug, Serialize)]
struct GroundRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GroundResponse {
    #[serde(default)]
    matches: Vec<GroundingCandidate>,
}
