//! Gooey.ai video-generation client.
//!
//! DESIGN
//! ======
//! Thin HTTP wrapper for the DeforumSD text-to-video endpoint. Exactly one
//! request per call, no retries; retry policy, if ever wanted, belongs to
//! the caller. Pure parsing in `parse_response` for testability, and the
//! whole network seam sits behind the [`VideoGeneration`] trait so services
//! and routes can run against a mock.

use std::time::Duration;

pub const API_BASE_URL: &str = "https://api.gooey.ai/v2/DeforumSD/";
const RUN_ID: &str = "6gnu2gz9";
const RUN_UID: &str = "en5uGuoba4d7an6GL6bbQSmvLuk1";
// The DeforumSD protocol wants a keyframe number alongside the prompt.
const ANIMATION_FRAME: u32 = 1;
const REQUEST_TIMEOUT_SECS: u64 = 120;
const CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum GooeyError {
    #[error("failed to build HTTP client: {0}")]
    HttpClientBuild(String),
    #[error("generation request failed: {0}")]
    Request(String),
    #[error("generation service returned status {status}")]
    Api { status: u16 },
    #[error("generation response missing output video")]
    MalformedResponse,
}

/// Result of a successful generation call.
#[derive(Debug, Clone)]
pub struct GenerationOutcome {
    pub video_url: String,
    pub external_id: Option<String>,
    pub external_created_at: Option<String>,
}

/// Network seam for video generation. `GooeyClient` is the one real
/// implementation; tests substitute their own.
#[async_trait::async_trait]
pub trait VideoGeneration: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome, GooeyError>;
}

// =============================================================================
// CLIENT
// =============================================================================

pub struct GooeyClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GooeyClient {
    /// Build a client against the production endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(api_key: String) -> Result<Self, GooeyError> {
        Self::with_base_url(api_key, API_BASE_URL.to_owned())
    }

    /// Build a client against a custom endpoint (tests point this at a
    /// local mock server).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, GooeyError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| GooeyError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, api_key, base_url })
    }
}

#[async_trait::async_trait]
impl VideoGeneration for GooeyClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome, GooeyError> {
        let body = ApiRequest { animation_prompts: vec![AnimationPrompt { frame: ANIMATION_FRAME, prompt }] };

        let response = self
            .http
            .post(&self.base_url)
            .query(&[("run_id", RUN_ID), ("uid", RUN_UID)])
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GooeyError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GooeyError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(GooeyError::Api { status: status.as_u16() });
        }

        parse_response(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    animation_prompts: Vec<AnimationPrompt<'a>>,
}

#[derive(serde::Serialize)]
struct AnimationPrompt<'a> {
    frame: u32,
    prompt: &'a str,
}

#[derive(serde::Deserialize)]
struct ApiResponse {
    id: Option<String>,
    created_at: Option<String>,
    output: Option<ApiOutput>,
}

#[derive(serde::Deserialize)]
struct ApiOutput {
    output_video: Option<String>,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_response(json: &str) -> Result<GenerationOutcome, GooeyError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|_| GooeyError::MalformedResponse)?;

    let video_url = api
        .output
        .and_then(|o| o.output_video)
        .ok_or(GooeyError::MalformedResponse)?;

    Ok(GenerationOutcome { video_url, external_id: api.id, external_created_at: api.created_at })
}

#[cfg(test)]
#[path = "gooey_test.rs"]
mod tests;
