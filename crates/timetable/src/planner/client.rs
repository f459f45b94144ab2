//! HTTP client for the generative planner.
//!
//! Sends one `generateContent` request with the timetable prompt and a JSON
//! response schema, then decodes the returned text into a
//! [`ScheduleDocument`]. Nothing is retried; a failed request is reported as
//! a classified [`PlannerError`].

use super::error::PlannerError;
use super::prompt::{build_prompt, response_schema};
use crate::timetable::{Constraints, ScheduleDocument, Subject};
use rand::Rng;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

/// Base URL for the Generative Language API.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Configuration for the planner client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// API root; model paths are joined onto it
    pub base_url: String,
    pub model: String,
    /// Low values keep the output close to deterministic
    pub temperature: f32,
    /// Whole-request timeout; hitting it counts as "planner busy"
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: "gemini-3-flash-preview".to_string(),
            temperature: 0.2,
            timeout_secs: 60,
            api_key: None,
        }
    }
}

/// Client for requesting AI-optimized timetables.
pub struct PlannerClient {
    client: Client,
    config: PlannerConfig,
}

impl PlannerClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: PlannerConfig) -> Result<Self, PlannerError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| PlannerError::Unclassified {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// Requests a timetable for `constraints` and `subjects`.
    ///
    /// This is the main entry point for the AI generation path.
    pub async fn request_schedule(
        &self,
        constraints: &Constraints,
        subjects: &[Subject],
    ) -> Result<ScheduleDocument, PlannerError> {
        let correlation_id = generate_correlation_id();
        let start = Instant::now();

        info!(
            correlation_id = %correlation_id,
            model = %self.config.model,
            days = constraints.working_days.len(),
            subjects = subjects.len(),
            "Requesting AI timetable"
        );

        let result = self.execute_request(constraints, subjects, &correlation_id).await;

        match &result {
            Ok(document) => info!(
                correlation_id = %correlation_id,
                days = document.days.len(),
                entries = document.entry_count(),
                duration_ms = start.elapsed().as_millis() as u64,
                "AI timetable received"
            ),
            Err(e) => error!(
                correlation_id = %correlation_id,
                error = %e,
                retryable = e.is_retryable(),
                duration_ms = start.elapsed().as_millis() as u64,
                "AI timetable request failed"
            ),
        }

        result
    }

    async fn execute_request(
        &self,
        constraints: &Constraints,
        subjects: &[Subject],
        correlation_id: &str,
    ) -> Result<ScheduleDocument, PlannerError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PlannerError::classify("api_key is not configured"))?;

        let url = self.endpoint_url()?;
        let prompt = build_prompt(constraints, subjects);
        debug!(
            correlation_id = %correlation_id,
            prompt_len = prompt.len(),
            "Built planner prompt"
        );

        let body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "responseMimeType": "application/json",
                "responseSchema": response_schema(),
            }
        });

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(
                correlation_id = %correlation_id,
                status = %status,
                "Planner returned an error status"
            );
            return Err(PlannerError::classify(&format!(
                "Planner request failed with status {}: {}",
                status, text
            )));
        }

        decode_response(&text)
    }

    /// `{base_url}/models/{model}:generateContent`
    fn endpoint_url(&self) -> Result<Url, PlannerError> {
        let mut base = self.config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        Url::parse(&base)
            .and_then(|b| b.join(&format!("models/{}:generateContent", self.config.model)))
            .map_err(|e| PlannerError::Unclassified {
                message: format!("Invalid planner URL {:?}: {}", self.config.base_url, e),
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Decodes a `generateContent` response body into a timetable.
///
/// Anything that does not parse into the document shape is a
/// [`PlannerError::MalformedOutput`]; a safety stop is a
/// [`PlannerError::ContentPolicy`].
pub fn decode_response(body: &str) -> Result<ScheduleDocument, PlannerError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|_| PlannerError::MalformedOutput)?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(PlannerError::classify(&format!("Prompt blocked: {}", reason)));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(PlannerError::MalformedOutput)?;

    if let Some(reason) = candidate.finish_reason.as_deref() {
        if reason.eq_ignore_ascii_case("SAFETY") {
            return Err(PlannerError::ContentPolicy);
        }
    }

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(PlannerError::MalformedOutput);
    }

    let mut document: ScheduleDocument =
        serde_json::from_str(&text).map_err(|_| PlannerError::MalformedOutput)?;

    let assigned = document.ensure_entry_ids();
    if assigned > 0 {
        debug!(assigned, "Assigned ids to planner entries");
    }

    Ok(document)
}

/// Generates a unique correlation ID for request tracing.
fn generate_correlation_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_micros();
    let random: u32 = rand::thread_rng().gen();
    format!("{:x}-{:08x}", timestamp & 0xFFFFFFFF, random)
}
