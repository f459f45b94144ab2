//! Error types for the AI planner.

use thiserror::Error;

/// Message fragments, checked case-insensitively in this order.
const AUTH_FRAGMENTS: &[&str] = &["api_key", "401", "403"];
const CAPACITY_FRAGMENTS: &[&str] = &["quota", "429", "rate limit"];
const POLICY_FRAGMENTS: &[&str] = &["safety", "finish_reason_safety", "blocked"];
const OVERLOAD_FRAGMENTS: &[&str] = &["overloaded", "503", "server error", "500"];
const MALFORMED_FRAGMENTS: &[&str] = &["json", "parse"];
const CONNECTIVITY_FRAGMENTS: &[&str] = &["network", "fetch", "internet"];

/// Errors that can occur while requesting an AI-optimized timetable.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlannerError {
    /// Nothing to schedule; the request was never sent
    #[error("Data input error: add at least one subject before generating a timetable.")]
    InvalidInput,

    /// Credential missing, invalid or lacking permission
    #[error("Authentication failed: the planner API key is invalid or lacks permission. Check the service configuration.")]
    Authentication,

    /// Quota or rate limit reached
    #[error("Capacity reached: too many requests at once. Wait about a minute and try again.")]
    RateLimited,

    /// The planner refused the content
    #[error("Policy restriction: the request was flagged by the planner's safety filters. Rephrase subject names and custom rules.")]
    ContentPolicy,

    /// The planner is overloaded, failing or did not answer in time
    #[error("Planner busy: the service is overloaded right now. Retrying in a few moments usually helps.")]
    ServiceOverloaded,

    /// The response was not a valid timetable document
    #[error("Formatting error: the planner returned a malformed timetable. Retrying usually fixes this.")]
    MalformedOutput,

    /// Could not reach the planner at all
    #[error("Connectivity issue: could not reach the planner. Check the network connection and try again.")]
    Connectivity,

    /// Anything else, with the raw message
    #[error("Scheduling failure: {message}")]
    Unclassified { message: String },
}

impl PlannerError {
    /// Classifies a raw failure message by its content.
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let matches = |fragments: &[&str]| fragments.iter().any(|f| lower.contains(f));

        if matches(AUTH_FRAGMENTS) {
            PlannerError::Authentication
        } else if matches(CAPACITY_FRAGMENTS) {
            PlannerError::RateLimited
        } else if matches(POLICY_FRAGMENTS) {
            PlannerError::ContentPolicy
        } else if matches(OVERLOAD_FRAGMENTS) {
            PlannerError::ServiceOverloaded
        } else if matches(MALFORMED_FRAGMENTS) {
            PlannerError::MalformedOutput
        } else if matches(CONNECTIVITY_FRAGMENTS) {
            PlannerError::Connectivity
        } else if message.trim().is_empty() {
            PlannerError::Unclassified {
                message: "an unexpected error occurred in the planner".to_string(),
            }
        } else {
            PlannerError::Unclassified {
                message: message.to_string(),
            }
        }
    }

    /// Returns true if repeating the same request is likely to succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PlannerError::RateLimited
                | PlannerError::ServiceOverloaded
                | PlannerError::MalformedOutput
                | PlannerError::Connectivity
        )
    }
}

impl From<reqwest::Error> for PlannerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PlannerError::ServiceOverloaded
        } else if err.is_connect() {
            PlannerError::Connectivity
        } else if err.is_decode() {
            PlannerError::MalformedOutput
        } else {
            PlannerError::classify(&err.to_string())
        }
    }
}
