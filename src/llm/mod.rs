pub mod chat;

use thiserror::Error;

/// Failures of a single completion call. None of them are retried.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Invalid API key format: {0}")]
    InvalidApiKey(String),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Completion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Malformed completion response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("No response from completion API")]
    EmptyChoices,
    #[error("Completion choice carried no message content")]
    MissingContent,
}
