//! Completion provider abstraction
//!
//! Defines the `SuggestError` taxonomy and the `CompletionTransport` seam the
//! executor drives. One `complete` call is one network attempt; retries,
//! timeouts and backoff belong to the executor.

use futures::future::BoxFuture;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

pub mod openai;

pub use openai::OpenAiClient;

/// Failures a single `generate` invocation can end with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SuggestError {
    /// Rejected by the throttle gate before any work was done
    #[error("Throttled: call arrived inside the minimum interval")]
    Throttled,

    /// Remote returned 429
    #[error("Rate limited by the completion API")]
    RateLimit,

    /// An attempt exceeded its wall-clock bound
    #[error("Request timed out")]
    Timeout,

    /// Remote returned 5xx
    #[error("Server error ({status})")]
    ServerError { status: u16 },

    /// Transport failure, no response received
    #[error("Network error: {message}")]
    Network { message: String },

    /// Remote returned 4xx other than 429
    #[error("Client error: {detail}")]
    ClientError { detail: String },

    /// Response received but `choices[0].message.content` missing or not a string
    #[error("Unexpected response format: {message}")]
    UnexpectedFormat { message: String },

    /// Non-success status outside the 4xx/5xx ranges
    #[error("Unexpected status {status}")]
    UnexpectedStatus { status: u16 },
}

impl SuggestError {
    /// Stable tag for this failure kind
    pub fn kind(&self) -> &'static str {
        match self {
            SuggestError::Throttled => "throttled",
            SuggestError::RateLimit => "rate_limit",
            SuggestError::Timeout => "timeout",
            SuggestError::ServerError { .. } => "server_error",
            SuggestError::Network { .. } => "network_error",
            SuggestError::ClientError { .. } => "client_error",
            SuggestError::UnexpectedFormat { .. } => "unexpected_format",
            SuggestError::UnexpectedStatus { .. } => "unexpected_status",
        }
    }

    /// Whether the executor may spend another attempt on this failure
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SuggestError::Timeout | SuggestError::ServerError { .. } | SuggestError::Network { .. }
        )
    }

    /// Message shown to the applicant
    pub fn user_message(&self) -> String {
        match self {
            SuggestError::Throttled => "Please wait a moment before requesting again.".to_string(),
            SuggestError::RateLimit => {
                "You've hit the rate limit. Please wait a moment or upgrade your plan.".to_string()
            }
            SuggestError::Timeout => "The request timed out. Please try again.".to_string(),
            SuggestError::ServerError { .. } => {
                "Something went wrong on our side. Please try again later.".to_string()
            }
            SuggestError::Network { .. } => {
                "Network error. Please check your connection and try again.".to_string()
            }
            SuggestError::ClientError { detail } => detail.clone(),
            SuggestError::UnexpectedFormat { .. } | SuggestError::UnexpectedStatus { .. } => {
                "An unexpected error occurred.".to_string()
            }
        }
    }
}

/// One network attempt against a text-completion endpoint
///
/// Implementations must return promptly with `SuggestError::Timeout` once
/// `cancel` fires; the executor cancels the token when an attempt runs past
/// its timeout.
pub trait CompletionTransport: Send + Sync {
    /// Display name used in logs
    fn name(&self) -> &str;

    /// Send `prompt` and return the raw completion text
    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, Result<String, SuggestError>>;
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod provider_tests;
