//! OpenAI chat-completions client
//!
//! One non-streaming POST per attempt. Uses reqwest for HTTP and races the
//! request against the attempt's CancellationToken.

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::{CompletionTransport, SuggestError};
use crate::config::AssistConfig;
use crate::error::AppError;

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

/// Async OpenAI API client
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String, endpoint: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            endpoint,
        }
    }

    /// Create a client from the `[assist]` section
    ///
    /// A missing or blank API key or model is fatal.
    pub fn from_config(config: &AssistConfig) -> Result<Self, AppError> {
        let api_key = config
            .api_key
            .as_ref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::NotConfigured {
                message: "missing API key".to_string(),
            })?;

        let model = config
            .model
            .as_ref()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| AppError::NotConfigured {
                message: "missing model (e.g. 'gpt-3.5-turbo')".to_string(),
            })?;

        Ok(Self::new(
            api_key.clone(),
            model.clone(),
            config.endpoint.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> RequestBody<'a> {
        RequestBody {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        }
    }

    async fn send(&self, prompt: &str) -> Result<String, SuggestError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| SuggestError::Network {
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SuggestError::Network {
            message: e.to_string(),
        })?;

        if let Some(err) = classify_status(status, &body) {
            return Err(err);
        }

        extract_content(&body)
    }
}

impl CompletionTransport for OpenAiClient {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn complete<'a>(
        &'a self,
        prompt: &'a str,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, Result<String, SuggestError>> {
        async move {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => {
                    log::debug!("OpenAI request cancelled");
                    Err(SuggestError::Timeout)
                }

                result = self.send(prompt) => result,
            }
        }
        .boxed()
    }
}

/// Map a non-success HTTP status to its failure kind
///
/// Returns `None` for 2xx. For 4xx other than 429 the remote
/// `error.message` is used when present, otherwise the status reason.
pub fn classify_status(status: StatusCode, body: &str) -> Option<SuggestError> {
    if status.is_success() {
        return None;
    }

    let code = status.as_u16();
    Some(match code {
        429 => SuggestError::RateLimit,
        400..=499 => SuggestError::ClientError {
            detail: remote_error_message(body).unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            }),
        },
        500..=599 => SuggestError::ServerError { status: code },
        _ => SuggestError::UnexpectedStatus { status: code },
    })
}

fn remote_error_message(body: &str) -> Option<String> {
    #[derive(Debug, Deserialize)]
    struct ErrorEnvelope {
        error: Option<ErrorBody>,
    }
    #[derive(Debug, Deserialize)]
    struct ErrorBody {
        message: Option<String>,
    }

    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()?
        .error?
        .message
        .filter(|m| !m.trim().is_empty())
}

/// Pull `choices[0].message.content` out of a success body, trimmed
pub fn extract_content(body: &str) -> Result<String, SuggestError> {
    let value: Value = serde_json::from_str(body).map_err(|e| SuggestError::UnexpectedFormat {
        message: format!("invalid JSON body: {}", e),
    })?;

    let content = value
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| SuggestError::UnexpectedFormat {
            message: "missing choices[0].message.content".to_string(),
        })?;

    Ok(content.to_string())
}

#[cfg(test)]
#[path = "openai_tests.rs"]
mod openai_tests;
