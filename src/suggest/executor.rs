//! Request executor with timeout, retry and exponential backoff
//!
//! Each attempt gets its own CancellationToken, cancelled when the attempt
//! outlives `RetryPolicy::timeout`. Transient failures (timeout, 5xx,
//! transport) are retried after `initial_backoff`, doubling per retry.
//! Everything else propagates on the first occurrence.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::provider::{CompletionTransport, SuggestError};
use crate::config::AssistConfig;

/// Attempt limits for one logical request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    /// Wall-clock bound per attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(1000),
            timeout: Duration::from_millis(15_000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &AssistConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            timeout: Duration::from_millis(config.timeout_ms),
        }
    }

    /// Delay before retry number `retry` (1-based): 1s, 2s, 4s, ...
    pub fn backoff_for(&self, retry: u32) -> Duration {
        let shift = retry.saturating_sub(1).min(16);
        self.initial_backoff.saturating_mul(1u32 << shift)
    }
}

/// Transient per-call attempt bookkeeping; dropped when the call settles
#[derive(Debug)]
struct AttemptState {
    attempt: u32,
    backoff: Duration,
}

/// Performs one logical suggestion request against a transport
pub struct RequestExecutor {
    transport: Arc<dyn CompletionTransport>,
    policy: RetryPolicy,
}

impl RequestExecutor {
    pub fn new(transport: Arc<dyn CompletionTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Run `prompt` through the transport, retrying transient failures
    ///
    /// Returns the raw completion text, or the last failure once attempts are
    /// exhausted or a non-retryable failure occurs.
    pub async fn execute(&self, prompt: &str) -> Result<String, SuggestError> {
        let mut state = AttemptState {
            attempt: 0,
            backoff: self.policy.initial_backoff,
        };

        loop {
            state.attempt += 1;
            log::debug!(
                "[{}] attempt {}/{}",
                self.transport.name(),
                state.attempt,
                self.policy.max_attempts
            );

            let err = match self.attempt(prompt).await {
                Ok(raw) => return Ok(raw),
                Err(err) => err,
            };

            if !err.is_retryable() || state.attempt >= self.policy.max_attempts {
                log::debug!(
                    "[{}] giving up after attempt {}: {}",
                    self.transport.name(),
                    state.attempt,
                    err
                );
                return Err(err);
            }

            log::warn!(
                "[{}] attempt {} failed ({}), retrying in {:?}",
                self.transport.name(),
                state.attempt,
                err.kind(),
                state.backoff
            );
            tokio::time::sleep(state.backoff).await;
            state.backoff = state.backoff.saturating_mul(2);
        }
    }

    /// One attempt bounded by the policy timeout
    async fn attempt(&self, prompt: &str) -> Result<String, SuggestError> {
        let cancel = CancellationToken::new();
        let call = self.transport.complete(prompt, cancel.clone());

        match tokio::time::timeout(self.policy.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                Err(SuggestError::Timeout)
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod executor_tests;
