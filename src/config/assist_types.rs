// Suggestion assistant configuration type definitions

use serde::Deserialize;

/// Default OpenAI chat-completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

fn default_model() -> Option<String> {
    Some("gpt-3.5-turbo".to_string())
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

/// Per-attempt wall-clock bound
fn default_timeout_ms() -> u64 {
    15_000
}

fn default_max_attempts() -> u32 {
    3
}

/// First retry delay; doubles on each subsequent retry
fn default_initial_backoff_ms() -> u64 {
    1000
}

/// Minimum interval between accepted `generate` calls
fn default_throttle_ms() -> u64 {
    2000
}

/// `[assist]` configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct AssistConfig {
    /// Bearer credential for the completion endpoint (required)
    pub api_key: Option<String>,
    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u64,
    /// Bound on cached suggestions; unbounded when absent
    #[serde(default)]
    pub cache_capacity: Option<usize>,
    /// Answer cache hits before consulting the throttle gate
    ///
    /// Off by default, so the throttle runs first: an identical request
    /// inside the throttle window is rejected as throttled instead of being
    /// answered from the cache. Turn on to serve repeats without the wait.
    #[serde(default)]
    pub serve_cache_before_throttle: bool,
}

impl Default for AssistConfig {
    fn default() -> Self {
        AssistConfig {
            api_key: None,
            model: default_model(),
            endpoint: default_endpoint(),
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            throttle_ms: default_throttle_ms(),
            cache_capacity: None,
            serve_cache_before_throttle: false,
        }
    }
}

#[cfg(test)]
#[path = "assist_types_tests.rs"]
mod assist_types_tests;
