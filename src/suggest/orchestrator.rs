//! Suggestion orchestrator
//!
//! The single entry point callers use: `generate` runs the throttle gate, the
//! cache lookup, prompt building, the retrying request and section parsing in
//! strict sequence. Observable state (`loading`, `error`, `last_result`) is
//! kept alongside, and every transition is published to subscribers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::cache::SuggestionCache;
use super::executor::{RequestExecutor, RetryPolicy};
use super::parser::parse_sections;
use super::prompt::build_prompt;
use super::provider::{CompletionTransport, OpenAiClient, SuggestError};
use super::throttle::Throttler;
use crate::application::{ApplicationData, SuggestionResult};
use crate::config::AssistConfig;
use crate::error::AppError;

/// Snapshot of the orchestrator's observable state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestState {
    pub loading: bool,
    /// User-facing message of the most recent failure
    pub error: Option<String>,
    /// Last accepted suggestion; kept when a later request fails
    pub last_result: Option<SuggestionResult>,
}

/// State-change notifications delivered to subscribers
#[derive(Debug, Clone, PartialEq)]
pub enum SuggestEvent {
    /// A cache miss is about to hit the network
    Loading,
    Completed {
        result: SuggestionResult,
        from_cache: bool,
    },
    Failed {
        kind: &'static str,
        message: String,
    },
}

/// Outcome of a successful `generate_detailed` call
#[derive(Debug, Clone, PartialEq)]
pub struct Generated {
    pub result: SuggestionResult,
    /// Served from the cache without touching the network
    pub from_cache: bool,
}

/// Observable state plus the count of network requests still running
///
/// `view.loading` is true exactly while `in_flight > 0`. Throttle rejections
/// and cache hits leave both alone.
#[derive(Debug, Default)]
struct StateCell {
    view: SuggestState,
    in_flight: usize,
}

pub struct SuggestionOrchestrator {
    executor: RequestExecutor,
    cache: Mutex<SuggestionCache>,
    throttler: Mutex<Throttler>,
    state: Mutex<StateCell>,
    subscribers: Mutex<Vec<Sender<SuggestEvent>>>,
    serve_cache_before_throttle: bool,
}

impl StateCell {
    fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.view.loading = self.in_flight > 0;
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Current time on the tokio clock, so paused-clock tests drive the throttle too
fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

impl SuggestionOrchestrator {
    /// Build an orchestrator backed by the OpenAI client
    ///
    /// Fails when the credential or model is missing; there is no way to get
    /// an orchestrator without one.
    pub fn from_config(config: &AssistConfig) -> Result<Self, AppError> {
        let client = OpenAiClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Build an orchestrator over any transport
    pub fn new(transport: Arc<dyn CompletionTransport>, config: &AssistConfig) -> Self {
        let cache = match config.cache_capacity {
            Some(capacity) => SuggestionCache::with_capacity(capacity),
            None => SuggestionCache::new(),
        };

        Self {
            executor: RequestExecutor::new(transport, RetryPolicy::from_config(config)),
            cache: Mutex::new(cache),
            throttler: Mutex::new(Throttler::new(config.throttle_ms)),
            state: Mutex::new(StateCell::default()),
            subscribers: Mutex::new(Vec::new()),
            serve_cache_before_throttle: config.serve_cache_before_throttle,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.executor.transport_name()
    }

    /// Request rewritten situation sections for `data`
    ///
    /// On failure the user-facing message is also stored in `state().error`
    /// and the previous `last_result` is left in place.
    pub async fn generate(&self, data: &ApplicationData) -> Result<SuggestionResult, SuggestError> {
        self.generate_detailed(data).await.map(|generated| generated.result)
    }

    /// Same as `generate`, also reporting whether the cache answered
    pub async fn generate_detailed(&self, data: &ApplicationData) -> Result<Generated, SuggestError> {
        let key = data.cache_key();

        if self.serve_cache_before_throttle
            && let Some(hit) = self.cached(&key)
        {
            return Ok(hit);
        }

        let allowed = lock(&self.throttler).allow_at(now());
        if !allowed {
            log::debug!("Suggestion request throttled");
            return Err(self.fail(SuggestError::Throttled, false));
        }

        if !self.serve_cache_before_throttle
            && let Some(hit) = self.cached(&key)
        {
            return Ok(hit);
        }

        self.update(|cell| {
            cell.in_flight += 1;
            cell.view.loading = true;
            cell.view.error = None;
        });
        self.publish(SuggestEvent::Loading);

        let prompt = build_prompt(data);
        match self.executor.execute(&prompt).await {
            Ok(raw) => {
                let result = parse_sections(&raw, &data.situation);
                lock(&self.cache).put(key, result.clone());
                self.succeed(result.clone(), false, true);
                Ok(Generated {
                    result,
                    from_cache: false,
                })
            }
            Err(err) => Err(self.fail(err, true)),
        }
    }

    /// Snapshot of the current observable state
    pub fn state(&self) -> SuggestState {
        lock(&self.state).view.clone()
    }

    /// Receive every subsequent state transition
    pub fn subscribe(&self) -> Receiver<SuggestEvent> {
        let (tx, rx) = mpsc::channel();
        lock(&self.subscribers).push(tx);
        rx
    }

    pub fn cache_len(&self) -> usize {
        lock(&self.cache).len()
    }

    pub fn clear_cache(&self) {
        lock(&self.cache).clear();
    }

    fn cached(&self, key: &str) -> Option<Generated> {
        let hit = lock(&self.cache).get(key)?;
        log::debug!("Suggestion served from cache");
        self.succeed(hit.clone(), true, false);
        Some(Generated {
            result: hit,
            from_cache: true,
        })
    }

    /// `finished_request` is set only by the call that raised `loading`
    fn succeed(&self, result: SuggestionResult, from_cache: bool, finished_request: bool) {
        self.update(|cell| {
            if finished_request {
                cell.finish_request();
            }
            cell.view.error = None;
            cell.view.last_result = Some(result.clone());
        });
        self.publish(SuggestEvent::Completed { result, from_cache });
    }

    fn fail(&self, err: SuggestError, finished_request: bool) -> SuggestError {
        let message = err.user_message();
        log::debug!("Suggestion request failed: {}", err);
        self.update(|cell| {
            if finished_request {
                cell.finish_request();
            }
            cell.view.error = Some(message.clone());
        });
        self.publish(SuggestEvent::Failed {
            kind: err.kind(),
            message,
        });
        err
    }

    fn update(&self, f: impl FnOnce(&mut StateCell)) {
        f(&mut lock(&self.state));
    }

    fn publish(&self, event: SuggestEvent) {
        // Drop subscribers whose receiver has gone away
        lock(&self.subscribers).retain(|tx| tx.send(event.clone()).is_ok());
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
