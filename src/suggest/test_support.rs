//! Shared fixtures for suggestion tests
//!
//! `ScriptedTransport` replays a fixed sequence of outcomes, one per call, and
//! records when each attempt started on the tokio clock.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::provider::{CompletionTransport, SuggestError};
use crate::application::{ApplicationData, PersonalInfo, SituationInfo};

/// One scripted attempt outcome
#[derive(Debug, Clone)]
pub enum Step {
    Reply(String),
    Fail(SuggestError),
    /// Never completes on its own; only the cancel token ends it
    Hang,
    /// Reply after a delay
    Delayed(Duration, String),
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    attempts: Mutex<Vec<Instant>>,
}

impl ScriptedTransport {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: Mutex::new(steps.into()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// Transport that answers every call with `raw`
    pub fn replying(raw: &str, times: usize) -> Self {
        Self::new(vec![Step::Reply(raw.to_string()); times])
    }

    pub fn attempt_count(&self) -> usize {
        self.attempts.lock().unwrap().len()
    }

    /// Gaps between consecutive attempt starts
    pub fn gaps(&self) -> Vec<Duration> {
        let attempts = self.attempts.lock().unwrap();
        attempts.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

impl CompletionTransport for ScriptedTransport {
    fn name(&self) -> &str {
        "Scripted"
    }

    fn complete<'a>(
        &'a self,
        _prompt: &'a str,
        cancel: CancellationToken,
    ) -> BoxFuture<'a, Result<String, SuggestError>> {
        self.attempts.lock().unwrap().push(Instant::now());
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Step::Fail(SuggestError::Network {
                message: "script exhausted".to_string(),
            }));

        async move {
            match step {
                Step::Reply(raw) => Ok(raw),
                Step::Fail(err) => Err(err),
                Step::Hang => {
                    cancel.cancelled().await;
                    Err(SuggestError::Timeout)
                }
                Step::Delayed(delay, raw) => {
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => Err(SuggestError::Timeout),
                        _ = tokio::time::sleep(delay) => Ok(raw),
                    }
                }
            }
        }
        .boxed()
    }
}

pub const FULL_RESPONSE: &str = "Current Financial Situation:\nI am two months behind on rent.\n\nEmployment Circumstances:\nMy warehouse hours were cut in half.\n\nReason for Applying:\nI need help until my new contract starts.";

pub fn empty_situation_application() -> ApplicationData {
    ApplicationData {
        personal: PersonalInfo {
            name: "Amina Yusuf".to_string(),
            city: "Leeds".to_string(),
            ..Default::default()
        },
        situation: SituationInfo::default(),
        ..Default::default()
    }
}
