//! Suggestion worker thread
//!
//! Runs the orchestrator on a background thread so a synchronous caller (the
//! form front end, the CLI) never blocks on the network. Requests arrive over
//! a channel and are handled one at a time on a single-threaded tokio
//! runtime; results go back over a second channel.
//!
//! Includes panic handling so a crash inside the worker is reported as a
//! failed response instead of tearing down the caller.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender};
use std::thread::JoinHandle;

use super::orchestrator::SuggestionOrchestrator;
use crate::application::{ApplicationData, SuggestionResult};

/// Request messages sent to the worker thread
#[derive(Debug)]
pub enum AssistRequest {
    /// Ask for rewritten situation sections
    Generate {
        data: ApplicationData,
        /// Echoed back so callers can drop stale responses
        request_id: u64,
    },
}

/// Response messages received from the worker thread
#[derive(Debug, Clone, PartialEq)]
pub enum AssistResponse {
    Suggestion {
        request_id: u64,
        result: SuggestionResult,
        from_cache: bool,
    },
    Failed {
        request_id: u64,
        kind: &'static str,
        message: String,
    },
}

/// Spawn the suggestion worker thread
///
/// The thread exits once every `Sender<AssistRequest>` is dropped.
pub fn spawn_worker(
    orchestrator: Arc<SuggestionOrchestrator>,
    request_rx: Receiver<AssistRequest>,
    response_tx: Sender<AssistResponse>,
) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to create tokio runtime");

            rt.block_on(worker_loop(orchestrator, request_rx, response_tx));
        }));

        if let Err(e) = result {
            let panic_msg = if let Some(s) = e.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = e.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            };
            log::error!("Suggestion worker thread panicked: {}", panic_msg);
        }
    })
}

/// Process requests until the channel is closed
///
/// Blocking `recv()` is fine here since the worker owns its thread.
async fn worker_loop(
    orchestrator: Arc<SuggestionOrchestrator>,
    request_rx: Receiver<AssistRequest>,
    response_tx: Sender<AssistResponse>,
) {
    while let Ok(request) = request_rx.recv() {
        match request {
            AssistRequest::Generate { data, request_id } => {
                let response = handle_generate(&orchestrator, &data, request_id).await;
                if response_tx.send(response).is_err() {
                    log::debug!("Response receiver dropped, stopping worker");
                    break;
                }
            }
        }
    }
}

async fn handle_generate(
    orchestrator: &SuggestionOrchestrator,
    data: &ApplicationData,
    request_id: u64,
) -> AssistResponse {
    match orchestrator.generate_detailed(data).await {
        Ok(generated) => AssistResponse::Suggestion {
            request_id,
            result: generated.result,
            from_cache: generated.from_cache,
        },
        Err(err) => AssistResponse::Failed {
            request_id,
            kind: err.kind(),
            message: err.user_message(),
        },
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
