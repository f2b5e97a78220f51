//! Tests for the suggestion worker thread

use super::*;
use crate::config::AssistConfig;
use crate::suggest::provider::SuggestError;
use crate::suggest::test_support::{
    FULL_RESPONSE, ScriptedTransport, Step, empty_situation_application,
};
use std::sync::mpsc;
use std::time::Duration;

fn spawn_with(
    transport: ScriptedTransport,
    config: AssistConfig,
) -> (
    Sender<AssistRequest>,
    Receiver<AssistResponse>,
    JoinHandle<()>,
) {
    let orchestrator = Arc::new(SuggestionOrchestrator::new(Arc::new(transport), &config));
    let (request_tx, request_rx) = mpsc::channel();
    let (response_tx, response_rx) = mpsc::channel();
    let handle = spawn_worker(orchestrator, request_rx, response_tx);
    (request_tx, response_rx, handle)
}

fn no_throttle() -> AssistConfig {
    AssistConfig {
        throttle_ms: 0,
        ..AssistConfig::default()
    }
}

fn recv(rx: &Receiver<AssistResponse>) -> AssistResponse {
    rx.recv_timeout(Duration::from_secs(5))
        .expect("worker should respond")
}

#[test]
fn test_worker_returns_parsed_suggestion() {
    let (tx, rx, _handle) = spawn_with(ScriptedTransport::replying(FULL_RESPONSE, 1), no_throttle());

    tx.send(AssistRequest::Generate {
        data: empty_situation_application(),
        request_id: 7,
    })
    .unwrap();

    match recv(&rx) {
        AssistResponse::Suggestion {
            request_id,
            result,
            from_cache,
        } => {
            assert_eq!(request_id, 7);
            assert!(!from_cache);
            assert_eq!(result.reason, "I need help until my new contract starts.");
        }
        other => panic!("Expected suggestion, got {:?}", other),
    }
}

#[test]
fn test_worker_reports_cache_hits() {
    let (tx, rx, _handle) = spawn_with(ScriptedTransport::replying(FULL_RESPONSE, 1), no_throttle());
    let data = empty_situation_application();

    for request_id in 1..=2 {
        tx.send(AssistRequest::Generate {
            data: data.clone(),
            request_id,
        })
        .unwrap();
    }

    let first = recv(&rx);
    let second = recv(&rx);
    assert!(matches!(
        first,
        AssistResponse::Suggestion {
            request_id: 1,
            from_cache: false,
            ..
        }
    ));
    assert!(matches!(
        second,
        AssistResponse::Suggestion {
            request_id: 2,
            from_cache: true,
            ..
        }
    ));
}

#[test]
fn test_worker_reports_failure_kind_and_message() {
    let (tx, rx, _handle) = spawn_with(
        ScriptedTransport::new(vec![Step::Fail(SuggestError::ClientError {
            detail: "model not found".to_string(),
        })]),
        no_throttle(),
    );

    tx.send(AssistRequest::Generate {
        data: empty_situation_application(),
        request_id: 3,
    })
    .unwrap();

    assert_eq!(
        recv(&rx),
        AssistResponse::Failed {
            request_id: 3,
            kind: "client_error",
            message: "model not found".to_string(),
        }
    );
}

#[test]
fn test_worker_reports_throttled_requests() {
    let (tx, rx, _handle) = spawn_with(
        ScriptedTransport::replying(FULL_RESPONSE, 2),
        AssistConfig::default(),
    );
    let mut data = empty_situation_application();

    tx.send(AssistRequest::Generate {
        data: data.clone(),
        request_id: 1,
    })
    .unwrap();
    data.situation.reason = "edited".to_string();
    tx.send(AssistRequest::Generate { data, request_id: 2 })
        .unwrap();

    assert!(matches!(recv(&rx), AssistResponse::Suggestion { .. }));
    assert!(matches!(
        recv(&rx),
        AssistResponse::Failed {
            request_id: 2,
            kind: "throttled",
            ..
        }
    ));
}

#[test]
fn test_worker_shuts_down_when_channel_closed() {
    let (tx, _rx, handle) = spawn_with(ScriptedTransport::default(), no_throttle());

    drop(tx);

    handle.join().expect("Worker thread should exit cleanly");
}

#[test]
fn test_worker_stops_when_response_receiver_dropped() {
    let (tx, rx, handle) = spawn_with(ScriptedTransport::replying(FULL_RESPONSE, 1), no_throttle());
    drop(rx);

    tx.send(AssistRequest::Generate {
        data: empty_situation_application(),
        request_id: 1,
    })
    .unwrap();

    handle.join().expect("Worker thread should exit after failed send");
}
