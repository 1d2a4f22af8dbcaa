//! End-to-end start stream tests.
//!
//! Drive `BackendClient::start_server` and `StartHandle` over mocked bodies
//! and check the settled outcome.

mod common;

use bytes::Bytes;
use common::*;
use futures::stream::{self, StreamExt};
use gsctl::adapters::mock::MockResponse;
use gsctl::error::{StartError, STREAM_ENDED_EARLY};
use gsctl::sse::{EventFrame, FrameDecoder};
use gsctl::start::StartHandle;
use gsctl::traits::HttpError;
use std::time::Duration;

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_heartbeat_blank_done_without_trailing_newline() {
    let body = [
        "data: {\"type\":\"HEARTBEAT\"}",
        "",
        "data: {\"type\":\"DONE\",\"ports\":[25565]}",
    ]
    .join("\n");
    let client = mock_start("mc", vec![body]);

    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    assert_eq!(handle.outcome().await, Ok(vec![25565]));
}

#[tokio::test]
async fn test_error_frame_reports_message_verbatim() {
    let client = mock_start(
        "mc",
        vec!["data: {\"type\":\"ERROR\",\"message\":\"boom\"}".to_string()],
    );

    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    let err = handle.outcome().await.unwrap_err();
    assert_eq!(
        err,
        StartError::ServerReported {
            message: "boom".to_string()
        }
    );
    assert_eq!(err.to_string(), "boom");
}

#[tokio::test]
async fn test_absent_body_is_precondition_failure() {
    let client = mock_backend("mc", MockResponse::NoBody);
    let result = client.start_server("mc", &test_auth()).await;
    assert!(matches!(result, Err(StartError::MissingBody)));
}

#[tokio::test]
async fn test_present_but_empty_body_ends_early() {
    let client = mock_start("mc", vec![]);
    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    let err = handle.outcome().await.unwrap_err();
    assert_eq!(err, StartError::StreamTerminatedEarly);
}

// ============================================================================
// Chunk-boundary independence
// ============================================================================

#[test]
fn test_frames_identical_for_every_two_way_split() {
    let payload = format!("{}{}{}", heartbeat(), heartbeat(), done(&[25565, 25575]));
    let bytes = payload.as_bytes();

    let expected: Vec<EventFrame> = FrameDecoder::new().feed(bytes).collect();
    assert_eq!(expected.len(), 3);

    for a in 0..=bytes.len() {
        for b in a..=bytes.len() {
            let mut decoder = FrameDecoder::new();
            let mut frames = Vec::new();
            for part in split_at(bytes, &[a, b]) {
                frames.extend(decoder.feed(&part));
            }
            assert_eq!(frames, expected, "split at {} and {}", a, b);
        }
    }
}

#[tokio::test]
async fn test_multibyte_error_message_split_inside_code_point() {
    let payload = error("pull fehlgeschlagen: Größe überschritten ✗");
    let bytes = payload.as_bytes();

    // One byte per chunk splits every multi-byte character
    let parts: Vec<Vec<u8>> = bytes.iter().map(|b| vec![*b]).collect();
    let handle = StartHandle::spawn("mc", byte_chunks(parts));

    assert_eq!(
        handle.outcome().await,
        Err(StartError::ServerReported {
            message: "pull fehlgeschlagen: Größe überschritten ✗".to_string()
        })
    );
}

#[tokio::test]
async fn test_chunk_holding_many_lines() {
    let mut payload = String::new();
    for _ in 0..50 {
        payload.push_str(&heartbeat());
    }
    payload.push_str(&done(&[7777]));

    let handle = StartHandle::spawn("mc", byte_chunks(vec![payload.into_bytes()]));
    assert_eq!(handle.outcome().await, Ok(vec![7777]));
}

// ============================================================================
// Malformed-line tolerance
// ============================================================================

#[tokio::test]
async fn test_malformed_lines_do_not_fail_the_start() {
    let body = vec![
        "data: {not json\n".to_string(),
        "data: \n".to_string(),
        "    \n".to_string(),
        heartbeat(),
        "data: {\"type\":\"DONE\"}\n".to_string(),
        "data: {\"type\":\"REBOOT\"}\n".to_string(),
        "x\n".to_string(),
        done(&[25565]),
        "data: [1,2,3]\n".to_string(),
    ];
    let client = mock_start("mc", body);

    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    assert_eq!(handle.outcome().await, Ok(vec![25565]));
}

#[tokio::test]
async fn test_only_malformed_lines_end_early() {
    let client = mock_start("mc", vec!["data: {oops\n".to_string(), "data:\n".to_string()]);
    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    assert_eq!(
        handle.outcome().await,
        Err(StartError::StreamTerminatedEarly)
    );
}

// ============================================================================
// Exactly-once settlement
// ============================================================================

#[tokio::test]
async fn test_frames_after_done_do_not_change_outcome() {
    let client = mock_start(
        "mc",
        vec![
            format!("{}{}", done(&[1]), error("too late")),
            done(&[2]),
        ],
    );

    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    assert_eq!(handle.outcome().await, Ok(vec![1]));
}

#[tokio::test]
async fn test_read_error_after_error_frame_is_ignored() {
    let client = mock_backend(
        "mc",
        MockResponse::StreamThenError(
            vec![Bytes::from(error("disk full"))],
            HttpError::ConnectionFailed("reset".to_string()),
        ),
    );

    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    assert_eq!(
        handle.outcome().await,
        Err(StartError::ServerReported {
            message: "disk full".to_string()
        })
    );
}

// ============================================================================
// Early termination and transport failure
// ============================================================================

#[tokio::test]
async fn test_heartbeats_then_close_fails_early() {
    let client = mock_start("mc", vec![heartbeat(), heartbeat(), heartbeat()]);
    let handle = client.start_server("mc", &test_auth()).await.unwrap();

    let err = handle.outcome().await.unwrap_err();
    assert_eq!(err, StartError::StreamTerminatedEarly);
    assert_eq!(err.to_string(), STREAM_ENDED_EARLY);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_read_failure_wraps_transport_error() {
    let client = mock_backend(
        "mc",
        MockResponse::StreamThenError(
            vec![Bytes::from(heartbeat())],
            HttpError::ConnectionFailed("connection reset".to_string()),
        ),
    );

    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    assert_eq!(
        handle.outcome().await,
        Err(StartError::Transport(HttpError::ConnectionFailed(
            "connection reset".to_string()
        )))
    );
}

#[tokio::test]
async fn test_unauthorized_start_fails_before_decoding() {
    let client = mock_backend(
        "mc",
        MockResponse::Error(HttpError::ServerError {
            status: 401,
            message: "invalid token".to_string(),
        }),
    );

    let err = client.start_server("mc", &test_auth()).await.unwrap_err();
    assert!(err.requires_reauth());
    assert!(!err.is_retryable());
}

// ============================================================================
// Ports fidelity
// ============================================================================

#[tokio::test]
async fn test_ports_kept_in_order_without_dedup() {
    let client = mock_start(
        "mc",
        vec!["data: {\"type\":\"DONE\",\"ports\":[3,1,2,1]}\n".to_string()],
    );
    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    assert_eq!(handle.outcome().await, Ok(vec![3, 1, 2, 1]));
}

#[tokio::test]
async fn test_ports_one_two_three() {
    let handle = StartHandle::spawn(
        "mc",
        byte_chunks(vec![b"data: {\"type\":\"DONE\",\"ports\":[1,2,3]}\n".to_vec()]),
    );
    assert_eq!(handle.outcome().await, Ok(vec![1, 2, 3]));
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_before_settlement_produces_no_outcome() {
    // Heartbeat, then a body that never yields again
    let body = stream::iter(vec![Ok(Bytes::from(heartbeat()))]).chain(stream::pending());
    let handle = StartHandle::spawn("mc", Box::pin(body));

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!handle.is_finished());

    handle.cancel();
    handle.cancel();
    assert_eq!(handle.outcome().await, Err(StartError::Cancelled));
}

#[tokio::test]
async fn test_cancel_after_settlement_keeps_outcome() {
    let handle = StartHandle::spawn("mc", byte_chunks(vec![done(&[25565]).into_bytes()]));

    tokio::time::timeout(Duration::from_secs(1), async {
        while !handle.is_finished() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    handle.cancel();
    assert_eq!(handle.outcome().await, Ok(vec![25565]));
}

#[tokio::test]
async fn test_canceller_stops_a_start_being_awaited_elsewhere() {
    let body = stream::iter(vec![Ok(Bytes::from(heartbeat()))]).chain(stream::pending());
    let handle = StartHandle::spawn("mc", Box::pin(body));
    let canceller = handle.canceller();

    let waiter = tokio::spawn(handle.outcome());
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert!(!waiter.is_finished());

    tokio::spawn(async move { canceller.cancel() }).await.unwrap();

    let outcome = tokio::time::timeout(Duration::from_secs(1), waiter)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(outcome, Err(StartError::Cancelled));
}

#[tokio::test]
async fn test_start_request_carries_auth_and_accept_headers() {
    let client = mock_start("mc", vec![done(&[25565])]);
    let handle = client.start_server("mc", &test_auth()).await.unwrap();
    handle.outcome().await.unwrap();

    let requests = client.http().get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].url, start_url("mc"));
    assert_eq!(
        requests[0].headers.get("Authorization"),
        Some(&format!("Bearer {}", test_token()))
    );
    assert_eq!(
        requests[0].headers.get("Accept"),
        Some(&"text/event-stream".to_string())
    );
}
