//! Common test utilities for integration tests.
//!
//! Frame builders for the start stream and helpers that wire a
//! [`BackendClient`] to the crate's [`MockHttpClient`].
//!
//! # Example
//!
//! ```ignore
//! use common::{done, heartbeat, mock_start};
//!
//! let client = mock_start("mc", vec![heartbeat(), done(&[25565])]);
//! ```

#![allow(dead_code)]

use bytes::Bytes;
use futures::stream::{self, Stream};
use gsctl::adapters::mock::{MockHttpClient, MockResponse};
use gsctl::auth::AuthContext;
use gsctl::backend::BackendClient;
use gsctl::traits::HttpError;

pub const TEST_BASE_URL: &str = "http://panel.test";

/// Token used by every test request.
pub fn test_token() -> String {
    "test-auth-token".to_string()
}

pub fn test_auth() -> AuthContext {
    AuthContext::bearer(test_token())
}

/// One newline-terminated heartbeat line.
pub fn heartbeat() -> String {
    "data: {\"type\":\"HEARTBEAT\"}\n".to_string()
}

/// One newline-terminated DONE line carrying `ports`.
pub fn done(ports: &[u16]) -> String {
    format!(
        "data: {}\n",
        serde_json::json!({ "type": "DONE", "ports": ports })
    )
}

/// One newline-terminated ERROR line.
pub fn error(message: &str) -> String {
    format!(
        "data: {}\n",
        serde_json::json!({ "type": "ERROR", "message": message })
    )
}

pub fn start_url(name: &str) -> String {
    format!("{}/game-server/{}/start", TEST_BASE_URL, name)
}

pub fn stop_url(name: &str) -> String {
    format!("{}/game-server/{}/stop", TEST_BASE_URL, name)
}

/// A client whose start endpoint for `name` streams `chunks` and then ends.
pub fn mock_start(name: &str, chunks: Vec<String>) -> BackendClient<MockHttpClient> {
    mock_backend(name, MockResponse::Stream(chunks.into_iter().map(Bytes::from).collect()))
}

/// A client whose start endpoint for `name` answers with `response`.
pub fn mock_backend(name: &str, response: MockResponse) -> BackendClient<MockHttpClient> {
    let http = MockHttpClient::new();
    http.set_response(&start_url(name), response);
    BackendClient::with_http(TEST_BASE_URL, http)
}

/// Body stream over raw byte chunks.
pub fn byte_chunks(
    parts: Vec<Vec<u8>>,
) -> impl Stream<Item = Result<Bytes, HttpError>> + Send + Unpin + 'static {
    stream::iter(parts.into_iter().map(|p| Ok(Bytes::from(p))).collect::<Vec<_>>())
}

/// Split `payload` at each of `cuts` (sorted byte offsets).
pub fn split_at(payload: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for &cut in cuts {
        parts.push(payload[start..cut].to_vec());
        start = cut;
    }
    parts.push(payload[start..].to_vec());
    parts
}
