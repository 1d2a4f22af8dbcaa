//! Trait abstractions for external collaborators.
//!
//! The backend is reached through [`HttpClient`] so the start flow can run
//! against the reqwest adapter in production and a mock in tests.

pub mod http;

pub use http::{ByteStream, Headers, HttpClient, HttpError, Response, StreamResponse};
