//! Panel API client for game-server lifecycle calls.
//!
//! Starting a server streams progress over Server-Sent Events and is handed
//! to a [`StartHandle`]; stopping is a plain request/response call.

use tracing::{debug, info, warn};

use crate::adapters::ReqwestHttpClient;
use crate::auth::AuthContext;
use crate::config::ClientConfig;
use crate::error::StartError;
use crate::start::StartHandle;
use crate::traits::{HttpClient, HttpError};

/// Client for the panel's `/game-server` endpoints.
pub struct BackendClient<C: HttpClient = ReqwestHttpClient> {
    /// Base URL for the panel API, without trailing slash
    base_url: String,
    http: C,
}

impl BackendClient<ReqwestHttpClient> {
    /// Create a reqwest-backed client from configuration.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpError> {
        let http = ReqwestHttpClient::from_config(config)?;
        Ok(Self::with_http(config.base_url.clone(), http))
    }
}

impl<C: HttpClient> BackendClient<C> {
    /// Create a client over any [`HttpClient`].
    pub fn with_http(base_url: impl Into<String>, http: C) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// URL for a lifecycle action on one server. The name is percent-encoded
    /// as a single path segment.
    pub fn server_url(&self, name: &str, action: &str) -> String {
        format!(
            "{}/game-server/{}/{}",
            self.base_url,
            urlencoding::encode(name),
            action
        )
    }

    /// Open the start stream for `name` and begin reading it.
    ///
    /// Errors here happen before any frame is decoded: the request failed,
    /// the panel answered with a non-2xx status, or the response has no body.
    /// Everything after that is reported through the returned handle.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn start_server(
        &self,
        name: &str,
        auth: &AuthContext,
    ) -> Result<StartHandle, StartError> {
        let url = self.server_url(name, "start");
        let mut headers = auth.headers();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        debug!(server = name, %url, "Opening start stream");
        let response = self.http.post_stream(&url, "", &headers).await?;
        match response.content_type() {
            Some(_) if response.is_event_stream() => {}
            Some(content_type) => warn!(
                server = name,
                content_type,
                "Start response is not declared as an event stream"
            ),
            None => debug!(server = name, "Start response has no content type"),
        }
        let body = response.body.ok_or(StartError::MissingBody)?;

        let handle = StartHandle::spawn(name, body);
        info!(server = name, op = %handle.id(), "Start stream opened");
        Ok(handle)
    }

    /// Ask the panel to stop `name`.
    pub async fn stop_server(&self, name: &str, auth: &AuthContext) -> Result<(), HttpError> {
        let url = self.server_url(name, "stop");
        let response = self.http.post(&url, "", &auth.headers()).await?;

        if !response.is_success() {
            let message = response
                .text()
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HttpError::ServerError {
                status: response.status,
                message,
            });
        }

        info!(server = name, "Server stop requested");
        Ok(())
    }
}
