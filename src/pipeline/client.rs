//! Submission transport: POST the diary entry and decode the reply.
//!
//! [`SubmissionClient`] makes exactly one attempt per call. There is no
//! retry, no backoff and no timeout beyond what the configuration sets
//! (none by default). The HTTP layer sits behind the [`Transport`] trait so
//! the controller can be exercised without a network.
//!
//! A reply with a non-2xx status is not a transport failure: its body is
//! decoded like any other. Only failing to reach the server at all, or
//! failing to read the body, counts as [`SubmitError::Transport`].

use crate::config::SubmissionConfig;
use crate::error::{DiaryError, SubmitError};
use crate::output::{Confirmation, SubmissionRequest};
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Send a JSON body, get the raw reply text back.
///
/// The error string is shown to the user as-is.
pub trait Transport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<String, String>>;
}

/// [`Transport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client. `None` keeps reqwest's default timeout behaviour.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, DiaryError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| DiaryError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: &'a serde_json::Value,
    ) -> BoxFuture<'a, Result<String, String>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .json(body)
                .send()
                .await
                .map_err(|e| e.to_string())?;

            let status = response.status();
            if status.is_success() {
                debug!("POST {} → HTTP {}", url, status);
            } else {
                warn!("POST {} → HTTP {}; decoding body anyway", url, status);
            }

            response.text().await.map_err(|e| e.to_string())
        })
    }
}

/// Serialises a [`SubmissionRequest`], sends it once, decodes the reply.
#[derive(Clone)]
pub struct SubmissionClient {
    transport: Arc<dyn Transport>,
    url: String,
}

impl fmt::Debug for SubmissionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmissionClient")
            .field("transport", &"<dyn Transport>")
            .field("url", &self.url)
            .finish()
    }
}

impl SubmissionClient {
    /// Client talking HTTP to the configured endpoint.
    pub fn new(config: &SubmissionConfig) -> Result<Self, DiaryError> {
        let transport = HttpTransport::new(config.timeout_secs)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Client using a caller-supplied transport.
    pub fn with_transport(config: &SubmissionConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            url: config.submission_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Perform one submission round-trip.
    ///
    /// # Errors
    /// - [`SubmitError::Transport`] when the server could not be reached;
    ///   the message is the transport's own.
    /// - [`SubmitError::Decode`] when the reply is not a JSON object.
    pub async fn submit(&self, request: &SubmissionRequest) -> Result<Confirmation, SubmitError> {
        let body = serde_json::to_value(request).map_err(|e| SubmitError::Transport {
            message: format!("Request could not be serialised: {e}"),
        })?;

        info!(
            "Submitting diary entry with {} photo(s) to {}",
            request.image_data.len(),
            self.url
        );

        let reply = self
            .transport
            .post_json(&self.url, &body)
            .await
            .map_err(|message| {
                warn!("Submission failed in transport: {}", message);
                SubmitError::Transport { message }
            })?;

        debug!("Reply body: {} bytes", reply.len());

        Confirmation::from_body(&reply).inspect_err(|e| {
            warn!("Reply from {} could not be decoded: {}", self.url, e);
        })
    }
}
