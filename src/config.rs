//! Configuration types for diary submission.
//!
//! Every knob lives in [`SubmissionConfig`], built via its
//! [`SubmissionConfigBuilder`]. The defaults reproduce the shipped screen
//! exactly, including its two known quirks (silently dropped replies and
//! display-only photo removal); the policy enums let a caller opt out.

use crate::error::DiaryError;
use serde::{Deserialize, Serialize};

/// Server root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://reqres.in/";

/// Path of the diary creation endpoint, relative to the base URL.
pub const DEFAULT_ENDPOINT: &str = "api/users";

/// Base64 wrap width of the encoded photos.
pub const DEFAULT_LINE_LENGTH: usize = 64;

/// Configuration for the submission pipeline.
///
/// # Example
/// ```rust
/// use new_diary::{DecodeFailurePolicy, SubmissionConfig};
///
/// let config = SubmissionConfig::builder()
///     .base_url("http://localhost:8080")
///     .decode_failure(DecodeFailurePolicy::Report)
///     .build()
///     .unwrap();
/// assert_eq!(config.submission_url(), "http://localhost:8080/api/users");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionConfig {
    /// Server root, e.g. `https://reqres.in/`. Default: [`DEFAULT_BASE_URL`].
    pub base_url: String,

    /// Endpoint path joined onto `base_url`. Default: [`DEFAULT_ENDPOINT`].
    pub endpoint: String,

    /// Characters per line in the base64 photo text. 0 disables wrapping.
    /// Default: 64.
    pub line_length: usize,

    /// Request timeout. `None` leaves the HTTP client's own default in place.
    pub timeout_secs: Option<u64>,

    /// What to do when the reply body is not a JSON object. Default: `Silent`.
    pub decode_failure: DecodeFailurePolicy,

    /// How `remove_photo` treats the encoded photo list. Default: `DisplayOnly`.
    pub photo_removal: PhotoRemoval,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            line_length: DEFAULT_LINE_LENGTH,
            timeout_secs: None,
            decode_failure: DecodeFailurePolicy::default(),
            photo_removal: PhotoRemoval::default(),
        }
    }
}

impl SubmissionConfig {
    /// Create a new builder for `SubmissionConfig`.
    pub fn builder() -> SubmissionConfigBuilder {
        SubmissionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Full URL the diary entry is POSTed to.
    ///
    /// Exactly one `/` separates the base URL from the endpoint regardless
    /// of how either was written.
    pub fn submission_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

/// Builder for [`SubmissionConfig`].
#[derive(Debug)]
pub struct SubmissionConfigBuilder {
    config: SubmissionConfig,
}

impl SubmissionConfigBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    pub fn line_length(mut self, n: usize) -> Self {
        self.config.line_length = n;
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = Some(secs);
        self
    }

    pub fn decode_failure(mut self, policy: DecodeFailurePolicy) -> Self {
        self.config.decode_failure = policy;
        self
    }

    pub fn photo_removal(mut self, policy: PhotoRemoval) -> Self {
        self.config.photo_removal = policy;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SubmissionConfig, DiaryError> {
        let c = &self.config;
        if !(c.base_url.starts_with("http://") || c.base_url.starts_with("https://")) {
            return Err(DiaryError::InvalidConfig(format!(
                "Base URL must start with http:// or https://, got '{}'",
                c.base_url
            )));
        }
        if c.endpoint.trim_matches('/').is_empty() {
            return Err(DiaryError::InvalidConfig("Endpoint must not be empty".into()));
        }
        if c.line_length % 4 != 0 {
            return Err(DiaryError::InvalidConfig(format!(
                "Line length must be a multiple of 4, got {}",
                c.line_length
            )));
        }
        if c.timeout_secs == Some(0) {
            return Err(DiaryError::InvalidConfig("Timeout must be ≥ 1 second".into()));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Reaction to a reply body that is not a JSON object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DecodeFailurePolicy {
    /// Drop the reply without a notice; the controller stays `Submitting`
    /// and the progress indicator stays up. (default)
    #[default]
    Silent,
    /// Hide the progress indicator and show a failure notice, like a
    /// transport error.
    Report,
}

/// How removing a photo affects the encoded photo list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotoRemoval {
    /// Remove from the displayed photos only; the encoded copy is still
    /// submitted. (default)
    #[default]
    DisplayOnly,
    /// Remove the matching encoded photo as well.
    Synchronized,
}
