//! Error types for the new-diary library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DiaryError`] — an operation on the crate API could not be carried out
//!   (photo file missing, bad configuration, a submission already in flight,
//!   no photos attached). Returned as `Err(DiaryError)`.
//!
//! * [`SubmitError`] — a single request/response cycle failed (transport
//!   down, reply not decodable). Terminal for that attempt only; the form is
//!   left untouched so the user can try again.

use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the form, configuration and controller APIs.
#[derive(Debug, Error)]
pub enum DiaryError {
    // ── Validation ────────────────────────────────────────────────────────
    /// Submission attempted with no encoded photo attached.
    #[error("No photos attached: add at least one photo before submitting")]
    NoPhotosAttached,

    // ── Photo intake ──────────────────────────────────────────────────────
    /// Photo file was not found at the given path.
    #[error("Photo not found: '{path}'\nCheck the path exists and is readable.")]
    PhotoNotFound { path: PathBuf },

    /// Process does not have read permission on the photo.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but could not be decoded as an image.
    #[error("File is not a supported image: '{path}': {detail}")]
    NotAnImage { path: PathBuf, detail: String },

    /// `remove_photo` was given an index past the end of the photo list.
    #[error("Photo index {index} is out of range (form holds {len} photos)")]
    PhotoIndexOutOfRange { index: usize, len: usize },

    /// A field name did not match any of the six form fields.
    #[error("Unknown form field '{name}'\nExpected one of: comments, date, area, category, tags, event")]
    UnknownField { name: String },

    // ── Controller state ──────────────────────────────────────────────────
    /// A submission is already waiting on the server.
    #[error("A submission is already in flight")]
    SubmissionInFlight,

    /// A success notice is still on screen and must be acknowledged first.
    #[error("A confirmation notice is waiting to be acknowledged")]
    AwaitingAcknowledgment,

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A `.strings` table could not be read.
    #[error("Failed to read strings table '{path}': {source}")]
    StringsLoadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of one submission round-trip.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Network or connectivity failure. Displayed verbatim.
    #[error("{message}")]
    Transport { message: String },

    /// The reply body was not a JSON object.
    #[error("Reply could not be decoded: {detail}")]
    Decode { detail: String },
}

impl SubmitError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// True when the reply arrived but could not be read.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_display_is_verbatim() {
        let e = SubmitError::transport("offline");
        assert_eq!(e.to_string(), "offline");
        assert!(!e.is_decode());
    }

    #[test]
    fn decode_display_mentions_detail() {
        let e = SubmitError::Decode {
            detail: "expected value at line 1 column 1".into(),
        };
        assert!(e.is_decode());
        assert!(e.to_string().contains("line 1 column 1"), "got: {e}");
    }

    #[test]
    fn index_out_of_range_display() {
        let e = DiaryError::PhotoIndexOutOfRange { index: 4, len: 2 };
        let msg = e.to_string();
        assert!(msg.contains("index 4"), "got: {msg}");
        assert!(msg.contains("2 photos"), "got: {msg}");
    }

    #[test]
    fn not_an_image_display() {
        let e = DiaryError::NotAnImage {
            path: PathBuf::from("/tmp/notes.txt"),
            detail: "format could not be determined".into(),
        };
        assert!(e.to_string().contains("notes.txt"));
    }
}
