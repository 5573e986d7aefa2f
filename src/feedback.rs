//! Collaborator traits through which the controller talks to the screen.
//!
//! The controller never draws anything. It reports progress and notices to
//! a [`SubmissionPresenter`], tells an [`ImagePickerDelegate`] when a pick
//! lands, and asks a [`ContentFieldsDelegate`] to blank the inputs after a
//! confirmed submission. All three are injected at construction through
//! [`crate::controller::Collaborators`]; [`NoopFeedback`] implements every
//! one of them for headless use.
//!
//! # Example
//!
//! ```rust
//! use new_diary::{Notice, SubmissionPresenter};
//! use std::sync::Mutex;
//!
//! #[derive(Default)]
//! struct LogPresenter {
//!     lines: Mutex<Vec<String>>,
//! }
//!
//! impl SubmissionPresenter for LogPresenter {
//!     fn show_notice(&self, notice: &Notice) {
//!         self.lines.lock().unwrap().push(notice.message.clone());
//!     }
//! }
//! ```

use crate::pipeline::photo::Photo;
use serde::Serialize;

/// Whether a notice reports a success or a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    Success,
    Failure,
}

/// A modal message with a single confirm button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
    /// Label of the button that dismisses the notice.
    pub confirm_label: String,
}

/// Receives loading and result feedback for a submission.
///
/// All methods default to no-ops so implementors only override what they
/// show.
pub trait SubmissionPresenter: Send + Sync {
    /// Put up the blocking progress indicator.
    fn show_progress(&self, message: &str) {
        let _ = message;
    }

    /// Take the progress indicator down.
    fn hide_progress(&self) {}

    /// Show a modal notice. The controller learns of its dismissal through
    /// [`crate::controller::SubmissionController::acknowledge`].
    fn show_notice(&self, notice: &Notice) {
        let _ = notice;
    }
}

/// Told about every completed pick, photo or not.
pub trait ImagePickerDelegate: Send + Sync {
    fn did_select(&self, photo: Option<&Photo>);
}

/// Told to blank every input after a confirmed submission was acknowledged.
pub trait ContentFieldsDelegate: Send + Sync {
    fn clear_contents(&self);
}

/// Does nothing; the default for every collaborator.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFeedback;

impl SubmissionPresenter for NoopFeedback {}

impl ImagePickerDelegate for NoopFeedback {
    fn did_select(&self, _photo: Option<&Photo>) {}
}

impl ContentFieldsDelegate for NoopFeedback {
    fn clear_contents(&self) {}
}
