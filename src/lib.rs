//! # new-diary
//!
//! Collect a diary entry (six text fields plus photos) and submit it to a
//! remote HTTP endpoint.
//!
//! ## Pipeline Overview
//!
//! ```text
//! UI events ──▶ FormState ──▶ submit() ──▶ validate ──▶ SubmissionClient ──▶ notice
//!  (fields,      (fields,                  (≥1 photo)    (POST JSON,          (ack clears
//!   picks)        encoded photos)                         decode reply)         the form)
//! ```
//!
//! 1. **Intake**  picks become [`Photo`]s; a cancelled pick is `None`
//! 2. **Encode**  each photo → PNG → wrapped base64 text
//! 3. **Validate** at least one encoded photo, nothing else
//! 4. **Submit**  one POST to `{base_url}/api/users`, no retry
//! 5. **Report**  success / failure notice through the injected presenter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use new_diary::{Collaborators, FormField, Photo, SubmissionConfig, SubmissionController};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SubmissionConfig::default();
//!     let mut controller = SubmissionController::from_config(config, Collaborators::default())?;
//!
//!     controller.set_field(FormField::Comments, "First swim of the year");
//!     controller.did_pick_photo(Some(Photo::open("lake.jpg")?));
//!
//!     let outcome = controller.submit().await?;
//!     println!("{outcome:?}");
//!     controller.acknowledge();
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `new-diary` binary (clap + anyhow + indicatif + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod controller;
pub mod error;
pub mod feedback;
pub mod form;
pub mod localize;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DecodeFailurePolicy, PhotoRemoval, SubmissionConfig, SubmissionConfigBuilder};
pub use controller::{Collaborators, SubmissionController, SubmissionState, SubmitOutcome};
pub use error::{DiaryError, SubmitError};
pub use feedback::{
    ContentFieldsDelegate, ImagePickerDelegate, NoopFeedback, Notice, NoticeKind,
    SubmissionPresenter,
};
pub use form::{EntryFields, FormField, FormState, Toggle};
pub use localize::{Localizer, StringTable};
pub use output::{Confirmation, SubmissionRequest};
pub use pipeline::client::{HttpTransport, SubmissionClient, Transport};
pub use pipeline::encode::encode_photo;
pub use pipeline::photo::Photo;
