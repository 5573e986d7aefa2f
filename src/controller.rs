//! Submission controller: validate, submit, report, reset.
//!
//! ## State machine
//!
//! ```text
//!          submit()                 reply has id
//! Idle ──▶ Validating ──▶ Submitting ──────────────▶ Success ──ack──▶ Idle (form cleared)
//!   ▲          │               │  │  transport error
//!   │          │ no photos     │  └────────────────▶ Failed ───ack──▶ Idle (form kept)
//!   └──────────┘ (notice)      │ reply undecodable, Silent policy
//!                              └──▶ stays Submitting, progress stays up
//! ```
//!
//! The controller is the only owner of the [`FormState`]; every mutation
//! goes through `&mut self`. Because [`SubmissionController::submit`] also
//! borrows `&mut self` across the network call, two submissions can never
//! overlap on one controller. A further `submit` while the state is still
//! `Submitting` (after a silently dropped reply) returns
//! [`DiaryError::SubmissionInFlight`].
//!
//! Clearing happens when the success notice is acknowledged, not when the
//! reply arrives: the user reads the confirmation first.

use crate::config::{DecodeFailurePolicy, SubmissionConfig};
use crate::error::{DiaryError, SubmitError};
use crate::feedback::{
    ContentFieldsDelegate, ImagePickerDelegate, NoopFeedback, Notice, NoticeKind,
    SubmissionPresenter,
};
use crate::form::{FormField, FormState, Toggle};
use crate::localize::{format_arg, keys, Localizer, StringTable};
use crate::output::Confirmation;
use crate::pipeline::client::SubmissionClient;
use crate::pipeline::photo::Photo;
use chrono::NaiveDate;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Where the controller is in a submission cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    /// Confirmed by the server; the success notice awaits acknowledgment.
    Success(Confirmation),
    /// Failure notice shown with this message; form untouched.
    Failed(String),
}

impl SubmissionState {
    fn name(&self) -> &'static str {
        match self {
            SubmissionState::Idle => "Idle",
            SubmissionState::Validating => "Validating",
            SubmissionState::Submitting => "Submitting",
            SubmissionState::Success(_) => "Success",
            SubmissionState::Failed(_) => "Failed",
        }
    }
}

/// What one call to [`SubmissionController::submit`] ended with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No encoded photo; nothing was sent and a failure notice is up.
    Rejected,
    /// The server replied with a decodable record. A success notice is up
    /// only when the record carries an `id`.
    Confirmed(Confirmation),
    /// The attempt failed; a failure notice is up and the form is intact.
    Failed(SubmitError),
    /// The reply could not be decoded and was dropped without a notice. The
    /// controller stays `Submitting`.
    Unanswered(SubmitError),
}

/// Screen-side collaborators, injected once at construction.
#[derive(Clone)]
pub struct Collaborators {
    pub presenter: Arc<dyn SubmissionPresenter>,
    pub picker: Arc<dyn ImagePickerDelegate>,
    pub content: Arc<dyn ContentFieldsDelegate>,
    pub strings: Arc<dyn Localizer>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            presenter: Arc::new(NoopFeedback),
            picker: Arc::new(NoopFeedback),
            content: Arc::new(NoopFeedback),
            strings: Arc::new(StringTable::english()),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators")
            .field("presenter", &"<dyn SubmissionPresenter>")
            .field("picker", &"<dyn ImagePickerDelegate>")
            .field("content", &"<dyn ContentFieldsDelegate>")
            .field("strings", &"<dyn Localizer>")
            .finish()
    }
}

/// Drives one diary entry screen from first keystroke to confirmed upload.
#[derive(Debug)]
pub struct SubmissionController {
    config: SubmissionConfig,
    client: SubmissionClient,
    form: FormState,
    state: SubmissionState,
    pending_notice: Option<Notice>,
    include_photo: Toggle,
    link_event: Toggle,
    collaborators: Collaborators,
}

impl SubmissionController {
    pub fn new(
        config: SubmissionConfig,
        client: SubmissionClient,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            form: FormState::new(&config),
            config,
            client,
            state: SubmissionState::Idle,
            pending_notice: None,
            include_photo: Toggle::default(),
            link_event: Toggle::default(),
            collaborators,
        }
    }

    /// Controller talking HTTP to the configured endpoint.
    pub fn from_config(
        config: SubmissionConfig,
        collaborators: Collaborators,
    ) -> Result<Self, DiaryError> {
        let client = SubmissionClient::new(&config)?;
        Ok(Self::new(config, client, collaborators))
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// The notice currently on screen, if any.
    pub fn pending_notice(&self) -> Option<&Notice> {
        self.pending_notice.as_ref()
    }

    pub fn include_photo(&self) -> Toggle {
        self.include_photo
    }

    pub fn link_event(&self) -> Toggle {
        self.link_event
    }

    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    // ── Form events ──────────────────────────────────────────────────────

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set_field(field, value);
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.form.set_date(date);
    }

    /// The image picker finished; `None` means the user cancelled.
    ///
    /// Returns `true` when the photo was encoded and will be submitted.
    pub fn did_pick_photo(&mut self, photo: Option<Photo>) -> bool {
        self.collaborators.picker.did_select(photo.as_ref());
        self.form.add_photo(photo)
    }

    /// The delete button on the photo at `index` was tapped.
    pub fn remove_photo(&mut self, index: usize) -> Result<Option<Photo>, DiaryError> {
        self.form.remove_photo(index)
    }

    pub fn toggle_include_photo(&mut self) -> bool {
        self.include_photo.tap()
    }

    pub fn toggle_link_event(&mut self) -> bool {
        self.link_event.tap()
    }

    // ── Submission ───────────────────────────────────────────────────────

    /// Validate the form and, if it holds at least one encoded photo, send
    /// it.
    ///
    /// # Errors
    /// - [`DiaryError::SubmissionInFlight`] while an earlier submission is
    ///   still `Submitting`.
    /// - [`DiaryError::AwaitingAcknowledgment`] while a success notice is up.
    ///
    /// Every other result, including network failure, is an `Ok` outcome.
    pub async fn submit(&mut self) -> Result<SubmitOutcome, DiaryError> {
        match self.state {
            SubmissionState::Submitting => return Err(DiaryError::SubmissionInFlight),
            SubmissionState::Success(_) => return Err(DiaryError::AwaitingAcknowledgment),
            _ => {}
        }
        // A failure notice still up is superseded by this attempt.
        self.pending_notice = None;

        self.transition(SubmissionState::Validating);
        if let Err(e) = self.form.validate() {
            info!("Submission rejected: {}", e);
            self.transition(SubmissionState::Idle);
            let message = self.localize(keys::MESSAGE_FAILED);
            self.present(NoticeKind::Failure, keys::TITLE_FAILED, message);
            return Ok(SubmitOutcome::Rejected);
        }

        self.transition(SubmissionState::Submitting);
        let loading = self.localize(keys::LOADING_MESSAGE);
        self.collaborators.presenter.show_progress(&loading);

        let request = self.form.to_request();
        match self.client.submit(&request).await {
            Ok(confirmation) => {
                self.collaborators.presenter.hide_progress();
                match confirmation.id.as_deref() {
                    Some(id) => {
                        info!("Diary entry confirmed with id {}", id);
                        let template = self.localize(keys::MESSAGE_SUCCESS);
                        let message = format_arg(&template, id);
                        self.transition(SubmissionState::Success(confirmation.clone()));
                        self.present(NoticeKind::Success, keys::TITLE_SUCCESS, message);
                    }
                    None => {
                        info!("Reply carried no id; nothing to confirm");
                        self.transition(SubmissionState::Idle);
                    }
                }
                Ok(SubmitOutcome::Confirmed(confirmation))
            }
            Err(e) if e.is_decode() && self.config.decode_failure == DecodeFailurePolicy::Silent => {
                warn!("Dropping undecodable reply; submission left pending: {}", e);
                Ok(SubmitOutcome::Unanswered(e))
            }
            Err(e) => {
                self.collaborators.presenter.hide_progress();
                let message = e.to_string();
                self.transition(SubmissionState::Failed(message.clone()));
                self.present(NoticeKind::Failure, keys::TITLE_FAILED, message);
                Ok(SubmitOutcome::Failed(e))
            }
        }
    }

    /// The user dismissed the notice on screen.
    ///
    /// Dismissing a success notice clears the form and tells the content
    /// delegate to blank its inputs. Returns the dismissed notice, or `None`
    /// when nothing was showing.
    pub fn acknowledge(&mut self) -> Option<Notice> {
        let notice = self.pending_notice.take()?;

        if notice.kind == NoticeKind::Success {
            self.form.clear();
            self.collaborators.content.clear_contents();
            info!("Form cleared after confirmed submission");
        }

        if matches!(
            self.state,
            SubmissionState::Success(_) | SubmissionState::Failed(_)
        ) {
            self.transition(SubmissionState::Idle);
        }

        Some(notice)
    }

    // ── Internal helpers ─────────────────────────────────────────────────

    fn transition(&mut self, next: SubmissionState) {
        debug!("Submission state {} → {}", self.state.name(), next.name());
        self.state = next;
    }

    fn localize(&self, key: &str) -> String {
        self.collaborators.strings.localize(key)
    }

    fn present(&mut self, kind: NoticeKind, title_key: &str, message: String) {
        let notice = Notice {
            kind,
            title: self.localize(title_key),
            message,
            confirm_label: self.localize(keys::CONFIRM_BUTTON),
        };
        self.collaborators.presenter.show_notice(&notice);
        self.pending_notice = Some(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::client::Transport;
    use futures::future::BoxFuture;
    use image::{DynamicImage, RgbImage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedReply(Result<String, String>, AtomicUsize);

    impl Transport for FixedReply {
        fn post_json<'a>(
            &'a self,
            _url: &'a str,
            _body: &'a serde_json::Value,
        ) -> BoxFuture<'a, Result<String, String>> {
            self.1.fetch_add(1, Ordering::SeqCst);
            let reply = self.0.clone();
            Box::pin(async move { reply })
        }
    }

    fn controller(reply: Result<&str, &str>, config: SubmissionConfig) -> (SubmissionController, Arc<FixedReply>) {
        let transport = Arc::new(FixedReply(
            reply.map(str::to_owned).map_err(str::to_owned),
            AtomicUsize::new(0),
        ));
        let client = SubmissionClient::with_transport(&config, transport.clone());
        (
            SubmissionController::new(config, client, Collaborators::default()),
            transport,
        )
    }

    fn photo() -> Photo {
        Photo::from_image(DynamicImage::ImageRgb8(RgbImage::new(2, 2)))
    }

    #[test]
    fn rejected_without_photos_sends_nothing() {
        let (mut c, transport) = controller(Ok(r#"{"id":"1"}"#), SubmissionConfig::default());
        c.did_pick_photo(None);

        let outcome = tokio_test::block_on(c.submit()).unwrap();
        assert_eq!(outcome, SubmitOutcome::Rejected);
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert_eq!(transport.1.load(Ordering::SeqCst), 0);

        let notice = c.pending_notice().unwrap();
        assert_eq!(notice.kind, NoticeKind::Failure);
        assert_eq!(notice.title, "Failed");
    }

    #[tokio::test]
    async fn success_waits_for_acknowledgment_before_clearing() {
        let (mut c, _) = controller(Ok(r#"{"id":"7"}"#), SubmissionConfig::default());
        c.set_field(FormField::Comments, "walk");
        c.did_pick_photo(Some(photo()));

        let outcome = c.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Confirmed(ref r) if r.id.as_deref() == Some("7")));
        assert!(matches!(c.state(), SubmissionState::Success(_)));
        assert!(c.pending_notice().unwrap().message.contains('7'));
        assert_eq!(c.form().field(FormField::Comments), "walk");

        assert!(matches!(
            c.submit().await,
            Err(DiaryError::AwaitingAcknowledgment)
        ));

        let dismissed = c.acknowledge().unwrap();
        assert_eq!(dismissed.kind, NoticeKind::Success);
        assert!(c.form().is_empty());
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert!(c.acknowledge().is_none());
    }

    #[tokio::test]
    async fn reply_without_id_shows_nothing_and_keeps_form() {
        let (mut c, _) = controller(Ok(r#"{"name":"Ann"}"#), SubmissionConfig::default());
        c.did_pick_photo(Some(photo()));

        let outcome = c.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Confirmed(_)));
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert!(c.pending_notice().is_none());
        assert_eq!(c.form().photo_count(), 1);
    }

    #[tokio::test]
    async fn silent_decode_failure_leaves_submission_pending() {
        let (mut c, transport) = controller(Ok("<html>"), SubmissionConfig::default());
        c.did_pick_photo(Some(photo()));

        let outcome = c.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Unanswered(_)));
        assert_eq!(c.state(), &SubmissionState::Submitting);
        assert!(c.pending_notice().is_none());

        assert!(matches!(c.submit().await, Err(DiaryError::SubmissionInFlight)));
        assert_eq!(transport.1.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reported_decode_failure_shows_notice() {
        let config = SubmissionConfig::builder()
            .decode_failure(DecodeFailurePolicy::Report)
            .build()
            .unwrap();
        let (mut c, _) = controller(Ok("<html>"), config);
        c.did_pick_photo(Some(photo()));

        let outcome = c.submit().await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Failed(ref e) if e.is_decode()));
        assert!(matches!(c.state(), SubmissionState::Failed(_)));
        assert_eq!(c.pending_notice().unwrap().kind, NoticeKind::Failure);
    }

    #[tokio::test]
    async fn failure_can_be_retried_without_acknowledging() {
        let (mut c, transport) = controller(Err("offline"), SubmissionConfig::default());
        c.did_pick_photo(Some(photo()));

        c.submit().await.unwrap();
        assert_eq!(c.state(), &SubmissionState::Failed("offline".into()));
        c.submit().await.unwrap();
        assert_eq!(transport.1.load(Ordering::SeqCst), 2);

        c.acknowledge();
        assert_eq!(c.state(), &SubmissionState::Idle);
        assert_eq!(c.form().photo_count(), 1);
    }

    #[test]
    fn toggles_are_independent() {
        let (mut c, _) = controller(Ok("{}"), SubmissionConfig::default());
        assert!(c.toggle_include_photo());
        assert!(c.include_photo().is_checked());
        assert!(!c.link_event().is_checked());
        assert!(c.toggle_link_event());
        assert!(!c.toggle_include_photo());
    }
}
