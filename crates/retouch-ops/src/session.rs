//! Per-session image state and its transitions.
//!
//! [`Session`] is the single source of truth for the editor view:
//! which image is selected, the processed preview, the status line, and
//! whether a request is in flight. It is generic over the preview
//! resource so the browser can use object URLs (revoked on drop) while
//! tests use plain values.
//!
//! Async work is split into `begin_*` / `finish_*` pairs so the UI never
//! holds the session across an `await`. Each `begin_*` hands out a
//! [`Ticket`]; a `finish_*` whose ticket predates a later reset or
//! selection is discarded.

use std::fmt;

use crate::config::OperationConfig;
use crate::operation::Operation;
use crate::pipeline::{ApplyError, NO_OPERATIONS_MESSAGE, UploadError};

/// Message shown when download is requested with no processed image.
pub const NOTHING_TO_DOWNLOAD_MESSAGE: &str =
    "No processed image to download. Please apply operations first.";

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// No image selected; the upload prompt is shown.
    #[default]
    Empty,
    /// The ingest request is in flight.
    Uploading,
    /// The image is ingested and operations can be applied.
    Ready,
    /// The apply + download sequence is in flight.
    Applying,
}

/// How a status message should be presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    /// Progress or success.
    #[default]
    Info,
    /// Any failure.
    Error,
}

/// The outcome of the most recent action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Text shown to the user.
    pub message: String,
    /// Presentation severity.
    pub severity: Severity,
}

impl Status {
    /// An informational status.
    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Info,
        }
    }

    /// An error status.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity: Severity::Error,
        }
    }

    /// Returns `true` for [`Severity::Error`].
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// The image the user picked.
#[derive(Debug)]
pub struct SelectedImage<P> {
    /// Original filename.
    pub name: String,
    /// Local preview of the original file, if one could be created.
    pub preview: Option<P>,
}

/// Proof that a request was started at a given session generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A started apply: the operations to send and the ticket to finish it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyRequest {
    /// Ticket to pass to [`Session::finish_apply`].
    pub ticket: Ticket,
    /// Enabled operations in declared order. Never empty.
    pub operations: Vec<Operation>,
}

/// Local download failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DownloadError {
    /// No processed preview is held.
    #[error("{}", NOTHING_TO_DOWNLOAD_MESSAGE)]
    NothingToDownload,
}

/// Session image state machine.
#[derive(Debug)]
pub struct Session<P> {
    phase: Phase,
    status: Option<Status>,
    selected: Option<SelectedImage<P>>,
    processed: Option<P>,
    generation: u64,
}

impl<P> Default for Session<P> {
    fn default() -> Self {
        Self {
            phase: Phase::Empty,
            status: None,
            selected: None,
            processed: None,
            generation: 0,
        }
    }
}

impl<P> Session<P> {
    /// A fresh session showing the upload prompt.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether an upload or apply is in flight.
    ///
    /// Actions that would start another request are disabled while
    /// this is `true`.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::Uploading | Phase::Applying)
    }

    /// The last status, if any.
    #[must_use]
    pub const fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// The selected image, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&SelectedImage<P>> {
        self.selected.as_ref()
    }

    /// The processed preview, if any.
    #[must_use]
    pub const fn processed(&self) -> Option<&P> {
        self.processed.as_ref()
    }

    /// Returns `true` if a processed preview is held.
    #[must_use]
    pub const fn has_processed(&self) -> bool {
        self.processed.is_some()
    }

    /// Whether the editor (rather than the upload prompt) is shown.
    #[must_use]
    pub const fn shows_editor(&self) -> bool {
        self.selected.is_some()
    }

    fn set_status(&mut self, status: Status) {
        self.status = Some(status);
    }

    fn next_ticket(&mut self) -> Ticket {
        self.generation += 1;
        Ticket(self.generation)
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    /// Start uploading a newly selected image.
    ///
    /// Releases the previous local and processed previews before calling
    /// `make_preview` for the new one, so at most one of each exists.
    /// Any in-flight request from the previous selection becomes stale.
    pub fn begin_upload(
        &mut self,
        name: impl Into<String>,
        make_preview: impl FnOnce() -> Option<P>,
    ) -> Ticket {
        self.selected = None;
        self.processed = None;

        let name = name.into();
        tracing::debug!(%name, "image selected");
        self.selected = Some(SelectedImage {
            name,
            preview: make_preview(),
        });
        self.phase = Phase::Uploading;
        self.set_status(Status::info("Uploading image..."));
        self.next_ticket()
    }

    /// Record the outcome of the ingest request.
    ///
    /// On failure the selection is released and the upload prompt is
    /// shown again. Returns `false` if the ticket was stale and the
    /// outcome was discarded.
    pub fn finish_upload(&mut self, ticket: Ticket, outcome: Result<String, UploadError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("discarding stale upload result");
            return false;
        }
        match outcome {
            Ok(message) => {
                self.phase = Phase::Ready;
                self.set_status(Status::info(format!("{message} Ready to apply operations.")));
            }
            Err(e) => {
                self.phase = Phase::Empty;
                self.selected = None;
                self.set_status(Status::error(e.to_string()));
            }
        }
        true
    }

    /// Start an apply from the current configuration.
    ///
    /// Returns `None` without side effects unless the session is
    /// [`Phase::Ready`]. If nothing is enabled, sets an error status and
    /// returns `None`; no request may be issued.
    pub fn begin_apply(&mut self, config: &OperationConfig) -> Option<ApplyRequest> {
        if self.phase != Phase::Ready {
            tracing::debug!(phase = ?self.phase, "apply ignored outside ready phase");
            return None;
        }
        if config.is_empty() {
            self.set_status(Status::error(NO_OPERATIONS_MESSAGE));
            return None;
        }
        self.phase = Phase::Applying;
        self.set_status(Status::info("Applying operations..."));
        Some(ApplyRequest {
            ticket: Ticket(self.generation),
            operations: config.operations(),
        })
    }

    /// Record the outcome of the apply sequence.
    ///
    /// On success the previous processed preview is released when the
    /// new one replaces it. On failure it is left untouched. Returns
    /// `false` if the ticket was stale; a stale preview is dropped
    /// immediately.
    pub fn finish_apply(&mut self, ticket: Ticket, outcome: Result<P, ApplyError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("discarding stale apply result");
            return false;
        }
        self.phase = Phase::Ready;
        match outcome {
            Ok(preview) => {
                self.processed = Some(preview);
                self.set_status(Status::info(
                    "Operations applied successfully. Preview updated.",
                ));
            }
            Err(e) => self.set_status(Status::error(e.to_string())),
        }
        true
    }

    /// The processed preview to save.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::NothingToDownload`] and sets an error
    /// status if no processed preview is held.
    pub fn request_download(&mut self) -> Result<&P, DownloadError> {
        if self.processed.is_none() {
            self.set_status(Status::error(NOTHING_TO_DOWNLOAD_MESSAGE));
            return Err(DownloadError::NothingToDownload);
        }
        self.processed
            .as_ref()
            .ok_or(DownloadError::NothingToDownload)
    }

    /// Report that the save was triggered.
    pub fn mark_download_started(&mut self) {
        self.set_status(Status::info("Download started."));
    }

    /// Report that the save could not be triggered.
    pub fn report_download_failure(&mut self, err: &impl fmt::Display) {
        self.set_status(Status::error(format!("Download failed: {err}")));
    }

    /// Return to the upload prompt, releasing every preview.
    ///
    /// The backend is not notified. Results of in-flight requests are
    /// discarded when they arrive.
    pub fn reset(&mut self) {
        self.selected = None;
        self.processed = None;
        self.status = None;
        self.phase = Phase::Empty;
        self.generation += 1;
    }
}

/// Filename for a saved processed image.
///
/// No extension is added; the format is whatever the backend produced.
#[must_use]
pub fn processed_filename(epoch_millis: u128) -> String {
    format!("processed_image_{epoch_millis}")
}
