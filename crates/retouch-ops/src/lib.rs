//! retouch-ops: Editor state and request sequencing (sans-IO).
//!
//! Models the image operations a user can request, the editor
//! configuration they are derived from, the session state machine
//! (empty -> uploading -> ready -> applying), and the two-step
//! apply-then-download sequence against a remote image service.
//!
//! This crate has **no browser dependencies**. The service is reached
//! through the [`ImageBackend`] trait; the `fetch` implementation and
//! all DOM interaction live in `retouch-io`.

pub mod backend;
pub mod config;
pub mod operation;
pub mod pipeline;
pub mod session;

pub use backend::{BackendConfig, ImageBackend, RequestError, SourceImage};
pub use config::OperationConfig;
pub use operation::{Operation, OperationKind};
pub use pipeline::{ApplyError, UploadError, apply_pipeline, upload_image};
pub use session::{
    ApplyRequest, DownloadError, Phase, SelectedImage, Session, Severity, Status, Ticket,
    processed_filename,
};
