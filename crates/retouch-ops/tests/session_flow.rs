//! Integration test: drive a session through upload, apply, download,
//! and reset against a recording in-memory backend.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::executor::block_on;
use retouch_ops::{
    ApplyError, ImageBackend, Operation, OperationConfig, OperationKind, Phase, RequestError,
    Session, SourceImage, apply_pipeline, upload_image,
};

/// Preview resource that tracks how many instances are alive.
#[derive(Debug)]
struct Tracked {
    bytes: Vec<u8>,
    live: Rc<Cell<usize>>,
}

impl Tracked {
    fn new(bytes: Vec<u8>, live: &Rc<Cell<usize>>) -> Self {
        live.set(live.get() + 1);
        Self {
            bytes,
            live: Rc::clone(live),
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.live.set(self.live.get() - 1);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Upload(String),
    Apply(serde_json::Value),
    Download,
}

struct RecordingBackend {
    calls: RefCell<Vec<Call>>,
    upload_reply: RefCell<Result<String, RequestError>>,
    apply_reply: RefCell<Result<(), RequestError>>,
    download_reply: RefCell<Result<Vec<u8>, RequestError>>,
    live: Rc<Cell<usize>>,
}

impl RecordingBackend {
    fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            upload_reply: RefCell::new(Ok("Uploaded.".into())),
            apply_reply: RefCell::new(Ok(())),
            download_reply: RefCell::new(Ok(b"processed-1".to_vec())),
            live: Rc::new(Cell::new(0)),
        }
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }
}

impl ImageBackend for RecordingBackend {
    type Preview = Tracked;

    async fn upload(&self, image: &SourceImage) -> Result<String, RequestError> {
        self.calls.borrow_mut().push(Call::Upload(image.name.clone()));
        self.upload_reply.borrow().clone()
    }

    async fn apply(&self, operations: &[Operation]) -> Result<(), RequestError> {
        self.calls
            .borrow_mut()
            .push(Call::Apply(serde_json::to_value(operations).unwrap()));
        self.apply_reply.borrow().clone()
    }

    async fn download(&self) -> Result<Tracked, RequestError> {
        self.calls.borrow_mut().push(Call::Download);
        self.download_reply
            .borrow()
            .clone()
            .map(|bytes| Tracked::new(bytes, &self.live))
    }
}

fn select(session: &mut Session<Tracked>, backend: &RecordingBackend, name: &str) {
    let image = SourceImage::new(name.to_owned(), vec![0x89, b'P', b'N', b'G']);
    let ticket = session.begin_upload(name, || {
        Some(Tracked::new(image.bytes.clone(), &backend.live))
    });
    let outcome = block_on(upload_image(backend, &image));
    session.finish_upload(ticket, outcome);
}

fn apply(
    session: &mut Session<Tracked>,
    backend: &RecordingBackend,
    config: &OperationConfig,
) -> bool {
    let Some(request) = session.begin_apply(config) else {
        return false;
    };
    let outcome = block_on(apply_pipeline(backend, &request.operations));
    session.finish_apply(request.ticket, outcome)
}

fn resize_800x600() -> OperationConfig {
    let mut config = OperationConfig::default();
    config.toggle(OperationKind::Resize);
    config.resize.width = 800;
    config.resize.height = 600;
    config
}

fn status_message(session: &Session<Tracked>) -> String {
    session.status().expect("status should be set").message.clone()
}

#[test]
fn upload_then_resize_updates_preview() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();

    select(&mut session, &backend, "photo.png");
    assert_eq!(session.phase(), Phase::Ready);
    assert_eq!(
        status_message(&session),
        "Uploaded. Ready to apply operations."
    );

    assert!(apply(&mut session, &backend, &resize_800x600()));
    assert_eq!(
        backend.calls(),
        vec![
            Call::Upload("photo.png".into()),
            Call::Apply(serde_json::json!([{ "type": "resize", "width": 800, "height": 600 }])),
            Call::Download,
        ]
    );
    assert_eq!(
        status_message(&session),
        "Operations applied successfully. Preview updated."
    );
    assert_eq!(session.processed().unwrap().bytes, b"processed-1");
    assert!(!session.is_processing());
}

#[test]
fn server_error_on_apply_leaves_preview_unchanged() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");
    apply(&mut session, &backend, &resize_800x600());

    *backend.apply_reply.borrow_mut() = Err(RequestError::Status {
        status: 500,
        body: "decode error".into(),
    });
    *backend.download_reply.borrow_mut() = Ok(b"processed-2".to_vec());
    backend.clear_calls();

    apply(&mut session, &backend, &resize_800x600());

    let status = session.status().unwrap();
    assert!(status.is_error());
    assert!(status.message.contains("500"), "{}", status.message);
    assert!(status.message.contains("decode error"), "{}", status.message);
    assert_eq!(session.processed().unwrap().bytes, b"processed-1");
    // The download is never attempted after a failed apply.
    assert!(!backend.calls().contains(&Call::Download));
    assert_eq!(session.phase(), Phase::Ready);
}

#[test]
fn download_failure_after_apply_is_reported() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");

    *backend.download_reply.borrow_mut() = Err(RequestError::Status {
        status: 404,
        body: "nothing processed".into(),
    });
    apply(&mut session, &backend, &resize_800x600());

    assert!(session.processed().is_none());
    assert!(status_message(&session).starts_with("Error fetching preview:"));
}

#[test]
fn empty_selection_never_reaches_backend() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");
    backend.clear_calls();

    assert!(!apply(&mut session, &backend, &OperationConfig::default()));
    assert!(backend.calls().is_empty());
    assert_eq!(
        status_message(&session),
        "Please select at least one operation to apply."
    );
}

#[test]
fn apply_pipeline_rejects_empty_list_locally() {
    let backend = RecordingBackend::new();
    let outcome = block_on(apply_pipeline(&backend, &[]));
    assert!(matches!(outcome, Err(ApplyError::NoOperations)));
    assert!(backend.calls().is_empty());
}

#[test]
fn operations_are_sent_in_declared_order() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");
    backend.clear_calls();

    let mut config = OperationConfig::default();
    config.toggle(OperationKind::Format);
    config.toggle(OperationKind::Flip);
    config.toggle(OperationKind::Crop);
    config.flip.vertical = true;
    config.set_format("PNG");
    apply(&mut session, &backend, &config);

    assert_eq!(
        backend.calls()[0],
        Call::Apply(serde_json::json!([
            { "type": "crop", "width": 250, "height": 250, "x": 0, "y": 0 },
            { "type": "flip", "horizontal": false, "vertical": true },
            { "type": "format", "format": "png" },
        ]))
    );
}

#[test]
fn exactly_one_processed_preview_survives_repeated_applies() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");
    assert_eq!(backend.live.get(), 1, "local preview only");

    for round in 0..3 {
        *backend.download_reply.borrow_mut() = Ok(format!("round-{round}").into_bytes());
        apply(&mut session, &backend, &resize_800x600());
        assert_eq!(backend.live.get(), 2, "local + one processed preview");
    }
    assert_eq!(session.processed().unwrap().bytes, b"round-2");
}

#[test]
fn reset_releases_all_previews() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");
    apply(&mut session, &backend, &resize_800x600());
    assert_eq!(backend.live.get(), 2);

    session.reset();
    assert_eq!(backend.live.get(), 0);
    assert_eq!(session.phase(), Phase::Empty);
    assert!(session.status().is_none());
    assert!(session.selected().is_none());
    assert!(!session.shows_editor());
}

#[test]
fn new_selection_releases_previous_previews() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "first.png");
    apply(&mut session, &backend, &resize_800x600());

    select(&mut session, &backend, "second.jpg");
    assert_eq!(backend.live.get(), 1);
    assert!(session.processed().is_none());
    assert_eq!(session.selected().unwrap().name, "second.jpg");
}

#[test]
fn transport_failure_on_upload_is_reported() {
    let backend = RecordingBackend::new();
    *backend.upload_reply.borrow_mut() = Err(RequestError::Network("connection refused".into()));
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");

    assert_eq!(session.phase(), Phase::Empty);
    assert_eq!(status_message(&session), "Error: connection refused");
    assert_eq!(backend.live.get(), 0);
}

#[test]
fn download_without_processed_image_saves_nothing() {
    let backend = RecordingBackend::new();
    let mut session = Session::new();
    select(&mut session, &backend, "photo.png");

    assert!(session.request_download().is_err());
    assert!(session.status().unwrap().is_error());
}
