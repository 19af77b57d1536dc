//! retouch-io: Browser I/O and Dioxus component library.
//!
//! Talks to the image service with `fetch`, owns `blob:` object URLs
//! for previews, triggers local downloads, bridges `tracing` output to
//! the browser console, and provides the UI components for the retouch
//! web application.

pub mod components;
pub mod download;
pub mod fetch;
pub mod logging;
pub mod object_url;

pub use components::{ActionBar, FileUpload, ImagePanels, OperationControls, StatusBar};
pub use fetch::FetchBackend;
pub use object_url::ObjectUrl;
