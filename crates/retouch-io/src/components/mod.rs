//! Dioxus UI components for retouch.
//!
//! Provides the upload prompt, operation controls, status bar, image
//! previews, and the apply/download action bar.

mod actions;
mod images;
mod operations;
mod status;
mod upload;

pub use actions::ActionBar;
pub use images::ImagePanels;
pub use operations::OperationControls;
pub use status::StatusBar;
pub use upload::FileUpload;
