//! Local file saving via a temporary anchor element.
//!
//! Dioxus has no built-in file download API. The processed image is
//! already held as an [`ObjectUrl`], so saving only needs an
//! `<a download>` pointed at it; no network request is made.
//!
//! All functions in this module require a browser environment
//! (`wasm32-unknown-unknown` target).

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use web_time::SystemTime;

use retouch_ops::processed_filename;

use crate::object_url::ObjectUrl;

/// Errors that can occur when triggering a save.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for SaveError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it.
#[must_use]
pub fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis())
}

/// Save the processed preview as `processed_image_<epoch-millis>`.
///
/// # Errors
///
/// Returns [`SaveError::JsError`] if the anchor cannot be created or
/// attached.
pub fn save_processed(preview: &ObjectUrl) -> Result<(), SaveError> {
    let filename = processed_filename(epoch_millis());
    tracing::debug!(%filename, "saving processed image");
    trigger_download(preview.url(), &filename)
}

/// Trigger a browser download of `href` as `filename`.
///
/// Programmatically clicks a temporary `<a download="filename">`
/// element. The URL itself is left alone; its owner revokes it.
///
/// # Errors
///
/// Returns [`SaveError::JsError`] if any browser API call fails
/// (e.g., element creation or attaching to the body).
pub fn trigger_download(href: &str, filename: &str) -> Result<(), SaveError> {
    let window = web_sys::window().ok_or_else(|| SaveError::JsError("no global window".into()))?;
    let document = window
        .document()
        .ok_or_else(|| SaveError::JsError("no document".into()))?;

    let anchor: web_sys::HtmlAnchorElement = document
        .create_element("a")?
        .dyn_into::<web_sys::HtmlAnchorElement>()
        .map_err(|e| SaveError::JsError(format!("failed to cast element: {e:?}")))?;

    anchor.set_href(href);
    anchor.set_download(filename);

    let body = document
        .body()
        .ok_or_else(|| SaveError::JsError("no document body".into()))?;
    body.append_child(&anchor)?;
    anchor.click();

    // The download is already initiated; a failed removal is not a
    // failed download.
    let _ = body.remove_child(&anchor);

    Ok(())
}
