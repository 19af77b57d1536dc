//! Scoped `blob:` object URLs.
//!
//! An [`ObjectUrl`] owns one URL created with `URL.createObjectURL` and
//! revokes it when dropped, so a preview's browser-held memory lives
//! exactly as long as the value that displays it.

use wasm_bindgen::JsValue;
use web_sys::BlobPropertyBag;

/// Errors that can occur when creating an object URL.
#[derive(Debug, thiserror::Error)]
pub enum ObjectUrlError {
    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for ObjectUrlError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

/// An object URL revoked on drop.
///
/// Deliberately not `Clone`: each URL has exactly one owner.
#[derive(Debug, PartialEq, Eq)]
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    /// Create an object URL for an existing `Blob`.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectUrlError::JsError`] if `URL.createObjectURL`
    /// fails.
    pub fn from_blob(blob: &web_sys::Blob) -> Result<Self, ObjectUrlError> {
        let url = web_sys::Url::create_object_url_with_blob(blob)?;
        Ok(Self { url })
    }

    /// Copy `bytes` into a new `Blob` of type `mime` and create an
    /// object URL for it.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectUrlError::JsError`] if Blob or URL creation fails.
    pub fn from_bytes(bytes: &[u8], mime: &str) -> Result<Self, ObjectUrlError> {
        let blob = bytes_to_blob(bytes, mime)?;
        Self::from_blob(&blob)
    }

    /// The `blob:` URL, usable as an `<img src>` or `<a href>`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        // Best-effort: the document may already be gone on teardown.
        let _ = web_sys::Url::revoke_object_url(&self.url);
    }
}

/// Copy `bytes` into a new `Blob` with MIME type `mime`.
///
/// # Errors
///
/// Returns [`ObjectUrlError::JsError`] if the `Blob` constructor fails.
pub fn bytes_to_blob(bytes: &[u8], mime: &str) -> Result<web_sys::Blob, ObjectUrlError> {
    let array = js_sys::Uint8Array::from(bytes);
    let parts = js_sys::Array::new();
    parts.push(&array);

    let opts = BlobPropertyBag::new();
    opts.set_type(mime);

    Ok(web_sys::Blob::new_with_u8_array_sequence_and_options(
        &parts, &opts,
    )?)
}
