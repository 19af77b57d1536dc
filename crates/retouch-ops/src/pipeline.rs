//! Upload and apply sequences against an [`ImageBackend`].
//!
//! [`apply_pipeline`] runs apply-then-download as one task: the caller
//! sees either a new preview or a typed failure, never a state where
//! the apply went through but no preview was fetched.

use crate::backend::{ImageBackend, RequestError, SourceImage};
use crate::operation::Operation;

/// Message shown when apply is attempted with nothing enabled.
pub const NO_OPERATIONS_MESSAGE: &str = "Please select at least one operation to apply.";

/// Failure of the ingest call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error: {0}")]
pub struct UploadError(pub RequestError);

/// Failure of the apply sequence.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    /// No operation was enabled; nothing was sent.
    #[error("{}", NO_OPERATIONS_MESSAGE)]
    NoOperations,

    /// The apply request failed; no download was attempted.
    #[error("Error: {}", describe_apply(.0))]
    Apply(RequestError),

    /// The apply request succeeded but fetching the result failed.
    #[error("Error fetching preview: {}", describe_preview(.0))]
    Preview(RequestError),
}

fn describe_apply(err: &RequestError) -> String {
    match err {
        RequestError::Status { status, body } => {
            format!("Server responded with {status}: {body}")
        }
        other => other.to_string(),
    }
}

fn describe_preview(err: &RequestError) -> String {
    match err {
        RequestError::Status { .. } => format!("Failed to fetch preview: {err}"),
        other => other.to_string(),
    }
}

/// Send the selected image to the ingest endpoint.
///
/// # Errors
///
/// Returns [`UploadError`] wrapping the transport or server failure.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
pub async fn upload_image<B: ImageBackend>(
    backend: &B,
    image: &SourceImage,
) -> Result<String, UploadError> {
    tracing::debug!(name = %image.name, bytes = image.bytes.len(), "uploading image");
    match backend.upload(image).await {
        Ok(message) => {
            tracing::info!(name = %image.name, server_message = %message, "image ingested");
            Ok(message)
        }
        Err(e) => {
            tracing::warn!(name = %image.name, error = %e, "upload failed");
            Err(UploadError(e))
        }
    }
}

/// Apply `operations` remotely and fetch the processed preview.
///
/// Issues the apply request, and only if it succeeds, the download
/// request. An empty list fails without touching the backend.
///
/// # Errors
///
/// - [`ApplyError::NoOperations`] if `operations` is empty.
/// - [`ApplyError::Apply`] if the apply request fails.
/// - [`ApplyError::Preview`] if the download request fails.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Send is not needed
pub async fn apply_pipeline<B: ImageBackend>(
    backend: &B,
    operations: &[Operation],
) -> Result<B::Preview, ApplyError> {
    if operations.is_empty() {
        return Err(ApplyError::NoOperations);
    }

    tracing::debug!(count = operations.len(), "applying operations");
    backend.apply(operations).await.map_err(|e| {
        tracing::warn!(error = %e, "apply request failed");
        ApplyError::Apply(e)
    })?;

    let preview = backend.download().await.map_err(|e| {
        tracing::warn!(error = %e, "preview download failed");
        ApplyError::Preview(e)
    })?;

    tracing::info!(count = operations.len(), "operations applied");
    Ok(preview)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_status_message_names_status_and_body() {
        let err = ApplyError::Apply(RequestError::Status {
            status: 500,
            body: "decode error".into(),
        });
        assert_eq!(
            err.to_string(),
            "Error: Server responded with 500: decode error"
        );
    }

    #[test]
    fn apply_network_message_is_underlying_text() {
        let err = ApplyError::Apply(RequestError::Network("Failed to fetch".into()));
        assert_eq!(err.to_string(), "Error: Failed to fetch");
    }

    #[test]
    fn preview_status_message() {
        let err = ApplyError::Preview(RequestError::Status {
            status: 404,
            body: "no image in session".into(),
        });
        assert_eq!(
            err.to_string(),
            "Error fetching preview: Failed to fetch preview: 404 no image in session"
        );
    }

    #[test]
    fn no_operations_message() {
        assert_eq!(ApplyError::NoOperations.to_string(), NO_OPERATIONS_MESSAGE);
    }

    #[test]
    fn upload_error_message() {
        let err = UploadError(RequestError::Rejected("Upload failed".into()));
        assert_eq!(err.to_string(), "Error: Upload failed");
    }

    #[test]
    fn upload_gateway_error_message_names_status() {
        let outcome = crate::backend::interpret_upload(502, "<html>Bad Gateway</html>")
            .map_err(|e| UploadError(e).to_string());
        assert_eq!(
            outcome,
            Err("Error: 502 <html>Bad Gateway</html>".to_owned())
        );
    }
}
