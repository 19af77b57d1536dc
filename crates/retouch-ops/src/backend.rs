//! The remote image service contract.
//!
//! The backend keeps the uploaded image in server-side session state
//! keyed by cookies; no image identifier is ever sent. This module
//! defines the endpoints, the [`ImageBackend`] trait a transport
//! implements, and the pure response interpretation every transport
//! shares.

use serde::Deserialize;

use crate::operation::Operation;

/// Base URL used when no override is compiled in.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Message reported when the ingest endpoint fails without one.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed";

/// Message reported when the ingest endpoint succeeds without one.
pub const UPLOAD_OK_MESSAGE: &str = "Image uploaded.";

/// Where the image service lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Scheme, host, and optional port, e.g. `http://localhost:8080`.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }
}

impl BackendConfig {
    /// Configuration with the base URL taken from the `RETOUCH_API_BASE`
    /// environment variable at compile time, if set.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_base(option_env!("RETOUCH_API_BASE"))
    }

    /// Configuration with an optional base URL override.
    ///
    /// Blank overrides fall back to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn with_base(base: Option<&str>) -> Self {
        match base.map(str::trim) {
            Some(base) if !base.is_empty() => Self {
                base_url: base.to_owned(),
            },
            _ => Self::default(),
        }
    }

    /// URL of the ingest endpoint.
    #[must_use]
    pub fn upload_url(&self) -> String {
        self.endpoint("upload")
    }

    /// URL of the apply endpoint.
    #[must_use]
    pub fn apply_url(&self) -> String {
        self.endpoint("apply")
    }

    /// URL of the download endpoint.
    #[must_use]
    pub fn download_url(&self) -> String {
        self.endpoint("download")
    }

    fn endpoint(&self, name: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{base}/api/images/{name}")
    }
}

/// A user-selected image as sent to the ingest endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Original filename.
    pub name: String,
    /// MIME type of `bytes`.
    pub mime: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl SourceImage {
    /// Build a source image, inferring the MIME type from `name`.
    #[must_use]
    pub fn new(name: String, bytes: Vec<u8>) -> Self {
        let mime = mime_for_filename(&name).to_owned();
        Self { name, mime, bytes }
    }
}

/// Infer an image MIME type from a filename extension.
#[must_use]
pub fn mime_for_filename(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map_or("", |(_, ext)| ext);
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Errors from a single backend request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The request never produced a response (connection refused,
    /// CORS rejection, aborted fetch).
    #[error("{0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("{status} {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The server reported failure in its response body.
    #[error("{0}")]
    Rejected(String),

    /// The response body could not be interpreted.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Transport for the three image service endpoints.
///
/// Implementations must include credentials on every request so the
/// server can associate them with the ingested image.
#[allow(async_fn_in_trait)] // WASM is single-threaded; futures need not be Send
pub trait ImageBackend {
    /// Scoped handle to fetched image bytes, released on drop.
    type Preview;

    /// Send the source image to the ingest endpoint.
    ///
    /// Returns the server's message on success.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] if the request fails or the server
    /// reports failure.
    async fn upload(&self, image: &SourceImage) -> Result<String, RequestError>;

    /// Submit the ordered operation list to the apply endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] if the request fails or the server
    /// answers with a non-2xx status.
    async fn apply(&self, operations: &[Operation]) -> Result<(), RequestError>;

    /// Fetch the processed image from the download endpoint.
    ///
    /// # Errors
    ///
    /// Returns a [`RequestError`] if the request fails or the server
    /// answers with a non-2xx status.
    async fn download(&self) -> Result<Self::Preview, RequestError>;
}

/// JSON body returned by the ingest endpoint.
#[derive(Debug, Default, Deserialize)]
struct UploadReply {
    message: Option<String>,
    success: Option<bool>,
}

/// Returns `true` for 2xx status codes.
#[must_use]
pub const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}

/// Interpret an ingest endpoint response.
///
/// # Errors
///
/// On a non-2xx status, returns [`RequestError::Rejected`] with the
/// server's `message` (or [`UPLOAD_FAILED_MESSAGE`]) when the body is
/// JSON, and [`RequestError::Status`] when it is not (e.g. a proxy's
/// HTML error page). On a 2xx status, returns [`RequestError::Malformed`]
/// if the body is not JSON and [`RequestError::Rejected`] if it carries
/// `"success": false`.
pub fn interpret_upload(status: u16, body: &str) -> Result<String, RequestError> {
    if !is_success(status) {
        let Ok(reply) = serde_json::from_str::<UploadReply>(body) else {
            return Err(RequestError::Status {
                status,
                body: body.to_owned(),
            });
        };
        return Err(RequestError::Rejected(failure_message(reply)));
    }

    let reply: UploadReply =
        serde_json::from_str(body).map_err(|e| RequestError::Malformed(e.to_string()))?;
    if reply.success == Some(false) {
        return Err(RequestError::Rejected(failure_message(reply)));
    }
    Ok(reply
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UPLOAD_OK_MESSAGE.to_owned()))
}

fn failure_message(reply: UploadReply) -> String {
    reply
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_owned())
}

/// Interpret an apply endpoint response.
///
/// The body content is not used beyond confirming it is JSON. An empty
/// body is accepted.
///
/// # Errors
///
/// Returns [`RequestError::Status`] on a non-2xx status, or
/// [`RequestError::Malformed`] if a non-empty body is not JSON.
pub fn interpret_apply(status: u16, body: &str) -> Result<(), RequestError> {
    check_status(status, body)?;
    if body.trim().is_empty() {
        return Ok(());
    }
    serde_json::from_str::<serde_json::Value>(body)
        .map(|_| ())
        .map_err(|e| RequestError::Malformed(e.to_string()))
}

/// Check the status of a response whose body is otherwise opaque.
///
/// `body` is only read for the error message.
///
/// # Errors
///
/// Returns [`RequestError::Status`] on a non-2xx status.
pub fn check_status(status: u16, body: &str) -> Result<(), RequestError> {
    if is_success(status) {
        Ok(())
    } else {
        Err(RequestError::Status {
            status,
            body: body.to_owned(),
        })
    }
}
