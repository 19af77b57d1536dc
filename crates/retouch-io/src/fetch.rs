//! [`ImageBackend`] over the browser `fetch` API.
//!
//! Every request is sent with `credentials: "include"` so the image
//! service can tie the upload, apply, and download calls to the same
//! cookie-keyed session. No timeout or retry is applied; the browser's
//! defaults govern.

use retouch_ops::backend::{check_status, interpret_apply, interpret_upload};
use retouch_ops::{BackendConfig, ImageBackend, Operation, RequestError, SourceImage};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use crate::object_url::{ObjectUrl, bytes_to_blob};

/// Image service client backed by `window.fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchBackend {
    config: BackendConfig,
}

impl FetchBackend {
    /// Create a client for the service described by `config`.
    #[must_use]
    pub const fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    /// The endpoint configuration in use.
    #[must_use]
    pub const fn config(&self) -> &BackendConfig {
        &self.config
    }
}

impl ImageBackend for FetchBackend {
    type Preview = ObjectUrl;

    async fn upload(&self, image: &SourceImage) -> Result<String, RequestError> {
        let blob = bytes_to_blob(&image.bytes, &image.mime)
            .map_err(|e| RequestError::Network(e.to_string()))?;
        let form = web_sys::FormData::new().map_err(network_error)?;
        form.append_with_blob_and_filename("file", &blob, &image.name)
            .map_err(network_error)?;

        let body: &JsValue = &form;
        let request = new_request("POST", &self.config.upload_url(), Some(body))?;
        let response = send(&request).await?;
        let status = response.status();
        let body = read_text(&response).await?;
        interpret_upload(status, &body)
    }

    async fn apply(&self, operations: &[Operation]) -> Result<(), RequestError> {
        let json = serde_json::to_string(operations)
            .map_err(|e| RequestError::Malformed(format!("failed to serialize operations: {e}")))?;

        let request = new_request(
            "POST",
            &self.config.apply_url(),
            Some(&JsValue::from_str(&json)),
        )?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(network_error)?;

        let response = send(&request).await?;
        let status = response.status();
        let body = read_text(&response).await?;
        interpret_apply(status, &body)
    }

    async fn download(&self) -> Result<ObjectUrl, RequestError> {
        let request = new_request("GET", &self.config.download_url(), None)?;
        let response = send(&request).await?;
        if !response.ok() {
            let body = read_text(&response).await?;
            check_status(response.status(), &body)?;
        }

        let promise = response.blob().map_err(network_error)?;
        let blob: web_sys::Blob = JsFuture::from(promise)
            .await
            .map_err(network_error)?
            .dyn_into()
            .map_err(|_| RequestError::Malformed("response body is not a Blob".into()))?;
        tracing::debug!(bytes = blob.size(), mime = %blob.type_(), "fetched processed image");

        ObjectUrl::from_blob(&blob).map_err(|e| RequestError::Malformed(e.to_string()))
    }
}

/// Build a credentialed request.
fn new_request(method: &str, url: &str, body: Option<&JsValue>) -> Result<Request, RequestError> {
    let init = RequestInit::new();
    init.set_method(method);
    init.set_credentials(RequestCredentials::Include);
    if let Some(body) = body {
        init.set_body(body);
    }
    Request::new_with_str_and_init(url, &init).map_err(network_error)
}

/// Dispatch `request` and wait for the response headers.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Request is !Send
async fn send(request: &Request) -> Result<Response, RequestError> {
    let window =
        web_sys::window().ok_or_else(|| RequestError::Network("no global window".into()))?;
    tracing::debug!(method = %request.method(), url = %request.url(), "fetch");
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(network_error)?;
    value
        .dyn_into::<Response>()
        .map_err(|_| RequestError::Malformed("fetch did not resolve to a Response".into()))
}

/// Read the whole response body as text.
#[allow(clippy::future_not_send)] // WASM is single-threaded; Response is !Send
async fn read_text(response: &Response) -> Result<String, RequestError> {
    let promise = response.text().map_err(network_error)?;
    let value = JsFuture::from(promise).await.map_err(network_error)?;
    Ok(value.as_string().unwrap_or_default())
}

/// Convert a rejected promise or thrown value into a transport error.
///
/// Uses the JS `Error.message` when available (e.g. `"Failed to
/// fetch"`), falling back to the value's debug representation.
#[allow(clippy::needless_pass_by_value)] // used as a map_err callback
fn network_error(value: JsValue) -> RequestError {
    let text = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    RequestError::Network(text)
}
