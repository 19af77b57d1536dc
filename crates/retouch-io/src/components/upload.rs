//! File upload prompt with drag-and-drop and file picker.

use dioxus::html::{FileData, HasFileData};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdUpload;
use retouch_ops::SourceImage;

/// Allowed file extensions for image uploads.
const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "bmp"];

/// Check whether a filename has an allowed image extension.
fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(_, ext)| {
        ALLOWED_EXTENSIONS
            .iter()
            .any(|a| a.eq_ignore_ascii_case(ext))
    })
}

/// Props for the [`FileUpload`] component.
#[derive(Props, Clone, PartialEq)]
pub struct FileUploadProps {
    /// Called with the selected image once its bytes have been read.
    on_select: EventHandler<SourceImage>,
    /// Ignore new selections (an upload is already in flight).
    #[props(default)]
    disabled: bool,
}

/// The initial upload prompt.
///
/// Accepts PNG, JPEG, GIF, WebP, and BMP images. When a file is chosen
/// (via the picker or drag-and-drop), reads the bytes and fires
/// `on_select`. Only the first file of a multi-file drop is used.
#[component]
pub fn FileUpload(props: FileUploadProps) -> Element {
    let mut dragging = use_signal(|| false);
    let mut error = use_signal(|| Option::<String>::None);
    let disabled = props.disabled;

    // Shared by the picker and drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        if disabled {
            return;
        }
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        if !has_allowed_extension(&name) {
            error.set(Some(format!("Unsupported file type: {name}")));
            return;
        }
        match file.read_bytes().await {
            Ok(bytes) => {
                error.set(None);
                props.on_select.call(SourceImage::new(name, bytes.to_vec()));
            }
            Err(e) => {
                tracing::warn!(%name, error = %e, "failed to read selected file");
                error.set(Some(format!("Failed to read file: {e}")));
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let zone_class = if dragging() {
        "image-upload-container dragging"
    } else {
        "image-upload-container"
    };

    rsx! {
        div {
            class: "{zone_class}",
            ondragover: move |evt| {
                evt.prevent_default();
                dragging.set(true);
            },
            ondragleave: move |_| {
                dragging.set(false);
            },
            ondrop: handle_drop,

            h2 { "Upload Your Image" }
            p { "Select a file from your computer to get started" }

            if let Some(ref err) = error() {
                p { class: "upload-error", "{err}" }
            }

            label {
                class: "custom-file-upload",
                r#for: "file-upload",
                Icon { icon: LdUpload, width: 18, height: 18 }
                " Choose Your Image"
            }
            input {
                id: "file-upload",
                r#type: "file",
                accept: ".png,.jpg,.jpeg,.gif,.webp,.bmp",
                disabled: disabled,
                onchange: handle_files,
            }

            p { class: "upload-hint", "PNG, JPEG, GIF, WebP, BMP" }
        }
    }
}
