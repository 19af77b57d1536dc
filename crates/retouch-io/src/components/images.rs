//! Original and processed image previews.

use dioxus::prelude::*;

/// Props for the [`ImagePanels`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImagePanelsProps {
    /// Object URL of the selected file.
    original: Option<String>,
    /// Object URL of the most recently fetched processed image.
    processed: Option<String>,
}

/// Side-by-side previews. Each panel is only shown when its URL exists.
///
/// The URLs are borrowed from the session's object URLs; this
/// component never creates or revokes them.
#[component]
pub fn ImagePanels(props: ImagePanelsProps) -> Element {
    rsx! {
        section { class: "preview-panel",
            div { class: "image-display-area",
                if let Some(ref url) = props.original {
                    div { class: "image-container",
                        h3 { "Original" }
                        img { src: "{url}", alt: "Original" }
                    }
                }
                if let Some(ref url) = props.processed {
                    div { class: "image-container",
                        h3 { "Processed" }
                        img { src: "{url}", alt: "Processed" }
                    }
                }
            }
        }
    }
}
