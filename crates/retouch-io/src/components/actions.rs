//! Apply and download buttons.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdWand};

/// Props for the [`ActionBar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ActionBarProps {
    /// A request is in flight; both actions are disabled.
    processing: bool,
    /// A processed preview exists and can be saved.
    has_processed: bool,
    /// Fired when "Apply & Preview" is clicked.
    on_apply: EventHandler<()>,
    /// Fired when "Download Image" is clicked.
    on_download: EventHandler<()>,
}

/// "Apply & Preview" and "Download Image" buttons.
///
/// Disabling while `processing` is the only guard against overlapping
/// requests; there is no cancellation.
#[component]
pub fn ActionBar(props: ActionBarProps) -> Element {
    let apply_label = if props.processing {
        "Processing..."
    } else {
        "Apply & Preview"
    };
    let download_disabled = props.processing || !props.has_processed;

    rsx! {
        div { class: "action-buttons",
            button {
                class: "btn btn-primary",
                disabled: props.processing,
                onclick: move |_| props.on_apply.call(()),
                Icon { icon: LdWand, width: 16, height: 16 }
                " {apply_label}"
            }
            button {
                class: "btn btn-secondary",
                disabled: download_disabled,
                onclick: move |_| props.on_download.call(()),
                Icon { icon: LdDownload, width: 16, height: 16 }
                " Download Image"
            }
        }
    }
}
