//! Status line for the outcome of the last action.

use dioxus::prelude::*;
use retouch_ops::Status;

/// Props for the [`StatusBar`] component.
#[derive(Props, Clone, PartialEq)]
pub struct StatusBarProps {
    /// The status to show. `None` renders nothing.
    status: Option<Status>,
}

/// Shows the most recent status, styled as an error when it is one.
#[component]
pub fn StatusBar(props: StatusBarProps) -> Element {
    let Some(status) = props.status else {
        return rsx! {};
    };
    let class = if status.is_error() {
        "status-bar error"
    } else {
        "status-bar"
    };

    rsx! {
        div { class: "{class}", role: "status", "{status.message}" }
    }
}
