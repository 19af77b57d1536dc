use std::rc::Rc;

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdRotateCcw;
use retouch_io::{
    ActionBar, FetchBackend, FileUpload, ImagePanels, ObjectUrl, OperationControls, StatusBar,
    download,
};
use retouch_ops::{BackendConfig, OperationConfig, Session, SourceImage};

fn main() {
    retouch_io::logging::init_logging();
    dioxus::launch(app);
}

/// Root application component.
///
/// All session state (selection, previews, status, in-flight phase)
/// lives in one `Session` signal; the operation toggles and parameters
/// live in one `OperationConfig` signal. Requests run in spawned tasks
/// that report back through the session's `finish_*` transitions.
#[allow(clippy::too_many_lines)]
fn app() -> Element {
    // --- Application state ---
    let backend = use_hook(|| {
        let backend = FetchBackend::new(BackendConfig::from_env());
        tracing::info!(base_url = %backend.config().base_url, "image service configured");
        Rc::new(backend)
    });
    let mut session = use_signal(Session::<ObjectUrl>::new);
    let mut config = use_signal(OperationConfig::default);

    // --- File selection handler ---
    let on_select = {
        let backend = Rc::clone(&backend);
        move |image: SourceImage| {
            let ticket = session.write().begin_upload(image.name.clone(), || {
                ObjectUrl::from_bytes(&image.bytes, &image.mime)
                    .map_err(|e| tracing::warn!(error = %e, "failed to create local preview"))
                    .ok()
            });
            let backend = Rc::clone(&backend);
            spawn(async move {
                let outcome = retouch_ops::upload_image(&*backend, &image).await;
                session.write().finish_upload(ticket, outcome);
            });
        }
    };

    // --- Apply handler ---
    // Builds the operation list, then runs apply + download as one task.
    let on_apply = {
        let backend = Rc::clone(&backend);
        move |()| {
            let Some(request) = session.write().begin_apply(&config.read()) else {
                return;
            };
            let backend = Rc::clone(&backend);
            spawn(async move {
                let outcome = retouch_ops::apply_pipeline(&*backend, &request.operations).await;
                session.write().finish_apply(request.ticket, outcome);
            });
        }
    };

    // --- Download handler (local only) ---
    let on_download = move |()| {
        let mut current = session.write();
        let saved = match current.request_download() {
            Ok(preview) => download::save_processed(preview),
            Err(_) => return,
        };
        match saved {
            Ok(()) => current.mark_download_started(),
            Err(e) => {
                tracing::warn!(error = %e, "download failed");
                current.report_download_failure(&e);
            }
        }
    };

    let on_reset = move |_| {
        tracing::debug!("session reset");
        session.write().reset();
    };

    let on_config_change = move |new_config: OperationConfig| {
        config.set(new_config);
    };

    // --- View state ---
    let view = session.read();
    let shows_editor = view.shows_editor();
    let processing = view.is_processing();
    let has_processed = view.has_processed();
    let status = view.status().cloned();
    let original_url = view
        .selected()
        .and_then(|selected| selected.preview.as_ref())
        .map(|url| url.url().to_owned());
    let processed_url = view.processed().map(|url| url.url().to_owned());
    drop(view);

    let main_class = if shows_editor {
        "main-content"
    } else {
        "main-content centered"
    };

    // --- Layout ---
    rsx! {
        style { dangerous_inner_html: include_str!("../assets/main.css") }

        div { class: "app-container",
            header { class: "app-header",
                h1 { "retouch" }
                if shows_editor {
                    button {
                        class: "btn btn-reset",
                        onclick: on_reset,
                        Icon { icon: LdRotateCcw, width: 16, height: 16 }
                        " Start Over"
                    }
                }
            }

            StatusBar { status: status }

            main { class: "{main_class}",
                if shows_editor {
                    div { class: "editor-layout",
                        aside { class: "controls-panel",
                            h2 { "Operations" }
                            OperationControls {
                                config: config(),
                                on_config_change: on_config_change,
                            }
                            ActionBar {
                                processing: processing,
                                has_processed: has_processed,
                                on_apply: on_apply,
                                on_download: on_download,
                            }
                        }
                        ImagePanels {
                            original: original_url,
                            processed: processed_url,
                        }
                    }
                } else {
                    div { class: "upload-prompt-container",
                        FileUpload {
                            on_select: on_select,
                            disabled: processing,
                        }
                    }
                }
            }
        }
    }
}
