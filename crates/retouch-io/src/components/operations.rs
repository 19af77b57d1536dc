//! Operation toggles and parameter inputs.
//!
//! One group per [`OperationKind`] in submission order. Clicking a
//! group header toggles the operation; its inputs are only shown while
//! it is enabled. Unparsable input leaves the previous value in place.

use dioxus::prelude::*;
use retouch_ops::config::{parse_field, parse_number, parse_quality};
use retouch_ops::{OperationConfig, OperationKind};

/// Props for the [`OperationControls`] component.
#[derive(Props, Clone, PartialEq)]
pub struct OperationControlsProps {
    /// Current configuration (read-only).
    config: OperationConfig,
    /// Callback fired with the updated configuration on any change.
    on_config_change: EventHandler<OperationConfig>,
}

/// Renders every operation group.
#[component]
pub fn OperationControls(props: OperationControlsProps) -> Element {
    let on_change = props.on_config_change;

    rsx! {
        for kind in OperationKind::ALL {
            {render_group(kind, &props.config, on_change)}
        }
    }
}

/// Render one collapsible operation group.
fn render_group(
    kind: OperationKind,
    config: &OperationConfig,
    on_change: EventHandler<OperationConfig>,
) -> Element {
    let enabled = config.is_enabled(kind);
    let group_class = if enabled {
        "operation-group active"
    } else {
        "operation-group"
    };
    let label = kind.label();
    let toggled = config.clone();

    rsx! {
        div { key: "{kind.tag()}", class: "{group_class}",
            div {
                class: "operation-group-header",
                role: "button",
                aria_pressed: "{enabled}",
                onclick: move |_| {
                    let mut c = toggled.clone();
                    c.toggle(kind);
                    tracing::debug!(%kind, enabled = c.is_enabled(kind), "operation toggled");
                    on_change.call(c);
                },
                "{label}"
            }
            if enabled {
                {render_inputs(kind, config, on_change)}
            }
        }
    }
}

/// Render the parameter inputs for an enabled operation.
#[allow(clippy::too_many_lines)]
fn render_inputs(
    kind: OperationKind,
    config: &OperationConfig,
    on_change: EventHandler<OperationConfig>,
) -> Element {
    match kind {
        OperationKind::Resize => rsx! {
            div { class: "operation-inputs",
                {render_number(
                    "resize_width",
                    "Width",
                    &config.resize.width.to_string(),
                    edit(config, on_change, |c, v| parse_field(v).map(|w| c.resize.width = w)),
                )}
                {render_number(
                    "resize_height",
                    "Height",
                    &config.resize.height.to_string(),
                    edit(config, on_change, |c, v| parse_field(v).map(|h| c.resize.height = h)),
                )}
            }
        },

        OperationKind::Crop => rsx! {
            div { class: "operation-inputs",
                {render_number(
                    "crop_width",
                    "Width",
                    &config.crop.width.to_string(),
                    edit(config, on_change, |c, v| parse_field(v).map(|w| c.crop.width = w)),
                )}
                {render_number(
                    "crop_height",
                    "Height",
                    &config.crop.height.to_string(),
                    edit(config, on_change, |c, v| parse_field(v).map(|h| c.crop.height = h)),
                )}
                {render_number(
                    "crop_x",
                    "X offset",
                    &config.crop.x.to_string(),
                    edit(config, on_change, |c, v| parse_field(v).map(|x| c.crop.x = x)),
                )}
                {render_number(
                    "crop_y",
                    "Y offset",
                    &config.crop.y.to_string(),
                    edit(config, on_change, |c, v| parse_field(v).map(|y| c.crop.y = y)),
                )}
            }
        },

        OperationKind::Rotate => rsx! {
            div { class: "operation-inputs single-input",
                {render_number(
                    "rotate_angle",
                    "Angle",
                    &config.rotate.angle.to_string(),
                    edit(config, on_change, |c, v| parse_number(v).map(|a| c.rotate.angle = a)),
                )}
            }
        },

        OperationKind::Flip => {
            let config_h = config.clone();
            let config_v = config.clone();
            rsx! {
                div { class: "operation-inputs flip-options",
                    {render_checkbox(
                        "flip_horizontal",
                        "Horizontal",
                        config.flip.horizontal,
                        move |checked| {
                            let mut c = config_h.clone();
                            c.flip.horizontal = checked;
                            on_change.call(c);
                        },
                    )}
                    {render_checkbox(
                        "flip_vertical",
                        "Vertical",
                        config.flip.vertical,
                        move |checked| {
                            let mut c = config_v.clone();
                            c.flip.vertical = checked;
                            on_change.call(c);
                        },
                    )}
                }
            }
        }

        OperationKind::Quality => rsx! {
            div { class: "operation-inputs single-input",
                {render_number(
                    "quality_value",
                    "1-100",
                    &config.quality.quality.to_string(),
                    edit(config, on_change, |c, v| parse_quality(v).map(|q| c.quality.quality = q)),
                )}
            }
        },

        OperationKind::BrightnessContrast => rsx! {
            div { class: "operation-inputs",
                {render_number(
                    "brightness",
                    "Brightness",
                    &config.brightness_contrast.brightness.to_string(),
                    edit(config, on_change, |c, v| {
                        parse_number(v).map(|b| c.brightness_contrast.brightness = b)
                    }),
                )}
                {render_number(
                    "contrast",
                    "Contrast",
                    &config.brightness_contrast.contrast.to_string(),
                    edit(config, on_change, |c, v| {
                        parse_number(v).map(|k| c.brightness_contrast.contrast = k)
                    }),
                )}
            }
        },

        OperationKind::Format => {
            let config = config.clone();
            let value = config.format.format.clone();
            rsx! {
                div { class: "operation-inputs single-input",
                    input {
                        id: "format_value",
                        placeholder: "png, jpg, etc.",
                        value: "{value}",
                        oninput: move |e| {
                            let mut c = config.clone();
                            c.set_format(&e.value());
                            on_change.call(c);
                        },
                    }
                }
            }
        }
    }
}

/// Build an input handler that applies `update` to a copy of `config`.
///
/// `update` returns `None` when the text could not be parsed, in which
/// case no change is emitted.
fn edit(
    config: &OperationConfig,
    on_change: EventHandler<OperationConfig>,
    update: impl Fn(&mut OperationConfig, &str) -> Option<()> + 'static,
) -> impl Fn(String) + 'static {
    let config = config.clone();
    move |text: String| {
        let mut c = config.clone();
        if update(&mut c, &text).is_some() {
            on_change.call(c);
        } else {
            tracing::debug!(input = %text, "ignoring unparsable parameter");
        }
    }
}

/// Render a numeric input with a placeholder label.
fn render_number(
    id: &str,
    placeholder: &str,
    value: &str,
    on_input: impl Fn(String) + 'static,
) -> Element {
    let id = id.to_string();
    let placeholder = placeholder.to_string();
    let value = value.to_string();

    rsx! {
        input {
            r#type: "number",
            id: "{id}",
            placeholder: "{placeholder}",
            title: "{placeholder}",
            value: "{value}",
            oninput: move |e| on_input(e.value()),
        }
    }
}

/// Render a labeled checkbox.
fn render_checkbox(
    id: &str,
    label: &str,
    checked: bool,
    on_change: impl Fn(bool) + 'static,
) -> Element {
    let id = id.to_string();
    let label = label.to_string();

    rsx! {
        label { r#for: "{id}",
            input {
                r#type: "checkbox",
                id: "{id}",
                checked: checked,
                onchange: move |e| {
                    on_change(e.checked());
                },
            }
            " {label}"
        }
    }
}
