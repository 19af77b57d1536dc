//! Declarative image operations and their wire format.
//!
//! An [`Operation`] is one transformation request sent to the apply
//! endpoint. Operations are never stored; they are rebuilt from the
//! current [`OperationConfig`](crate::OperationConfig) on every apply.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for an operation kind.
///
/// The variant order is the order in which enabled operations are sent
/// to the backend, regardless of the order the user enabled them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    /// Scale to an explicit width and height.
    Resize,
    /// Cut out a rectangle at an offset.
    Crop,
    /// Rotate by an angle in degrees.
    Rotate,
    /// Mirror horizontally and/or vertically.
    Flip,
    /// Encoder quality (1-100).
    Quality,
    /// Brightness and contrast adjustment.
    BrightnessContrast,
    /// Convert to another image format.
    Format,
}

impl OperationKind {
    /// All kinds in declared submission order.
    pub const ALL: [Self; 7] = [
        Self::Resize,
        Self::Crop,
        Self::Rotate,
        Self::Flip,
        Self::Quality,
        Self::BrightnessContrast,
        Self::Format,
    ];

    /// Display label for the operation group header.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Resize => "Resize",
            Self::Crop => "Crop",
            Self::Rotate => "Rotate",
            Self::Flip => "Flip",
            Self::Quality => "Quality",
            Self::BrightnessContrast => "Brightness/Contrast",
            Self::Format => "Format",
        }
    }

    /// The `type` tag used on the wire.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Resize => "resize",
            Self::Crop => "crop",
            Self::Rotate => "rotate",
            Self::Flip => "flip",
            Self::Quality => "quality",
            Self::BrightnessContrast => "brightness-contrast",
            Self::Format => "format",
        }
    }

    /// Position of this kind in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One image transformation with its parameters.
///
/// Serialized as an internally tagged object, e.g.
/// `{"type":"resize","width":800,"height":600}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Operation {
    /// Scale to `width` x `height` pixels.
    Resize {
        /// Target width in pixels.
        width: u32,
        /// Target height in pixels.
        height: u32,
    },
    /// Keep the `width` x `height` rectangle whose top-left corner is at
    /// (`x`, `y`).
    Crop {
        /// Crop width in pixels.
        width: u32,
        /// Crop height in pixels.
        height: u32,
        /// Horizontal offset of the crop rectangle.
        x: i32,
        /// Vertical offset of the crop rectangle.
        y: i32,
    },
    /// Rotate clockwise by `angle` degrees.
    Rotate {
        /// Rotation in degrees.
        angle: f64,
    },
    /// Mirror the image.
    Flip {
        /// Mirror left-to-right.
        horizontal: bool,
        /// Mirror top-to-bottom.
        vertical: bool,
    },
    /// Set the output encoder quality.
    Quality {
        /// Quality in `1..=100`.
        quality: u8,
    },
    /// Adjust brightness and contrast. Both values are signed offsets.
    BrightnessContrast {
        /// Brightness offset.
        brightness: f64,
        /// Contrast offset.
        contrast: f64,
    },
    /// Re-encode in another format (e.g. `"png"`, `"jpeg"`).
    Format {
        /// Target format name as understood by the backend.
        format: String,
    },
}

impl Operation {
    /// The kind of this operation.
    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        match self {
            Self::Resize { .. } => OperationKind::Resize,
            Self::Crop { .. } => OperationKind::Crop,
            Self::Rotate { .. } => OperationKind::Rotate,
            Self::Flip { .. } => OperationKind::Flip,
            Self::Quality { .. } => OperationKind::Quality,
            Self::BrightnessContrast { .. } => OperationKind::BrightnessContrast,
            Self::Format { .. } => OperationKind::Format,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn all_contains_every_variant_in_index_order() {
        assert_eq!(OperationKind::ALL.len(), 7);
        for (i, kind) in OperationKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i, "{kind} is out of declared order");
        }
    }

    #[test]
    fn resize_serializes_with_type_tag() {
        let op = Operation::Resize {
            width: 800,
            height: 600,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "type": "resize", "width": 800, "height": 600 })
        );
    }

    #[test]
    fn brightness_contrast_uses_hyphenated_tag() {
        let op = Operation::BrightnessContrast {
            brightness: -10.0,
            contrast: 25.0,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "brightness-contrast");
        assert_eq!(json["brightness"], -10.0);
        assert_eq!(json["contrast"], 25.0);
    }

    #[test]
    fn crop_and_flip_field_names() {
        let crop = serde_json::to_value(Operation::Crop {
            width: 250,
            height: 250,
            x: 10,
            y: -5,
        })
        .unwrap();
        assert_eq!(
            crop,
            serde_json::json!({ "type": "crop", "width": 250, "height": 250, "x": 10, "y": -5 })
        );

        let flip = serde_json::to_value(Operation::Flip {
            horizontal: true,
            vertical: false,
        })
        .unwrap();
        assert_eq!(
            flip,
            serde_json::json!({ "type": "flip", "horizontal": true, "vertical": false })
        );
    }

    #[test]
    fn tag_matches_serialized_type() {
        let samples = [
            Operation::Resize {
                width: 1,
                height: 1,
            },
            Operation::Crop {
                width: 1,
                height: 1,
                x: 0,
                y: 0,
            },
            Operation::Rotate { angle: 90.0 },
            Operation::Flip {
                horizontal: false,
                vertical: true,
            },
            Operation::Quality { quality: 85 },
            Operation::BrightnessContrast {
                brightness: 0.0,
                contrast: 0.0,
            },
            Operation::Format {
                format: "png".into(),
            },
        ];
        for op in samples {
            let json = serde_json::to_value(&op).unwrap();
            assert_eq!(json["type"], op.kind().tag());
        }
    }

    #[test]
    fn deserializes_captured_request_body() {
        let body = r#"[{"type":"rotate","angle":90},{"type":"format","format":"png"}]"#;
        let ops: Vec<Operation> = serde_json::from_str(body).unwrap();
        assert_eq!(
            ops,
            vec![
                Operation::Rotate { angle: 90.0 },
                Operation::Format {
                    format: "png".into()
                },
            ]
        );
    }
}
