//! Operation configuration: the editor's toggles and parameters.
//!
//! All editor state lives in one [`OperationConfig`] keyed by
//! [`OperationKind`]. The ordered request body is derived from it by
//! the pure [`OperationConfig::operations`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::operation::{Operation, OperationKind};

/// Lowest accepted encoder quality.
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted encoder quality.
pub const MAX_QUALITY: u8 = 100;

/// Parameters for [`Operation::Resize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeParams {
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

impl Default for ResizeParams {
    fn default() -> Self {
        Self {
            width: 500,
            height: 500,
        }
    }
}

/// Parameters for [`Operation::Crop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropParams {
    /// Crop width in pixels.
    pub width: u32,
    /// Crop height in pixels.
    pub height: u32,
    /// Horizontal offset.
    pub x: i32,
    /// Vertical offset.
    pub y: i32,
}

impl Default for CropParams {
    fn default() -> Self {
        Self {
            width: 250,
            height: 250,
            x: 0,
            y: 0,
        }
    }
}

/// Parameters for [`Operation::Rotate`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotateParams {
    /// Rotation in degrees.
    pub angle: f64,
}

impl Default for RotateParams {
    fn default() -> Self {
        Self { angle: 90.0 }
    }
}

/// Parameters for [`Operation::Flip`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlipParams {
    /// Mirror left-to-right.
    pub horizontal: bool,
    /// Mirror top-to-bottom.
    pub vertical: bool,
}

/// Parameters for [`Operation::Quality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityParams {
    /// Encoder quality. Clamped to
    /// [`MIN_QUALITY`]..=[`MAX_QUALITY`] when the operation is built.
    pub quality: u8,
}

impl Default for QualityParams {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

/// Parameters for [`Operation::BrightnessContrast`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BrightnessContrastParams {
    /// Brightness offset.
    pub brightness: f64,
    /// Contrast offset.
    pub contrast: f64,
}

/// Parameters for [`Operation::Format`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatParams {
    /// Target format name.
    pub format: String,
}

impl Default for FormatParams {
    fn default() -> Self {
        Self {
            format: "jpeg".to_owned(),
        }
    }
}

/// Editor configuration: which operations are enabled and their
/// parameters.
///
/// Parameters of a disabled operation are kept so re-enabling it
/// restores what the user last entered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationConfig {
    /// Enabled flag per kind, indexed by [`OperationKind::index`].
    enabled: [bool; OperationKind::ALL.len()],

    /// Resize parameters.
    pub resize: ResizeParams,
    /// Crop parameters.
    pub crop: CropParams,
    /// Rotate parameters.
    pub rotate: RotateParams,
    /// Flip parameters.
    pub flip: FlipParams,
    /// Quality parameters.
    pub quality: QualityParams,
    /// Brightness/contrast parameters.
    pub brightness_contrast: BrightnessContrastParams,
    /// Format parameters.
    pub format: FormatParams,
}

impl OperationConfig {
    /// Whether `kind` will be included in the next apply.
    #[must_use]
    pub const fn is_enabled(&self, kind: OperationKind) -> bool {
        self.enabled[kind.index()]
    }

    /// Enable or disable `kind`.
    pub const fn set_enabled(&mut self, kind: OperationKind, enabled: bool) {
        self.enabled[kind.index()] = enabled;
    }

    /// Flip the enabled state of `kind`.
    pub const fn toggle(&mut self, kind: OperationKind) {
        self.enabled[kind.index()] = !self.enabled[kind.index()];
    }

    /// Enabled kinds in declared order.
    pub fn enabled_kinds(&self) -> impl Iterator<Item = OperationKind> + '_ {
        OperationKind::ALL
            .into_iter()
            .filter(|&kind| self.is_enabled(kind))
    }

    /// Returns `true` if no operation is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.enabled.iter().any(|&e| e)
    }

    /// Set the target format, normalizing whitespace and case.
    pub fn set_format(&mut self, format: &str) {
        self.format.format = format.trim().to_ascii_lowercase();
    }

    /// Build the operation for `kind` from the current parameters,
    /// whether or not it is enabled.
    #[must_use]
    pub fn operation(&self, kind: OperationKind) -> Operation {
        match kind {
            OperationKind::Resize => Operation::Resize {
                width: self.resize.width,
                height: self.resize.height,
            },
            OperationKind::Crop => Operation::Crop {
                width: self.crop.width,
                height: self.crop.height,
                x: self.crop.x,
                y: self.crop.y,
            },
            OperationKind::Rotate => Operation::Rotate {
                angle: self.rotate.angle,
            },
            OperationKind::Flip => Operation::Flip {
                horizontal: self.flip.horizontal,
                vertical: self.flip.vertical,
            },
            OperationKind::Quality => Operation::Quality {
                quality: self.quality.quality.clamp(MIN_QUALITY, MAX_QUALITY),
            },
            OperationKind::BrightnessContrast => Operation::BrightnessContrast {
                brightness: self.brightness_contrast.brightness,
                contrast: self.brightness_contrast.contrast,
            },
            OperationKind::Format => Operation::Format {
                format: self.format.format.clone(),
            },
        }
    }

    /// The ordered list of enabled operations.
    ///
    /// Order follows [`OperationKind::ALL`], never toggle order.
    #[must_use]
    pub fn operations(&self) -> Vec<Operation> {
        self.enabled_kinds().map(|kind| self.operation(kind)).collect()
    }
}

/// Parse a form field into `T`, ignoring surrounding whitespace.
///
/// Returns `None` for empty or unparsable input; callers keep the
/// previous value in that case.
#[must_use]
pub fn parse_field<T: FromStr>(text: &str) -> Option<T> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    text.parse().ok()
}

/// Parse a finite decimal number from a form field.
///
/// Like [`parse_field`] but also rejects `NaN` and infinities, which
/// `f64::from_str` otherwise accepts.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    parse_field::<f64>(text).filter(|v| v.is_finite())
}

/// Parse a quality value, clamping it into
/// [`MIN_QUALITY`]..=[`MAX_QUALITY`].
#[must_use]
pub fn parse_quality(text: &str) -> Option<u8> {
    let value = parse_field::<i64>(text)?;
    let clamped = value.clamp(i64::from(MIN_QUALITY), i64::from(MAX_QUALITY));
    u8::try_from(clamped).ok()
}
