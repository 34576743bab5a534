//! Geometry utilities
//!
//! Coordinate normalization and per-kind field size presets. Mapped fields
//! carry positions and sizes as fractions of the containing page box, so
//! everything here works in `[0, 1]` space except [`normalized_point`],
//! which converts from viewport pixels.

use serde::{Deserialize, Serialize};

use crate::palette::FieldKind;

/// Clamp a value into `[min, max]`
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}

/// Rectangle in viewport pixel space
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

/// A point in normalized page space (fractions of the page box)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f32,
    pub y: f32,
}

/// A size in normalized page space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormSize {
    pub width: f32,
    pub height: f32,
}

/// Per-kind bounds on normalized field size
#[derive(Debug, Clone, Copy)]
pub struct SizeLimits {
    pub min_width: f32,
    pub max_width: f32,
    pub min_height: f32,
    pub max_height: f32,
}

/// Convert viewport pointer coordinates into a fraction of `target`'s box,
/// clamped to `[0, 1]` on each axis.
///
/// A degenerate rect (zero width or height) yields the box center; the
/// element may not have been laid out yet when the event fires.
pub fn normalized_point(client_x: f32, client_y: f32, target: &Rect) -> NormPoint {
    if target.width <= 0.0 || target.height <= 0.0 {
        return NormPoint { x: 0.5, y: 0.5 };
    }
    NormPoint {
        x: clamp((client_x - target.x) / target.width, 0.0, 1.0),
        y: clamp((client_y - target.y) / target.height, 0.0, 1.0),
    }
}

/// Default normalized size for a freshly placed field of the given kind
pub fn default_field_size(kind: FieldKind) -> NormSize {
    let (width, height) = match kind {
        FieldKind::Textarea => (0.30, 0.14),
        FieldKind::Date => (0.16, 0.065),
        FieldKind::Select => (0.28, 0.065),
        FieldKind::Radio => (0.24, 0.12),
        FieldKind::Checkbox => (0.06, 0.045),
        FieldKind::Signature => (0.26, 0.10),
        FieldKind::String | FieldKind::Email | FieldKind::Number => (0.22, 0.065),
    };
    NormSize { width, height }
}

/// Normalized size bounds enforced by the field editor
pub fn size_limits(kind: FieldKind) -> SizeLimits {
    match kind {
        FieldKind::Checkbox => SizeLimits {
            min_width: 0.02,
            max_width: 0.20,
            min_height: 0.015,
            max_height: 0.15,
        },
        FieldKind::Textarea | FieldKind::Signature => SizeLimits {
            min_width: 0.10,
            max_width: 0.95,
            min_height: 0.04,
            max_height: 0.60,
        },
        _ => SizeLimits {
            min_width: 0.05,
            max_width: 0.90,
            min_height: 0.02,
            max_height: 0.30,
        },
    }
}
