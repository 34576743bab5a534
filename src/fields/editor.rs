//! Field editing surface
//!
//! The single mutation choke point for a placed field. A partial patch is
//! merged into the field, then size and position are re-clamped together:
//! growing a field repositions it so it stays on-page, shrinking never
//! moves it.

use crate::geometry::{self, clamp};

use super::types::{FieldPatch, MappedField};

/// Merge `patch` into `field`, enforcing per-kind size limits and the
/// on-page invariant (`x + width <= 1`, `y + height <= 1`).
pub fn apply_patch(field: &mut MappedField, patch: FieldPatch) {
    if let Some(label) = patch.label {
        field.label = label;
    }
    if let Some(name) = patch.name {
        field.name = name;
    }
    if let Some(required) = patch.required {
        field.required = required;
    }
    if let Some(help_text) = patch.help_text {
        field.help_text = help_text;
    }
    if let Some(options) = patch.options {
        field.options = options;
    }
    if let Some(x) = patch.x {
        field.x = x;
    }
    if let Some(y) = patch.y {
        field.y = y;
    }
    if let Some(width) = patch.width {
        field.width = width;
    }
    if let Some(height) = patch.height {
        field.height = height;
    }

    let limits = geometry::size_limits(field.kind);
    field.width = clamp(field.width, limits.min_width, limits.max_width);
    field.height = clamp(field.height, limits.min_height, limits.max_height);
    field.x = clamp(field.x, 0.0, 1.0 - field.width);
    field.y = clamp(field.y, 0.0, 1.0 - field.height);
}
