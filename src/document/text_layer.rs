//! PDF text layer
//!
//! Turns a page's raw text-content fragments into positioned, editable
//! runs in the page's pixel space. PDF coordinates grow bottom-up, so the
//! vertical translation is flipped against the native page height before
//! scaling.

use crate::geometry::clamp;

use super::types::{EditableTextRun, PageView, PdfPageContent};

/// Visual font-size clamp range in pixels
const MIN_FONT_SIZE: f32 = 8.0;
const MAX_FONT_SIZE: f32 = 40.0;

/// Width estimate per character, as a fraction of the font size
const WIDTH_PER_CHAR: f32 = 0.55;

/// Floor for a run's box width in pixels
const MIN_RUN_WIDTH: f32 = 24.0;

/// Floor for a run's box height in pixels
const MIN_RUN_HEIGHT: f32 = 12.0;

/// Fraction of the box height the anchor is nudged upward so the visible
/// glyph baseline lines up with the box
const BASELINE_NUDGE: f32 = 0.8;

/// Build the editable text runs for one page.
///
/// Whitespace-only fragments are dropped; every run's box is clamped to
/// stay inside the page's pixel bounds.
pub fn build_text_runs(content: &PdfPageContent, view: &PageView) -> Vec<EditableTextRun> {
    let scale = view.scale;
    let mut runs = Vec::with_capacity(content.fragments.len());

    for fragment in &content.fragments {
        if fragment.text.trim().is_empty() {
            continue;
        }

        let [_a, _b, _c, d, e, f] = fragment.transform;

        let font_size = clamp(d.abs() * scale, MIN_FONT_SIZE, MAX_FONT_SIZE);
        let char_count = fragment.text.chars().count() as f32;
        let width = (fragment.width * scale)
            .max(char_count * font_size * WIDTH_PER_CHAR)
            .max(MIN_RUN_WIDTH);
        let height = (font_size * 1.2).max(MIN_RUN_HEIGHT);

        let x = e * scale;
        // Flip from PDF's bottom-up origin to top-down pixels, then pull
        // the anchor up so the baseline sits on the box
        let y = (content.height - f) * scale - BASELINE_NUDGE * height;

        runs.push(EditableTextRun {
            page_number: view.page_number,
            index: runs.len() as u32,
            x: clamp(x, 0.0, (view.width - width).max(0.0)),
            y: clamp(y, 0.0, (view.height - height).max(0.0)),
            width,
            height,
            font_size,
            text: fragment.text.clone(),
        });
    }

    runs
}
