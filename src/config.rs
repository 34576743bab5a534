//! Engine configuration

use serde::Deserialize;

use crate::geometry::clamp;

/// Vertical stacking policy for fields placed without an explicit drop
/// point: the n-th field on a page lands at `base + n * step`, clamped
/// into `[min, max]`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct StackPolicy {
    pub base: f32,
    pub step: f32,
    pub min: f32,
    pub max: f32,
}

impl StackPolicy {
    /// Normalized vertical offset for the n-th stacked field
    pub fn offset(&self, n: usize) -> f32 {
        clamp(self.base + n as f32 * self.step, self.min, self.max)
    }
}

/// Engine-wide tunables
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Fixed design width pages are scaled to fit, in pixels
    pub target_page_width: f32,
    /// Nominal page size used in Word mode, which has no pixel-accurate
    /// page geometry
    pub docx_page_width: f32,
    pub docx_page_height: f32,
    /// Bounded poll for presentation surfaces before rasterization
    pub surface_poll_attempts: u32,
    pub surface_poll_delay_ms: u64,
    /// Stacking for click-to-place on a PDF page
    pub click_stack: StackPolicy,
    /// Stacking for insertion into Word content
    pub docx_stack: StackPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            target_page_width: 820.0,
            docx_page_width: 1000.0,
            docx_page_height: 1400.0,
            surface_poll_attempts: 20,
            surface_poll_delay_ms: 50,
            click_stack: StackPolicy {
                base: 0.18,
                step: 0.08,
                min: 0.12,
                max: 0.88,
            },
            docx_stack: StackPolicy {
                base: 0.12,
                step: 0.06,
                min: 0.0,
                max: 0.92,
            },
        }
    }
}
