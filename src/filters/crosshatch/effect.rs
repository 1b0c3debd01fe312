use crate::{
    error::Result,
    filters::{css, EffectContext, PixelEffect},
    raster::{draw, Frame},
};

use super::{
    ANGLES, PAPER_OPACITY, PAPER_TINT, PREPARE_EXPRESSION, SPACING_FACTORS, THRESHOLDS,
    VIGNETTE_STRENGTH,
};

/// Pen-and-ink crosshatch rendering
///
/// Deterministic: identical source pixels produce byte-identical output.
pub struct CrosshatchEffect;

impl CrosshatchEffect {
    pub fn new() -> Self {
        Self
    }

    /// Base line spacing scaled to the frame, clamped to a usable range
    fn base_spacing(width: u32, height: u32) -> f32 {
        (width.min(height) as f32 / 50.0).clamp(4.0, 12.0)
    }

    /// Value (255 = paper, 0 = ink) of the stripe pattern for one
    /// angle/spacing/width family at a pixel center
    ///
    /// The pattern is computed analytically from the perpendicular distance
    /// to the nearest line, which is equivalent to rasterizing parallel
    /// lines across the frame's diagonal extent.
    fn pattern_value(x: u32, y: u32, angle_deg: f32, spacing: f32, line_width: f32) -> u8 {
        let rad = angle_deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        // Perpendicular coordinate of the pixel center along the line normal
        let p = (x as f32 + 0.5) * sin - (y as f32 + 0.5) * cos;
        let offset = p.rem_euclid(spacing);
        let distance = offset.min(spacing - offset);
        let coverage = (line_width / 2.0 + 0.5 - distance).clamp(0.0, 1.0);
        (255.0 * (1.0 - coverage)) as u8
    }
}

impl Default for CrosshatchEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelEffect for CrosshatchEffect {
    fn name(&self) -> &str {
        "crosshatch"
    }

    fn description(&self) -> &str {
        "Pen-and-ink rendering built from layered hatching at four angles"
    }

    fn apply(&self, target: &mut Frame, source: &Frame, _ctx: &mut EffectContext<'_>) -> Result<()> {
        let width = target.width();
        let height = target.height();
        if width == 0 || height == 0 {
            return Ok(());
        }

        let base = source.resized(width, height);
        let gray = css::apply_expression(&base, PREPARE_EXPRESSION);
        let mut work = gray.clone();

        let base_spacing = Self::base_spacing(width, height);

        for (angle_index, &angle) in ANGLES.iter().enumerate() {
            for tier in 0..THRESHOLDS.len() {
                // The densest tier over-darkens when repeated at every
                // angle; only the first angle gets it
                if angle_index > 0 && tier == THRESHOLDS.len() - 1 {
                    continue;
                }

                let threshold = THRESHOLDS[tier];
                let spacing = base_spacing * SPACING_FACTORS[tier];
                let line_width = 0.5 + tier as f32 * 0.25;

                for y in 0..height {
                    for x in 0..width {
                        if gray.luminance(x, y) >= threshold {
                            continue;
                        }
                        let pattern = Self::pattern_value(x, y, angle, spacing, line_width);
                        let pixel = work.get_pixel_mut(x, y);
                        for c in 0..3 {
                            pixel[c] = pixel[c].min(pattern);
                        }
                    }
                }
            }
        }

        // Warm paper tint, multiply at reduced opacity
        for y in 0..height {
            for x in 0..width {
                let pixel = work.get_pixel_mut(x, y);
                for c in 0..3 {
                    let tinted = draw::multiply(pixel[c], PAPER_TINT[c]);
                    pixel[c] = (pixel[c] as f32 * (1.0 - PAPER_OPACITY)
                        + tinted as f32 * PAPER_OPACITY) as u8;
                }
            }
        }

        // Radial vignette, transparent center to ~20% black at the
        // corners, composited in overlay mode
        let center_x = width as f32 / 2.0;
        let center_y = height as f32 / 2.0;
        let outer = width.max(height) as f32 / 1.5;
        for y in 0..height {
            for x in 0..width {
                let dx = x as f32 + 0.5 - center_x;
                let dy = y as f32 + 0.5 - center_y;
                let t = ((dx * dx + dy * dy).sqrt() / outer).clamp(0.0, 1.0);
                let alpha = VIGNETTE_STRENGTH * t;
                if alpha <= 0.0 {
                    continue;
                }
                let pixel = work.get_pixel_mut(x, y);
                for c in 0..3 {
                    let blended = draw::overlay(pixel[c], 0);
                    pixel[c] =
                        (pixel[c] as f32 * (1.0 - alpha) + blended as f32 * alpha) as u8;
                }
            }
        }

        *target = work;
        Ok(())
    }
}
