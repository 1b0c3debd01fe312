//! Pixel-level drawing helpers shared by the effect processors and the
//! strip composer: blend modes, anti-aliased rounded rectangles, and glyph
//! rasterization.

use std::sync::OnceLock;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};

use crate::raster::Frame;

/// Axis-aligned rectangle in frame coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// Source-over blend of `color` onto the pixel at (x, y)
pub fn blend_pixel(frame: &mut Frame, x: u32, y: u32, color: [u8; 4], opacity: f32) {
    let alpha = (color[3] as f32 / 255.0) * opacity;
    if alpha < 0.004 {
        return;
    }

    let dst = frame.get_pixel_mut(x, y);
    let inv = 1.0 - alpha;
    dst[0] = (color[0] as f32 * alpha + dst[0] as f32 * inv).round() as u8;
    dst[1] = (color[1] as f32 * alpha + dst[1] as f32 * inv).round() as u8;
    dst[2] = (color[2] as f32 * alpha + dst[2] as f32 * inv).round() as u8;
    let out_a = alpha + (dst[3] as f32 / 255.0) * inv;
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

/// Screen blend of two channel values
pub fn screen(base: u8, src: u8) -> u8 {
    255 - ((255 - base as u16) * (255 - src as u16) / 255) as u8
}

/// Multiply blend of two channel values
pub fn multiply(base: u8, src: u8) -> u8 {
    ((base as u16 * src as u16) / 255) as u8
}

/// Overlay blend of two channel values (multiply in shadows, screen in highlights)
pub fn overlay(base: u8, src: u8) -> u8 {
    if base < 128 {
        ((2 * base as u16 * src as u16) / 255) as u8
    } else {
        255 - ((2 * (255 - base as u16) * (255 - src as u16)) / 255) as u8
    }
}

/// Signed distance from a point to the boundary of a rounded rectangle
///
/// Negative inside, positive outside, in pixels.
fn rounded_rect_distance(px: f32, py: f32, rect: Rect, radius: f32) -> f32 {
    let radius = radius.min(rect.w / 2.0).min(rect.h / 2.0);
    let cx = rect.x + rect.w / 2.0;
    let cy = rect.y + rect.h / 2.0;
    let qx = (px - cx).abs() - (rect.w / 2.0 - radius);
    let qy = (py - cy).abs() - (rect.h / 2.0 - radius);

    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - radius
}

/// Anti-aliased fill coverage (0..1) of the rounded rectangle at a pixel center
pub fn fill_coverage(px: u32, py: u32, rect: Rect, radius: f32) -> f32 {
    let d = rounded_rect_distance(px as f32 + 0.5, py as f32 + 0.5, rect, radius);
    (0.5 - d).clamp(0.0, 1.0)
}

/// Anti-aliased stroke coverage (0..1) for a stroke centered on the path
pub fn stroke_coverage(px: u32, py: u32, rect: Rect, radius: f32, line_width: f32) -> f32 {
    let d = rounded_rect_distance(px as f32 + 0.5, py as f32 + 0.5, rect, radius);
    (line_width / 2.0 + 0.5 - d.abs()).clamp(0.0, 1.0)
}

fn clipped_bounds(frame: &Frame, rect: Rect, pad: f32) -> (u32, u32, u32, u32) {
    let x0 = (rect.x - pad).floor().max(0.0) as u32;
    let y0 = (rect.y - pad).floor().max(0.0) as u32;
    let x1 = ((rect.x + rect.w + pad).ceil() as u32).min(frame.width());
    let y1 = ((rect.y + rect.h + pad).ceil() as u32).min(frame.height());
    (x0, y0, x1, y1)
}

/// Fill a rounded rectangle with a solid color
pub fn fill_rounded_rect(frame: &mut Frame, rect: Rect, radius: f32, color: [u8; 4]) {
    let (x0, y0, x1, y1) = clipped_bounds(frame, rect, 1.0);
    for y in y0..y1 {
        for x in x0..x1 {
            let cov = fill_coverage(x, y, rect, radius);
            if cov > 0.0 {
                let c = [color[0], color[1], color[2], (color[3] as f32 * cov) as u8];
                blend_pixel(frame, x, y, c, 1.0);
            }
        }
    }
}

/// Stroke a rounded rectangle outline
pub fn stroke_rounded_rect(
    frame: &mut Frame,
    rect: Rect,
    radius: f32,
    line_width: f32,
    color: [u8; 4],
) {
    let (x0, y0, x1, y1) = clipped_bounds(frame, rect, line_width);
    for y in y0..y1 {
        for x in x0..x1 {
            let cov = stroke_coverage(x, y, rect, radius, line_width);
            if cov > 0.0 {
                let c = [color[0], color[1], color[2], (color[3] as f32 * cov) as u8];
                blend_pixel(frame, x, y, c, 1.0);
            }
        }
    }
}

/// Draw `src` stretched into `rect`, clipped to the rounded path
pub fn draw_clipped(frame: &mut Frame, src: &Frame, rect: Rect, radius: f32) {
    if rect.w < 1.0 || rect.h < 1.0 {
        return;
    }
    let scaled = src.resized(rect.w.round() as u32, rect.h.round() as u32);
    let (x0, y0, x1, y1) = clipped_bounds(frame, rect, 0.0);
    for y in y0..y1 {
        for x in x0..x1 {
            let cov = fill_coverage(x, y, rect, radius);
            if cov <= 0.0 {
                continue;
            }
            let sx = ((x as f32 - rect.x) as u32).min(scaled.width().saturating_sub(1));
            let sy = ((y as f32 - rect.y) as u32).min(scaled.height().saturating_sub(1));
            let mut c = scaled.get_pixel(sx, sy);
            c[3] = (c[3] as f32 * cov) as u8;
            blend_pixel(frame, x, y, c, 1.0);
        }
    }
}

/// Horizontal text alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Locate a usable system font, caching the result
///
/// Returns None when no font file can be read; callers skip text rendering
/// in that case rather than failing the composition.
pub fn system_font() -> Option<&'static FontArc> {
    static FONT: OnceLock<Option<FontArc>> = OnceLock::new();
    FONT.get_or_init(|| {
        let font_paths = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/System/Library/Fonts/Helvetica.ttc",
            "/System/Library/Fonts/SFNS.ttf",
            "C:\\Windows\\Fonts\\arial.ttf",
            "C:\\Windows\\Fonts\\segoeui.ttf",
        ];

        for path in &font_paths {
            if let Ok(data) = std::fs::read(path) {
                if let Ok(font) = FontArc::try_from_vec(data) {
                    return Some(font);
                }
            }
        }

        None
    })
    .as_ref()
}

/// Measure the advance width of a line of text at the given pixel size
pub fn text_width(font: &FontArc, text: &str, size: f32) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    text.chars()
        .map(|ch| scaled.h_advance(scaled.glyph_id(ch)))
        .sum()
}

/// Rasterize a line of text; (x, y) is the anchor point on the baseline
pub fn draw_text(
    frame: &mut Frame,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: [u8; 4],
    align: TextAlign,
) {
    let font = match system_font() {
        Some(font) => font,
        None => {
            tracing::warn!("no system font available, skipping text: {:?}", text);
            return;
        }
    };

    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);

    let line_width = text_width(font, text, size);
    let mut cursor_x = match align {
        TextAlign::Left => x,
        TextAlign::Center => x - line_width / 2.0,
        TextAlign::Right => x - line_width,
    };

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            let (w, h) = (frame.width(), frame.height());
            outlined.draw(|px, py, coverage| {
                let abs_x = bounds.min.x as i32 + px as i32;
                let abs_y = bounds.min.y as i32 + py as i32;
                if abs_x >= 0 && abs_y >= 0 && (abs_x as u32) < w && (abs_y as u32) < h {
                    let c = [color[0], color[1], color[2], (color[3] as f32 * coverage) as u8];
                    blend_pixel(frame, abs_x as u32, abs_y as u32, c, 1.0);
                }
            });
        }

        cursor_x += scaled.h_advance(glyph_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_modes() {
        assert_eq!(screen(0, 0), 0);
        assert_eq!(screen(255, 10), 255);
        assert_eq!(multiply(255, 100), 100);
        assert_eq!(multiply(0, 200), 0);
        // overlay of black source darkens, white source lightens
        assert_eq!(overlay(60, 0), 0);
        assert_eq!(overlay(200, 255), 255);
    }

    #[test]
    fn test_blend_pixel_full_opacity_replaces() {
        let mut frame = Frame::new_filled(1, 1, [10, 10, 10, 255]);
        blend_pixel(&mut frame, 0, 0, [200, 100, 50, 255], 1.0);
        assert_eq!(frame.get_pixel(0, 0), [200, 100, 50, 255]);
    }

    #[test]
    fn test_fill_coverage_inside_and_outside() {
        let rect = Rect::new(10.0, 10.0, 100.0, 80.0);
        // deep inside
        assert_eq!(fill_coverage(60, 50, rect, 10.0), 1.0);
        // far outside
        assert_eq!(fill_coverage(0, 0, rect, 10.0), 0.0);
        // a square corner pixel is clipped off by the radius
        assert_eq!(fill_coverage(10, 10, rect, 10.0), 0.0);
    }

    #[test]
    fn test_fill_rounded_rect_rounds_corners() {
        let mut frame = Frame::new_clear(40, 40);
        fill_rounded_rect(&mut frame, Rect::new(0.0, 0.0, 40.0, 40.0), 10.0, [255, 255, 255, 255]);
        // center is filled solid
        assert_eq!(frame.get_pixel(20, 20), [255, 255, 255, 255]);
        // the extreme corner stays empty
        assert_eq!(frame.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_stroke_coverage_hits_edge_only() {
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        assert!(stroke_coverage(20, 0, rect, 10.0, 2.0) > 0.0);
        assert_eq!(stroke_coverage(20, 20, rect, 10.0, 2.0), 0.0);
    }
}
