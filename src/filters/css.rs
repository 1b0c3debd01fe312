//! CSS filter-expression engine
//!
//! Cheap filters are declared as CSS `filter` expression strings (for
//! example `"sepia(50%) contrast(120%) brightness(90%)"`). The browser
//! applied these on the compositor; here the expression is parsed once into
//! an op list and applied as per-pixel color math, using the W3C
//! filter-effects matrices. Unknown functions and malformed arguments are
//! skipped, so a bad expression degrades to a passthrough instead of
//! failing the render path.

use image::imageops;
use tracing::warn;

use crate::raster::Frame;

/// A single parsed filter function
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssOp {
    Grayscale(f32),
    Sepia(f32),
    Invert(f32),
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    /// Angle in degrees
    HueRotate(f32),
    /// Gaussian standard deviation in pixels
    Blur(f32),
}

/// Parse a CSS filter expression into an op list
///
/// `"none"`, the empty string, and fully-malformed input all produce an
/// empty list (passthrough).
pub fn parse_expression(expression: &str) -> Vec<CssOp> {
    let trimmed = expression.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Vec::new();
    }

    let mut ops = Vec::new();
    for segment in trimmed.split(')') {
        let segment = segment.trim();
        if segment.is_empty() {
            continue;
        }
        let (name, arg) = match segment.split_once('(') {
            Some((name, arg)) => (name.trim(), arg.trim()),
            None => {
                warn!("malformed filter segment ignored: {:?}", segment);
                continue;
            }
        };

        let value = match parse_value(arg) {
            Some(value) => value,
            None => {
                warn!("unparseable filter argument ignored: {}({})", name, arg);
                continue;
            }
        };

        match name.to_ascii_lowercase().as_str() {
            "grayscale" => ops.push(CssOp::Grayscale(value.clamp(0.0, 1.0))),
            "sepia" => ops.push(CssOp::Sepia(value.clamp(0.0, 1.0))),
            "invert" => ops.push(CssOp::Invert(value.clamp(0.0, 1.0))),
            "brightness" => ops.push(CssOp::Brightness(value.max(0.0))),
            "contrast" => ops.push(CssOp::Contrast(value.max(0.0))),
            "saturate" => ops.push(CssOp::Saturate(value.max(0.0))),
            "hue-rotate" => ops.push(CssOp::HueRotate(value)),
            "blur" => ops.push(CssOp::Blur(value.max(0.0))),
            other => warn!("unknown filter function ignored: {}", other),
        }
    }

    ops
}

/// Parse `100%`, `3px`, `90deg`, `-10deg` or a bare number
///
/// Percentages are normalized to fractions; pixel and degree values keep
/// their magnitude.
fn parse_value(arg: &str) -> Option<f32> {
    let arg = arg.trim();
    if let Some(percent) = arg.strip_suffix('%') {
        return percent.trim().parse::<f32>().ok().map(|v| v / 100.0);
    }
    for suffix in ["px", "deg"] {
        if let Some(value) = arg.strip_suffix(suffix) {
            return value.trim().parse::<f32>().ok();
        }
    }
    arg.parse::<f32>().ok()
}

/// Apply a parsed op list to a frame, returning the filtered copy
pub fn apply_ops(source: &Frame, ops: &[CssOp]) -> Frame {
    let mut frame = source.clone();
    for op in ops {
        match *op {
            CssOp::Grayscale(a) => apply_matrix(&mut frame, grayscale_matrix(a)),
            CssOp::Sepia(a) => apply_matrix(&mut frame, sepia_matrix(a)),
            CssOp::Saturate(x) => apply_matrix(&mut frame, saturate_matrix(x)),
            CssOp::HueRotate(deg) => apply_matrix(&mut frame, hue_rotate_matrix(deg)),
            CssOp::Invert(a) => apply_channels(&mut frame, |p| {
                (255.0 - p) * a + p * (1.0 - a)
            }),
            CssOp::Brightness(x) => apply_channels(&mut frame, |p| p * x),
            CssOp::Contrast(x) => apply_channels(&mut frame, |p| (p - 127.5) * x + 127.5),
            CssOp::Blur(sigma) => {
                if sigma > 0.0 {
                    let blurred = imageops::blur(frame.as_image(), sigma);
                    frame = Frame::new(blurred);
                }
            }
        }
    }
    frame
}

/// Parse and apply an expression in one step
pub fn apply_expression(source: &Frame, expression: &str) -> Frame {
    apply_ops(source, &parse_expression(expression))
}

fn apply_channels<F: Fn(f32) -> f32>(frame: &mut Frame, f: F) {
    for pixel in frame.as_image_mut().pixels_mut() {
        for c in 0..3 {
            pixel[c] = f(pixel[c] as f32).round().clamp(0.0, 255.0) as u8;
        }
    }
}

fn apply_matrix(frame: &mut Frame, m: [[f32; 3]; 3]) {
    for pixel in frame.as_image_mut().pixels_mut() {
        let (r, g, b) = (pixel[0] as f32, pixel[1] as f32, pixel[2] as f32);
        for c in 0..3 {
            let v = m[c][0] * r + m[c][1] * g + m[c][2] * b;
            pixel[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    }
}

// Color matrices from the W3C filter-effects specification. `s` is the
// remaining share of the identity matrix.

fn grayscale_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount;
    [
        [0.2126 + 0.7874 * s, 0.7152 - 0.7152 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 + 0.2848 * s, 0.0722 - 0.0722 * s],
        [0.2126 - 0.2126 * s, 0.7152 - 0.7152 * s, 0.0722 + 0.9278 * s],
    ]
}

fn sepia_matrix(amount: f32) -> [[f32; 3]; 3] {
    let s = 1.0 - amount;
    [
        [0.393 + 0.607 * s, 0.769 - 0.769 * s, 0.189 - 0.189 * s],
        [0.349 - 0.349 * s, 0.686 + 0.314 * s, 0.168 - 0.168 * s],
        [0.272 - 0.272 * s, 0.534 - 0.534 * s, 0.131 + 0.869 * s],
    ]
}

fn saturate_matrix(x: f32) -> [[f32; 3]; 3] {
    [
        [0.213 + 0.787 * x, 0.715 - 0.715 * x, 0.072 - 0.072 * x],
        [0.213 - 0.213 * x, 0.715 + 0.285 * x, 0.072 - 0.072 * x],
        [0.213 - 0.213 * x, 0.715 - 0.715 * x, 0.072 + 0.928 * x],
    ]
}

fn hue_rotate_matrix(degrees: f32) -> [[f32; 3]; 3] {
    let rad = degrees.to_radians();
    let cos = rad.cos();
    let sin = rad.sin();
    [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_none_is_empty() {
        assert!(parse_expression("none").is_empty());
        assert!(parse_expression("").is_empty());
        assert!(parse_expression("  ").is_empty());
    }

    #[test]
    fn test_parse_compound_expression() {
        let ops = parse_expression("sepia(50%) contrast(120%) brightness(90%)");
        assert_eq!(
            ops,
            vec![
                CssOp::Sepia(0.5),
                CssOp::Contrast(1.2),
                CssOp::Brightness(0.9),
            ]
        );
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_expression("blur(3px)"), vec![CssOp::Blur(3.0)]);
        assert_eq!(
            parse_expression("hue-rotate(-10deg)"),
            vec![CssOp::HueRotate(-10.0)]
        );
    }

    #[test]
    fn test_unknown_function_is_skipped() {
        let ops = parse_expression("sparkle(100%) grayscale(100%)");
        assert_eq!(ops, vec![CssOp::Grayscale(1.0)]);
    }

    #[test]
    fn test_grayscale_full_equalizes_channels() {
        let source = Frame::new_filled(2, 2, [200, 50, 10, 255]);
        let result = apply_expression(&source, "grayscale(100%)");
        let p = result.get_pixel(0, 0);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
        assert_eq!(p[3], 255);
    }

    #[test]
    fn test_invert_full() {
        let source = Frame::new_filled(1, 1, [255, 0, 30, 255]);
        let result = apply_expression(&source, "invert(100%)");
        assert_eq!(result.get_pixel(0, 0), [0, 255, 225, 255]);
    }

    #[test]
    fn test_brightness_clamps() {
        let source = Frame::new_filled(1, 1, [200, 200, 200, 255]);
        let result = apply_expression(&source, "brightness(150%)");
        assert_eq!(result.get_pixel(0, 0), [255, 255, 255, 255]);
    }

    #[test]
    fn test_contrast_pushes_away_from_midpoint() {
        let source = Frame::new_filled(1, 1, [100, 160, 128, 255]);
        let result = apply_expression(&source, "contrast(200%)");
        let p = result.get_pixel(0, 0);
        assert!(p[0] < 100);
        assert!(p[1] > 160);
    }

    #[test]
    fn test_passthrough_keeps_pixels() {
        let source = Frame::new_filled(3, 3, [12, 34, 56, 255]);
        let result = apply_expression(&source, "none");
        assert_eq!(result, source);
    }
}
