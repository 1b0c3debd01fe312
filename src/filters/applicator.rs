//! Still-image filter application
//!
//! Takes an encoded bitmap and a filter identifier, runs the matching pixel
//! effect or CSS expression at the image's native resolution, and
//! re-encodes the result. Used for preview thumbnails, finalizing captured
//! photos, and each cell of the strip composer.

use image::codecs::jpeg::JpegEncoder;
use rand::{rngs::SmallRng, SeedableRng};
use tracing::debug;

use crate::{
    error::{ImageError, Result},
    filters::{css, EffectContext, FilterRegistry},
    raster::Frame,
};

/// JPEG quality for re-encoded stills and composites
pub const JPEG_QUALITY: u8 = 95;

/// Decode an encoded bitmap into an RGBA frame
pub fn decode_frame(bytes: &[u8]) -> Result<Frame> {
    let image = image::load_from_memory(bytes).map_err(|e| ImageError::DecodeFailed {
        reason: e.to_string(),
    })?;
    Ok(Frame::new(image.to_rgba8()))
}

/// Encode a frame as JPEG at the standard quality
///
/// JPEG has no alpha channel; the frame is flattened to RGB first.
pub fn encode_jpeg(frame: &Frame) -> Result<Vec<u8>> {
    let rgb = image::DynamicImage::ImageRgba8(frame.as_image().clone()).to_rgb8();
    let mut bytes = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY);
    encoder
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), image::ColorType::Rgb8)
        .map_err(|e| ImageError::EncodeFailed {
            reason: e.to_string(),
        })?;
    Ok(bytes)
}

/// Apply a filter to a decoded frame at its native resolution
///
/// Unknown identifiers resolve to the `"none"` expression and pass the
/// frame through untouched.
pub fn apply_filter_to_frame(
    frame: &Frame,
    filter_id: &str,
    registry: &FilterRegistry,
) -> Result<Frame> {
    if registry.is_pixel_effect(filter_id) {
        if let Some(processor) = registry.processor(filter_id) {
            debug!("applying pixel effect {}", filter_id);
            let mut target = Frame::new_clear(frame.width(), frame.height());
            let mut rng = SmallRng::from_entropy();
            let mut ctx = EffectContext::new(&mut rng);
            processor.apply(&mut target, frame, &mut ctx)?;
            return Ok(target);
        }
        // A definition marked as a pixel effect without a registered
        // processor degrades to a passthrough, never a crash
        debug!("pixel effect {} has no processor, passing through", filter_id);
        return Ok(frame.clone());
    }

    Ok(css::apply_expression(frame, registry.css_expression(filter_id)))
}

/// Apply a filter to an encoded image and re-encode the result
///
/// Fails only when the input cannot be decoded or the output cannot be
/// encoded; callers fall back to the unfiltered original on error.
pub fn apply_filter_to_image(
    bytes: &[u8],
    filter_id: &str,
    registry: &FilterRegistry,
) -> Result<Vec<u8>> {
    let frame = decode_frame(bytes)?;
    let filtered = apply_filter_to_frame(&frame, filter_id, registry)?;
    encode_jpeg(&filtered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_jpeg(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
        encode_jpeg(&Frame::new_filled(width, height, color)).unwrap()
    }

    #[test]
    fn test_roundtrip_preserves_dimensions() {
        let bytes = sample_jpeg(40, 30, [200, 10, 10, 255]);
        let out = apply_filter_to_image(&bytes, "none", &FilterRegistry::new()).unwrap();
        let frame = decode_frame(&out).unwrap();
        assert_eq!((frame.width(), frame.height()), (40, 30));
    }

    #[test]
    fn test_unknown_filter_is_passthrough() {
        let registry = FilterRegistry::new();
        let frame = Frame::new_filled(8, 8, [40, 80, 120, 255]);
        let out = apply_filter_to_frame(&frame, "does-not-exist", &registry).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn test_grayscale_filter_applies() {
        let registry = FilterRegistry::new();
        let frame = Frame::new_filled(8, 8, [250, 20, 20, 255]);
        let out = apply_filter_to_frame(&frame, "grayscale", &registry).unwrap();
        let p = out.get_pixel(4, 4);
        assert_eq!(p[0], p[1]);
        assert_eq!(p[1], p[2]);
    }

    #[test]
    fn test_pixel_effect_keeps_dimensions() {
        let registry = FilterRegistry::new();
        let frame = Frame::new_filled(64, 48, [90, 140, 90, 255]);
        let out = apply_filter_to_frame(&frame, "fisheye", &registry).unwrap();
        assert_eq!((out.width(), out.height()), (64, 48));
    }

    #[test]
    fn test_malformed_input_is_rejected() {
        let registry = FilterRegistry::new();
        let result = apply_filter_to_image(&[0xde, 0xad, 0xbe, 0xef], "none", &registry);
        assert!(result.is_err());
    }
}
