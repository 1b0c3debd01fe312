use image::{imageops, ImageBuffer, Rgba, RgbaImage};

use crate::error::{ImageError, Result};

/// A single RGBA raster, row-major, origin top-left
///
/// This is a thin wrapper around an RGBA image buffer that provides the
/// pixel-level accessors the effect processors use. Processors always work
/// on a copy of their source frame, never in place, so repeated runs on the
/// same input stay idempotent.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    buffer: RgbaImage,
}

impl Frame {
    /// Create a new frame from an RGBA image buffer
    pub fn new(buffer: RgbaImage) -> Self {
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with transparent black
    pub fn new_clear(width: u32, height: u32) -> Self {
        let buffer = ImageBuffer::new(width, height);
        Self { buffer }
    }

    /// Create a new frame with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgba(color));
        Self { buffer }
    }

    /// Get the width of the frame
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the frame
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGBA array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.buffer.get_pixel(x, y).0
    }

    /// Get a mutable reference to a pixel at the given coordinates
    pub fn get_pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8; 4] {
        &mut self.buffer.get_pixel_mut(x, y).0
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 4]) {
        self.buffer.put_pixel(x, y, Rgba(color));
    }

    /// Average-of-channels brightness of the pixel at the given coordinates
    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        let p = self.buffer.get_pixel(x, y).0;
        ((p[0] as u16 + p[1] as u16 + p[2] as u16) / 3) as u8
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbaImage {
        &self.buffer
    }

    /// Get a mutable reference to the underlying image buffer
    pub fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.buffer
    }

    /// Consume the frame and return the underlying buffer
    pub fn into_image(self) -> RgbaImage {
        self.buffer
    }

    /// Create a frame from raw RGBA bytes
    pub fn from_rgba_bytes(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        ImageBuffer::from_raw(width, height, data)
            .map(|buffer| Self { buffer })
            .ok_or_else(|| ImageError::InvalidDimensions { width, height }.into())
    }

    /// Return a copy resampled to the given dimensions (bilinear)
    ///
    /// Effects work at the caller-chosen target resolution; the source is
    /// resampled first when it does not already match.
    pub fn resized(&self, width: u32, height: u32) -> Self {
        if self.width() == width && self.height() == height {
            return self.clone();
        }
        let buffer = imageops::resize(&self.buffer, width, height, imageops::FilterType::Triangle);
        Self { buffer }
    }

    /// Center-crop to the given aspect ratio
    ///
    /// Captured stills are cropped to 4:3 before they enter a session; a
    /// wider frame loses its sides, a taller frame its top and bottom.
    pub fn crop_to_aspect(&self, aspect_w: u32, aspect_h: u32) -> Self {
        let (w, h) = (self.width(), self.height());
        if w == 0 || h == 0 || aspect_w == 0 || aspect_h == 0 {
            return self.clone();
        }

        let current = w as f64 / h as f64;
        let target = aspect_w as f64 / aspect_h as f64;

        let (crop_w, crop_h) = if current > target {
            (((h as f64) * target).round() as u32, h)
        } else {
            (w, ((w as f64) / target).round() as u32)
        };
        let crop_w = crop_w.min(w).max(1);
        let crop_h = crop_h.min(h).max(1);

        let x0 = (w - crop_w) / 2;
        let y0 = (h - crop_h) / 2;

        let buffer = imageops::crop_imm(&self.buffer, x0, y0, crop_w, crop_h).to_image();
        Self { buffer }
    }

    /// Return a horizontally mirrored copy
    ///
    /// Mirror mode affects the live preview only; stored pixels are never
    /// flipped.
    pub fn flip_horizontal(&self) -> Self {
        Self {
            buffer: imageops::flip_horizontal(&self.buffer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clear_is_transparent() {
        let frame = Frame::new_clear(4, 4);
        assert_eq!(frame.get_pixel(0, 0), [0, 0, 0, 0]);
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 4);
    }

    #[test]
    fn test_pixel_roundtrip() {
        let mut frame = Frame::new_clear(2, 2);
        frame.set_pixel(1, 1, [10, 20, 30, 255]);
        assert_eq!(frame.get_pixel(1, 1), [10, 20, 30, 255]);

        frame.get_pixel_mut(0, 0)[2] = 99;
        assert_eq!(frame.get_pixel(0, 0), [0, 0, 99, 0]);
    }

    #[test]
    fn test_from_rgba_bytes_rejects_bad_length() {
        assert!(Frame::from_rgba_bytes(2, 2, vec![0u8; 3]).is_err());
        assert!(Frame::from_rgba_bytes(2, 2, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn test_crop_to_aspect_wide_source() {
        // 400x300 is already 4:3
        let frame = Frame::new_filled(400, 300, [1, 2, 3, 255]);
        let cropped = frame.crop_to_aspect(4, 3);
        assert_eq!((cropped.width(), cropped.height()), (400, 300));

        // 800x300 loses its sides
        let wide = Frame::new_filled(800, 300, [1, 2, 3, 255]);
        let cropped = wide.crop_to_aspect(4, 3);
        assert_eq!((cropped.width(), cropped.height()), (400, 300));

        // 400x600 loses top and bottom
        let tall = Frame::new_filled(400, 600, [1, 2, 3, 255]);
        let cropped = tall.crop_to_aspect(4, 3);
        assert_eq!((cropped.width(), cropped.height()), (400, 300));
    }

    #[test]
    fn test_flip_horizontal() {
        let mut frame = Frame::new_clear(2, 1);
        frame.set_pixel(0, 0, [255, 0, 0, 255]);
        frame.set_pixel(1, 0, [0, 255, 0, 255]);

        let flipped = frame.flip_horizontal();
        assert_eq!(flipped.get_pixel(0, 0), [0, 255, 0, 255]);
        assert_eq!(flipped.get_pixel(1, 0), [255, 0, 0, 255]);
        // the original is untouched
        assert_eq!(frame.get_pixel(0, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_resized_noop_at_same_size() {
        let frame = Frame::new_filled(8, 6, [7, 7, 7, 255]);
        let same = frame.resized(8, 6);
        assert_eq!(same, frame);
    }
}
