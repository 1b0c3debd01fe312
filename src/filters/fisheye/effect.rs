use crate::{
    error::Result,
    filters::{EffectContext, PixelEffect},
    raster::Frame,
};

use super::STRENGTH;

/// Fisheye lens distortion
///
/// Deterministic: identical source pixels produce identical output.
pub struct FisheyeEffect;

impl FisheyeEffect {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FisheyeEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelEffect for FisheyeEffect {
    fn name(&self) -> &str {
        "fisheye"
    }

    fn description(&self) -> &str {
        "Radial lens distortion bulging the center of the frame"
    }

    fn apply(&self, target: &mut Frame, source: &Frame, _ctx: &mut EffectContext<'_>) -> Result<()> {
        let width = target.width();
        let height = target.height();
        if width == 0 || height == 0 {
            return Ok(());
        }

        let base = source.resized(width, height);

        let center_x = width as f32 / 2.0;
        let center_y = height as f32 / 2.0;
        let radius = width.min(height) as f32 / 2.0;

        for y in 0..height {
            for x in 0..width {
                let nx = (x as f32 - center_x) / radius;
                let ny = (y as f32 - center_y) / radius;
                let r = (nx * nx + ny * ny).sqrt();

                // Outside the lens circle the frame passes through untouched
                if r > 1.0 {
                    target.set_pixel(x, y, base.get_pixel(x, y));
                    continue;
                }

                // r = 0 maps to itself; guard the division below
                if r == 0.0 {
                    target.set_pixel(x, y, base.get_pixel(x, y));
                    continue;
                }

                let remapped = r.powf(STRENGTH);
                let scale = remapped / r;
                let src_x = (nx * scale * radius + center_x).round() as i64;
                let src_y = (ny * scale * radius + center_y).round() as i64;

                // Rounding can push the sample just past the edge; fall back
                // to the unmapped source pixel so the lens leaves no holes
                let pixel = if src_x >= 0
                    && src_y >= 0
                    && (src_x as u32) < width
                    && (src_y as u32) < height
                {
                    base.get_pixel(src_x as u32, src_y as u32)
                } else {
                    base.get_pixel(x, y)
                };
                target.set_pixel(x, y, pixel);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    fn checkered(width: u32, height: u32) -> Frame {
        let buffer = image::ImageBuffer::from_fn(width, height, |x, y| {
            let v = (((x / 4) + (y / 4)) % 2 * 255) as u8;
            image::Rgba([v, 255 - v, (x % 256) as u8, 255])
        });
        Frame::new(buffer)
    }

    fn run(source: &Frame, width: u32, height: u32) -> Frame {
        let mut target = Frame::new_clear(width, height);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut ctx = EffectContext::new(&mut rng);
        FisheyeEffect::new()
            .apply(&mut target, source, &mut ctx)
            .unwrap();
        target
    }

    #[test]
    fn test_center_pixel_unchanged() {
        let source = checkered(100, 100);
        let result = run(&source, 100, 100);
        assert_eq!(result.get_pixel(50, 50), source.get_pixel(50, 50));
    }

    #[test]
    fn test_outside_circle_passthrough() {
        let source = checkered(120, 80);
        let result = run(&source, 120, 80);

        let center_x = 60.0_f32;
        let center_y = 40.0_f32;
        let radius = 40.0_f32;

        let mut outside = 0usize;
        for y in 0..80u32 {
            for x in 0..120u32 {
                let nx = (x as f32 - center_x) / radius;
                let ny = (y as f32 - center_y) / radius;
                if (nx * nx + ny * ny).sqrt() > 1.0 {
                    assert_eq!(result.get_pixel(x, y), source.get_pixel(x, y));
                    outside += 1;
                }
            }
        }
        // a 3:2 frame has plenty of out-of-lens area
        assert!(outside > 1000);
    }

    #[test]
    fn test_deterministic() {
        let source = checkered(64, 64);
        assert_eq!(run(&source, 64, 64), run(&source, 64, 64));
    }

    #[test]
    fn test_no_transparent_holes() {
        let source = checkered(64, 48);
        let result = run(&source, 64, 48);
        for y in 0..48u32 {
            for x in 0..64u32 {
                assert_eq!(result.get_pixel(x, y)[3], 255);
            }
        }
    }

    #[test]
    fn test_zero_sized_target_is_noop() {
        let source = checkered(8, 8);
        let mut target = Frame::new_clear(0, 0);
        let mut rng = SmallRng::seed_from_u64(0);
        let mut ctx = EffectContext::new(&mut rng);
        assert!(FisheyeEffect::new()
            .apply(&mut target, &source, &mut ctx)
            .is_ok());
    }
}
