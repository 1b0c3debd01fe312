//! # Crosshatch Effect
//!
//! Pen-and-ink stylization: grayscale conversion followed by four angles of
//! parallel line families at increasing density, darkening pixels whose
//! luminance falls under each tier's threshold, finished with a warm paper
//! tint and a corner vignette.

mod effect;

pub use effect::CrosshatchEffect;

/// Grayscale + contrast preparation, in the CSS-op engine's vocabulary
pub const PREPARE_EXPRESSION: &str = "grayscale(100%) contrast(150%)";

/// Hatching angles in degrees
pub const ANGLES: [f32; 4] = [0.0, 45.0, 90.0, 135.0];

/// Luminance thresholds per density tier, descending toward the shadows
pub const THRESHOLDS: [u8; 4] = [220, 180, 120, 60];

/// Spacing multiplier per density tier, applied to the base spacing
pub const SPACING_FACTORS: [f32; 4] = [4.0, 2.0, 1.0, 0.5];

/// Warm paper tint multiplied over the finished hatching
pub const PAPER_TINT: [u8; 3] = [245, 240, 230];

/// Opacity of the paper tint layer
pub const PAPER_OPACITY: f32 = 0.3;

/// Peak vignette darkness at the corners
pub const VIGNETTE_STRENGTH: f32 = 0.2;
