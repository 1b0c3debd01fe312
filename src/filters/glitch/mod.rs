//! # Glitch Effect
//!
//! Stochastic corruption simulating analog signal artifacts: horizontal
//! tear bands, scanline flares, corrupted blocks, a full-frame channel
//! misalignment, then a deterministic finishing pass (scanlines, chromatic
//! aberration overlay, color boost).

mod effect;

pub use effect::GlitchEffect;

/// Default inclusive range of tear bands per invocation
pub const DEFAULT_BANDS: std::ops::RangeInclusive<u32> = 10..=25;

/// Inclusive run-length range of a tear band, in rows
pub const TEAR_LENGTH: std::ops::RangeInclusive<u32> = 50..=200;

/// Maximum horizontal wrap-shift of a torn row, in pixels
pub const MAX_TEAR_SHIFT: i32 = 20;

/// Probability that a row in a band flares instead of shifting
pub const FLARE_PROBABILITY: f32 = 0.3;

/// Row brightness multiplier for scanline flares
pub const FLARE_GAIN: f32 = 1.5;

/// Probability that a band also injects a corrupted block
pub const BLOCK_PROBABILITY: f32 = 0.5;

/// Maximum displacement of the full-frame channel shift, per axis
pub const MAX_CHANNEL_SHIFT: i32 = 10;

/// Opacity of the repeating white scanlines in the finishing pass
pub const SCANLINE_OPACITY: f32 = 0.03;

/// Pixel offset of the chromatic-aberration layers
pub const ABERRATION_OFFSET: u32 = 2;

/// Opacity of each aberration tint layer
pub const ABERRATION_OPACITY: f32 = 0.1;

/// Blend weight of the aberration overlay over the corrupted frame
pub const ABERRATION_BLEND: f32 = 0.7;

/// Final color boost, expressed in the CSS-op engine's vocabulary
pub const FINISH_EXPRESSION: &str = "contrast(130%) saturate(130%) brightness(110%)";
