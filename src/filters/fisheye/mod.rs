//! # Fisheye Effect
//!
//! Radial lens-distortion remap: pixels inside the lens circle are pulled
//! toward the center by a power curve, pixels outside pass through
//! unchanged.

mod effect;

pub use effect::FisheyeEffect;

/// Exponent applied to the normalized radius; larger values bulge harder
pub const STRENGTH: f32 = 2.5;
