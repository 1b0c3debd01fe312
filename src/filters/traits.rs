use rand::RngCore;

use crate::{error::Result, raster::Frame};

/// Core trait that all pixel effects must implement
///
/// A pixel effect reads a source frame and writes the filtered result into
/// a caller-sized target frame. The source is never mutated; when its
/// resolution differs from the target the effect resamples it first.
/// Effects hold no state between calls, so a single instance can serve a
/// live preview loop and still-image processing concurrently.
pub trait PixelEffect: Send + Sync {
    /// Returns the unique registry key of this effect
    fn name(&self) -> &str;

    /// Returns a human-readable description of this effect
    fn description(&self) -> &str;

    /// Apply the effect
    ///
    /// # Arguments
    ///
    /// * `target` - The output frame, pre-sized by the caller
    /// * `source` - The input frame, read-only
    /// * `ctx` - Per-invocation context (random source)
    ///
    /// Deterministic effects ignore the context's generator. A zero-sized
    /// target is a no-op, not an error.
    fn apply(&self, target: &mut Frame, source: &Frame, ctx: &mut EffectContext<'_>) -> Result<()>;
}

/// Per-invocation effect context
///
/// The random source is injected rather than created internally so tests
/// can substitute a seeded or zero-entropy generator and assert structural
/// invariants on stochastic effects.
pub struct EffectContext<'a> {
    pub rng: &'a mut dyn RngCore,
}

impl<'a> EffectContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore) -> Self {
        Self { rng }
    }
}
