//! # Filter System
//!
//! Filters come in two kinds. Cheap filters are CSS-style compositing
//! expressions applied by the [`css`] engine; special filters are
//! per-pixel [`PixelEffect`] processors. The [`FilterRegistry`] maps
//! opaque identifiers to one or the other, with fail-safe passthrough for
//! anything unknown.
//!
//! ## Built-in Pixel Effects
//!
//! - **Fisheye**: radial lens-distortion remap
//! - **Glitch**: stochastic tear bands, block corruption, chromatic misalignment
//! - **Crosshatch**: pen-and-ink hatching at four angles
//!
//! ## Usage
//!
//! ```rust
//! use snapbooth::filters::FilterRegistry;
//!
//! let registry = FilterRegistry::new();
//! assert!(registry.is_pixel_effect("fisheye"));
//! assert_eq!(registry.css_expression("sepia"), "sepia(100%)");
//! ```

pub mod applicator;
pub mod css;
pub mod registry;
pub mod traits;

// Effect implementations
pub mod crosshatch;
pub mod fisheye;
pub mod glitch;

// Re-exports for convenience
pub use applicator::{apply_filter_to_frame, apply_filter_to_image, decode_frame, encode_jpeg};
pub use registry::{format_filter_name, FilterDefinition, FilterRegistry};
pub use traits::{EffectContext, PixelEffect};

// Re-export all built-in effects
pub use crosshatch::CrosshatchEffect;
pub use fisheye::FisheyeEffect;
pub use glitch::GlitchEffect;
