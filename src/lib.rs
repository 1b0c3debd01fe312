//! # Snapbooth
//!
//! A photobooth image-effects engine: per-pixel raster filters (fisheye,
//! glitch, crosshatch) plus CSS-style color filters, and a compositor that
//! assembles filtered photos into a bordered, rounded-corner grid strip
//! with header and footer decoration.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use snapbooth::{
//!     compose::{GridLayout, StripComposer, StripSpec},
//!     filters::FilterRegistry,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let registry = Arc::new(FilterRegistry::new());
//! let composer = StripComposer::new(registry);
//!
//! let photos: Vec<Vec<u8>> = vec![/* encoded stills, capture order */];
//! let spec = StripSpec::new(GridLayout::OneByThree, "fisheye");
//! let strip = composer.compose(&photos, &spec).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - [`raster`] - RGBA frames and pixel-level drawing helpers
//! - [`filters`] - The filter registry, CSS-op engine, and pixel effects
//! - [`compose`] - Grid layouts, themes, and the strip composer
//! - [`session`] - Photo session lifecycle and capture helpers
//! - [`preview`] - Live special-filter preview loop
//! - [`export`] - Save/share fallback ladders
//! - [`config`] - Configuration management
//!
//! ## Creating Custom Effects
//!
//! You can add custom pixel effects by implementing the
//! [`PixelEffect`](filters::PixelEffect) trait and registering them:
//!
//! ```rust,no_run
//! use snapbooth::filters::{EffectContext, PixelEffect};
//! use snapbooth::raster::Frame;
//! use snapbooth::error::Result;
//!
//! struct MyEffect;
//!
//! impl PixelEffect for MyEffect {
//!     fn name(&self) -> &str {
//!         "my_effect"
//!     }
//!
//!     fn description(&self) -> &str {
//!         "Does something custom"
//!     }
//!
//!     fn apply(&self, target: &mut Frame, source: &Frame, _ctx: &mut EffectContext<'_>) -> Result<()> {
//!         // Your custom effect implementation
//!         *target = source.clone();
//!         Ok(())
//!     }
//! }
//! ```

pub mod compose;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod preview;
pub mod raster;
pub mod session;

// Re-export commonly used types for convenience
pub use crate::{
    compose::{GridLayout, StripComposer, StripSpec, ThemeKind},
    config::Config,
    error::{BoothError, Result},
    filters::{FilterRegistry, PixelEffect},
    raster::Frame,
    session::PhotoSession,
};
