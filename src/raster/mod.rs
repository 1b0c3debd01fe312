//! # Raster Types and Drawing
//!
//! The in-memory pixel representation shared by the effect processors and
//! the strip composer, plus low-level drawing helpers (blend modes, rounded
//! rectangles, text).

pub mod draw;
pub mod types;

pub use types::Frame;
