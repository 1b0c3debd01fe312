//! # Strip Composition
//!
//! Assembles filtered photos into a bordered, rounded-corner grid with an
//! optional header band, a footer signature, and a themed background, and
//! encodes the result as a single JPEG artifact.

pub mod engine;
pub mod layout;
pub mod theme;

pub use engine::{StripComposer, StripSpec};
pub use layout::GridLayout;
pub use theme::{Theme, ThemeKind};
