//! Board-agnostic rendering pipeline for the e-paper dashboard
//!
//! This crate contains all rendering logic that does not depend on
//! specific hardware implementations:
//!
//! - Packed 1-bit canvas with rotation and drawing primitives
//! - Font back-ends (fixed ASCII, indexed Unicode with LRU glyph cache)
//! - Width-aware, script-aware line breaking
//! - Configuration type definitions
//!
//! Data flows text → [`layout`] (lines) → [`canvas`] (pixels, with glyphs
//! from [`font`]) → the panel driver in `inkdash-drivers`.

#![no_std]
#![deny(unsafe_code)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod canvas;
pub mod color;
pub mod config;
pub mod font;
pub mod layout;
pub mod traits;

pub use canvas::{Canvas, CanvasError, PixelBuffer, Rotation, RotationError};
pub use color::{Color, ColorError};
pub use config::{ConfigError, DashboardConfig};
pub use font::{CellMetrics, FixedFont, FontError, GlyphCache, IndexedFont};
pub use layout::{wrap, Line, Wrap};
pub use traits::{Font, GlyphMetrics, GlyphSource, TextStyle};
