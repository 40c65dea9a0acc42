//! Rendering abstraction traits
//!
//! These traits define the interface between the layout engine, the
//! canvas, and the font back-ends.

pub mod font;

pub use font::{Font, GlyphBitmap, GlyphMetrics, GlyphSource, TextStyle, GLYPH_BYTES};
