//! Font traits

use crate::canvas::{Canvas, PixelBuffer};
use crate::color::Color;

/// Bytes in one indexed glyph record (16 rows × 2 bytes)
pub const GLYPH_BYTES: usize = 32;

/// Packed glyph rows, MSB-first, bit 1 = foreground
pub type GlyphBitmap = [u8; GLYPH_BYTES];

/// Text size and letter spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TextStyle {
    /// Integer magnification (0 is treated as 1)
    pub scale: u8,
    /// Extra pixels after every glyph
    pub spacing: u8,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

impl TextStyle {
    /// Create a style
    pub const fn new(scale: u8, spacing: u8) -> Self {
        Self { scale, spacing }
    }

    /// Scale clamped to at least 1
    pub const fn effective_scale(&self) -> u32 {
        if self.scale == 0 {
            1
        } else {
            self.scale as u32
        }
    }
}

/// Horizontal metrics of a font
///
/// The layout engine only needs to know how far the cursor moves for each
/// character, not the glyph bitmaps.
pub trait GlyphMetrics {
    /// Cursor advance in pixels for `c`, including spacing
    fn advance(&self, c: char, style: TextStyle) -> u32;

    /// Pixel width of `text` on a single row
    fn measure(&self, text: &str, style: TextStyle) -> u32 {
        text.chars().map(|c| self.advance(c, style)).sum()
    }
}

impl<T: GlyphMetrics + ?Sized> GlyphMetrics for &T {
    fn advance(&self, c: char, style: TextStyle) -> u32 {
        (**self).advance(c, style)
    }
}

/// Lazily decoded glyph storage
///
/// Resolves a code point to its bitmap, reading the backing storage on
/// demand. `None` means the glyph is not present; it is not an error.
pub trait GlyphSource {
    /// Load the bitmap for `code_point`
    fn load_glyph(&mut self, code_point: u32) -> Option<GlyphBitmap>;
}

/// A font that can render glyphs into a canvas
pub trait Font {
    /// Copyable metrics handle, usable while the font is borrowed mutably
    type Metrics: GlyphMetrics + Copy;

    /// Glyph cell size in pixels (width, height) at scale 1
    fn cell_size(&self) -> (u16, u16);

    /// Metrics for layout
    fn metrics(&self) -> Self::Metrics;

    /// Draw `c` with its top-left corner at (`x`, `y`)
    ///
    /// Characters the font cannot resolve are silently skipped.
    fn draw_char<B: PixelBuffer>(
        &mut self,
        c: char,
        x: i32,
        y: i32,
        canvas: &mut Canvas<B>,
        color: Color,
        scale: u8,
    );
}
