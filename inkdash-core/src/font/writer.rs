//! Font image builders for host tools and tests

use std::collections::BTreeMap;
use std::vec::Vec;

use super::indexed::INDEXED_MAGIC;
use crate::traits::{GlyphBitmap, GLYPH_BYTES};

/// Builds an indexed 16×16 font image in memory
#[derive(Debug, Clone, Default)]
pub struct IndexedFontWriter {
    glyphs: BTreeMap<u16, GlyphBitmap>,
}

impl IndexedFontWriter {
    /// Empty font
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the glyph for `c`
    ///
    /// Characters outside the Basic Multilingual Plane cannot be indexed and
    /// are ignored.
    pub fn insert(&mut self, c: char, bitmap: GlyphBitmap) {
        if let Ok(code_point) = u16::try_from(c as u32) {
            self.insert_code_point(code_point, bitmap);
        }
    }

    /// Add or replace the glyph for a raw code point
    pub fn insert_code_point(&mut self, code_point: u16, bitmap: GlyphBitmap) {
        self.glyphs.insert(code_point, bitmap);
    }

    /// Number of glyphs added
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Check if no glyphs were added
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    /// Serialize header, sorted index and glyph data
    pub fn build(&self) -> Vec<u8> {
        let count = self.glyphs.len() as u16;
        let data_start = 8 + count as usize * 6;
        let mut image = Vec::with_capacity(data_start + self.glyphs.len() * GLYPH_BYTES);

        for field in [INDEXED_MAGIC, 16, 16, count] {
            image.extend_from_slice(&field.to_le_bytes());
        }
        for (i, code_point) in self.glyphs.keys().enumerate() {
            let offset = (data_start + i * GLYPH_BYTES) as u32;
            image.extend_from_slice(&code_point.to_le_bytes());
            image.extend_from_slice(&offset.to_le_bytes());
        }
        for bitmap in self.glyphs.values() {
            image.extend_from_slice(bitmap);
        }
        image
    }
}

/// Build a fixed font image of `width`×`height` glyphs
///
/// `glyphs` lists `(code, columns)`; codes not listed are blank. Extra
/// columns are ignored and missing ones stay empty.
pub fn fixed_font_image(width: u8, height: u8, glyphs: &[(u8, &[u8])]) -> Vec<u8> {
    let w = width as usize;
    let mut image = std::vec![0u8; 2 + 256 * w];
    image[0] = width;
    image[1] = height;

    for (code, columns) in glyphs {
        let start = 2 + *code as usize * w;
        let n = columns.len().min(w);
        image[start..start + n].copy_from_slice(&columns[..n]);
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_layout() {
        let mut writer = IndexedFontWriter::new();
        writer.insert('B', [2; GLYPH_BYTES]);
        writer.insert('A', [1; GLYPH_BYTES]);
        writer.insert('😀', [9; GLYPH_BYTES]);
        assert_eq!(writer.len(), 2);

        let image = writer.build();
        assert_eq!(image.len(), 8 + 2 * 6 + 2 * 32);
        assert_eq!(&image[..8], &[0x46, 0x55, 16, 0, 16, 0, 2, 0]);
        // Index sorted by code point: 'A' first, data right after the index
        assert_eq!(&image[8..14], &[b'A', 0, 20, 0, 0, 0]);
        assert_eq!(&image[14..20], &[b'B', 0, 52, 0, 0, 0]);
        assert_eq!(image[20], 1);
        assert_eq!(image[52], 2);
    }

    #[test]
    fn test_fixed_image() {
        let image = fixed_font_image(3, 5, &[(b'!', &[0u8, 0x17, 0][..])]);
        assert_eq!(image.len(), 2 + 256 * 3);
        assert_eq!(image[2 + 33 * 3 + 1], 0x17);
    }
}
