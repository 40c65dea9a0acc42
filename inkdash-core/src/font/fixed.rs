//! Fixed-size 8-bit font
//!
//! 256 glyphs of `W` columns each. Every column is one byte whose bit `n`
//! (LSB first) is row `n`, so glyphs are at most 8 pixels tall.

use inkdash_hal::BlobStorage;

use super::{read_header, FontError};
use crate::canvas::{Canvas, PixelBuffer};
use crate::color::Color;
use crate::traits::{Font, GlyphMetrics, TextStyle};

const HEADER_LEN: u32 = 2;
const GLYPH_COUNT: u32 = 256;
const MAX_HEIGHT: u8 = 8;

/// Column-major fixed font
pub struct FixedFont<S> {
    storage: S,
    width: u8,
    height: u8,
}

/// Advance rule of a [`FixedFont`]: glyph width plus one column gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedMetrics {
    width: u8,
}

impl GlyphMetrics for FixedMetrics {
    fn advance(&self, _c: char, style: TextStyle) -> u32 {
        (self.width as u32 + 1) * style.effective_scale() + style.spacing as u32
    }
}

impl<S: BlobStorage> FixedFont<S> {
    /// Open a fixed font, validating its size against the header
    pub fn new(mut storage: S) -> Result<Self, FontError> {
        let [width, height] = read_header::<S, 2>(&mut storage)?;

        let expected = HEADER_LEN + GLYPH_COUNT * width as u32;
        let actual = storage.len();
        if actual != expected {
            return Err(FontError::InvalidSize { expected, actual });
        }
        if width == 0 || height == 0 || height > MAX_HEIGHT {
            return Err(FontError::InvalidGeometry {
                width: width as u16,
                height: height as u16,
            });
        }

        Ok(Self {
            storage,
            width,
            height,
        })
    }

    /// Glyph width in pixels
    pub fn width(&self) -> u8 {
        self.width
    }

    /// Glyph height in pixels
    pub fn height(&self) -> u8 {
        self.height
    }

    /// Width of `text` at scale 1 without extra spacing
    pub fn text_width(&self, text: &str) -> u32 {
        self.metrics().measure(text, TextStyle::default())
    }

    /// Release the storage
    pub fn close(self) -> S {
        self.storage
    }
}

impl<S: BlobStorage> Font for FixedFont<S> {
    type Metrics = FixedMetrics;

    fn cell_size(&self) -> (u16, u16) {
        (self.width as u16, self.height as u16)
    }

    fn metrics(&self) -> FixedMetrics {
        FixedMetrics { width: self.width }
    }

    fn draw_char<B: PixelBuffer>(
        &mut self,
        c: char,
        x: i32,
        y: i32,
        canvas: &mut Canvas<B>,
        color: Color,
        scale: u8,
    ) {
        let code = c as u32;
        if code >= GLYPH_COUNT {
            return;
        }

        let mut columns = [0u8; u8::MAX as usize];
        let columns = &mut columns[..self.width as usize];
        let offset = HEADER_LEN + code * self.width as u32;
        if self.storage.read_at(offset, columns).is_err() {
            return;
        }

        let scale = scale.max(1) as i32;
        for (col, bits) in columns.iter().enumerate() {
            let px = x.saturating_add(col as i32 * scale);
            for row in 0..self.height {
                if bits >> row & 1 != 0 {
                    let py = y.saturating_add(row as i32 * scale);
                    canvas.fill_rect(px, py, scale, scale, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::writer::fixed_font_image;
    use std::vec::Vec;

    /// 5x7 font where only 'A' and 'I' have pixels
    fn font_image() -> Vec<u8> {
        fixed_font_image(
            5,
            7,
            &[
                (b'A', &[0x7E, 0x11, 0x11, 0x11, 0x7E][..]),
                (b'I', &[0x00, 0x41, 0x7F, 0x41, 0x00][..]),
            ],
        )
    }

    fn blank() -> Canvas<[u8; 64]> {
        let mut canvas = Canvas::new([0u8; 64], 32, 16).unwrap();
        canvas.fill(Color::White);
        canvas
    }

    #[test]
    fn test_new_validates_size() {
        let mut image = font_image();
        image.pop();
        assert_eq!(
            FixedFont::new(&image[..]).err(),
            Some(FontError::InvalidSize {
                expected: 1282,
                actual: 1281
            })
        );
        assert_eq!(
            FixedFont::new(&[5u8][..]).err(),
            Some(FontError::InvalidSize {
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_new_validates_geometry() {
        let mut image = font_image();
        image[1] = 9;
        assert_eq!(
            FixedFont::new(&image[..]).err(),
            Some(FontError::InvalidGeometry {
                width: 5,
                height: 9
            })
        );
        assert!(matches!(
            FixedFont::new(&[0u8, 8][..]),
            Err(FontError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_draw_char_columns() {
        let image = font_image();
        let mut font = FixedFont::new(&image[..]).unwrap();
        let mut canvas = blank();

        font.draw_char('I', 0, 0, &mut canvas, Color::Black, 1);
        // Middle column is a full 7-pixel bar
        for row in 0..7 {
            assert_eq!(canvas.pixel(2, row), Some(Color::Black));
        }
        assert_eq!(canvas.pixel(2, 7), Some(Color::White));
        // Serifs at top and bottom of columns 1 and 3
        assert_eq!(canvas.pixel(1, 0), Some(Color::Black));
        assert_eq!(canvas.pixel(1, 1), Some(Color::White));
        assert_eq!(canvas.pixel(3, 6), Some(Color::Black));
        assert_eq!(canvas.pixel(0, 0), Some(Color::White));
    }

    #[test]
    fn test_draw_char_scaled() {
        let image = font_image();
        let mut font = FixedFont::new(&image[..]).unwrap();
        let mut canvas = blank();

        font.draw_char('I', 0, 0, &mut canvas, Color::Black, 2);
        assert_eq!(canvas.pixel(4, 13), Some(Color::Black));
        assert_eq!(canvas.pixel(5, 13), Some(Color::Black));
        assert_eq!(canvas.pixel(4, 14), Some(Color::White));
    }

    #[test]
    fn test_unmapped_chars_are_skipped() {
        let image = font_image();
        let mut font = FixedFont::new(&image[..]).unwrap();
        let mut canvas = blank();

        font.draw_char('数', 0, 0, &mut canvas, Color::Black, 1);
        font.draw_char('B', 0, 0, &mut canvas, Color::Black, 1);
        assert!(canvas.buffer().iter().all(|b| *b == 0xFF));
    }

    #[test]
    fn test_advance_and_text_width() {
        let image = font_image();
        let font = FixedFont::new(&image[..]).unwrap();
        assert_eq!(font.text_width("AI"), 12);
        assert_eq!(font.metrics().advance('A', TextStyle::new(2, 3)), 15);
    }

    #[test]
    fn test_canvas_text_advances_cursor() {
        let image = font_image();
        let mut font = FixedFont::new(&image[..]).unwrap();
        let mut canvas = blank();

        canvas.text(&mut font, "IA\nI", 0, 0, Color::Black, TextStyle::default());
        // Second glyph starts at x = 6
        assert_eq!(canvas.pixel(6, 1), Some(Color::Black));
        // Second row starts 7 pixels lower
        assert_eq!(canvas.pixel(2, 13), Some(Color::Black));

        let image = font.close();
        assert_eq!(image.len(), 1282);
    }
}
