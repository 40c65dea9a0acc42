//! Packed monochrome canvas
//!
//! One bit per pixel, scanline-major, most significant bit first:
//! pixel (x, y) lives in byte `(y * stride + x) / 8` at bit `7 - (x & 7)`.
//! This is exactly the order the panel expects on the wire, so a plane is
//! transmitted straight from [`Canvas::buffer`].
//!
//! Every drawing call takes logical coordinates and applies the current
//! [`Rotation`] before addressing the buffer. Anything that lands outside
//! the panel is clipped silently.

use crate::color::Color;
use crate::traits::{Font, GlyphMetrics, TextStyle};

/// Byte storage a canvas can draw into
///
/// Implemented for arrays, slices, `&'static mut` buffers and `Vec<u8>`.
pub trait PixelBuffer: AsRef<[u8]> + AsMut<[u8]> {}

impl<T: AsRef<[u8]> + AsMut<[u8]> + ?Sized> PixelBuffer for T {}

/// Display orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Identity
    #[default]
    Deg0,
    /// Swap axes, mirror x
    Deg90,
    /// Mirror both axes
    Deg180,
    /// Swap axes, mirror y
    Deg270,
}

/// Error converting a raw value into a [`Rotation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RotationError {
    /// Only 0..=3 are valid rotations
    InvalidValue(u8),
}

impl Rotation {
    /// Rotation as its index (0..=3)
    pub const fn index(self) -> u8 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 1,
            Rotation::Deg180 => 2,
            Rotation::Deg270 => 3,
        }
    }

    /// Whether logical x/y are swapped relative to the panel
    pub const fn is_transposed(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }
}

impl TryFrom<u8> for Rotation {
    type Error = RotationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rotation::Deg0),
            1 => Ok(Rotation::Deg90),
            2 => Ok(Rotation::Deg180),
            3 => Ok(Rotation::Deg270),
            other => Err(RotationError::InvalidValue(other)),
        }
    }
}

/// Canvas construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CanvasError {
    /// Buffer length is not `stride * height / 8`
    BufferSize {
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },
    /// Stride is narrower than the width or not a multiple of 8
    Stride,
}

/// Packed 1-bit drawing surface
pub struct Canvas<B> {
    buffer: B,
    width: u16,
    height: u16,
    stride: u16,
    rotation: Rotation,
}

impl<B: PixelBuffer> Canvas<B> {
    /// Create a canvas whose stride equals its width
    pub fn new(buffer: B, width: u16, height: u16) -> Result<Self, CanvasError> {
        Self::with_stride(buffer, width, height, width)
    }

    /// Create a canvas with an explicit scanline stride (in pixels)
    pub fn with_stride(
        buffer: B,
        width: u16,
        height: u16,
        stride: u16,
    ) -> Result<Self, CanvasError> {
        if stride < width || stride % 8 != 0 {
            return Err(CanvasError::Stride);
        }

        let expected = stride as usize * height as usize / 8;
        let actual = buffer.as_ref().len();
        if actual != expected {
            return Err(CanvasError::BufferSize { expected, actual });
        }

        Ok(Self {
            buffer,
            width,
            height,
            stride,
            rotation: Rotation::Deg0,
        })
    }

    /// Physical width in pixels
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Physical height in pixels
    pub fn height(&self) -> u16 {
        self.height
    }

    /// Scanline stride in pixels
    pub fn stride(&self) -> u16 {
        self.stride
    }

    /// Current rotation
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Change the rotation; the buffer is not touched
    pub fn set_rotation(&mut self, rotation: Rotation) {
        self.rotation = rotation;
    }

    /// Logical (width, height) under the current rotation
    pub fn rotated_size(&self) -> (u16, u16) {
        if self.rotation.is_transposed() {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }

    /// Packed pixel bytes, ready for transmission
    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    /// Mutable access to the packed bytes
    pub fn buffer_mut(&mut self) -> &mut [u8] {
        self.buffer.as_mut()
    }

    /// Release the backing buffer
    pub fn into_inner(self) -> B {
        self.buffer
    }

    /// Read a pixel; `None` if outside the canvas
    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.physical(x as i64, y as i64)
            .map(|(px, py)| Color::from_bit(self.read_bit(px, py)))
    }

    /// Write a pixel; ignored if outside the canvas
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) {
        self.plot(x as i64, y as i64, color.bit());
    }

    /// Set every pixel to `color`
    pub fn fill(&mut self, color: Color) {
        self.buffer.as_mut().fill(color.fill_byte());
    }

    /// Filled rectangle, clipped to the canvas
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.draw_rect(x, y, width, height, color, true);
    }

    /// One pixel rectangle outline, clipped to the canvas
    pub fn rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color) {
        self.draw_rect(x, y, width, height, color, false);
    }

    /// Horizontal line of `width` pixels
    pub fn hline(&mut self, x: i32, y: i32, width: i32, color: Color) {
        self.fill_rect(x, y, width, 1, color);
    }

    /// Vertical line of `height` pixels
    pub fn vline(&mut self, x: i32, y: i32, height: i32, color: Color) {
        self.fill_rect(x, y, 1, height, color);
    }

    /// Circle outline (midpoint stepping, eight octants per step)
    pub fn circle(&mut self, center_x: i32, center_y: i32, radius: i32, color: Color) {
        let (cx, cy, r) = (center_x as i64, center_y as i64, radius as i64);
        let bit = color.bit();

        let mut x = r - 1;
        let mut y = 0i64;
        let mut d_x = 1i64;
        let mut d_y = 1i64;
        let mut err = d_x - (r << 1);

        while x >= y {
            self.plot(cx + x, cy + y, bit);
            self.plot(cx + y, cy + x, bit);
            self.plot(cx - y, cy + x, bit);
            self.plot(cx - x, cy + y, bit);
            self.plot(cx - x, cy - y, bit);
            self.plot(cx - y, cy - x, bit);
            self.plot(cx + y, cy - x, bit);
            self.plot(cx + x, cy - y, bit);

            if err <= 0 {
                y += 1;
                err += d_y;
                d_y += 2;
            }
            if err > 0 {
                x -= 1;
                d_x += 2;
                err += d_x - (r << 1);
            }
        }
    }

    /// Straight line between two points, both endpoints included
    ///
    /// Integer Bresenham; the error term is kept doubled so no fractions
    /// are needed.
    pub fn line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        let (x0, y0, x1, y1) = (x0 as i64, y0 as i64, x1 as i64, y1 as i64);
        let bit = color.bit();

        let d_x = (x1 - x0).abs();
        let d_y = (y1 - y0).abs();
        let s_x = if x0 > x1 { -1 } else { 1 };
        let s_y = if y0 > y1 { -1 } else { 1 };
        let (mut x, mut y) = (x0, y0);

        if d_x > d_y {
            let mut err = d_x;
            while x != x1 {
                self.plot(x, y, bit);
                err -= 2 * d_y;
                if err < 0 {
                    y += s_y;
                    err += 2 * d_x;
                }
                x += s_x;
            }
        } else {
            let mut err = d_y;
            while y != y1 {
                self.plot(x, y, bit);
                err -= 2 * d_x;
                if err < 0 {
                    x += s_x;
                    err += 2 * d_y;
                }
                y += s_y;
            }
        }
        self.plot(x, y, bit);
    }

    /// Shift the whole panel content in place by (`delta_x`, `delta_y`)
    ///
    /// Works on physical coordinates. Nothing wraps around; the vacated
    /// strip keeps its previous pixels.
    pub fn scroll(&mut self, delta_x: i32, delta_y: i32) {
        let (w, h) = (self.width as i64, self.height as i64);
        let (dx, dy) = (delta_x as i64, delta_y as i64);
        if dx.abs() >= w || dy.abs() >= h {
            return;
        }

        // Walk from the far edge inward so sources are read before they
        // are overwritten.
        let rows = h - dy.abs();
        let cols = w - dx.abs();
        for i in 0..rows {
            let y = if dy >= 0 { h - 1 - i } else { i };
            for j in 0..cols {
                let x = if dx >= 0 { w - 1 - j } else { j };
                let bit = self.read_bit((x - dx) as usize, (y - dy) as usize);
                self.write_bit(x as usize, y as usize, bit);
            }
        }
    }

    /// Draw text; `'\n'` starts a new row one cell height lower
    pub fn text<F: Font>(
        &mut self,
        font: &mut F,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        style: TextStyle,
    ) {
        let (_, cell_h) = font.cell_size();
        let line_height = cell_h as i32 * style.effective_scale() as i32;

        let mut y = y;
        for chunk in text.split('\n') {
            self.glyphs(font, chunk.chars(), x, y, color, style);
            y = y.saturating_add(line_height);
        }
    }

    /// Draw text twice, one pixel apart, for a bold look
    pub fn bold_text<F: Font>(
        &mut self,
        font: &mut F,
        text: &str,
        x: i32,
        y: i32,
        color: Color,
        style: TextStyle,
    ) {
        self.text(font, text, x, y, color, style);
        self.text(font, text, x.saturating_add(1), y, color, style);
    }

    /// Draw a single row of characters and return the final cursor x
    ///
    /// Glyphs entirely outside the rotated frame are skipped but still
    /// advance the cursor.
    pub fn glyphs<F, I>(
        &mut self,
        font: &mut F,
        chars: I,
        x: i32,
        y: i32,
        color: Color,
        style: TextStyle,
    ) -> i32
    where
        F: Font,
        I: IntoIterator<Item = char>,
    {
        let (frame_w, frame_h) = self.rotated_size();
        let (cell_w, cell_h) = font.cell_size();
        let scale = style.effective_scale() as i32;
        let glyph_w = cell_w as i32 * scale;
        let glyph_h = cell_h as i32 * scale;
        let metrics = font.metrics();

        let row_visible = y.saturating_add(glyph_h) > 0 && y < frame_h as i32;
        let mut cursor = x;
        for c in chars {
            if row_visible && cursor.saturating_add(glyph_w) > 0 && cursor < frame_w as i32 {
                font.draw_char(c, cursor, y, self, color, style.scale);
            }
            cursor = cursor.saturating_add(metrics.advance(c, style) as i32);
        }
        cursor
    }

    fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color, fill: bool) {
        let Some((x0, y0, x1, y1)) = self.clip_rect(x, y, width, height) else {
            return;
        };
        let bit = color.bit();

        if fill {
            self.fill_physical(x0, y0, x1, y1, bit);
        } else {
            self.fill_physical(x0, y0, x1, y0, bit);
            self.fill_physical(x0, y0, x0, y1, bit);
            self.fill_physical(x0, y1, x1, y1, bit);
            self.fill_physical(x1, y0, x1, y1, bit);
        }
    }

    /// Rotate a logical rectangle and clip it; inclusive physical corners
    fn clip_rect(
        &self,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> Option<(usize, usize, usize, usize)> {
        let (x, y, w, h) = (x as i64, y as i64, width as i64, height as i64);
        let (cw, ch) = (self.width as i64, self.height as i64);

        let (x, y, w, h) = match self.rotation {
            Rotation::Deg0 => (x, y, w, h),
            Rotation::Deg90 => (cw - y - h, x, h, w),
            Rotation::Deg180 => (cw - x - w, ch - y - h, w, h),
            Rotation::Deg270 => (y, ch - x - w, h, w),
        };

        if w < 1 || h < 1 || x + w <= 0 || y + h <= 0 || x >= cw || y >= ch {
            return None;
        }

        let x_end = (x + w - 1).min(cw - 1);
        let y_end = (y + h - 1).min(ch - 1);
        Some((x.max(0) as usize, y.max(0) as usize, x_end as usize, y_end as usize))
    }

    /// Fill an inclusive physical rectangle a byte at a time
    fn fill_physical(&mut self, x0: usize, y0: usize, x1: usize, y1: usize, bit: bool) {
        let stride = self.stride as usize;
        let buf = self.buffer.as_mut();
        let head = 0xFFu8 >> (x0 & 7);
        let tail = 0xFFu8 << (7 - (x1 & 7));

        for y in y0..=y1 {
            let row = y * stride;
            let first = (row + x0) / 8;
            let last = (row + x1) / 8;

            if first == last {
                apply_mask(&mut buf[first], head & tail, bit);
            } else {
                apply_mask(&mut buf[first], head, bit);
                buf[first + 1..last].fill(if bit { 0xFF } else { 0x00 });
                apply_mask(&mut buf[last], tail, bit);
            }
        }
    }

    /// Rotate logical coordinates into the panel, `None` if outside
    fn physical(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let (w, h) = (self.width as i64, self.height as i64);
        let (px, py) = match self.rotation {
            Rotation::Deg0 => (x, y),
            Rotation::Deg90 => (w - 1 - y, x),
            Rotation::Deg180 => (w - 1 - x, h - 1 - y),
            Rotation::Deg270 => (y, h - 1 - x),
        };

        if px < 0 || py < 0 || px >= w || py >= h {
            None
        } else {
            Some((px as usize, py as usize))
        }
    }

    fn plot(&mut self, x: i64, y: i64, bit: bool) {
        if let Some((px, py)) = self.physical(x, y) {
            self.write_bit(px, py, bit);
        }
    }

    fn read_bit(&self, x: usize, y: usize) -> bool {
        let index = (y * self.stride as usize + x) / 8;
        let mask = 0x80u8 >> (x & 7);
        self.buffer.as_ref()[index] & mask != 0
    }

    fn write_bit(&mut self, x: usize, y: usize, bit: bool) {
        let index = (y * self.stride as usize + x) / 8;
        let mask = 0x80u8 >> (x & 7);
        apply_mask(&mut self.buffer.as_mut()[index], mask, bit);
    }
}

fn apply_mask(byte: &mut u8, mask: u8, bit: bool) {
    if bit {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}
