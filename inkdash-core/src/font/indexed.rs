//! Sparse Unicode font with a sorted index
//!
//! File layout (little-endian):
//!
//! ```text
//! 0      u16 magic (0x5546)
//! 2      u16 glyph width
//! 4      u16 glyph height
//! 6      u16 glyph count
//! 8      count × { u16 code point, u32 data offset }   ascending by code point
//! ...    32-byte glyph records, rows MSB-first
//! ```
//!
//! Only the header is read at open time. Each glyph costs one binary search
//! over the index plus one 32-byte read, after which it is served from the
//! LRU cache until evicted.

use inkdash_hal::BlobStorage;

use super::cache::GlyphCache;
use super::{read_header, FontError};
use crate::canvas::{Canvas, PixelBuffer};
use crate::color::Color;
use crate::traits::{Font, GlyphBitmap, GlyphMetrics, GlyphSource, TextStyle, GLYPH_BYTES};

/// Magic value at offset 0 ("FU" little-endian)
pub const INDEXED_MAGIC: u16 = 0x5546;

/// Default number of cached glyphs
pub const DEFAULT_CACHE_SIZE: usize = 30;

const INDEX_OFFSET: u32 = 8;
const RECORD_LEN: u32 = 6;

/// Half-width for ASCII and the degree sign, full width for everything else
///
/// This is the advance rule of the 16×16 mixed ASCII/CJK font, and the one
/// the layout engine uses by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellMetrics {
    /// Full cell width in pixels
    pub cell_width: u16,
}

impl CellMetrics {
    /// Metrics for a cell `cell_width` pixels wide
    pub const fn new(cell_width: u16) -> Self {
        Self { cell_width }
    }

    /// Whether `c` occupies half a cell
    pub fn is_half_width(c: char) -> bool {
        (c as u32) < 128 || c == '°'
    }
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self::new(16)
    }
}

impl GlyphMetrics for CellMetrics {
    fn advance(&self, c: char, style: TextStyle) -> u32 {
        let base = if Self::is_half_width(c) {
            self.cell_width / 2
        } else {
            self.cell_width
        };
        base as u32 * style.effective_scale() + style.spacing as u32
    }
}

/// Indexed font storage with its parsed header
///
/// Resolves glyphs straight from storage without caching.
pub struct IndexedSource<S> {
    storage: S,
    width: u16,
    height: u16,
    count: u16,
}

impl<S: BlobStorage> IndexedSource<S> {
    /// Parse and validate the header
    pub fn new(mut storage: S) -> Result<Self, FontError> {
        let header = read_header::<S, 8>(&mut storage)?;
        let field = |i: usize| u16::from_le_bytes([header[i], header[i + 1]]);

        let magic = field(0);
        if magic != INDEXED_MAGIC {
            return Err(FontError::BadMagic(magic));
        }

        let (width, height, count) = (field(2), field(4), field(6));
        if width == 0 || width % 8 != 0 || (width / 8) as usize * height as usize != GLYPH_BYTES {
            return Err(FontError::InvalidGeometry { width, height });
        }

        let expected = INDEX_OFFSET + count as u32 * RECORD_LEN;
        let actual = storage.len();
        if actual < expected {
            return Err(FontError::InvalidSize { expected, actual });
        }

        Ok(Self {
            storage,
            width,
            height,
            count,
        })
    }

    /// Number of glyphs in the index
    pub fn char_count(&self) -> u16 {
        self.count
    }

    /// Binary search the index for `code_point`, returning its data offset
    pub fn lookup(&mut self, code_point: u32) -> Option<u32> {
        let target = u16::try_from(code_point).ok()?;

        let mut lo = 0u32;
        let mut hi = self.count as u32;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let record = INDEX_OFFSET + mid * RECORD_LEN;
            let cp = self.storage.read_u16_le(record).ok()?;
            match cp.cmp(&target) {
                core::cmp::Ordering::Equal => {
                    return self.storage.read_u32_le(record + 2).ok();
                }
                core::cmp::Ordering::Less => lo = mid + 1,
                core::cmp::Ordering::Greater => hi = mid,
            }
        }
        None
    }

    /// Release the storage
    pub fn into_inner(self) -> S {
        self.storage
    }
}

impl<S: BlobStorage> GlyphSource for IndexedSource<S> {
    fn load_glyph(&mut self, code_point: u32) -> Option<GlyphBitmap> {
        let offset = self.lookup(code_point)?;
        let mut bitmap = [0u8; GLYPH_BYTES];
        self.storage.read_at(offset, &mut bitmap).ok()?;
        Some(bitmap)
    }
}

/// Indexed font with an LRU glyph cache of capacity `N`
pub struct IndexedFont<S, const N: usize = DEFAULT_CACHE_SIZE> {
    source: IndexedSource<S>,
    cache: GlyphCache<N>,
}

impl<S: BlobStorage> IndexedFont<S> {
    /// Open a font with the default cache size
    pub fn new(storage: S) -> Result<Self, FontError> {
        Self::with_cache_size(storage, DEFAULT_CACHE_SIZE)
    }
}

impl<S: BlobStorage, const N: usize> IndexedFont<S, N> {
    /// Open a font caching at most `cache_size` glyphs (clamped to `N`)
    pub fn with_cache_size(storage: S, cache_size: usize) -> Result<Self, FontError> {
        Ok(Self {
            source: IndexedSource::new(storage)?,
            cache: GlyphCache::with_limit(cache_size),
        })
    }

    /// Glyph width in pixels
    pub fn width(&self) -> u16 {
        self.source.width
    }

    /// Glyph height in pixels
    pub fn height(&self) -> u16 {
        self.source.height
    }

    /// Number of glyphs in the font
    pub fn char_count(&self) -> u16 {
        self.source.char_count()
    }

    /// Data offset of `code_point`, bypassing the cache
    pub fn lookup(&mut self, code_point: u32) -> Option<u32> {
        self.source.lookup(code_point)
    }

    /// Bitmap for `c`, from cache or storage
    pub fn glyph(&mut self, c: char) -> Option<GlyphBitmap> {
        let code_point = u16::try_from(c as u32).ok()?;
        if let Some(bitmap) = self.cache.get(code_point) {
            return Some(bitmap);
        }

        let bitmap = self.source.load_glyph(code_point as u32)?;
        self.cache.insert(code_point, bitmap);
        Some(bitmap)
    }

    /// Check whether `c` is cached, without changing its recency
    pub fn is_cached(&self, c: char) -> bool {
        u16::try_from(c as u32).is_ok_and(|cp| self.cache.contains(cp))
    }

    /// Number of cached glyphs
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop every cached glyph
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Width of `text` at scale 1 without extra spacing
    pub fn text_width(&self, text: &str) -> u32 {
        self.metrics().measure(text, TextStyle::default())
    }

    /// Clear the cache and release the storage
    pub fn close(mut self) -> S {
        self.cache.clear();
        self.source.into_inner()
    }
}

impl<S: BlobStorage, const N: usize> Font for IndexedFont<S, N> {
    type Metrics = CellMetrics;

    fn cell_size(&self) -> (u16, u16) {
        (self.source.width, self.source.height)
    }

    fn metrics(&self) -> CellMetrics {
        CellMetrics::new(self.source.width)
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
        let Some(bitmap) = self.glyph(c) else {
            return;
        };

        let scale = scale.max(1) as i32;
        let row_bytes = (self.source.width / 8) as usize;
        for (row, bytes) in bitmap.chunks_exact(row_bytes).enumerate() {
            let py = y.saturating_add(row as i32 * scale);
            for (col_byte, byte) in bytes.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (0x80 >> bit) != 0 {
                        let px = x.saturating_add((col_byte as i32 * 8 + bit) * scale);
                        canvas.fill_rect(px, py, scale, scale, color);
                    }
                }
            }
        }
    }
}
