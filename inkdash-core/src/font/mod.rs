//! Bitmap font back-ends
//!
//! Two on-storage encodings are supported:
//!
//! - [`FixedFont`]: a 2-byte header (`W`, `H`) followed by 256 glyphs of
//!   `W` column bytes each. Glyph `N` sits at offset `2 + N * W`.
//! - [`IndexedFont`]: a little-endian header (`magic`, `width`, `height`,
//!   `count`), a sorted index of `(u16 code point, u32 offset)` records at
//!   offset 8, then 32-byte glyph records. Lookups are binary searches
//!   backed by a small LRU cache.
//!
//! Both read their storage lazily through [`BlobStorage`], so a font can
//! live in flash, on a filesystem, or in a test vector.

pub mod cache;
pub mod fixed;
pub mod indexed;
#[cfg(any(test, feature = "std"))]
pub mod writer;

pub use cache::GlyphCache;
pub use fixed::{FixedFont, FixedMetrics};
pub use indexed::{CellMetrics, IndexedFont, IndexedSource, DEFAULT_CACHE_SIZE, INDEXED_MAGIC};

use inkdash_hal::{BlobStorage, StorageError};

/// Font construction errors
///
/// Only raised while opening a font. A missing glyph is never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontError {
    /// Storage could not be read
    Storage(StorageError),
    /// Blob length does not match the declared geometry
    InvalidSize {
        /// Length implied by the header
        expected: u32,
        /// Actual blob length
        actual: u32,
    },
    /// Indexed font magic mismatch
    BadMagic(u16),
    /// Glyph dimensions the renderer cannot handle
    InvalidGeometry {
        /// Glyph width in pixels
        width: u16,
        /// Glyph height in pixels
        height: u16,
    },
}

impl From<StorageError> for FontError {
    fn from(err: StorageError) -> Self {
        FontError::Storage(err)
    }
}

/// Open a font stored on a filesystem (host tools and tests)
#[cfg(feature = "std")]
pub fn open_indexed<P: AsRef<std::path::Path>>(
    path: P,
) -> Result<IndexedFont<inkdash_hal::FileStorage>, FontError> {
    let storage = inkdash_hal::FileStorage::open(path)?;
    IndexedFont::new(storage)
}

/// Read the `N`-byte header at offset 0; a short blob is an invalid size
pub(crate) fn read_header<S: BlobStorage, const N: usize>(
    storage: &mut S,
) -> Result<[u8; N], FontError> {
    let mut header = [0u8; N];
    storage.read_at(0, &mut header).map_err(|err| match err {
        StorageError::OutOfBounds => FontError::InvalidSize {
            expected: N as u32,
            actual: storage.len(),
        },
        other => FontError::Storage(other),
    })?;
    Ok(header)
}
