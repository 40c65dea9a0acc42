//! Bounded LRU glyph cache
//!
//! Entries are kept oldest-first in a fixed-capacity vector. A hit moves the
//! entry to the back; inserting into a full cache drops the front entry.
//! With the small capacities used on device (tens of glyphs) a linear scan
//! beats any hashed structure.

use heapless::Vec;

use crate::traits::GlyphBitmap;

/// Strict LRU map from code point to glyph bitmap
///
/// `N` is the storage capacity; the effective limit can be lowered at
/// runtime with [`GlyphCache::with_limit`].
#[derive(Debug, Clone)]
pub struct GlyphCache<const N: usize> {
    entries: Vec<(u16, GlyphBitmap), N>,
    limit: usize,
}

impl<const N: usize> Default for GlyphCache<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> GlyphCache<N> {
    /// Empty cache using the full capacity
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            limit: N,
        }
    }

    /// Empty cache holding at most `limit` entries (clamped to `N`)
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.min(N),
        }
    }

    /// Maximum number of entries kept
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of cached glyphs
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check for a code point without touching recency
    pub fn contains(&self, code_point: u16) -> bool {
        self.entries.iter().any(|(cp, _)| *cp == code_point)
    }

    /// Look up a glyph, marking it most recently used
    pub fn get(&mut self, code_point: u16) -> Option<GlyphBitmap> {
        let index = self.entries.iter().position(|(cp, _)| *cp == code_point)?;
        let entry = self.entries.remove(index);
        let bitmap = entry.1;
        // Capacity is unchanged by remove + push
        let _ = self.entries.push(entry);
        Some(bitmap)
    }

    /// Store a glyph as most recently used, evicting the oldest if full
    pub fn insert(&mut self, code_point: u16, bitmap: GlyphBitmap) {
        if self.limit == 0 {
            return;
        }

        if let Some(index) = self.entries.iter().position(|(cp, _)| *cp == code_point) {
            self.entries.remove(index);
        } else if self.entries.len() >= self.limit {
            self.entries.remove(0);
        }

        let _ = self.entries.push((code_point, bitmap));
    }

    /// Code points from least to most recently used
    pub fn code_points(&self) -> impl Iterator<Item = u16> + '_ {
        self.entries.iter().map(|(cp, _)| *cp)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(seed: u8) -> GlyphBitmap {
        [seed; 32]
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache: GlyphCache<3> = GlyphCache::new();
        cache.insert(1, glyph(1));
        cache.insert(2, glyph(2));
        cache.insert(3, glyph(3));

        // Touch 1 so 2 becomes the oldest
        assert_eq!(cache.get(1), Some(glyph(1)));
        cache.insert(4, glyph(4));

        assert!(!cache.contains(2));
        assert!(cache.contains(1));
        assert!(cache.contains(3));
        assert!(cache.contains(4));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_get_reorders() {
        let mut cache: GlyphCache<4> = GlyphCache::new();
        for cp in 10..14 {
            cache.insert(cp, glyph(cp as u8));
        }
        cache.get(10);
        let order: heapless::Vec<u16, 4> = cache.code_points().collect();
        assert_eq!(&order[..], &[11, 12, 13, 10]);
    }

    #[test]
    fn test_contains_does_not_reorder() {
        let mut cache: GlyphCache<2> = GlyphCache::new();
        cache.insert(1, glyph(1));
        cache.insert(2, glyph(2));
        assert!(cache.contains(1));
        cache.insert(3, glyph(3));
        assert!(!cache.contains(1));
    }

    #[test]
    fn test_reinsert_does_not_grow() {
        let mut cache: GlyphCache<2> = GlyphCache::new();
        cache.insert(1, glyph(1));
        cache.insert(1, glyph(9));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(1), Some(glyph(9)));
    }

    #[test]
    fn test_runtime_limit() {
        let mut cache: GlyphCache<8> = GlyphCache::with_limit(2);
        assert_eq!(cache.limit(), 2);
        for cp in 0..5 {
            cache.insert(cp, glyph(cp as u8));
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(3) && cache.contains(4));

        let clamped: GlyphCache<4> = GlyphCache::with_limit(100);
        assert_eq!(clamped.limit(), 4);
    }

    #[test]
    fn test_zero_limit_caches_nothing() {
        let mut cache: GlyphCache<4> = GlyphCache::with_limit(0);
        cache.insert(1, glyph(1));
        assert!(cache.is_empty());
        assert_eq!(cache.get(1), None);
    }

    #[test]
    fn test_clear() {
        let mut cache: GlyphCache<4> = GlyphCache::new();
        cache.insert(1, glyph(1));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(1), None);
    }
}
