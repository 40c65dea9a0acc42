//! Grayscale to two-plane conversion
//!
//! Images prepared off-device (8 bits per pixel) are quantized into the
//! panel's black and yellow planes. Dark pixels become black ink, mid
//! tones become yellow ink, and the rest stay white. Both planes use the
//! canvas convention: a cleared bit is ink.

/// Gray level thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GrayBounds {
    /// Levels below this are black
    pub black_below: u8,
    /// Levels below this (and not black) are yellow
    pub yellow_below: u8,
}

impl Default for GrayBounds {
    fn default() -> Self {
        Self {
            black_below: 64,
            yellow_below: 192,
        }
    }
}

/// Plane conversion errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SplitError {
    /// A plane does not hold one bit per gray pixel
    SizeMismatch {
        /// Required plane length
        expected: usize,
        /// Offending plane length
        actual: usize,
    },
}

/// Quantize `gray` (one byte per pixel, scanline-major) into two planes
///
/// The pixel count must be a multiple of 8 and each plane must be exactly
/// `gray.len() / 8` bytes.
pub fn split_planes(
    gray: &[u8],
    black: &mut [u8],
    yellow: &mut [u8],
    bounds: GrayBounds,
) -> Result<(), SplitError> {
    let expected = gray.len() / 8;
    for actual in [black.len(), yellow.len()] {
        if actual != expected || gray.len() % 8 != 0 {
            return Err(SplitError::SizeMismatch { expected, actual });
        }
    }

    for ((pixels, b), y) in gray
        .chunks_exact(8)
        .zip(black.iter_mut())
        .zip(yellow.iter_mut())
    {
        let mut black_byte = 0xFF;
        let mut yellow_byte = 0xFF;
        for (i, &level) in pixels.iter().enumerate() {
            let mask = 0x80 >> i;
            if level < bounds.black_below {
                black_byte &= !mask;
            } else if level < bounds.yellow_below {
                yellow_byte &= !mask;
            }
        }
        *b = black_byte;
        *y = yellow_byte;
    }
    Ok(())
}
