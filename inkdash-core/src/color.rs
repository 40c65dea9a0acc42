//! Pixel colors
//!
//! Each plane stores one bit per pixel. A cleared bit is ink (black on the
//! black plane, yellow on the yellow plane) and a set bit is paper, so a
//! freshly filled `White` buffer transmits as all `0xFF`.

/// Color of a single pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Ink (bit 0)
    Black,
    /// Paper (bit 1)
    White,
}

/// Error converting a raw value into a [`Color`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorError {
    /// Only 0 and 1 are valid colors
    InvalidValue(u8),
}

impl Color {
    /// Stored bit for this color
    pub const fn bit(self) -> bool {
        matches!(self, Color::White)
    }

    /// Color for a stored bit
    pub const fn from_bit(bit: bool) -> Self {
        if bit {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Byte with all eight pixels set to this color
    pub const fn fill_byte(self) -> u8 {
        match self {
            Color::Black => 0x00,
            Color::White => 0xFF,
        }
    }

    /// The opposite color
    pub const fn inverted(self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }
}

impl TryFrom<u8> for Color {
    type Error = ColorError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Color::Black),
            1 => Ok(Color::White),
            other => Err(ColorError::InvalidValue(other)),
        }
    }
}

impl From<Color> for u8 {
    fn from(color: Color) -> Self {
        color.bit() as u8
    }
}
