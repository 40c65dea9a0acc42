//! Panel backend trait
//!
//! Defines the two-plane sink the dashboard composer renders into.

/// Composer errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError<E> {
    /// The panel rejected a transfer
    Panel(E),
    /// Canvas buffer does not match the panel resolution
    BufferSize {
        /// Bytes in one plane of the panel
        expected: usize,
        /// Bytes in the canvas buffer
        actual: usize,
    },
}

/// Two-plane e-paper panel
///
/// A frame is a black plane and a yellow plane, each one bit per pixel
/// with a cleared bit meaning ink. Writing a plane does not change what is
/// shown; the panel updates when a write requests a refresh.
pub trait PanelBackend {
    /// Error type of the underlying driver
    type Error;

    /// Panel resolution in pixels (width, height)
    fn size(&self) -> (u16, u16);

    /// Transmit the black plane, optionally refreshing afterwards
    fn write_black_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Self::Error>;

    /// Transmit the yellow plane, optionally refreshing afterwards
    fn write_yellow_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Self::Error>;

    /// Bytes in one plane
    fn plane_len(&self) -> usize {
        let (width, height) = self.size();
        width as usize * height as usize / 8
    }
}

impl<T: PanelBackend + ?Sized> PanelBackend for &mut T {
    type Error = T::Error;

    fn size(&self) -> (u16, u16) {
        (**self).size()
    }

    fn write_black_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Self::Error> {
        (**self).write_black_plane(data, refresh)
    }

    fn write_yellow_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Self::Error> {
        (**self).write_yellow_plane(data, refresh)
    }
}
