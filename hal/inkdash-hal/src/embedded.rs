//! Adapters from `embedded-hal` 1.0 to the Inkdash traits
//!
//! Chip HALs (embassy-rp, esp-hal, linux-embedded-hal, ...) implement the
//! `embedded-hal` traits. Wrapping a peripheral in [`Hal`] makes it usable
//! by the Inkdash drivers without a per-chip HAL crate.
//!
//! GPIO errors are discarded: on every supported chip pin access is
//! infallible (`Error = Infallible`). An input that fails to read reports
//! low. For the panel's busy line low means busy, so a faulty pin keeps
//! the driver waiting until its busy deadline, if one is configured.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital;
use embedded_hal::spi;

/// Wrapper adapting an `embedded-hal` peripheral
#[derive(Debug)]
pub struct Hal<T>(pub T);

impl<T> Hal<T> {
    /// Wrap a peripheral
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Unwrap the peripheral
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: digital::OutputPin> crate::gpio::OutputPin for Hal<T> {
    fn set_high(&mut self) {
        let _ = self.0.set_high();
    }

    fn set_low(&mut self) {
        let _ = self.0.set_low();
    }
}

impl<T: digital::InputPin> crate::gpio::InputPin for Hal<T> {
    fn is_high(&mut self) -> bool {
        match self.0.is_high() {
            Ok(level) => level,
            Err(_) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("gpio: input read failed, reporting low");
                false
            }
        }
    }
}

impl<T: spi::SpiBus<u8>> crate::spi::SpiBus for Hal<T> {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        spi::SpiBus::write(&mut self.0, data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        spi::SpiBus::flush(&mut self.0)
    }
}

impl<T: DelayNs> crate::delay::Delay for Hal<T> {
    fn delay_ms(&mut self, ms: u32) {
        DelayNs::delay_ms(&mut self.0, ms);
    }
}
