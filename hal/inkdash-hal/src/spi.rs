//! SPI bus abstractions
//!
//! Provides traits for SPI master operations that can be implemented
//! by chip-specific HALs.

/// SPI bus master
///
/// Chip select is not part of the bus; drivers toggle their own CS pin
/// around each transaction.
pub trait SpiBus {
    /// Error type for SPI operations
    type Error;

    /// Write data without reading
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Wait until all queued bytes have left the shift register
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<T: SpiBus + ?Sized> SpiBus for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        (**self).write(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}

/// Bus settings the firmware applies to the chip's SPI peripheral
///
/// The panel samples on the rising edge with the clock idle low (mode 0),
/// which every supported chip HAL uses by default, so only the clock rate
/// is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpiConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
}

impl Default for SpiConfig {
    fn default() -> Self {
        Self {
            frequency: 20_000_000, // 20 MHz, the panel's rated write clock
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CountingBus {
        bytes: usize,
        flushes: usize,
    }

    impl SpiBus for CountingBus {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            self.bytes += data.len();
            Ok(())
        }

        fn flush(&mut self) -> Result<(), ()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn send<B: SpiBus>(mut bus: B) -> Result<(), B::Error> {
        bus.write(&[0x10, 0x00, 0xFF])?;
        bus.flush()
    }

    #[test]
    fn test_default_clock_is_20mhz() {
        assert_eq!(SpiConfig::default().frequency, 20_000_000);
    }

    #[test]
    fn test_borrowed_bus_forwards() {
        let mut bus = CountingBus {
            bytes: 0,
            flushes: 0,
        };
        send(&mut bus).unwrap();
        send(&mut bus).unwrap();
        assert_eq!(bus.bytes, 6);
        assert_eq!(bus.flushes, 2);
    }
}
