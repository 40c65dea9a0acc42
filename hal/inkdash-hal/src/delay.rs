//! Blocking delays

/// Blocking millisecond delay
///
/// The panel driver is single-threaded and blocks on every wait, so a plain
/// busy or timer-backed delay is all it needs.
pub trait Delay {
    /// Block for at least `ms` milliseconds
    fn delay_ms(&mut self, ms: u32);
}

impl<T: Delay + ?Sized> Delay for &mut T {
    fn delay_ms(&mut self, ms: u32) {
        (**self).delay_ms(ms);
    }
}
