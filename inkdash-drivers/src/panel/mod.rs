//! E-paper panel drivers
//!
//! Panels in this family are driven over a write-only SPI bus with a
//! data/command select line, a reset line and an active-low busy line.
//! A frame is two full planes (black and yellow) followed by one refresh.

pub mod epd7in5b;
pub mod planes;

pub use epd7in5b::{Epd7in5b, PanelError, PanelState, Plane, HEIGHT, PLANE_BYTES, WIDTH};
pub use planes::{split_planes, GrayBounds, SplitError};
