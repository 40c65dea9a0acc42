//! Inkdash Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the rendering
//! pipeline and the panel driver are written against. Chip HALs plug in
//! through the [`embedded`] adapters, which wrap any `embedded-hal` 1.0
//! implementation.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (inkdash-firmware, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  inkdash-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ embedded-hal  │       │ std::fs::File │
//! │  (adapters)   │       │ (std feature) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`spi::SpiBus`] - SPI bus operations
//! - [`delay::Delay`] - Blocking millisecond delays
//! - [`storage::BlobStorage`] - Random-access read-only blobs (font files)

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "std")]
extern crate std;

pub mod delay;
pub mod embedded;
pub mod gpio;
pub mod spi;
pub mod storage;

// Re-export key traits at crate root for convenience
pub use delay::Delay;
pub use gpio::{InputPin, OutputPin};
pub use spi::SpiBus;
pub use storage::{BlobStorage, StorageError};

#[cfg(feature = "std")]
pub use storage::FileStorage;
