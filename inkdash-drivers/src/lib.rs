//! Hardware driver implementations
//!
//! This crate provides concrete drivers for the hardware the dashboard
//! talks to, written against the traits in `inkdash-hal`:
//!
//! - 7.5" 800×480 black/yellow e-paper panel ([`panel::Epd7in5b`])
//! - Grayscale to two-plane conversion ([`panel::split_planes`])

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod panel;

pub use panel::{Epd7in5b, PanelError, PanelState, Plane};
