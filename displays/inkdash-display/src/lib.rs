//! Dashboard composition for Inkdash e-paper panels
//!
//! This crate provides:
//! - [`PanelBackend`], the two-plane sink a frame is sent to
//! - The dashboard content model ([`Panel`], [`Readings`])
//! - [`Composer`], which lays out two text columns and a status line and
//!   transmits them as a black pass and a yellow pass
//!
//! # Architecture
//!
//! The composer only knows about planes. The concrete panel driver in
//! `inkdash-drivers` implements [`PanelBackend`], and tests use an
//! in-memory mock.
//!
//! ```text
//! Dashboard ──► Composer ──► Canvas (inkdash-core) ──► PanelBackend
//!                  │
//!                  └── layout::Wrap + Font
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod backend;
pub mod content;
pub mod dashboard;
pub mod status;

// Re-export key types
pub use backend::{DisplayError, PanelBackend};
pub use content::{ContentLine, Panel, PanelBody};
pub use dashboard::{Composer, Dashboard};
pub use status::{status_line, CivilTime, Readings, StatusLine};
