//! Embedded configuration
//!
//! `build.rs` validates dashboard.toml and stores it as postcard bytes in
//! OUT_DIR. Decoding can only fail if the image was built from a different
//! configuration format, in which case the defaults are used.

use defmt::*;

use inkdash_core::config::DashboardConfig;

/// Postcard-encoded configuration written by the build script
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/dashboard.bin"));

/// Decode the embedded configuration
pub fn load() -> DashboardConfig {
    match DashboardConfig::from_postcard(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Configuration loaded ({} bytes)", EMBEDDED_CONFIG.len());
            config
        }
        Err(e) => {
            warn!("Embedded configuration rejected: {}, using defaults", e);
            DashboardConfig::default()
        }
    }
}
