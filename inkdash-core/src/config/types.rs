//! Configuration type definitions
//!
//! These types describe the dashboard: page geometry, font cache, panel
//! timing and the local clock. Configuration is embedded in the firmware
//! image as postcard-serialized binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Current configuration format version
pub const CONFIG_VERSION: u8 = 1;

/// Page geometry of the two-column dashboard (pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Horizontal distance between the two columns
    pub column_width: u16,
    /// Left margin inside a column
    pub margin: u16,
    /// Wrapping width of column text
    pub max_width: u16,
    /// Furthest a soft break may sit from the line limit
    pub lookback: u16,
    /// Title baseline row
    pub title_top: u16,
    /// Title magnification
    pub title_scale: u8,
    /// Extra pixels between title glyphs
    pub title_spacing: u8,
    /// Row advance of wrapped title lines
    pub title_line_height: u16,
    /// Row of the first of the two separator lines
    pub separator_y: u16,
    /// First content row
    pub content_top: u16,
    /// Content stops once the cursor passes this row
    pub content_bottom: u16,
    /// Extra pixels between subheader glyphs
    pub subheader_spacing: u8,
    /// Row advance of subheader lines
    pub subheader_line_height: u16,
    /// Extra pixels between body glyphs
    pub body_spacing: u8,
    /// Row advance of body lines
    pub body_line_height: u16,
    /// Vertical gap for an empty content line
    pub blank_line_gap: u16,
    /// Status line position
    pub status_x: u16,
    /// Status line position
    pub status_y: u16,
    /// Extra pixels between status glyphs
    pub status_spacing: u8,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: 400,
            margin: 20,
            max_width: 360,
            lookback: 32,
            title_top: 30,
            title_scale: 2,
            title_spacing: 2,
            title_line_height: 32,
            separator_y: 65,
            content_top: 90,
            content_bottom: 440,
            subheader_spacing: 2,
            subheader_line_height: 32,
            body_spacing: 0,
            body_line_height: 28,
            blank_line_gap: 10,
            status_x: 20,
            status_y: 460,
            status_spacing: 0,
        }
    }
}

/// Glyph cache settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FontConfig {
    /// Number of decoded glyphs kept in RAM
    pub cache_size: u16,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self { cache_size: 30 }
    }
}

/// Panel timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PanelConfig {
    /// First busy poll interval
    pub busy_initial_ms: u32,
    /// Upper bound of the doubling poll interval
    pub busy_max_ms: u32,
    /// Give up waiting after this long; `None` waits forever
    pub busy_deadline_ms: Option<u32>,
    /// Length of each half of the reset pulse
    pub reset_pulse_ms: u32,
    /// Pause after a full plane transfer
    pub post_write_delay_ms: u32,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            busy_initial_ms: 100,
            busy_max_ms: 3000,
            busy_deadline_ms: None,
            reset_pulse_ms: 200,
            post_write_delay_ms: 100,
        }
    }
}

/// Local time settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ClockConfig {
    /// Offset from UTC in whole hours
    pub utc_offset_hours: i8,
}

impl ClockConfig {
    /// Offset from UTC in seconds
    pub const fn utc_offset_secs(&self) -> i64 {
        self.utc_offset_hours as i64 * 3600
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: 8,
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DashboardConfig {
    /// Format version
    pub version: u8,
    /// Page geometry
    pub layout: LayoutConfig,
    /// Glyph cache
    pub font: FontConfig,
    /// Panel timing
    pub panel: PanelConfig,
    /// Local time
    pub clock: ClockConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            layout: LayoutConfig::default(),
            font: FontConfig::default(),
            panel: PanelConfig::default(),
            clock: ClockConfig::default(),
        }
    }
}
