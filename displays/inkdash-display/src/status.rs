//! Status line
//!
//! The bottom row shows local time and whatever sensor readings are
//! available, joined by `" | "`:
//!
//! ```text
//! 2024-03-09 07:05:00 | 21.5°C | 湿度40.0% | 电量87.5%(4.12V)
//! ```

use core::fmt::{self, Write};

use heapless::String;
use inkdash_core::config::ClockConfig;

/// Capacity of a formatted status line in bytes
pub const STATUS_LEN: usize = 96;

/// Formatted status line
pub type StatusLine = String<STATUS_LEN>;

/// Sensor and clock readings supplied by the caller
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Readings {
    /// Unix time in seconds (UTC)
    pub time: Option<u64>,
    /// Degrees Celsius
    pub temperature: Option<f32>,
    /// Relative humidity in percent
    pub humidity: Option<f32>,
    /// Battery charge in percent
    pub battery_percent: Option<f32>,
    /// Battery voltage
    pub battery_volts: Option<f32>,
}

/// Broken-down civil time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CivilTime {
    pub year: i64,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl CivilTime {
    /// Convert Unix seconds shifted by `offset_secs` into a calendar date
    pub fn from_unix(timestamp: u64, offset_secs: i64) -> Self {
        let local = i64::try_from(timestamp)
            .unwrap_or(i64::MAX)
            .saturating_add(offset_secs);
        let days = local.div_euclid(86_400);
        let secs = local.rem_euclid(86_400);
        let (year, month, day) = civil_from_days(days);

        Self {
            year,
            month,
            day,
            hour: (secs / 3600) as u8,
            minute: (secs / 60 % 60) as u8,
            second: (secs % 60) as u8,
        }
    }
}

impl fmt::Display for CivilTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// Proleptic Gregorian date of a day count relative to 1970-01-01
fn civil_from_days(days: i64) -> (i64, u8, u8) {
    // Shift the epoch to 0000-03-01 so leap days end each 400-year era
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month as u8, day as u8)
}

/// Format the status line for `readings`
///
/// Parts that do not fit in [`STATUS_LEN`] bytes are cut off.
pub fn status_line(readings: &Readings, clock: &ClockConfig) -> StatusLine {
    let mut line = StatusLine::new();
    let _ = write_parts(&mut line, readings, clock);
    line
}

fn write_parts(line: &mut StatusLine, readings: &Readings, clock: &ClockConfig) -> fmt::Result {
    let mut sep = "";
    if let Some(time) = readings.time {
        write!(line, "{}", CivilTime::from_unix(time, clock.utc_offset_secs()))?;
        sep = " | ";
    }
    if let Some(temperature) = readings.temperature {
        write!(line, "{sep}{temperature:.1}°C")?;
        sep = " | ";
    }
    if let Some(humidity) = readings.humidity {
        write!(line, "{sep}湿度{humidity:.1}%")?;
        sep = " | ";
    }
    if let (Some(percent), Some(volts)) = (readings.battery_percent, readings.battery_volts) {
        write!(line, "{sep}电量{percent:.1}%({volts:.2}V)")?;
    }
    Ok(())
}
