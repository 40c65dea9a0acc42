//! 7.5" 800×480 black/white/yellow e-paper panel
//!
//! # Wire protocol
//!
//! Every command is a single byte sent with DC low, optionally followed by
//! parameter bytes sent with DC high. CS is asserted around each phase:
//!
//! ```text
//! DC=0 CS=0 [cmd] CS=1   DC=1 CS=0 [data...] CS=1
//! ```
//!
//! # Planes
//!
//! The controller holds two frame memories. Data start transmission 1
//! fills the black plane and data start transmission 2 the yellow plane.
//! Both hold one bit per pixel, scanline-major, MSB first, with a cleared
//! bit meaning ink. Nothing becomes visible until a display refresh, which
//! keeps the busy line low for several seconds.
//!
//! # Busy line
//!
//! BUSY reads low while the controller is working. The driver polls it with
//! a doubling interval (100 ms, 200 ms, ... capped at 3 s by default) and
//! optionally gives up after an overall deadline.

use inkdash_core::config::PanelConfig;
use inkdash_hal::{Delay, InputPin, OutputPin, SpiBus};

use super::planes::SplitError;

/// Panel controller command codes
pub mod command {
    /// Panel setting (resolution select, scan direction, booster switch)
    pub const PANEL_SETTING: u8 = 0x00;
    /// Power setting (internal supply levels)
    pub const POWER_SETTING: u8 = 0x01;
    /// Power off
    pub const POWER_OFF: u8 = 0x02;
    /// Power off sequence setting
    pub const POWER_OFF_SEQUENCE: u8 = 0x03;
    /// Power on
    pub const POWER_ON: u8 = 0x04;
    /// Power on measure
    pub const POWER_ON_MEASURE: u8 = 0x05;
    /// Booster soft start
    pub const BOOSTER_SOFT_START: u8 = 0x06;
    /// Deep sleep, requires the check code [`DEEP_SLEEP_CHECK`]
    pub const DEEP_SLEEP: u8 = 0x07;
    /// Data start transmission 1 (black plane)
    pub const DATA_START_TRANSMISSION_1: u8 = 0x10;
    /// Data stop
    pub const DATA_STOP: u8 = 0x11;
    /// Display refresh
    pub const DISPLAY_REFRESH: u8 = 0x12;
    /// Data start transmission 2 (yellow plane)
    pub const DATA_START_TRANSMISSION_2: u8 = 0x13;
    /// First look-up table register (VCOM)
    pub const LUT_VCOM: u8 = 0x20;
    /// Last look-up table register
    pub const LUT_LAST: u8 = 0x29;
    /// PLL control (frame rate)
    pub const PLL_CONTROL: u8 = 0x30;
    /// Temperature sensor command
    pub const TEMPERATURE_SENSOR: u8 = 0x40;
    /// Temperature sensor calibration
    pub const TEMPERATURE_CALIBRATION: u8 = 0x41;
    /// Temperature sensor write
    pub const TEMPERATURE_SENSOR_WRITE: u8 = 0x42;
    /// Temperature sensor read
    pub const TEMPERATURE_SENSOR_READ: u8 = 0x43;
    /// VCOM and data interval setting
    pub const VCOM_AND_DATA_INTERVAL: u8 = 0x50;
    /// Low power detection
    pub const LOW_POWER_DETECTION: u8 = 0x51;
    /// TCON setting (non-overlap periods)
    pub const TCON_SETTING: u8 = 0x60;
    /// TCON resolution, big-endian width then height
    pub const TCON_RESOLUTION: u8 = 0x61;
    /// SPI flash control
    pub const SPI_FLASH_CONTROL: u8 = 0x65;
    /// Revision
    pub const REVISION: u8 = 0x70;
    /// Get status
    pub const GET_STATUS: u8 = 0x71;
    /// Auto measure VCOM
    pub const AUTO_MEASURE_VCOM: u8 = 0x80;
    /// Read VCOM value
    pub const READ_VCOM_VALUE: u8 = 0x81;
    /// VCM DC setting
    pub const VCM_DC_SETTING: u8 = 0x82;
    /// Flash mode
    pub const FLASH_MODE: u8 = 0xE5;

    /// Check code accepted by [`DEEP_SLEEP`]
    pub const DEEP_SLEEP_CHECK: u8 = 0xA5;
}

/// Panel width in pixels
pub const WIDTH: u16 = 800;

/// Panel height in pixels
pub const HEIGHT: u16 = 480;

/// Bytes in one full plane
pub const PLANE_BYTES: usize = WIDTH as usize * HEIGHT as usize / 8;

/// Bytes streamed per SPI write when clearing a plane (one scanline)
const CLEAR_CHUNK: usize = WIDTH as usize / 8;

/// Configuration sent after reset, as (command, parameters)
const INIT_SEQUENCE: [(u8, &[u8]); 7] = [
    (command::PLL_CONTROL, &[0x3C]),
    (command::TEMPERATURE_CALIBRATION, &[0x00]),
    (command::VCOM_AND_DATA_INTERVAL, &[0x77]),
    (command::TCON_SETTING, &[0x22]),
    (
        command::TCON_RESOLUTION,
        &[
            (WIDTH >> 8) as u8,
            WIDTH as u8,
            (HEIGHT >> 8) as u8,
            HEIGHT as u8,
        ],
    ),
    (command::VCM_DC_SETTING, &[0x1E]),
    (command::FLASH_MODE, &[0x03]),
];

/// Driver lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelState {
    /// Not initialized since power-up or the last reset
    Uninitialized,
    /// Init sequence in progress
    Initializing,
    /// Ready for commands
    Idle,
    /// Waiting for the busy line to release
    Busy,
    /// Deep sleep; needs `reset()` or `init()` before further use
    Sleeping,
}

/// Frame memory selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Plane {
    /// Data start transmission 1
    Black,
    /// Data start transmission 2
    Yellow,
}

impl Plane {
    /// Command that starts a transfer into this plane
    pub const fn command(self) -> u8 {
        match self {
            Plane::Black => command::DATA_START_TRANSMISSION_1,
            Plane::Yellow => command::DATA_START_TRANSMISSION_2,
        }
    }
}

/// Panel driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelError<E> {
    /// SPI transfer failed
    Bus(E),
    /// Plane is not exactly one full frame
    BufferSize {
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },
    /// Panel is in deep sleep
    Sleeping,
    /// Busy line did not release before the configured deadline
    BusyTimeout,
}

impl<E> From<SplitError> for PanelError<E> {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::SizeMismatch { expected, actual } => {
                PanelError::BufferSize { expected, actual }
            }
        }
    }
}

/// 7.5" black/yellow e-paper panel driver
pub struct Epd7in5b<SPI, CS, DC, RST, BUSY, D> {
    spi: SPI,
    cs: CS,
    dc: DC,
    rst: RST,
    busy: BUSY,
    delay: D,
    config: PanelConfig,
    state: PanelState,
}

impl<SPI, CS, DC, RST, BUSY, D> Epd7in5b<SPI, CS, DC, RST, BUSY, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: Delay,
{
    /// Take ownership of the bus and pins; the panel is not touched
    pub fn new(
        spi: SPI,
        cs: CS,
        dc: DC,
        rst: RST,
        busy: BUSY,
        delay: D,
        config: PanelConfig,
    ) -> Self {
        let mut epd = Self {
            spi,
            cs,
            dc,
            rst,
            busy,
            delay,
            config,
            state: PanelState::Uninitialized,
        };
        epd.cs.set_high();
        epd
    }

    /// Current lifecycle state
    pub fn state(&self) -> PanelState {
        self.state
    }

    /// Timing configuration
    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    /// Panel size in pixels (width, height)
    pub fn size(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }

    /// Give back the bus, pins and delay
    pub fn release(self) -> (SPI, CS, DC, RST, BUSY, D) {
        (self.spi, self.cs, self.dc, self.rst, self.busy, self.delay)
    }

    /// Pulse the reset line; the panel must be initialized again afterwards
    pub fn reset(&mut self) {
        let pulse = self.config.reset_pulse_ms;
        self.rst.set_low();
        self.delay.delay_ms(pulse);
        self.rst.set_high();
        self.delay.delay_ms(pulse);
        self.state = PanelState::Uninitialized;

        #[cfg(feature = "defmt")]
        defmt::debug!("epd: reset");
    }

    /// Reset and configure the panel
    ///
    /// Does nothing once the panel is initialized. A panel in deep sleep is
    /// woken by the reset pulse. If the busy wait after power-on times out,
    /// the driver stays uninitialized.
    pub fn init(&mut self) -> Result<(), PanelError<SPI::Error>> {
        if matches!(self.state, PanelState::Idle | PanelState::Busy) {
            return Ok(());
        }

        self.reset();
        self.state = PanelState::Initializing;

        let result = self.power_up();
        self.state = if result.is_ok() {
            PanelState::Idle
        } else {
            PanelState::Uninitialized
        };

        #[cfg(feature = "defmt")]
        match result {
            Ok(()) => defmt::debug!("epd: init complete"),
            Err(_) => defmt::warn!("epd: init failed"),
        }

        result
    }

    fn power_up(&mut self) -> Result<(), PanelError<SPI::Error>> {
        self.send_command(command::POWER_SETTING, &[0x37, 0x00])?;
        self.send_command(command::PANEL_SETTING, &[0xCF, 0x08])?;
        self.send_command(command::BOOSTER_SOFT_START, &[0xC7, 0xCC, 0x28])?;
        self.send_command(command::POWER_ON, &[])?;
        self.wait_until_idle()?;

        for (cmd, data) in INIT_SEQUENCE {
            self.send_command(cmd, data)?;
        }
        Ok(())
    }

    /// Initialize if needed; refuse while asleep
    fn ensure_ready(&mut self) -> Result<(), PanelError<SPI::Error>> {
        match self.state {
            PanelState::Idle | PanelState::Busy => Ok(()),
            PanelState::Sleeping => Err(PanelError::Sleeping),
            PanelState::Uninitialized | PanelState::Initializing => self.init(),
        }
    }

    /// Send a command byte followed by optional parameter bytes
    pub fn send_command(&mut self, cmd: u8, data: &[u8]) -> Result<(), PanelError<SPI::Error>> {
        self.dc.set_low();
        self.transfer(&[cmd])?;
        if !data.is_empty() {
            self.send_data(data)?;
        }
        Ok(())
    }

    /// Send parameter or pixel bytes in a single CS frame
    pub fn send_data(&mut self, data: &[u8]) -> Result<(), PanelError<SPI::Error>> {
        self.dc.set_high();
        self.transfer(data)
    }

    fn transfer(&mut self, bytes: &[u8]) -> Result<(), PanelError<SPI::Error>> {
        self.cs.set_low();
        let result = self.spi.write(bytes).and_then(|()| self.spi.flush());
        self.cs.set_high();
        result.map_err(PanelError::Bus)
    }

    /// Stream `byte` for a whole plane in a single CS frame
    fn send_repeated(&mut self, byte: u8) -> Result<(), PanelError<SPI::Error>> {
        let chunk = [byte; CLEAR_CHUNK];
        self.dc.set_high();
        self.cs.set_low();
        let mut result = Ok(());
        for _ in 0..PLANE_BYTES / CLEAR_CHUNK {
            result = self.spi.write(&chunk);
            if result.is_err() {
                break;
            }
        }
        let result = result.and_then(|()| self.spi.flush());
        self.cs.set_high();
        result.map_err(PanelError::Bus)
    }

    /// Transmit a full plane, then optionally refresh
    pub fn write_plane(
        &mut self,
        plane: Plane,
        data: &[u8],
        refresh: bool,
    ) -> Result<(), PanelError<SPI::Error>> {
        if data.len() != PLANE_BYTES {
            return Err(PanelError::BufferSize {
                expected: PLANE_BYTES,
                actual: data.len(),
            });
        }
        self.ensure_ready()?;

        self.send_command(plane.command(), &[])?;
        self.send_data(data)?;
        self.delay.delay_ms(self.config.post_write_delay_ms);

        #[cfg(feature = "defmt")]
        defmt::trace!("epd: wrote {} plane", plane);

        if refresh {
            self.refresh()?;
        }
        Ok(())
    }

    /// Transmit the black plane
    pub fn write_black_plane(
        &mut self,
        data: &[u8],
        refresh: bool,
    ) -> Result<(), PanelError<SPI::Error>> {
        self.write_plane(Plane::Black, data, refresh)
    }

    /// Transmit the yellow plane
    pub fn write_yellow_plane(
        &mut self,
        data: &[u8],
        refresh: bool,
    ) -> Result<(), PanelError<SPI::Error>> {
        self.write_plane(Plane::Yellow, data, refresh)
    }

    /// Fill a plane with white without a frame buffer
    pub fn clear_plane(&mut self, plane: Plane) -> Result<(), PanelError<SPI::Error>> {
        self.ensure_ready()?;
        self.send_command(plane.command(), &[])?;
        self.send_repeated(0xFF)
    }

    /// Fill the black plane with white
    pub fn clear_black_plane(&mut self) -> Result<(), PanelError<SPI::Error>> {
        self.clear_plane(Plane::Black)
    }

    /// Fill the yellow plane with white
    pub fn clear_yellow_plane(&mut self) -> Result<(), PanelError<SPI::Error>> {
        self.clear_plane(Plane::Yellow)
    }

    /// Show the frame memories and block until the panel is done
    pub fn refresh(&mut self) -> Result<(), PanelError<SPI::Error>> {
        self.ensure_ready()?;
        self.send_command(command::DISPLAY_REFRESH, &[])?;

        #[cfg(feature = "defmt")]
        defmt::debug!("epd: refresh");

        self.state = PanelState::Busy;
        let result = self.wait_until_idle();
        self.state = PanelState::Idle;
        result
    }

    /// Write the supplied planes, clear the missing ones, refresh once
    pub fn display_frame(
        &mut self,
        black: Option<&[u8]>,
        yellow: Option<&[u8]>,
    ) -> Result<(), PanelError<SPI::Error>> {
        for (plane, data) in [(Plane::Black, black), (Plane::Yellow, yellow)] {
            match data {
                Some(data) => self.write_plane(plane, data, false)?,
                None => self.clear_plane(plane)?,
            }
        }
        self.refresh()
    }

    /// Power down into deep sleep
    ///
    /// Only a reset wakes the controller again.
    pub fn sleep(&mut self) -> Result<(), PanelError<SPI::Error>> {
        match self.state {
            PanelState::Sleeping => return Ok(()),
            PanelState::Uninitialized | PanelState::Initializing => {}
            PanelState::Idle | PanelState::Busy => {
                self.send_command(command::POWER_OFF, &[])?;
                self.wait_until_idle()?;
            }
        }
        self.send_command(command::DEEP_SLEEP, &[command::DEEP_SLEEP_CHECK])?;
        self.state = PanelState::Sleeping;

        #[cfg(feature = "defmt")]
        defmt::debug!("epd: sleeping");

        Ok(())
    }

    /// Poll the busy line with a doubling interval
    fn wait_until_idle(&mut self) -> Result<(), PanelError<SPI::Error>> {
        let mut interval = self.config.busy_initial_ms;
        let mut waited: u32 = 0;

        while self.busy.is_low() {
            if let Some(deadline) = self.config.busy_deadline_ms {
                if waited >= deadline {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("epd: busy for {} ms, giving up", waited);

                    return Err(PanelError::BusyTimeout);
                }
            }
            self.delay.delay_ms(interval);
            waited = waited.saturating_add(interval);
            interval = interval.saturating_mul(2).min(self.config.busy_max_ms);
        }
        Ok(())
    }
}

impl<SPI, CS, DC, RST, BUSY, D> inkdash_display::PanelBackend for Epd7in5b<SPI, CS, DC, RST, BUSY, D>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    D: Delay,
{
    type Error = PanelError<SPI::Error>;

    fn size(&self) -> (u16, u16) {
        (WIDTH, HEIGHT)
    }

    fn write_black_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Self::Error> {
        self.write_plane(Plane::Black, data, refresh)
    }

    fn write_yellow_plane(&mut self, data: &[u8], refresh: bool) -> Result<(), Self::Error> {
        self.write_plane(Plane::Yellow, data, refresh)
    }
}
