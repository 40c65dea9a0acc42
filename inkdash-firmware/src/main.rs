//! Inkdash - E-Paper Dashboard Firmware
//!
//! Main firmware binary for RP2040 boards driving a 7.5" 800×480
//! black/yellow e-paper panel (Waveshare Pico-ePaper pinout).
//!
//! Each cycle wakes the panel, renders the two-column dashboard in a black
//! and a yellow pass, and puts the panel back into deep sleep. Content and
//! sensor readings are supplied by external collaborators; until they are
//! wired in, every column shows its placeholder.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Duration, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use inkdash_core::{Canvas, Color, IndexedFont};
use inkdash_display::{Composer, Dashboard, Panel, Readings};
use inkdash_drivers::panel::{Epd7in5b, HEIGHT, PLANE_BYTES, WIDTH};
use inkdash_hal::embedded::Hal;
use inkdash_hal::spi::SpiConfig;

mod settings;

/// Glyph cache capacity reserved in RAM
const FONT_CACHE_CAPACITY: usize = 64;

/// Time between two dashboard refreshes
const REFRESH_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Indexed 16×16 font image, copied from assets/ by the build script
static FONT: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/font.bin"));

// Frame buffer shared by both passes (must live forever)
static FRAME: StaticCell<[u8; PLANE_BYTES]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Inkdash firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = settings::load();

    // SPI1 on GP10 (SCK) / GP11 (MOSI); the panel never talks back
    let mut spi_config = spi::Config::default();
    spi_config.frequency = SpiConfig::default().frequency;
    let spi = Spi::new_blocking_txonly(p.SPI1, p.PIN_10, p.PIN_11, spi_config);

    let cs = Output::new(p.PIN_9, Level::High);
    let dc = Output::new(p.PIN_8, Level::Low);
    let rst = Output::new(p.PIN_12, Level::High);
    let busy = Input::new(p.PIN_13, Pull::Up);

    let mut epd = Epd7in5b::new(
        Hal::new(spi),
        Hal::new(cs),
        Hal::new(dc),
        Hal::new(rst),
        Hal::new(busy),
        Hal::new(Delay),
        config.panel,
    );
    info!("Panel driver ready: {}x{}", WIDTH, HEIGHT);

    let mut font = match IndexedFont::<_, FONT_CACHE_CAPACITY>::with_cache_size(
        FONT,
        config.font.cache_size as usize,
    ) {
        Ok(font) => {
            info!("Font loaded: {} glyphs", font.char_count());
            font
        }
        Err(e) => {
            error!("Font image rejected: {}", e);
            if let Err(e) = epd.sleep() {
                warn!("Panel sleep failed: {}", Debug2Format(&e));
            }
            loop {
                Timer::after(REFRESH_INTERVAL).await;
            }
        }
    };

    let frame = FRAME.init([Color::White.fill_byte(); PLANE_BYTES]);
    let mut canvas = match Canvas::new(&mut frame[..], WIDTH, HEIGHT) {
        Ok(canvas) => canvas,
        Err(e) => {
            // Unreachable with PLANE_BYTES sized from the same constants
            error!("Frame buffer rejected: {}", e);
            loop {
                Timer::after(REFRESH_INTERVAL).await;
            }
        }
    };

    let composer = Composer::from_config(&config);
    let mut cycle: u32 = 0;

    loop {
        cycle = cycle.wrapping_add(1);
        info!("Render pass {}", cycle);

        let dashboard = Dashboard {
            panels: [Panel::new("INFO 1", None), Panel::new("INFO 2", None)],
            readings: Readings::default(),
        };

        match epd.init() {
            Ok(()) => {
                if let Err(e) = composer.render(&dashboard, &mut canvas, &mut font, &mut epd) {
                    warn!("Render failed: {}", Debug2Format(&e));
                }
            }
            Err(e) => warn!("Panel init failed: {}", Debug2Format(&e)),
        }

        if let Err(e) = epd.sleep() {
            warn!("Panel sleep failed: {}", Debug2Format(&e));
        }
        info!("Panel asleep, next refresh in {} s", REFRESH_INTERVAL.as_secs());

        Timer::after(REFRESH_INTERVAL).await;
    }
}
