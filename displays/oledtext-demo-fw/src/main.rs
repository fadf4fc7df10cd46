//! oledtext demo firmware
//!
//! Drives an SSD1306/SH1106 panel on I2C0 (SDA GPIO4, SCL GPIO5) of an
//! RP2040. A banner is printed on the top row, then a scrolling ticker runs
//! on the row chosen in `display.toml`, restarting whenever the message has
//! scrolled off.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::i2c::{self, Blocking, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::{Duration, Ticker};
use {defmt_rtt as _, panic_probe as _};

use oledtext_core::font::system5x7::SYSTEM5X7;
use oledtext_core::{Display, Font, Magnification, SessionOptions, TickerState};
use oledtext_devices::{parse_display_config, DisplayConfig, DisplaySettings};
use oledtext_hal::I2cTransport;

/// Embedded configuration (compiled into firmware)
/// Edit display.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../display.toml");

/// Row the pass counter is drawn on
const COUNTER_ROW: u8 = 2;

type Panel<'f> = Display<'f, I2cTransport<I2c<'static, I2C0, Blocking>>>;

#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("oledtext demo starting...");

    let p = embassy_rp::init(Default::default());

    let config = match parse_display_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("display.toml rejected ({}), using defaults", e);
            DisplayConfig::default()
        }
    };
    let settings = &config.display;
    let dev = settings.device.descriptor();
    info!(
        "Panel: {} at {:#x}",
        settings.device.name(),
        settings.i2c_address
    );

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let bus = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, i2c_config);

    let options = SessionOptions {
        nonfont_space: settings.nonfont_space,
    };
    let mut display: Panel<'static> =
        Display::with_options(I2cTransport::new(bus, settings.i2c_address), options);
    display.init(dev);
    apply_settings(&mut display, settings);

    let font = Font::program(&SYSTEM5X7);
    display.set_font(Some(font));
    display.set_cursor(0, 0);
    display.print("oledtext ");
    display.print_u32(u32::from(dev.width), 10);
    display.print("x");
    display.print_u32(u32::from(dev.height), 10);
    check_bus(&mut display);

    let ticker_cfg = &config.ticker;
    let mag = if ticker_cfg.mag2x {
        Magnification::X2
    } else {
        Magnification::X1
    };
    let mut state: TickerState = TickerState::new();
    display.ticker_init(
        &mut state,
        Some(font),
        ticker_cfg.row,
        mag,
        ticker_cfg.begin_col,
        ticker_cfg.end_col,
    );

    let mut passes: u32 = 0;
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(ticker_cfg.period_ms.max(1))));
    loop {
        if state.is_idle() {
            if passes > 0 && ticker_cfg.row != COUNTER_ROW {
                draw_passes(&mut display, passes);
            }
            passes = passes.wrapping_add(1);
            if !state.text(Some(ticker_cfg.text.as_str())) {
                warn!("ticker queue rejected the message");
            }
        }

        if display.ticker_tick(&mut state) < 0 {
            error!("ticker has no font");
            return;
        }
        check_bus(&mut display);

        ticker.next().await;
    }
}

/// Apply the optional panel overrides from the config file
fn apply_settings(display: &mut Panel<'_>, settings: &DisplaySettings) {
    if let Some(contrast) = settings.contrast {
        display.set_contrast(contrast);
    }
    if let Some(remap) = settings.remap {
        display.display_remap(remap);
    }
    display.invert_display(settings.invert);
}

/// Show how many times the message has scrolled through
fn draw_passes(display: &mut Panel<'_>, passes: u32) {
    display.set_magnification(Magnification::X1);
    display.clear_field(0, COUNTER_ROW, 12);
    display.set_cursor(0, COUNTER_ROW);
    display.print("passes ");
    display.print_u32(passes, 10);
}

/// Flush buffered pixels and report a latched bus error
fn check_bus(display: &mut Panel<'_>) {
    display.flush();
    if let Some(e) = display.transport_mut().take_error() {
        warn!("I2C write failed: {}", e);
    }
}
