//! Controller init tables and display configuration for oledtext
//!
//! This crate provides:
//! - `DeviceDescriptor` constants for common SSD1306 and SH1106 modules
//! - `DeviceKind` for selecting a module by name at runtime
//! - A small configuration file parser (`config`) for text displays
//!
//! All init tables leave the controller in page addressing mode, which is the
//! only mode the glyph engine drives.

#![no_std]
#![deny(unsafe_code)]

pub mod config;

use oledtext_core::device::cmd::*;
use oledtext_core::DeviceDescriptor;

pub use config::{parse_display_config, ConfigError, DisplayConfig, DisplaySettings, TickerSettings};

/// Adafruit-style SSD1306 128x64
#[rustfmt::skip]
pub const ADAFRUIT_128X64: DeviceDescriptor = DeviceDescriptor {
    init_commands: &[
        DISPLAY_OFF,
        SET_DISPLAY_CLOCK_DIV, 0x80,
        SET_MULTIPLEX, 0x3F,
        SET_DISPLAY_OFFSET, 0x00,
        SET_START_LINE,
        CHARGE_PUMP, 0x14,
        MEMORY_MODE, 0x02,
        SEG_REMAP | 0x1,
        COM_SCAN_DEC,
        SET_COM_PINS, 0x12,
        SET_CONTRAST, 0xCF,
        SET_PRECHARGE, 0xF1,
        SET_VCOM_DETECT, 0x40,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ],
    width: 128,
    height: 64,
    col_offset: 0,
};

/// Adafruit-style SSD1306 128x32
#[rustfmt::skip]
pub const ADAFRUIT_128X32: DeviceDescriptor = DeviceDescriptor {
    init_commands: &[
        DISPLAY_OFF,
        SET_DISPLAY_CLOCK_DIV, 0x80,
        SET_MULTIPLEX, 0x1F,
        SET_DISPLAY_OFFSET, 0x00,
        SET_START_LINE,
        CHARGE_PUMP, 0x14,
        MEMORY_MODE, 0x02,
        SEG_REMAP | 0x1,
        COM_SCAN_DEC,
        SET_COM_PINS, 0x02,
        SET_CONTRAST, 0x8F,
        SET_PRECHARGE, 0xF1,
        SET_VCOM_DETECT, 0x40,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ],
    width: 128,
    height: 32,
    col_offset: 0,
};

/// Adafruit-style SSD1306 96x16
#[rustfmt::skip]
pub const ADAFRUIT_96X16: DeviceDescriptor = DeviceDescriptor {
    init_commands: &[
        DISPLAY_OFF,
        SET_DISPLAY_CLOCK_DIV, 0x80,
        SET_MULTIPLEX, 0x0F,
        SET_DISPLAY_OFFSET, 0x00,
        SET_START_LINE,
        CHARGE_PUMP, 0x14,
        MEMORY_MODE, 0x02,
        SEG_REMAP | 0x1,
        COM_SCAN_DEC,
        SET_COM_PINS, 0x02,
        SET_CONTRAST, 0xAF,
        SET_PRECHARGE, 0xF1,
        SET_VCOM_DETECT, 0x40,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ],
    width: 96,
    height: 16,
    col_offset: 0,
};

/// SparkFun Micro OLED 64x48 (SSD1306, RAM columns 32-95)
#[rustfmt::skip]
pub const MICRO_OLED_64X48: DeviceDescriptor = DeviceDescriptor {
    init_commands: &[
        DISPLAY_OFF,
        SET_DISPLAY_CLOCK_DIV, 0x80,
        SET_MULTIPLEX, 0x2F,
        SET_DISPLAY_OFFSET, 0x00,
        SET_START_LINE,
        CHARGE_PUMP, 0x14,
        SEG_REMAP | 0x1,
        COM_SCAN_DEC,
        SET_COM_PINS, 0x12,
        SET_CONTRAST, 0x8F,
        SET_PRECHARGE, 0xF1,
        SET_VCOM_DETECT, 0x40,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ],
    width: 64,
    height: 48,
    col_offset: 32,
};

/// Generic SSD1306 64x32 (RAM columns 32-95)
#[rustfmt::skip]
pub const SSD1306_64X32: DeviceDescriptor = DeviceDescriptor {
    init_commands: &[
        DISPLAY_OFF,
        SET_DISPLAY_CLOCK_DIV, 0x80,
        SET_MULTIPLEX, 0x1F,
        SET_DISPLAY_OFFSET, 0x00,
        SET_START_LINE,
        CHARGE_PUMP, 0x14,
        SEG_REMAP | 0x1,
        COM_SCAN_DEC,
        SET_COM_PINS, 0x12,
        SET_CONTRAST, 0xCF,
        SET_PRECHARGE, 0xF1,
        SET_VCOM_DETECT, 0x40,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ],
    width: 64,
    height: 32,
    col_offset: 32,
};

/// SH1106 128x64 (132-column RAM, visible area starts at column 2)
#[rustfmt::skip]
pub const SH1106_128X64: DeviceDescriptor = DeviceDescriptor {
    init_commands: &[
        DISPLAY_OFF,
        SET_DISPLAY_CLOCK_DIV, 0x80,
        SET_MULTIPLEX, 0x3F,
        SET_DISPLAY_OFFSET, 0x00,
        SET_START_LINE,
        CHARGE_PUMP, 0x14,
        MEMORY_MODE, 0x02,
        SEG_REMAP | 0x1,
        COM_SCAN_DEC,
        SET_COM_PINS, 0x12,
        SET_CONTRAST, 0xCF,
        SET_PRECHARGE, 0xF1,
        SET_VCOM_DETECT, 0x40,
        DISPLAY_ALL_ON_RESUME,
        NORMAL_DISPLAY,
        DISPLAY_ON,
    ],
    width: 128,
    height: 64,
    col_offset: 2,
};

/// Supported display modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeviceKind {
    #[default]
    Ssd1306_128x64,
    Ssd1306_128x32,
    Ssd1306_96x16,
    Ssd1306_64x48,
    Ssd1306_64x32,
    Sh1106_128x64,
}

impl DeviceKind {
    /// Every supported module, in declaration order
    pub const ALL: [DeviceKind; 6] = [
        DeviceKind::Ssd1306_128x64,
        DeviceKind::Ssd1306_128x32,
        DeviceKind::Ssd1306_96x16,
        DeviceKind::Ssd1306_64x48,
        DeviceKind::Ssd1306_64x32,
        DeviceKind::Sh1106_128x64,
    ];

    /// Init table and geometry for this module
    pub const fn descriptor(self) -> &'static DeviceDescriptor {
        match self {
            DeviceKind::Ssd1306_128x64 => &ADAFRUIT_128X64,
            DeviceKind::Ssd1306_128x32 => &ADAFRUIT_128X32,
            DeviceKind::Ssd1306_96x16 => &ADAFRUIT_96X16,
            DeviceKind::Ssd1306_64x48 => &MICRO_OLED_64X48,
            DeviceKind::Ssd1306_64x32 => &SSD1306_64X32,
            DeviceKind::Sh1106_128x64 => &SH1106_128X64,
        }
    }

    /// Config-file name, e.g. `"ssd1306_128x64"`
    pub const fn name(self) -> &'static str {
        match self {
            DeviceKind::Ssd1306_128x64 => "ssd1306_128x64",
            DeviceKind::Ssd1306_128x32 => "ssd1306_128x32",
            DeviceKind::Ssd1306_96x16 => "ssd1306_96x16",
            DeviceKind::Ssd1306_64x48 => "ssd1306_64x48",
            DeviceKind::Ssd1306_64x32 => "ssd1306_64x32",
            DeviceKind::Sh1106_128x64 => "sh1106_128x64",
        }
    }

    /// Look a module up by its config-file name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in DeviceKind::ALL {
            assert_eq!(DeviceKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(
            DeviceKind::from_name("SH1106_128X64"),
            Some(DeviceKind::Sh1106_128x64)
        );
        assert_eq!(DeviceKind::from_name("ssd1309"), None);
    }

    #[test]
    fn test_descriptor_geometry() {
        let sh = DeviceKind::Sh1106_128x64.descriptor();
        assert_eq!((sh.width, sh.height, sh.col_offset), (128, 64, 2));
        let micro = DeviceKind::Ssd1306_64x48.descriptor();
        assert_eq!(micro.rows(), 6);
        assert_eq!(micro.col_offset, 32);
    }

    #[test]
    fn test_multiplex_matches_height() {
        for kind in DeviceKind::ALL {
            let dev = kind.descriptor();
            let init = dev.init_commands;
            let at = init.iter().position(|&c| c == SET_MULTIPLEX).unwrap();
            assert_eq!(init[at + 1], dev.height - 1, "{:?}", kind);
            assert_eq!(init.first(), Some(&DISPLAY_OFF));
            assert_eq!(init.last(), Some(&DISPLAY_ON));
        }
    }

    #[test]
    fn test_tables_drive_a_session() {
        use oledtext_core::Display;
        use oledtext_hal::mock::MockController;

        let mut d = Display::new(MockController::new());
        d.init(&SH1106_128X64);
        d.set_cursor(0, 0);
        // column 0 lands on controller column 2
        assert_eq!(d.transport().address(), (0, 2));
    }
}
