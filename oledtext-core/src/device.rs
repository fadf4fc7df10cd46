//! Device descriptors and controller command set
//!
//! A [`DeviceDescriptor`] is consumed once by `Display::init`: the init
//! command bytes are sent in order and the geometry is copied into the
//! session.

/// SSD1306 / SH1106 command bytes used by the engine
pub mod cmd {
    /// Set lower column start address (low nibble in bits 0-3)
    pub const SET_LOW_COLUMN: u8 = 0x00;
    /// Set higher column start address (high nibble in bits 0-3)
    pub const SET_HIGH_COLUMN: u8 = 0x10;
    /// Memory addressing mode (followed by mode byte)
    pub const MEMORY_MODE: u8 = 0x20;
    /// Display start line (line in bits 0-5)
    pub const SET_START_LINE: u8 = 0x40;
    /// Contrast control (followed by value)
    pub const SET_CONTRAST: u8 = 0x81;
    /// Charge pump setting (followed by enable byte)
    pub const CHARGE_PUMP: u8 = 0x8D;
    /// Segment remap; OR with 1 to map column 127 to SEG0
    pub const SEG_REMAP: u8 = 0xA0;
    /// Resume display from RAM content
    pub const DISPLAY_ALL_ON_RESUME: u8 = 0xA4;
    /// Normal (non-inverted) display
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    /// Inverted display
    pub const INVERT_DISPLAY: u8 = 0xA7;
    /// Multiplex ratio (followed by ratio - 1)
    pub const SET_MULTIPLEX: u8 = 0xA8;
    /// Display off (sleep)
    pub const DISPLAY_OFF: u8 = 0xAE;
    /// Display on
    pub const DISPLAY_ON: u8 = 0xAF;
    /// Page start address for page addressing mode (page in bits 0-2)
    pub const SET_START_PAGE: u8 = 0xB0;
    /// COM output scan direction, normal
    pub const COM_SCAN_INC: u8 = 0xC0;
    /// COM output scan direction, remapped
    pub const COM_SCAN_DEC: u8 = 0xC8;
    /// Display offset (followed by offset)
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    /// Clock divide ratio / oscillator frequency (followed by value)
    pub const SET_DISPLAY_CLOCK_DIV: u8 = 0xD5;
    /// Pre-charge period (followed by value)
    pub const SET_PRECHARGE: u8 = 0xD9;
    /// COM pins hardware configuration (followed by value)
    pub const SET_COM_PINS: u8 = 0xDA;
    /// VCOMH deselect level (followed by value)
    pub const SET_VCOM_DETECT: u8 = 0xDB;
}

/// Immutable description of one controller/panel combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Command bytes sent in order by `init`
    pub init_commands: &'static [u8],
    /// Panel width in pixels
    pub width: u8,
    /// Panel height in pixels
    pub height: u8,
    /// Controller column of the panel's first visible pixel
    pub col_offset: u8,
}

impl DeviceDescriptor {
    /// Number of 8-pixel pages on the panel
    pub const fn rows(&self) -> u8 {
        self.height / 8
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DeviceDescriptor {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Device[{=u8}x{=u8}, offset {=u8}, {=usize} init bytes]",
            self.width,
            self.height,
            self.col_offset,
            self.init_commands.len()
        );
    }
}
