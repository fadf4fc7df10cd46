//! Controller byte sink
//!
//! The text engine never talks to a bus directly. Every command byte and
//! every pixel byte goes through a [`Transport`], which is assumed to
//! complete synchronously and never fail from the engine's point of view.

/// Maximum data bytes coalesced into one bus transaction
pub const DATA_CHUNK: usize = 16;

/// I2C control byte announcing a single command byte
pub const CONTROL_COMMAND: u8 = 0x00;

/// I2C control byte announcing a run of display RAM bytes
pub const CONTROL_DATA: u8 = 0x40;

/// Errors latched by bus adapters
///
/// These never reach the glyph engine; adapters keep the first one so the
/// application can inspect it with `take_error()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Bus transaction failed
    Bus,
    /// Data/command select pin could not be driven
    Pin,
}

/// Command and pixel-data sink for a page-addressed display controller
pub trait Transport {
    /// Send one controller command byte
    ///
    /// Any buffered pixel data must reach the controller first so that
    /// commands and data stay ordered.
    fn write_command(&mut self, cmd: u8);

    /// Send one display RAM byte immediately
    fn write_ram(&mut self, data: u8);

    /// Send one display RAM byte, allowing the sink to coalesce it with
    /// following bytes
    fn write_ram_buf(&mut self, data: u8) {
        self.write_ram(data);
    }

    /// Push out any coalesced RAM bytes
    fn flush(&mut self) {}
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write_command(&mut self, cmd: u8) {
        (**self).write_command(cmd);
    }

    fn write_ram(&mut self, data: u8) {
        (**self).write_ram(data);
    }

    fn write_ram_buf(&mut self, data: u8) {
        (**self).write_ram_buf(data);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}
