//! I2C transport
//!
//! Carries controller traffic over an `embedded-hal` 1.0 I2C bus using the
//! SSD1306/SH1106 control-byte framing: `0x00` before a command byte, `0x40`
//! before a run of display RAM bytes.

use embedded_hal::i2c::I2c;
use heapless::Vec;

use crate::transport::{Transport, TransportError, CONTROL_COMMAND, CONTROL_DATA, DATA_CHUNK};

/// Default 7-bit address (SA0 low). Modules strapped high answer on 0x3D.
pub const DEFAULT_ADDRESS: u8 = 0x3C;

/// Control byte plus a full data chunk
const FRAME_LEN: usize = DATA_CHUNK + 1;

/// I2C controller transport
///
/// Buffered RAM bytes are coalesced into transactions of up to
/// [`DATA_CHUNK`] bytes. Bus errors are latched rather than propagated.
pub struct I2cTransport<I2C> {
    i2c: I2C,
    address: u8,
    /// Data control byte followed by pending RAM bytes
    frame: Vec<u8, FRAME_LEN>,
    error: Option<TransportError>,
}

impl<I2C: I2c> I2cTransport<I2C> {
    /// Create a transport for the device at `address`
    pub fn new(i2c: I2C, address: u8) -> Self {
        let mut frame = Vec::new();
        let _ = frame.push(CONTROL_DATA);
        Self {
            i2c,
            address,
            frame,
            error: None,
        }
    }

    /// Device address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Take the first bus error seen since the last call
    pub fn take_error(&mut self) -> Option<TransportError> {
        self.error.take()
    }

    /// Flush pending data and give the bus back
    pub fn release(mut self) -> I2C {
        self.send_frame();
        self.i2c
    }

    fn latch(&mut self, result: Result<(), I2C::Error>) {
        if result.is_err() && self.error.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("i2c transport: bus error at address {=u8:#x}", self.address);
            self.error = Some(TransportError::Bus);
        }
    }

    fn send_frame(&mut self) {
        if self.frame.len() > 1 {
            let result = self.i2c.write(self.address, &self.frame);
            self.latch(result);
            self.frame.truncate(1);
        }
    }
}

impl<I2C: I2c> Transport for I2cTransport<I2C> {
    fn write_command(&mut self, cmd: u8) {
        self.send_frame();
        let result = self.i2c.write(self.address, &[CONTROL_COMMAND, cmd]);
        self.latch(result);
    }

    fn write_ram(&mut self, data: u8) {
        self.send_frame();
        let result = self.i2c.write(self.address, &[CONTROL_DATA, data]);
        self.latch(result);
    }

    fn write_ram_buf(&mut self, data: u8) {
        if self.frame.is_full() {
            self.send_frame();
        }
        let _ = self.frame.push(data);
    }

    fn flush(&mut self) {
        self.send_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::i2c::{ErrorKind, ErrorType, Operation};

    /// Records every write transaction
    struct FakeBus {
        writes: Vec<Vec<u8, 20>, 32>,
        fail: bool,
    }

    impl FakeBus {
        fn new() -> Self {
            Self {
                writes: Vec::new(),
                fail: false,
            }
        }
    }

    impl ErrorType for FakeBus {
        type Error = ErrorKind;
    }

    impl I2c for FakeBus {
        fn transaction(
            &mut self,
            _address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    let mut v = Vec::new();
                    v.extend_from_slice(bytes).unwrap();
                    self.writes.push(v).unwrap();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_command_framing() {
        let mut t = I2cTransport::new(FakeBus::new(), DEFAULT_ADDRESS);
        t.write_command(0xAF);
        let bus = t.release();
        assert_eq!(bus.writes.len(), 1);
        assert_eq!(&bus.writes[0][..], &[0x00, 0xAF]);
    }

    #[test]
    fn test_buffered_data_coalesced() {
        let mut t = I2cTransport::new(FakeBus::new(), DEFAULT_ADDRESS);
        for b in 0..3u8 {
            t.write_ram_buf(b);
        }
        // Command forces the pending run out first
        t.write_command(0xB1);
        let bus = t.release();
        assert_eq!(bus.writes.len(), 2);
        assert_eq!(&bus.writes[0][..], &[0x40, 0, 1, 2]);
        assert_eq!(&bus.writes[1][..], &[0x00, 0xB1]);
    }

    #[test]
    fn test_full_chunk_splits() {
        let mut t = I2cTransport::new(FakeBus::new(), DEFAULT_ADDRESS);
        for b in 0..(DATA_CHUNK as u8 + 2) {
            t.write_ram_buf(b);
        }
        t.flush();
        let bus = t.release();
        assert_eq!(bus.writes.len(), 2);
        assert_eq!(bus.writes[0].len(), FRAME_LEN);
        assert_eq!(&bus.writes[1][..], &[0x40, 16, 17]);
    }

    #[test]
    fn test_error_latched_once() {
        let mut bus = FakeBus::new();
        bus.fail = true;
        let mut t = I2cTransport::new(bus, DEFAULT_ADDRESS);
        t.write_command(0xAE);
        t.write_ram(0xFF);
        assert_eq!(t.take_error(), Some(TransportError::Bus));
        assert_eq!(t.take_error(), None);
    }
}
