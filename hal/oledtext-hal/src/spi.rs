//! SPI transport
//!
//! 4-wire SPI: the D/C select pin is driven low for command bytes and high
//! for display RAM bytes. Chip select is owned by the `SpiDevice`.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;
use heapless::Vec;

use crate::transport::{Transport, TransportError, DATA_CHUNK};

/// SPI controller transport
pub struct SpiTransport<SPI, DC> {
    spi: SPI,
    dc: DC,
    pending: Vec<u8, DATA_CHUNK>,
    error: Option<TransportError>,
}

impl<SPI: SpiDevice, DC: OutputPin> SpiTransport<SPI, DC> {
    /// Create a transport from an SPI device and its D/C pin
    pub fn new(spi: SPI, dc: DC) -> Self {
        Self {
            spi,
            dc,
            pending: Vec::new(),
            error: None,
        }
    }

    /// Take the first error seen since the last call
    pub fn take_error(&mut self) -> Option<TransportError> {
        self.error.take()
    }

    /// Flush pending data and give the peripherals back
    pub fn release(mut self) -> (SPI, DC) {
        self.send_pending();
        (self.spi, self.dc)
    }

    fn latch(&mut self, error: TransportError) {
        if self.error.is_none() {
            #[cfg(feature = "defmt")]
            defmt::warn!("spi transport: {}", error);
            self.error = Some(error);
        }
    }

    fn select(&mut self, data: bool) {
        let result = if data {
            self.dc.set_high()
        } else {
            self.dc.set_low()
        };
        if result.is_err() {
            self.latch(TransportError::Pin);
        }
    }

    fn send(&mut self, data: bool, bytes: &[u8]) {
        self.select(data);
        if self.spi.write(bytes).is_err() {
            self.latch(TransportError::Bus);
        }
    }

    fn send_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.select(true);
        if self.spi.write(&self.pending).is_err() {
            self.latch(TransportError::Bus);
        }
        self.pending.clear();
    }
}

impl<SPI: SpiDevice, DC: OutputPin> Transport for SpiTransport<SPI, DC> {
    fn write_command(&mut self, cmd: u8) {
        self.send_pending();
        self.send(false, &[cmd]);
    }

    fn write_ram(&mut self, data: u8) {
        self.send_pending();
        self.send(true, &[data]);
    }

    fn write_ram_buf(&mut self, data: u8) {
        if self.pending.is_full() {
            self.send_pending();
        }
        let _ = self.pending.push(data);
    }

    fn flush(&mut self) {
        self.send_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use core::convert::Infallible;
    use embedded_hal::digital::ErrorType as PinErrorType;
    use embedded_hal::spi::{ErrorKind, ErrorType, Operation};

    struct FakeDc<'a>(&'a Cell<bool>);

    impl PinErrorType for FakeDc<'_> {
        type Error = Infallible;
    }

    impl OutputPin for FakeDc<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.0.set(false);
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.0.set(true);
            Ok(())
        }
    }

    /// Records each write together with the D/C level at the time
    struct FakeSpi<'a> {
        dc: &'a Cell<bool>,
        log: Vec<(bool, Vec<u8, 20>), 16>,
        fail: bool,
    }

    impl ErrorType for FakeSpi<'_> {
        type Error = ErrorKind;
    }

    impl SpiDevice for FakeSpi<'_> {
        fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations.iter() {
                if let Operation::Write(bytes) = op {
                    let mut v = Vec::new();
                    v.extend_from_slice(bytes).unwrap();
                    self.log.push((self.dc.get(), v)).unwrap();
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_dc_select_per_byte_kind() {
        let level = Cell::new(true);
        let spi = FakeSpi {
            dc: &level,
            log: Vec::new(),
            fail: false,
        };
        let mut t = SpiTransport::new(spi, FakeDc(&level));
        t.write_ram_buf(0x11);
        t.write_ram_buf(0x22);
        t.write_command(0xB0);
        t.write_ram(0x33);

        let (spi, _) = t.release();
        assert_eq!(spi.log.len(), 3);
        assert_eq!(spi.log[0].0, true);
        assert_eq!(&spi.log[0].1[..], &[0x11, 0x22]);
        assert_eq!(spi.log[1].0, false);
        assert_eq!(&spi.log[1].1[..], &[0xB0]);
        assert_eq!(spi.log[2].0, true);
        assert_eq!(&spi.log[2].1[..], &[0x33]);
    }

    #[test]
    fn test_bus_error_latched() {
        let level = Cell::new(false);
        let spi = FakeSpi {
            dc: &level,
            log: Vec::new(),
            fail: true,
        };
        let mut t = SpiTransport::new(spi, FakeDc(&level));
        t.write_command(0xAF);
        assert_eq!(t.take_error(), Some(TransportError::Bus));
    }
}
