//! Text and number output on top of `write`

use oledtext_hal::Transport;

use super::Display;

const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

impl<'f, T: Transport> Display<'f, T> {
    /// Draw a string; stops at the first character the font cannot render
    pub fn print(&mut self, s: &str) -> usize {
        self.write_bytes(s.as_bytes())
    }

    /// Draw `\r\n`
    pub fn println(&mut self) -> usize {
        self.write_bytes(b"\r\n")
    }

    /// Draw `n` in `base`
    ///
    /// Base 0 writes `n` as a single raw character code. Other bases below
    /// 2 fall back to decimal, bases above 36 are clamped to 36.
    pub fn print_u32(&mut self, n: u32, base: u8) -> usize {
        if base == 0 {
            return self.write(n as u8);
        }
        self.print_number(n, base)
    }

    /// Draw a signed value; only base 10 gets a minus sign
    pub fn print_i32(&mut self, n: i32, base: u8) -> usize {
        if base == 0 {
            return self.write(n as u8);
        }
        if base == 10 && n < 0 {
            let sign = self.write(b'-');
            return sign + self.print_number(n.unsigned_abs(), base);
        }
        self.print_number(n as u32, base)
    }

    fn print_number(&mut self, mut n: u32, base: u8) -> usize {
        let base = match base {
            0 | 1 => 10,
            b => b.min(36),
        };
        let base = u32::from(base);

        let mut buf = [0u8; 32];
        let mut i = buf.len();
        loop {
            i -= 1;
            buf[i] = DIGITS[(n % base) as usize];
            n /= base;
            if n == 0 {
                break;
            }
        }
        self.write_bytes(&buf[i..])
    }
}
