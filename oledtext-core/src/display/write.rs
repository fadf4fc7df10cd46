//! Glyph rasterizer
//!
//! `write` is the only place glyph bitmaps turn into pixel bytes. A glyph is
//! streamed page row by page row: each row's columns go out left to right,
//! followed by the letter-spacing columns, then the cursor drops to the
//! next page at the glyph's starting column. Magnification writes each
//! column byte `mag` times and each page row `mag` times.
//!
//! The skip counter is reloaded at the start of every page row, so a glyph
//! scrolled partly past the left edge of a window loses the same leading
//! columns on every row.

use core::fmt;

use oledtext_hal::Transport;

use super::Display;
use crate::font::{Font, FontReader};

impl<'f, T: Transport> Display<'f, T> {
    /// Draw one character at the cursor
    ///
    /// Returns 1 when something was drawn or a control character was
    /// handled, 0 when no font is set or the font cannot render `ch`.
    /// On success the cursor ends on the starting page, just past the
    /// glyph and its spacing.
    ///
    /// `\r` moves to page 0. `\n` moves to page 0 and advances the column
    /// by the magnified glyph row count.
    pub fn write(&mut self, ch: u8) -> usize {
        let Some(font) = self.font else {
            return 0;
        };
        let rows = font.row_count();

        match ch {
            b'\r' => {
                self.set_row(0);
                return 1;
            }
            b'\n' => {
                self.set_row(0);
                let advance = self.mag_factor().saturating_mul(rows);
                self.set_col(self.col.saturating_add(advance));
                return 1;
            }
            _ => {}
        }

        match font.glyph_index(ch) {
            Some(index) => {
                let glyph = font.locate(self.font_kind, index);
                let shift = font.partial_row_shift(self.font_kind);
                self.rasterize(&font, Some(glyph.offset), glyph.width, rows, shift);
            }
            None if ch == b' ' && self.options.nonfont_space => {
                // Blank cell the size of a fixed-pitch glyph
                self.rasterize(&font, None, font.fixed_width(), rows, 0);
            }
            None => return 0,
        }
        1
    }

    fn rasterize(&mut self, font: &Font<'f>, base: Option<usize>, width: u8, rows: u8, shift: u8) {
        let mag = self.mag_factor();
        let spacing = self.letter_spacing;
        let scol = self.col;
        let srow = self.row;
        let skip = self.skip;
        let stride = usize::from(width);

        // Rows that fall off the bottom must not shorten the advance
        let mut end = scol;
        let mut page = srow;
        for r in 0..rows {
            let last_row = r + 1 == rows;
            for m in 0..mag {
                self.skip = skip;
                if r > 0 || m > 0 {
                    page = page.saturating_add(1);
                    self.place(scol, page);
                }
                for c in 0..width {
                    let mut b = match base {
                        Some(base) => {
                            font.read_byte(base + usize::from(c) + usize::from(r) * stride)
                        }
                        None => 0,
                    };
                    if last_row && shift > 0 {
                        b >>= shift;
                    }
                    for _ in 0..mag {
                        self.write_ram_buf(b);
                    }
                }
                for _ in 0..spacing {
                    self.write_ram_buf(0);
                }
                end = end.max(self.col);
            }
        }

        self.place(end, srow);
    }

    /// Draw bytes until one fails; returns how many were drawn
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        let mut n = 0;
        for &b in bytes {
            if self.write(b) == 0 {
                break;
            }
            n += 1;
        }
        n
    }
}

impl<T: Transport> fmt::Write for Display<'_, T> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if self.write_bytes(s.as_bytes()) == s.len() {
            Ok(())
        } else {
            Err(fmt::Error)
        }
    }
}
