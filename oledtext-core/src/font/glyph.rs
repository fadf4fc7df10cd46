//! Header decoding and glyph location

use super::layout::{FONT_CHAR_COUNT, FONT_FIRST_CHAR, FONT_HEIGHT, FONT_LENGTH, FONT_WIDTH, FONT_WIDTH_TABLE};
use super::{Font, FontReader};

/// Layout variant, decided by the format marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontKind {
    /// Every glyph shares the header width
    #[default]
    Fixed,
    /// Per-glyph widths stored ahead of the glyph data
    Proportional,
}

impl FontKind {
    /// Only the `< 2` / `>= 2` boundary of the marker is meaningful
    pub fn from_marker(marker: u16) -> Self {
        if marker < 2 {
            FontKind::Fixed
        } else {
            FontKind::Proportional
        }
    }
}

/// Location of one glyph's bitmap inside a font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Glyph {
    /// Unmagnified width in pixels
    pub width: u8,
    /// Byte offset of the first column of the first page row
    pub offset: usize,
}

impl Font<'_> {
    /// Raw 16-bit format marker
    pub fn format_marker(&self) -> u16 {
        u16::from_be_bytes([self.read_byte(FONT_LENGTH), self.read_byte(FONT_LENGTH + 1)])
    }

    /// Layout variant
    pub fn kind(&self) -> FontKind {
        FontKind::from_marker(self.format_marker())
    }

    /// Spacing a freshly selected font gets: none for marker 1, else one pixel
    pub fn default_letter_spacing(&self) -> u8 {
        if self.format_marker() == 1 {
            0
        } else {
            1
        }
    }

    /// Header width byte
    pub fn fixed_width(&self) -> u8 {
        self.read_byte(FONT_WIDTH)
    }

    /// Glyph height in pixels
    pub fn height(&self) -> u8 {
        self.read_byte(FONT_HEIGHT)
    }

    /// Number of 8-pixel page rows per glyph
    pub fn row_count(&self) -> u8 {
        self.height().div_ceil(8)
    }

    /// First character code covered
    pub fn first_char(&self) -> u8 {
        self.read_byte(FONT_FIRST_CHAR)
    }

    /// Number of characters covered
    pub fn char_count(&self) -> u8 {
        self.read_byte(FONT_CHAR_COUNT)
    }

    /// Map a character code to its glyph index, if the font covers it
    pub fn glyph_index(&self, c: u8) -> Option<u8> {
        let count = self.char_count();
        c.checked_sub(self.first_char()).filter(|&index| index < count)
    }

    /// Unmagnified width of the glyph at `index`
    pub fn glyph_width(&self, kind: FontKind, index: u8) -> u8 {
        match kind {
            FontKind::Fixed => self.fixed_width(),
            FontKind::Proportional => self.read_byte(FONT_WIDTH_TABLE + usize::from(index)),
        }
    }

    /// Locate the glyph at `index`
    ///
    /// Proportional glyphs are packed back to back, so the offset is the
    /// row-scaled prefix sum of all preceding widths, past the width table.
    pub fn locate(&self, kind: FontKind, index: u8) -> Glyph {
        let rows = usize::from(self.row_count());
        match kind {
            FontKind::Fixed => {
                let width = self.fixed_width();
                Glyph {
                    width,
                    offset: FONT_WIDTH_TABLE + rows * usize::from(width) * usize::from(index),
                }
            }
            FontKind::Proportional => {
                let preceding: usize = (0..usize::from(index))
                    .map(|i| usize::from(self.read_byte(FONT_WIDTH_TABLE + i)))
                    .sum();
                Glyph {
                    width: self.glyph_width(kind, index),
                    offset: FONT_WIDTH_TABLE + usize::from(self.char_count()) + rows * preceding,
                }
            }
        }
    }

    /// Right shift applied to the last page row so unused low bits read as 0
    ///
    /// Only proportional fonts pack partial rows this way.
    pub fn partial_row_shift(&self, kind: FontKind) -> u8 {
        let rem = self.height() & 7;
        if kind == FontKind::Proportional && rem != 0 {
            8 - rem
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::system5x7::SYSTEM5X7;

    /// Proportional, 10 px high (2 rows), chars 'a'..='c' with widths 1, 3, 2
    static PROP: [u8; 21] = [
        0x00, 0x15, 0x03, 10, b'a', 3, // header
        1, 3, 2, // widths
        0xA1, 0xA2, // 'a'
        0xB1, 0xB2, 0xB3, 0xB4, 0xB5, 0xB6, // 'b'
        0xC1, 0xC2, 0xC3, 0xC4, // 'c'
    ];

    #[test]
    fn test_fixed_header() {
        let font = Font::program(&SYSTEM5X7);
        assert_eq!(font.kind(), FontKind::Fixed);
        assert_eq!(font.fixed_width(), 5);
        assert_eq!(font.height(), 7);
        assert_eq!(font.row_count(), 1);
        assert_eq!(font.glyph_index(b' '), Some(0));
        assert_eq!(font.glyph_index(b'A'), Some(33));
        assert_eq!(font.glyph_index(0x1F), None);
    }

    #[test]
    fn test_fixed_locate() {
        let font = Font::program(&SYSTEM5X7);
        let g = font.locate(FontKind::Fixed, 33);
        assert_eq!(g.width, 5);
        assert_eq!(g.offset, 6 + 5 * 33);
        // 'A' starts with 0x7E
        assert_eq!(font.read_byte(g.offset), 0x7E);
    }

    #[test]
    fn test_proportional_prefix_sum() {
        let font = Font::ram(&PROP);
        assert_eq!(font.kind(), FontKind::Proportional);
        assert_eq!(font.row_count(), 2);

        let a = font.locate(FontKind::Proportional, 0);
        let b = font.locate(FontKind::Proportional, 1);
        let c = font.locate(FontKind::Proportional, 2);
        assert_eq!((a.width, a.offset), (1, 9));
        assert_eq!((b.width, b.offset), (3, 11));
        assert_eq!((c.width, c.offset), (2, 17));
        assert_eq!(font.read_byte(b.offset), 0xB1);
        assert_eq!(font.read_byte(c.offset), 0xC1);
    }

    #[test]
    fn test_partial_row_shift() {
        let font = Font::ram(&PROP);
        assert_eq!(font.partial_row_shift(FontKind::Proportional), 6);
        let fixed = Font::program(&SYSTEM5X7);
        assert_eq!(fixed.partial_row_shift(FontKind::Fixed), 0);
    }

    #[test]
    fn test_marker_boundary() {
        assert_eq!(FontKind::from_marker(0), FontKind::Fixed);
        assert_eq!(FontKind::from_marker(1), FontKind::Fixed);
        assert_eq!(FontKind::from_marker(2), FontKind::Proportional);
        assert_eq!(FontKind::from_marker(0x0F3C), FontKind::Proportional);
    }
}
