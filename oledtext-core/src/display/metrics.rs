//! Glyph metrics for the active font at the current magnification
//!
//! Every query returns 0 when no font is selected.

use oledtext_hal::Transport;

use super::Display;
use crate::font::FontKind;

impl<'f, T: Transport> Display<'f, T> {
    /// Raw format marker of the active font
    pub fn font_size(&self) -> u16 {
        self.font.map_or(0, |f| f.format_marker())
    }

    /// Magnified fixed-pitch width
    pub fn font_width(&self) -> u8 {
        self.font
            .map_or(0, |f| self.mag_factor().saturating_mul(f.fixed_width()))
    }

    /// Magnified glyph height in pixels
    pub fn font_height(&self) -> u8 {
        self.font
            .map_or(0, |f| self.mag_factor().saturating_mul(f.height()))
    }

    /// Magnified glyph height in pages
    pub fn font_rows(&self) -> u8 {
        self.font
            .map_or(0, |f| self.mag_factor().saturating_mul(f.row_count()))
    }

    /// First character code of the active font
    pub fn font_first_char(&self) -> u8 {
        self.font.map_or(0, |f| f.first_char())
    }

    /// Number of characters in the active font
    pub fn font_char_count(&self) -> u8 {
        self.font.map_or(0, |f| f.char_count())
    }

    /// Magnified width of `c`, or 0 if the font does not cover it
    pub fn char_width(&self, c: u8) -> u8 {
        let Some(font) = self.font else {
            return 0;
        };
        let Some(index) = font.glyph_index(c) else {
            return 0;
        };
        let width = match self.font_kind {
            FontKind::Fixed => font.fixed_width(),
            FontKind::Proportional => font.glyph_width(FontKind::Proportional, index),
        };
        self.mag_factor().saturating_mul(width)
    }

    /// Pixels `c` advances the cursor, spacing included
    pub fn char_spacing(&self, c: u8) -> u8 {
        self.char_width(c).saturating_add(self.letter_spacing)
    }

    /// Width of a string with spacing after every character
    ///
    /// Returns 0 if any character is unrenderable.
    pub fn str_width(&self, s: impl AsRef<[u8]>) -> usize {
        let mut width = 0;
        for &c in s.as_ref() {
            let cw = self.char_width(c);
            if cw == 0 {
                return 0;
            }
            width += usize::from(cw) + usize::from(self.letter_spacing);
        }
        width
    }

    /// Width of `n` fixed-pitch cells
    pub fn field_width(&self, n: u8) -> usize {
        usize::from(n) * (usize::from(self.font_width()) + usize::from(self.letter_spacing))
    }
}

#[cfg(test)]
mod tests {
    use crate::display::tests::session;
    use crate::display::Magnification;
    use crate::font::system5x7::SYSTEM5X7;
    use crate::font::Font;

    /// Marker 1: fixed pitch without letter spacing, 3x12, '0'..='9'
    static TIGHT: [u8; 66] = {
        let mut t = [0u8; 66];
        t[1] = 1;
        t[2] = 3;
        t[3] = 12;
        t[4] = b'0';
        t[5] = 10;
        t
    };

    /// Proportional, widths 2 and 4 for 'x' and 'y'
    static PROP: [u8; 14] = [
        0x00, 0x0E, 4, 8, b'x', 2, // header
        2, 4, // widths
        1, 2, 3, 4, 5, 6,
    ];

    #[test]
    fn test_no_font_metrics_are_zero() {
        let d = session();
        assert_eq!(d.font_width(), 0);
        assert_eq!(d.font_height(), 0);
        assert_eq!(d.font_rows(), 0);
        assert_eq!(d.char_width(b'A'), 0);
        assert_eq!(d.str_width("A"), 0);
    }

    #[test]
    fn test_letter_spacing_from_marker() {
        let mut d = session();
        d.set_font(Some(Font::ram(&TIGHT)));
        assert_eq!(d.letter_spacing(), 0);
        assert_eq!(d.font_rows(), 2);
        d.set_font(Some(Font::program(&SYSTEM5X7)));
        assert_eq!(d.letter_spacing(), 1);
        d.set_font(Some(Font::ram(&PROP)));
        assert_eq!(d.letter_spacing(), 1);
    }

    #[test]
    fn test_char_width_fixed_and_magnified() {
        let mut d = session();
        d.set_font(Some(Font::program(&SYSTEM5X7)));
        assert_eq!(d.char_width(b'A'), 5);
        assert_eq!(d.char_width(0x19), 0);
        assert_eq!(d.char_width(0x80), 0);
        d.set_magnification(Magnification::X2);
        assert_eq!(d.char_width(b'A'), 10);
        assert_eq!(d.font_height(), 14);
        assert_eq!(d.char_spacing(b'A'), 11);
    }

    #[test]
    fn test_char_width_proportional() {
        let mut d = session();
        d.set_font(Some(Font::ram(&PROP)));
        assert_eq!(d.char_width(b'x'), 2);
        assert_eq!(d.char_width(b'y'), 4);
        assert_eq!(d.char_width(b'z'), 0);
        assert_eq!(d.str_width("xyx"), 2 + 1 + 4 + 1 + 2 + 1);
    }

    #[test]
    fn test_str_width_rejects_whole_string() {
        let mut d = session();
        d.set_font(Some(Font::program(&SYSTEM5X7)));
        assert_eq!(d.str_width("AB"), 12);
        assert_eq!(d.str_width("A\u{7}B"), 0);
        assert_eq!(d.str_width(""), 0);
    }

    #[test]
    fn test_field_width() {
        let mut d = session();
        d.set_font(Some(Font::program(&SYSTEM5X7)));
        assert_eq!(d.field_width(4), 24);
        d.set_font(Some(Font::ram(&TIGHT)));
        assert_eq!(d.field_width(4), 12);
    }
}
