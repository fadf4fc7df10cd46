//! Display session
//!
//! One [`Display`] owns the mutable state of one physical panel: the active
//! font, magnification, invert mask, cursor and the pending skip counter.
//! Nothing here is global; every panel gets its own session.
//!
//! The cursor column is measured in pixels, the cursor row in 8-pixel
//! controller pages.

mod metrics;
mod print;
mod write;

use oledtext_hal::Transport;

use crate::device::{cmd, DeviceDescriptor};
use crate::font::{Font, FontKind};

/// Integer pixel scale applied by row and column duplication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magnification {
    /// Native size
    #[default]
    X1,
    /// Double width and height
    X2,
}

impl Magnification {
    /// Scale factor as an integer
    pub const fn factor(self) -> u8 {
        match self {
            Magnification::X1 => 1,
            Magnification::X2 => 2,
        }
    }
}

/// Behaviour switches fixed when the session is created
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SessionOptions {
    /// Draw a blank glyph for `' '` when the font does not cover it
    pub nonfont_space: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            nonfont_space: true,
        }
    }
}

/// Text session for one page-addressed display
pub struct Display<'f, T> {
    transport: T,
    options: SessionOptions,
    font: Option<Font<'f>>,
    /// Decoded once per `set_font`
    font_kind: FontKind,
    mag: Magnification,
    invert_mask: u8,
    col: u8,
    row: u8,
    letter_spacing: u8,
    /// Pixel-byte writes still to be discarded
    skip: u8,
    display_width: u8,
    display_height: u8,
    col_offset: u8,
    #[cfg(feature = "scrolling")]
    page_offset: u8,
    #[cfg(feature = "scrolling")]
    start_line: u8,
}

impl<'f, T: Transport> Display<'f, T> {
    /// Create a session with default options
    ///
    /// The geometry is zero until [`Display::init`] runs.
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, SessionOptions::default())
    }

    /// Create a session with explicit options
    pub fn with_options(transport: T, options: SessionOptions) -> Self {
        Self {
            transport,
            options,
            font: None,
            font_kind: FontKind::Fixed,
            mag: Magnification::X1,
            invert_mask: 0,
            col: 0,
            row: 0,
            letter_spacing: 1,
            skip: 0,
            display_width: 0,
            display_height: 0,
            col_offset: 0,
            #[cfg(feature = "scrolling")]
            page_offset: 0,
            #[cfg(feature = "scrolling")]
            start_line: 0,
        }
    }

    /// Send the device's init sequence, adopt its geometry and clear RAM
    pub fn init(&mut self, dev: &DeviceDescriptor) {
        #[cfg(feature = "defmt")]
        defmt::debug!("display init: {}", dev);

        self.col = 0;
        self.row = 0;
        self.display_width = dev.width;
        self.display_height = dev.height;
        self.col_offset = dev.col_offset;
        for &c in dev.init_commands {
            self.write_command(c);
        }
        self.clear();
    }

    /// Options this session was created with
    pub fn options(&self) -> SessionOptions {
        self.options
    }

    /// Borrow the transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutably borrow the transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Flush and give the transport back
    pub fn release(mut self) -> T {
        self.transport.flush();
        self.transport
    }

    // ---- font and rendering mode ----

    /// Select the active font, or `None` to disable drawing
    ///
    /// Letter spacing is recomputed from the format marker.
    pub fn set_font(&mut self, font: Option<Font<'f>>) {
        self.font = font;
        match font {
            Some(f) => {
                self.font_kind = f.kind();
                self.letter_spacing = f.default_letter_spacing();
            }
            None => {
                self.font_kind = FontKind::Fixed;
                self.letter_spacing = 1;
            }
        }
    }

    /// Active font
    pub fn font(&self) -> Option<Font<'f>> {
        self.font
    }

    /// Layout variant of the active font
    pub fn font_kind(&self) -> FontKind {
        self.font_kind
    }

    /// Select 1x or 2x rendering
    pub fn set_magnification(&mut self, mag: Magnification) {
        self.mag = mag;
    }

    /// Current magnification
    pub fn magnification(&self) -> Magnification {
        self.mag
    }

    /// Current magnification as an integer factor
    pub fn mag_factor(&self) -> u8 {
        self.mag.factor()
    }

    /// Invert every pixel byte written from now on
    pub fn set_invert_mode(&mut self, invert: bool) {
        self.invert_mask = if invert { 0xFF } else { 0x00 };
    }

    /// Current invert mask, 0x00 or 0xFF
    pub fn invert_mask(&self) -> u8 {
        self.invert_mask
    }

    /// Blank columns emitted after each glyph (never magnified)
    pub fn letter_spacing(&self) -> u8 {
        self.letter_spacing
    }

    /// Override the spacing chosen by `set_font`
    pub fn set_letter_spacing(&mut self, pixels: u8) {
        self.letter_spacing = pixels;
    }

    /// Discard the next `n` buffered pixel-byte writes
    pub fn skip_columns(&mut self, n: u8) {
        self.skip = n;
    }

    /// Pending skip count
    pub fn skip(&self) -> u8 {
        self.skip
    }

    // ---- geometry and cursor ----

    /// Visible width in pixels
    pub fn display_width(&self) -> u8 {
        self.display_width
    }

    /// Visible height in pixels
    pub fn display_height(&self) -> u8 {
        self.display_height
    }

    /// Visible height in 8-pixel pages
    pub fn display_rows(&self) -> u8 {
        self.display_height / 8
    }

    /// Controller column of the first visible pixel
    pub fn col_offset(&self) -> u8 {
        self.col_offset
    }

    /// Cursor column in pixels
    pub fn col(&self) -> u8 {
        self.col
    }

    /// Cursor row in pages
    pub fn row(&self) -> u8 {
        self.row
    }

    /// Move the cursor column; out-of-range columns are ignored
    pub fn set_col(&mut self, col: u8) {
        if col < self.display_width {
            self.col = col;
            self.send_col_address(col);
        }
    }

    /// Move the cursor row; out-of-range rows are ignored
    pub fn set_row(&mut self, row: u8) {
        if row < self.display_rows() {
            self.row = row;
            self.send_page_address(row);
        }
    }

    /// Move the cursor; each axis is ignored independently when out of range
    pub fn set_cursor(&mut self, col: u8, row: u8) {
        self.set_col(col);
        self.set_row(row);
    }

    /// Move the cursor without range checks
    ///
    /// Used while rasterizing, where the row may run past the panel and
    /// the pixel primitive drops what falls outside.
    pub(crate) fn place(&mut self, col: u8, row: u8) {
        self.col = col;
        if col < self.display_width {
            self.send_col_address(col);
        }
        self.row = row;
        if row < self.display_rows() {
            self.send_page_address(row);
        }
    }

    /// Run `f` with the visible width narrowed to `width`
    pub(crate) fn with_width<R>(&mut self, width: u8, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.display_width;
        self.display_width = width.min(saved);
        let r = f(self);
        self.display_width = saved;
        r
    }

    fn send_col_address(&mut self, col: u8) {
        let col = col.wrapping_add(self.col_offset);
        self.write_command(cmd::SET_LOW_COLUMN | (col & 0x0F));
        self.write_command(cmd::SET_HIGH_COLUMN | (col >> 4));
    }

    #[cfg(not(feature = "scrolling"))]
    fn send_page_address(&mut self, row: u8) {
        self.write_command(cmd::SET_START_PAGE | row);
    }

    #[cfg(feature = "scrolling")]
    fn send_page_address(&mut self, row: u8) {
        self.write_command(cmd::SET_START_PAGE | (row.wrapping_add(self.page_offset) & 7));
    }

    // ---- clearing ----

    /// Clear the whole panel and home the cursor
    pub fn clear(&mut self) {
        #[cfg(feature = "scrolling")]
        {
            self.page_offset = 0;
            self.set_start_line(0);
        }
        let c1 = self.display_width.saturating_sub(1);
        let r1 = self.display_rows().saturating_sub(1);
        self.clear_region(0, c1, 0, r1);
    }

    /// Write zero pixels over columns `c0..=c1` of pages `r0..=r1`
    ///
    /// Always stores true zero whatever the invert mode, cancels any pending
    /// skip and leaves the cursor at `(c0, r0)`. `r1` is clamped to the last
    /// page.
    pub fn clear_region(&mut self, c0: u8, c1: u8, r0: u8, r1: u8) {
        self.skip = 0;

        let rows = self.display_rows();
        if rows == 0 || c0 >= self.display_width {
            return;
        }
        let r1 = r1.min(rows - 1);

        for r in r0..=r1 {
            self.set_cursor(c0, r);
            for _ in c0..=c1 {
                // mask ^ mask == 0
                self.write_ram_buf(self.invert_mask);
            }
        }
        self.set_cursor(c0, r0);
    }

    /// Clear from the cursor to the right edge, over the font's page rows
    pub fn clear_to_eol(&mut self) {
        let rows = self.font_rows().max(1);
        self.clear_region(
            self.col,
            self.display_width.saturating_sub(1),
            self.row,
            self.row.saturating_add(rows - 1),
        );
    }

    /// Clear a field `n` fixed-width cells wide starting at `(col, row)`
    pub fn clear_field(&mut self, col: u8, row: u8, n: u8) {
        let width = self.field_width(n);
        if width == 0 {
            return;
        }
        let c1 = u8::try_from(usize::from(col) + width - 1).unwrap_or(u8::MAX);
        let rows = self.font_rows().max(1);
        self.clear_region(col, c1, row, row.saturating_add(rows - 1));
    }

    // ---- controller commands ----

    /// Hardware-invert the whole panel
    pub fn invert_display(&mut self, invert: bool) {
        self.write_command(if invert {
            cmd::INVERT_DISPLAY
        } else {
            cmd::NORMAL_DISPLAY
        });
    }

    /// Set panel contrast
    pub fn set_contrast(&mut self, value: u8) {
        self.write_command(cmd::SET_CONTRAST);
        self.write_command(value);
    }

    /// Select orientation: `true` for unmapped segments and normal COM scan,
    /// `false` for the remapped (rotated 180 degrees) layout
    pub fn display_remap(&mut self, mode: bool) {
        self.write_command(if mode {
            cmd::SEG_REMAP
        } else {
            cmd::SEG_REMAP | 1
        });
        self.write_command(if mode {
            cmd::COM_SCAN_INC
        } else {
            cmd::COM_SCAN_DEC
        });
    }

    #[cfg(feature = "scrolling")]
    /// Page added to every row address (0-7)
    pub fn set_page_offset(&mut self, page: u8) {
        self.page_offset = page & 7;
        let row = self.row;
        self.set_row(row);
    }

    #[cfg(feature = "scrolling")]
    /// Current page offset
    pub fn page_offset(&self) -> u8 {
        self.page_offset
    }

    #[cfg(feature = "scrolling")]
    /// RAM line mapped to the top of the panel (0-63)
    pub fn set_start_line(&mut self, line: u8) {
        self.start_line = line & 0x3F;
        self.write_command(cmd::SET_START_LINE | self.start_line);
    }

    #[cfg(feature = "scrolling")]
    /// Current start line
    pub fn start_line(&self) -> u8 {
        self.start_line
    }

    // ---- byte primitives ----

    /// Send a raw controller command
    pub fn write_command(&mut self, c: u8) {
        self.transport.write_command(c);
    }

    /// Write one pixel byte at the cursor, ignoring the skip counter
    ///
    /// The byte is XORed with the invert mask. Bytes outside the panel are
    /// dropped silently.
    pub fn write_ram(&mut self, b: u8) {
        if self.in_bounds() {
            self.transport.write_ram(b ^ self.invert_mask);
            self.col += 1;
        }
    }

    /// Write one pixel byte at the cursor, honouring the skip counter
    ///
    /// While the skip counter is positive the byte is discarded without
    /// moving the cursor.
    pub fn write_ram_buf(&mut self, b: u8) {
        if self.skip > 0 {
            self.skip -= 1;
        } else if self.in_bounds() {
            self.transport.write_ram_buf(b ^ self.invert_mask);
            self.col += 1;
        }
    }

    /// Push out bytes the transport may be holding
    pub fn flush(&mut self) {
        self.transport.flush();
    }

    fn in_bounds(&self) -> bool {
        self.row < self.display_rows() && self.col < self.display_width
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use oledtext_hal::mock::MockController;

    pub(crate) static TEST_INIT: [u8; 2] = [cmd::DISPLAY_OFF, cmd::DISPLAY_ON];

    /// 128x64, no column offset
    pub(crate) const TEST_DEVICE: DeviceDescriptor = DeviceDescriptor {
        init_commands: &TEST_INIT,
        width: 128,
        height: 64,
        col_offset: 0,
    };

    pub(crate) fn session<'f>() -> Display<'f, MockController> {
        let mut d = Display::new(MockController::new());
        d.init(&TEST_DEVICE);
        d.transport_mut().clear_logs();
        d
    }

    #[test]
    fn test_init_sends_table_and_clears() {
        let mut ctl = MockController::new();
        ctl.fill(0xAA);
        let mut d = Display::new(ctl);
        d.init(&TEST_DEVICE);

        assert_eq!(&d.transport().commands()[..2], &TEST_INIT);
        assert_eq!(d.display_rows(), 8);
        for page in 0..8 {
            assert!(d.transport().page(page)[..128].iter().all(|&b| b == 0));
        }
        assert_eq!((d.col(), d.row()), (0, 0));
    }

    #[test]
    fn test_set_cursor_ignores_out_of_range_axis() {
        let mut d = session();
        d.set_cursor(10, 3);
        d.set_cursor(200, 5);
        assert_eq!((d.col(), d.row()), (10, 5));
        d.set_cursor(20, 8);
        assert_eq!((d.col(), d.row()), (20, 5));
    }

    #[test]
    fn test_set_col_applies_offset() {
        let mut d = Display::new(MockController::new());
        d.init(&DeviceDescriptor {
            col_offset: 2,
            ..TEST_DEVICE
        });
        d.set_cursor(0x1F, 1);
        assert_eq!(d.transport().address(), (1, 0x21));
    }

    #[test]
    fn test_clear_writes_zero_in_invert_mode() {
        let mut d = session();
        d.transport_mut().fill(0x5A);
        d.set_invert_mode(true);
        d.skip_columns(3);
        d.clear_region(4, 9, 1, 2);

        for page in 1..=2 {
            for col in 4..=9 {
                assert_eq!(d.transport().ram(page, col), 0);
            }
            assert_eq!(d.transport().ram(page, 3), 0x5A);
            assert_eq!(d.transport().ram(page, 10), 0x5A);
        }
        assert_eq!(d.transport().ram(0, 4), 0x5A);
        assert_eq!((d.col(), d.row()), (4, 1));
        assert_eq!(d.skip(), 0);
    }

    #[test]
    fn test_clear_region_clamps_last_row() {
        let mut d = session();
        d.transport_mut().fill(0xFF);
        d.clear_region(0, 1, 6, 200);
        assert_eq!(d.transport().ram(6, 0), 0);
        assert_eq!(d.transport().ram(7, 1), 0);
        assert_eq!(d.transport().ram(5, 0), 0xFF);
    }

    #[test]
    fn test_pixel_write_inverts_and_clips() {
        let mut d = session();
        d.set_invert_mode(true);
        d.set_cursor(127, 0);
        d.write_ram(0x0F);
        d.write_ram(0x0F);
        assert_eq!(d.transport().ram(0, 127), 0xF0);
        assert_eq!(d.transport().data(), &[0xF0]);
        assert_eq!(d.col(), 128);
    }

    #[test]
    fn test_skip_discards_without_advancing() {
        let mut d = session();
        d.set_cursor(5, 0);
        d.skip_columns(2);
        d.write_ram_buf(0x11);
        d.write_ram_buf(0x22);
        d.write_ram_buf(0x33);
        assert_eq!(d.col(), 6);
        assert_eq!(d.transport().ram(0, 5), 0x33);
        // direct writes ignore the counter
        d.skip_columns(1);
        d.write_ram(0x44);
        assert_eq!(d.transport().ram(0, 6), 0x44);
        assert_eq!(d.skip(), 1);
    }

    #[test]
    fn test_controller_commands() {
        let mut d = session();
        d.invert_display(true);
        d.set_contrast(0x7F);
        d.display_remap(false);
        assert_eq!(
            d.transport().commands(),
            &[0xA7, 0x81, 0x7F, 0xA1, 0xC8]
        );
    }

    #[cfg(feature = "scrolling")]
    #[test]
    fn test_page_offset_applies_to_rows() {
        let mut d = session();
        d.set_page_offset(9);
        assert_eq!(d.page_offset(), 1);
        d.set_row(7);
        assert_eq!(d.transport().address().0, 0);
        d.clear();
        assert_eq!(d.page_offset(), 0);
        assert_eq!(d.start_line(), 0);
    }
}
