//! Font table reader
//!
//! Fonts are immutable byte blobs in the compact bitmap-font format:
//!
//! ```text
//! offset  size  field
//! 0       2     format marker, big-endian (< 2 fixed pitch, >= 2 proportional)
//! 2       1     fixed glyph width (nominal width for proportional fonts)
//! 3       1     glyph height in pixels
//! 4       1     first character code
//! 5       1     character count
//! 6       ...   proportional: `count` width bytes, then glyph data
//!               fixed pitch:  glyph data
//! ```
//!
//! Glyph data is column-major: each glyph holds `rows * width` bytes, one
//! 8-pixel page row after another.
//!
//! All decoding reads through [`FontReader`], so a font stored in a
//! separately addressed memory needs nothing more than its own reader.

mod glyph;
pub mod system5x7;

pub use glyph::{FontKind, Glyph};

/// Byte offsets of the header fields
pub mod layout {
    /// Format marker (two bytes, big-endian)
    pub const FONT_LENGTH: usize = 0;
    /// Fixed / nominal glyph width
    pub const FONT_WIDTH: usize = 2;
    /// Glyph height in pixels
    pub const FONT_HEIGHT: usize = 3;
    /// First character code
    pub const FONT_FIRST_CHAR: usize = 4;
    /// Number of characters
    pub const FONT_CHAR_COUNT: usize = 5;
    /// Width table (proportional) or glyph data (fixed pitch)
    pub const FONT_WIDTH_TABLE: usize = 6;
}

/// Byte-level access to a font blob
pub trait FontReader {
    /// Read the byte at `addr`, relative to the start of the font
    ///
    /// Reads past the end of the blob yield 0.
    fn read_byte(&self, addr: usize) -> u8;
}

/// Font table in ordinary data memory
#[derive(Debug, Clone, Copy)]
pub struct RamTable<'a> {
    bytes: &'a [u8],
}

impl<'a> RamTable<'a> {
    /// Wrap a table
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }
}

impl FontReader for RamTable<'_> {
    fn read_byte(&self, addr: usize) -> u8 {
        self.bytes.get(addr).copied().unwrap_or(0)
    }
}

/// Font table placed in read-only program memory
///
/// On targets with one address space for code and data this reads exactly
/// like [`RamTable`]; the distinction is kept so fonts can be registered
/// from either region.
#[derive(Debug, Clone, Copy)]
pub struct ProgramTable {
    bytes: &'static [u8],
}

impl ProgramTable {
    /// Wrap a table linked into flash
    pub const fn new(bytes: &'static [u8]) -> Self {
        Self { bytes }
    }
}

impl FontReader for ProgramTable {
    fn read_byte(&self, addr: usize) -> u8 {
        self.bytes.get(addr).copied().unwrap_or(0)
    }
}

/// A registered font and the memory space it lives in
#[derive(Debug, Clone, Copy)]
pub enum Font<'a> {
    /// Table in data memory
    Ram(RamTable<'a>),
    /// Table in program memory
    Program(ProgramTable),
}

impl<'a> Font<'a> {
    /// Register a font held in data memory
    pub const fn ram(bytes: &'a [u8]) -> Self {
        Font::Ram(RamTable::new(bytes))
    }
}

impl Font<'static> {
    /// Register a font linked into program memory
    pub const fn program(bytes: &'static [u8]) -> Self {
        Font::Program(ProgramTable::new(bytes))
    }
}

impl FontReader for Font<'_> {
    fn read_byte(&self, addr: usize) -> u8 {
        match self {
            Font::Ram(table) => table.read_byte(addr),
            Font::Program(table) => table.read_byte(addr),
        }
    }
}
