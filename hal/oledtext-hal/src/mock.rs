//! Simulated page-addressed display controller
//!
//! Decodes the SSD1306/SH1106 page-addressing commands the text engine
//! emits and keeps a copy of display RAM so tests can read pixels back.
//! Every command and data byte is also logged in order.

use heapless::Vec;

use crate::transport::Transport;

/// Columns of simulated RAM (SH1106 has 132)
pub const MOCK_COLUMNS: usize = 132;

/// 8-pixel pages of simulated RAM
pub const MOCK_PAGES: usize = 8;

/// Capacity of each byte log
pub const LOG_LEN: usize = 4096;

/// Simulated controller implementing [`Transport`]
pub struct MockController {
    ram: [[u8; MOCK_COLUMNS]; MOCK_PAGES],
    page: usize,
    column: usize,
    /// Argument bytes still owed to the last multi-byte command
    pending_args: u8,
    commands: Vec<u8, LOG_LEN>,
    data: Vec<u8, LOG_LEN>,
}

impl Default for MockController {
    fn default() -> Self {
        Self::new()
    }
}

impl MockController {
    /// Create a controller with all-zero RAM
    pub fn new() -> Self {
        Self {
            ram: [[0; MOCK_COLUMNS]; MOCK_PAGES],
            page: 0,
            column: 0,
            pending_args: 0,
            commands: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Read one RAM byte (0 outside the simulated area)
    pub fn ram(&self, page: usize, column: usize) -> u8 {
        self.ram
            .get(page)
            .and_then(|p| p.get(column))
            .copied()
            .unwrap_or(0)
    }

    /// Whole page of RAM
    pub fn page(&self, page: usize) -> &[u8] {
        self.ram.get(page).map(|p| &p[..]).unwrap_or(&[])
    }

    /// Fill all RAM with `value`
    pub fn fill(&mut self, value: u8) {
        for page in self.ram.iter_mut() {
            page.fill(value);
        }
    }

    /// Current (page, column) address pointer
    pub fn address(&self) -> (usize, usize) {
        (self.page, self.column)
    }

    /// Commands received, in order
    pub fn commands(&self) -> &[u8] {
        &self.commands
    }

    /// RAM bytes received, in order
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Forget logged commands and data (RAM is kept)
    pub fn clear_logs(&mut self) {
        self.commands.clear();
        self.data.clear();
    }

    fn command(&mut self, cmd: u8) {
        let _ = self.commands.push(cmd);
        if self.pending_args > 0 {
            self.pending_args -= 1;
            return;
        }
        match cmd {
            0x00..=0x0F => self.column = (self.column & 0xF0) | usize::from(cmd & 0x0F),
            0x10..=0x1F => self.column = (self.column & 0x0F) | (usize::from(cmd & 0x0F) << 4),
            0xB0..=0xB7 => self.page = usize::from(cmd & 0x07),
            // Contrast, charge pump, multiplex, offset, clock, precharge,
            // COM pins, VCOM detect, memory mode
            0x81 | 0x8D | 0xA8 | 0xD3 | 0xD5 | 0xD9 | 0xDA | 0xDB | 0x20 => self.pending_args = 1,
            // Column / page range
            0x21 | 0x22 => self.pending_args = 2,
            _ => {}
        }
    }

    fn ram_write(&mut self, data: u8) {
        let _ = self.data.push(data);
        if let Some(cell) = self
            .ram
            .get_mut(self.page)
            .and_then(|p| p.get_mut(self.column))
        {
            *cell = data;
        }
        self.column = self.column.saturating_add(1);
    }
}

impl Transport for MockController {
    fn write_command(&mut self, cmd: u8) {
        self.command(cmd);
    }

    fn write_ram(&mut self, data: u8) {
        self.ram_write(data);
    }

    fn write_ram_buf(&mut self, data: u8) {
        self.ram_write(data);
    }
}
