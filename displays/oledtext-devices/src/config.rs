//! Display configuration file parser
//!
//! Reads the small TOML subset used to describe one text display and its
//! ticker. It does NOT support full TOML.
//!
//! Supported features:
//! - `[display]` and `[ticker]` section headers
//! - Key = value pairs (string, integer, boolean)
//! - Hex integers (`0x3C`)
//! - Comments (# ...), including trailing comments
//!
//! Example:
//!
//! ```toml
//! [display]
//! device = "sh1106_128x64"
//! i2c_address = 0x3C
//! contrast = 0x7F
//!
//! [ticker]
//! row = 6
//! end_col = 127
//! period_ms = 25
//! text = "Hello from oledtext"
//! ```

use heapless::String as HString;

use crate::DeviceKind;

/// Longest ticker message accepted from a config file
pub const MAX_TEXT_LEN: usize = 64;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Section header other than `[display]` or `[ticker]`
    InvalidSection,
    /// Value of the wrong type, out of range or malformed line
    InvalidValue,
    /// Key not known in its section
    UnknownKey,
    /// `device` names no supported module
    UnknownDevice,
}

/// Panel settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplaySettings {
    pub device: DeviceKind,
    /// 7-bit bus address
    pub i2c_address: u8,
    /// Overrides the init table's contrast when set
    pub contrast: Option<u8>,
    /// Overrides the init table's orientation when set
    pub remap: Option<bool>,
    /// Hardware-invert the panel
    pub invert: bool,
    /// Draw a blank cell for spaces the font lacks
    pub nonfont_space: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            device: DeviceKind::default(),
            i2c_address: 0x3C,
            contrast: None,
            remap: None,
            invert: false,
            nonfont_space: true,
        }
    }
}

/// Marquee settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickerSettings {
    /// Text row in pages
    pub row: u8,
    pub begin_col: u8,
    /// Clamped to the panel width when the ticker starts
    pub end_col: u8,
    pub mag2x: bool,
    /// Delay between ticks
    pub period_ms: u32,
    pub text: HString<MAX_TEXT_LEN>,
}

impl Default for TickerSettings {
    fn default() -> Self {
        let mut text = HString::new();
        let _ = text.push_str("oledtext");
        Self {
            row: 0,
            begin_col: 0,
            end_col: u8::MAX,
            mag2x: false,
            period_ms: 30,
            text,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayConfig {
    pub display: DisplaySettings,
    pub ticker: TickerSettings,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Display,
    Ticker,
}

/// Parse a configuration file; missing keys keep their defaults
pub fn parse_display_config(input: &str) -> Result<DisplayConfig, ConfigError> {
    let mut config = DisplayConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') {
            section = parse_section_header(strip_comment(line))?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ConfigError::InvalidValue)?;
        match section {
            Section::Display => apply_display(&mut config.display, key, value)?,
            Section::Ticker => apply_ticker(&mut config.ticker, key, value)?,
            Section::Root => return Err(ConfigError::UnknownKey),
        }
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("display config: {}", config);

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ConfigError> {
    let inner = header
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .ok_or(ConfigError::InvalidSection)?;
    match inner.trim() {
        "display" => Ok(Section::Display),
        "ticker" => Ok(Section::Ticker),
        _ => Err(ConfigError::InvalidSection),
    }
}

/// Drop a trailing comment unless the `#` sits inside a string
fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(hash_pos) if line[..hash_pos].matches('"').count() % 2 == 0 => line[..hash_pos].trim(),
        _ => line,
    }
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = strip_comment(line[eq_pos + 1..].trim());

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn apply_display(d: &mut DisplaySettings, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "device" => {
            d.device = DeviceKind::from_name(parse_string(value)?).ok_or(ConfigError::UnknownDevice)?
        }
        "i2c_address" => {
            let addr = parse_u8(value)?;
            if addr > 0x7F {
                return Err(ConfigError::InvalidValue);
            }
            d.i2c_address = addr;
        }
        "contrast" => d.contrast = Some(parse_u8(value)?),
        "remap" => d.remap = Some(parse_bool(value)?),
        "invert" => d.invert = parse_bool(value)?,
        "nonfont_space" => d.nonfont_space = parse_bool(value)?,
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn apply_ticker(t: &mut TickerSettings, key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "row" => t.row = parse_u8(value)?,
        "begin_col" => t.begin_col = parse_u8(value)?,
        "end_col" => t.end_col = parse_u8(value)?,
        "mag2x" => t.mag2x = parse_bool(value)?,
        "period_ms" => t.period_ms = parse_int(value)?,
        "text" => {
            t.text.clear();
            t.text
                .push_str(parse_string(value)?)
                .map_err(|_| ConfigError::InvalidValue)?;
        }
        _ => return Err(ConfigError::UnknownKey),
    }
    Ok(())
}

fn parse_string(value: &str) -> Result<&str, ConfigError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue)
}

fn parse_u8(value: &str) -> Result<u8, ConfigError> {
    match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).map_err(|_| ConfigError::InvalidValue),
        None => parse_int(value),
    }
}

fn parse_bool(value: &str) -> Result<bool, ConfigError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConfigError::InvalidValue),
    }
}
