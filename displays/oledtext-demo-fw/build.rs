//! Build script for oledtext-demo-fw
//!
//! - Sets up linker search paths for memory.x
//! - Validates display.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Names accepted by `[display] device`
const DEVICES: &[&str] = &[
    "ssd1306_128x64",
    "ssd1306_128x32",
    "ssd1306_96x16",
    "ssd1306_64x48",
    "ssd1306_64x32",
    "sh1106_128x64",
];

const DISPLAY_KEYS: &[&str] = &[
    "device",
    "i2c_address",
    "contrast",
    "remap",
    "invert",
    "nonfont_space",
];

const TICKER_KEYS: &[&str] = &["row", "begin_col", "end_col", "mag2x", "period_ms", "text"];

/// Longest ticker message the firmware can hold
const MAX_TEXT_LEN: usize = 64;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate display.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=display.toml");

    let config_path = Path::new("display.toml");
    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read display.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: display.toml is not valid TOML                           ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                {}\n",
                e
            );
        }
    };

    let mut errors = Vec::new();

    let root = match config.as_table() {
        Some(t) => t,
        None => return,
    };
    for (name, value) in root {
        let keys = match name.as_str() {
            "display" => DISPLAY_KEYS,
            "ticker" => TICKER_KEYS,
            _ => {
                errors.push(format!("unknown section [{}]", name));
                continue;
            }
        };
        let Some(table) = value.as_table() else {
            errors.push(format!("[{}] must be a table", name));
            continue;
        };
        for key in table.keys() {
            if !keys.contains(&key.as_str()) {
                errors.push(format!("[{}] unknown key '{}'", name, key));
            }
        }
    }

    if let Some(display) = config.get("display") {
        match display.get("device") {
            Some(toml::Value::String(dev)) if !DEVICES.contains(&dev.to_ascii_lowercase().as_str()) => {
                errors.push(format!("[display] unknown device '{}'", dev));
            }
            Some(toml::Value::String(_)) | None => {}
            Some(_) => errors.push("[display] device must be a string".into()),
        }
        check_int(&mut errors, display, "display", "i2c_address", 0, 0x7F);
        check_int(&mut errors, display, "display", "contrast", 0, 255);
    }

    if let Some(ticker) = config.get("ticker") {
        check_int(&mut errors, ticker, "ticker", "row", 0, 7);
        check_int(&mut errors, ticker, "ticker", "begin_col", 0, 255);
        check_int(&mut errors, ticker, "ticker", "end_col", 0, 255);
        check_int(&mut errors, ticker, "ticker", "period_ms", 1, i64::from(u32::MAX));
        if let Some(toml::Value::String(text)) = ticker.get("text") {
            if text.len() > MAX_TEXT_LEN {
                errors.push(format!("[ticker] text longer than {} bytes", MAX_TEXT_LEN));
            }
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid display configuration                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
}

/// Integer keys are optional but must be in range when present
fn check_int(errors: &mut Vec<String>, table: &toml::Value, section: &str, key: &str, min: i64, max: i64) {
    match table.get(key) {
        Some(toml::Value::Integer(v)) if *v < min || *v > max => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
        }
        Some(toml::Value::Integer(_)) | None => {}
        Some(_) => errors.push(format!("[{}] {} must be an integer", section, key)),
    }
}
