//! Glyph engine and scrolling ticker for page-addressed monochrome displays
//!
//! This crate turns characters into controller pixel bytes without a frame
//! buffer, no allocation and no floating point:
//!
//! - Font table reader (RAM-resident or program-resident font blobs)
//! - Glyph metrics decoded from the compact bitmap-font header
//! - Display session state (cursor, magnification, invert mask, clipping)
//! - The `write` rasterizer that streams glyph bytes one page-column at a time
//! - A bounded marquee state machine advanced once per external tick
//!
//! Bytes leave through an [`oledtext_hal::Transport`]; the engine itself
//! never fails; unrenderable input is reported through return values.

#![no_std]
#![deny(unsafe_code)]

pub mod device;
pub mod display;
pub mod font;
pub mod ticker;

// Re-export key types
pub use device::DeviceDescriptor;
pub use display::{Display, Magnification, SessionOptions};
pub use font::{Font, FontKind, FontReader, Glyph};
pub use ticker::{TickerState, TICKER_QUEUE_DIM};
