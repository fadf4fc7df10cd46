//! oledtext Hardware Abstraction Layer
//!
//! This crate defines the byte sink the text engine streams into, plus
//! adapters that carry it over `embedded-hal` 1.0 buses.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  oledtext-core (glyph engine, ticker)   │
//! └─────────────────────────────────────────┘
//!                     │ write_command / write_ram
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  oledtext-hal (this crate - Transport)  │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ I2cTransport  │       │ SpiTransport  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`transport::Transport`] - Command and pixel-data byte sink
//!
//! The `mock` feature adds [`mock::MockController`], a simulated
//! page-addressed controller used by host tests.

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod spi;
pub mod transport;

// Re-export key types at crate root for convenience
pub use i2c::I2cTransport;
pub use spi::SpiTransport;
pub use transport::{Transport, TransportError};
