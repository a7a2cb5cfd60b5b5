//! MS912x Wire Protocol
//!
//! This crate defines the byte layouts exchanged with MacroSilicon MS912x
//! USB display adapters. Everything here is a pure formatter: no I/O, no
//! allocation, no rounding on behalf of the caller.
//!
//! # Protocol Overview
//!
//! Registers are accessed through 8-byte HID reports on the control
//! endpoint:
//! ```text
//! read:   ┌──────┬─────────┬──────────┐
//!         │ 0xB5 │ ADDRESS │ RESERVED │
//!         │ 1B   │ 2B (BE) │ 5B       │
//!         └──────┴─────────┴──────────┘
//! write:  ┌──────┬─────────┬─────────┐
//!         │ 0xA6 │ ADDRESS │ PAYLOAD │
//!         │ 1B   │ 1B      │ 6B      │
//!         └──────┴─────────┴─────────┘
//! ```
//!
//! Pixel data goes out on bulk endpoint 0x04, each rectangle prefixed by
//! a frame update header:
//! ```text
//! ┌────────┬──────────┬─────────┬──────────┬──────────┬──────────────┐
//! │ 0xFF00 │ X (÷16)  │ Y (BE)  │ W (÷16)  │ H (BE)   │ PIXELS       │
//! │ 2B     │ 1B       │ 2B      │ 1B       │ 2B       │ W × H × 2 B  │
//! └────────┴──────────┴─────────┴──────────┴──────────┴──────────────┘
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod frame;
pub mod pixel;
pub mod register;
pub mod request;
pub mod usb;

pub use frame::{FrameUpdateHeader, FRAME_HEADER_LEN, FRAME_MAGIC, MAX_TRANSFER_LENGTH};
pub use pixel::PixelFormat;
pub use request::{ModeRequest, RegisterRequest, ResolutionRequest, Report, REPORT_LEN};
