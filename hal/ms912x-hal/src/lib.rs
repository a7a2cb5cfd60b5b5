//! MS912x Transport Abstraction Layer
//!
//! This crate defines the transport traits the protocol engine drives.
//! A USB backend (libusb, a kernel interface, an embedded USB host stack)
//! implements them for one claimed adapter interface.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  ms912x-core (device, pipeline)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ms912x-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ control pipe  │       │ bulk OUT 0x04 │
//! │ (HID reports) │       │ (frames)      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`control::ControlTransport`] - Synchronous register reports
//! - [`bulk::BulkOut`] - Asynchronous frame data
//! - [`error::Error`] - Failure classification shared by both

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod bulk;
pub mod control;
pub mod error;

// Re-export key traits at crate root for convenience
pub use bulk::BulkOut;
pub use control::ControlTransport;
pub use error::{Error, ErrorKind};
