//! Protocol engine for MS912x USB display adapters
//!
//! This crate contains everything between the display framework and the
//! USB transport that does not depend on a particular USB stack:
//!
//! - Mode table and exact-match lookup
//! - Register access, resolution programming and the power state machine
//! - Double-buffered framebuffer transfer pipeline
//! - The [`Device`] façade tying them together
//! - Configuration type definitions
//!
//! # Usage
//!
//! ```ignore
//! let pipeline = Pipeline::new(config.pipeline);
//! let mut device = Device::open(control, &pipeline, &config)?;
//!
//! // On the async executor
//! spawn(pipeline.run(&mut bulk));
//!
//! device.power_on()?;
//! device.set_mode(1920, 1080, 60)?;
//! device.update(Damage::Rect(dirty), &framebuffer)?;
//! ```

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod config;
pub mod device;
pub mod error;
pub mod mode;
pub mod pipeline;
pub mod power;
pub mod registers;
pub mod resolution;

pub use config::{DeviceConfig, PipelineConfig, RetryPolicy};
pub use device::Device;
pub use error::Error;
pub use mode::{find_mode, supported_modes, ModeDescriptor, ModeKey};
pub use pipeline::{Damage, FramebufferView, Pipeline, Rect};
pub use power::PowerState;
