//! Configuration types
//!
//! Board-agnostic configuration for the device façade and the transfer
//! pipeline. With the `serde` feature the configuration can be stored as
//! postcard-serialized binary data.

#[cfg(feature = "serde")]
pub mod persist;
pub mod types;

pub use types::*;
