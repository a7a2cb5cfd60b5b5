//! Display modes the adapter understands
//!
//! The table is the single source of truth for supported timings. Lookup
//! is exact on width, height and refresh rate; there is no nearest-match
//! fallback.

pub mod table;

pub use table::{find_mode, supported_modes, ModeDescriptor, ModeKey, MODE_TABLE};
