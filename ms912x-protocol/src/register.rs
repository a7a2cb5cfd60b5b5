//! MS912x register map
//!
//! Only the registers the driver touches are named. Write registers are
//! addressed with a single byte; read registers use the full 16-bit space.

/// Resolution request (width, height, pixel format)
pub const SET1: u8 = 0x01;
/// Mode request (mode code, width, height)
pub const SET2: u8 = 0x02;
/// Prepare for a resolution change
pub const PREP: u8 = 0x03;
/// Streaming enable; 0 stops, 1 starts
pub const APPLY: u8 = 0x04;
/// Commit the programmed timing
pub const COMMIT: u8 = 0x05;
/// Output power
pub const POWER: u8 = 0x07;
/// Status byte
pub const STATUS: u16 = 0x32;
/// Start of the monitor EDID mirror
pub const EDID_BASE: u16 = 0xC000;
/// Active horizontal pixels of the current timing
pub const HACTIVE: u16 = 0xF384;
/// Active vertical lines of the current timing
pub const VACTIVE: u16 = 0xF388;
/// Refresh rate of the current timing
pub const HZ: u16 = 0xF182;

/// Payload value written to [`PREP`] before programming
pub const PREP_RESOLUTION: u8 = 0x03;
/// Payload written to [`POWER`] to enable the output
pub const POWER_ON_PAYLOAD: [u8; 6] = [0x01, 0x02, 0x00, 0x00, 0x00, 0x00];
/// Payload written to [`POWER`] to disable the output
pub const POWER_OFF_PAYLOAD: [u8; 6] = [0x00; 6];
