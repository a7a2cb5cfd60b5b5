//! Resolution programming
//!
//! Changing the timing is an ordered series of independent register
//! writes:
//!
//! 1. `APPLY ← 00` stop streaming
//! 2. `PREP ← 03` prepare for a resolution change
//! 3. `SET1 ← width, height, pixel format`
//! 4. `SET2 ← mode code, width, height`
//! 5. `APPLY ← 01` restart streaming
//! 6. `COMMIT ← 01` latch the new timing
//!
//! There is no rollback. A failed step aborts the series and the caller
//! re-issues the whole thing.

use ms912x_hal::ControlTransport;
use ms912x_protocol::{register, ModeRequest, RegisterRequest, ResolutionRequest};

use crate::error::Error;
use crate::mode::ModeDescriptor;
use crate::registers;

/// Number of register writes in one programming series
pub const SEQUENCE_LEN: usize = 6;

/// Build the register writes that program `mode`
pub fn programming_sequence(mode: &ModeDescriptor) -> [RegisterRequest; SEQUENCE_LEN] {
    let resolution = ResolutionRequest {
        width: mode.width,
        height: mode.height,
        format: mode.pixel_format,
    };
    let mode_request = ModeRequest {
        mode_code: mode.mode_code,
        width: mode.width,
        height: mode.height,
    };

    [
        RegisterRequest::write_byte(register::APPLY, 0),
        RegisterRequest::write_byte(register::PREP, register::PREP_RESOLUTION),
        RegisterRequest::write(register::SET1, resolution.to_bytes()),
        RegisterRequest::write(register::SET2, mode_request.to_bytes()),
        RegisterRequest::write_byte(register::APPLY, 1),
        RegisterRequest::write_byte(register::COMMIT, 1),
    ]
}

/// Program the adapter for `mode`
///
/// Stops at the first failed write and returns its error.
pub fn set_resolution<C: ControlTransport>(control: &mut C, mode: &ModeDescriptor) -> Result<(), Error> {
    for (step, request) in programming_sequence(mode).iter().enumerate() {
        if let Err(e) = registers::send(control, request) {
            warn!("resolution step {} failed: {}", step, e);
            return Err(e);
        }
        trace!("resolution step {} ok", step);
    }

    debug!(
        "programmed {}x{}@{} (mode {=u16:#x})",
        mode.width,
        mode.height,
        mode.refresh_hz,
        mode.mode_code
    );
    Ok(())
}
