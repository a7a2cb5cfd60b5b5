//! Output power state machine
//!
//! Two states, driven only by explicit requests. Each transition is a
//! single register write; the state changes only once the write has
//! been accepted.

use ms912x_hal::ControlTransport;
use ms912x_protocol::register;

use crate::error::Error;
use crate::registers;

/// Adapter output power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerState {
    #[default]
    Off,
    On,
}

impl PowerState {
    /// Payload written to the power register to reach this state
    pub fn payload(self) -> [u8; 6] {
        match self {
            PowerState::On => register::POWER_ON_PAYLOAD,
            PowerState::Off => register::POWER_OFF_PAYLOAD,
        }
    }

    /// Check if the output is enabled
    pub fn is_on(self) -> bool {
        self == PowerState::On
    }

    /// Issue the register write for `target` and move there on success
    ///
    /// Allowed from either state; repeating the current state writes the
    /// register again. On failure the state is left unchanged.
    pub fn transition<C: ControlTransport>(
        &mut self,
        control: &mut C,
        target: PowerState,
    ) -> Result<(), Error> {
        registers::write(control, register::POWER, target.payload())?;
        debug!("power {} -> {}", *self, target);
        *self = target;
        Ok(())
    }
}
