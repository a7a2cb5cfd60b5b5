//! Device façade
//!
//! Owns the control transport and coordinates the pieces the display
//! framework talks to: mode programming and power go out synchronously
//! over control reports, frame updates are handed to the shared
//! [`Pipeline`] whose worker drives the bulk endpoint.

use ms912x_hal::ControlTransport;

use crate::config::DeviceConfig;
use crate::error::Error;
use crate::mode::{find_mode, ModeDescriptor, ModeKey};
use crate::pipeline::{Damage, FramebufferView, Pipeline};
use crate::power::PowerState;
use crate::registers;
use crate::resolution;

/// An open adapter
pub struct Device<'p, C: ControlTransport> {
    control: C,
    pipeline: &'p Pipeline,
    power: PowerState,
    mode: Option<ModeDescriptor>,
    /// Power state to restore on resume; `Some` while suspended
    suspended: Option<PowerState>,
    closed: bool,
}

impl<'p, C: ControlTransport> Device<'p, C> {
    /// Open the adapter
    ///
    /// Programs the baseline mode, then allocates the pipeline's transfer
    /// buffers. The baseline does not become the active mode; frame
    /// updates need an explicit [`Device::set_mode`].
    pub fn open(mut control: C, pipeline: &'p Pipeline, config: &DeviceConfig) -> Result<Self, Error> {
        config.validate()?;
        let ModeKey { width, height, hz } = config.baseline_mode;
        let baseline = find_mode(width, height, hz).ok_or(Error::UnsupportedMode { width, height, hz })?;

        // The adapter's output is undefined until one resolution has been
        // programmed after enumeration.
        resolution::set_resolution(&mut control, &baseline)?;
        pipeline.open()?;

        info!("device open, baseline {}x{}@{}", width, height, hz);
        Ok(Self {
            control,
            pipeline,
            power: PowerState::Off,
            mode: None,
            suspended: None,
            closed: false,
        })
    }

    fn check_usable(&self) -> Result<(), Error> {
        if self.closed {
            Err(Error::AlreadyClosed)
        } else if self.pipeline.is_lost() {
            Err(Error::DeviceLost)
        } else {
            Ok(())
        }
    }

    /// Pass a control result through, noting an unplugged device
    fn observe<T>(&self, result: Result<T, Error>) -> Result<T, Error> {
        if let Err(e) = &result {
            if e.is_device_lost() {
                self.pipeline.mark_lost();
            }
        }
        result
    }

    /// Look up a timing without touching the device
    ///
    /// Fails for timings missing from the mode table and for modes the
    /// pipeline cannot carry.
    pub fn check_mode(&self, width: u16, height: u16, hz: u16) -> Result<ModeDescriptor, Error> {
        match find_mode(width, height, hz) {
            Some(mode) if self.pipeline.accepts(&mode) => Ok(mode),
            _ => {
                warn!("mode {}x{}@{} rejected", width, height, hz);
                Err(Error::UnsupportedMode { width, height, hz })
            }
        }
    }

    /// Program a new mode and make it the active one
    ///
    /// Unsupported timings are rejected before any register write. On a
    /// failed write the previous mode stays active; retry the whole call.
    pub fn set_mode(&mut self, width: u16, height: u16, hz: u16) -> Result<(), Error> {
        self.check_usable()?;
        let mode = self.check_mode(width, height, hz)?;
        let result = resolution::set_resolution(&mut self.control, &mode);
        self.observe(result)?;
        self.pipeline.set_mode(mode)?;
        self.mode = Some(mode);
        info!("mode {}x{}@{}", width, height, hz);
        Ok(())
    }

    pub fn power_on(&mut self) -> Result<(), Error> {
        self.set_power(PowerState::On)
    }

    pub fn power_off(&mut self) -> Result<(), Error> {
        self.set_power(PowerState::Off)
    }

    fn set_power(&mut self, target: PowerState) -> Result<(), Error> {
        self.check_usable()?;
        let result = self.power.transition(&mut self.control, target);
        self.observe(result)
    }

    /// Queue a frame update
    ///
    /// Returns as soon as the damage is queued or merged; transfer
    /// failures are retried on later updates. While suspended nothing is
    /// transferred and the damage is held until an update after
    /// [`Device::resume`].
    pub fn update(&self, damage: Damage, source: &FramebufferView<'_>) -> Result<(), Error> {
        self.check_usable()?;
        if self.suspended.is_some() {
            trace!("suspended, update deferred");
            return self.pipeline.defer_update(damage, source);
        }
        self.pipeline.submit_update(damage, source)
    }

    /// Read one byte of a device register
    pub fn read_register(&mut self, address: u16) -> Result<u8, Error> {
        self.check_usable()?;
        let result = registers::read(&mut self.control, address);
        self.observe(result)
    }

    /// Power the output down, remembering whether it was on
    pub fn suspend(&mut self) -> Result<(), Error> {
        self.check_usable()?;
        if self.suspended.is_some() {
            return Ok(());
        }
        let was = self.power;
        if was.is_on() {
            self.power_off()?;
        }
        self.suspended = Some(was);
        debug!("suspended");
        Ok(())
    }

    /// Restore power and the active mode after [`Device::suspend`]
    ///
    /// The next frame update is a full frame.
    pub fn resume(&mut self) -> Result<(), Error> {
        self.check_usable()?;
        let Some(was) = self.suspended else {
            return Ok(());
        };
        if was.is_on() {
            self.power_on()?;
        }
        if let Some(mode) = self.mode {
            let result = resolution::set_resolution(&mut self.control, &mode);
            self.observe(result)?;
        }
        self.suspended = None;
        self.pipeline.force_full_frame();
        debug!("resumed");
        Ok(())
    }

    /// Power down and release the transfer buffers
    ///
    /// Resolves once no transfer references a buffer. A lost device is
    /// closed without further control traffic.
    pub async fn close(&mut self) -> Result<(), Error> {
        if self.closed {
            return Err(Error::AlreadyClosed);
        }
        self.closed = true;

        if self.power.is_on() && !self.pipeline.is_lost() {
            let result = self.power.transition(&mut self.control, PowerState::Off);
            if let Err(e) = self.observe(result) {
                warn!("power off on close failed: {}", e);
            }
        }
        self.pipeline.close().await?;
        self.mode = None;
        info!("device closed");
        Ok(())
    }

    pub fn power_state(&self) -> PowerState {
        self.power
    }

    pub fn active_mode(&self) -> Option<ModeDescriptor> {
        self.mode
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended.is_some()
    }

    pub fn pipeline(&self) -> &'p Pipeline {
        self.pipeline
    }

    pub fn control(&self) -> &C {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut C {
        &mut self.control
    }
}
