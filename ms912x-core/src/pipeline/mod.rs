//! Double-buffered frame transfer pipeline
//!
//! ```text
//!  submit_update()                         run() (single worker)
//!  ──────────────                          ─────────────────────
//!  clamp + merge damage
//!  take next idle slot ──► encode ──► jobs ──► write chunks ──► finish
//!        │ (busy)                                    │             │
//!        ▼                                      cancel signal   restore slot
//!  pending damage ◄───────── failed / cancelled rect ◄──────────────┘
//! ```
//!
//! Two transfer slots are pooled. The producer never waits: when the next
//! slot is still busy its damage is kept as pending and folded into the
//! following update. The device double-buffers scanout, so each transfer
//! also carries the rectangle of the transfer before it.
//!
//! Slot buffers are moved into the job that uses them and come back only
//! when the job is finished. Closing waits for every slot before freeing
//! anything.

mod convert;
mod rect;
mod slot;

#[cfg(test)]
pub(crate) mod mock;

pub use convert::{converter, encode_uyvy, Converter, FramebufferView, SOURCE_BYTES_PER_PIXEL};
pub use rect::{merge, Rect};
pub use slot::SLOT_COUNT;

use alloc::boxed::Box;
use core::cell::RefCell;

use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::{Channel, TrySendError};
use embassy_sync::signal::Signal;
use ms912x_hal::{BulkOut, Error as _, ErrorKind};
use ms912x_protocol::{FrameUpdateHeader, MAX_TRANSFER_LENGTH};

use crate::config::{PipelineConfig, RetryPolicy};
use crate::error::Error;
use crate::mode::ModeDescriptor;
use slot::SlotPool;

/// Area of the framebuffer that changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Damage {
    /// The whole mode extent
    Full,
    /// A rectangle; clamped to the mode extent on submission
    Rect(Rect),
}

#[derive(Clone, Copy)]
struct ActiveMode {
    descriptor: ModeDescriptor,
    convert: Converter,
}

struct State {
    pool: SlotPool,
    mode: Option<ActiveMode>,
    /// Damage not yet handed to a transfer
    pending: Option<Rect>,
    /// Fresh damage of the last transfer, resent with the next one
    previous: Option<Rect>,
    force_full: bool,
    /// Bumped on every mode switch; jobs from older modes are stale
    generation: u32,
    closed: bool,
    lost: bool,
    failures: u8,
    worker_active: bool,
}

impl State {
    fn new() -> Self {
        Self {
            pool: SlotPool::new(),
            mode: None,
            pending: None,
            previous: None,
            force_full: true,
            generation: 0,
            closed: false,
            lost: false,
            failures: 0,
            worker_active: false,
        }
    }

    /// Validate an update against the active mode and clamp its damage
    fn clip(&self, damage: Damage, source: &FramebufferView<'_>) -> Result<(ActiveMode, Rect), Error> {
        self.check_open()?;
        let mode = self.mode.ok_or(Error::NoActiveMode)?;
        let ModeDescriptor { width, height, .. } = mode.descriptor;
        if source.width() < width || source.height() < height {
            return Err(Error::InvalidArgument);
        }
        let rect = match damage {
            Damage::Full => Rect::from_extent(width, height),
            Damage::Rect(rect) => rect.clamp_to(width, height),
        };
        Ok((mode, rect))
    }

    fn is_stale(&self, job: &Job) -> bool {
        job.generation != self.generation
    }

    fn check_open(&self) -> Result<(), Error> {
        if self.lost {
            Err(Error::DeviceLost)
        } else if self.closed {
            Err(Error::AlreadyClosed)
        } else if !self.pool.is_allocated() {
            Err(Error::NotOpen)
        } else {
            Ok(())
        }
    }
}

/// One encoded frame update and the slot buffer holding it
struct Job {
    slot: usize,
    generation: u32,
    rect: Rect,
    len: usize,
    buffer: Box<[u8]>,
}

/// Slot and geometry chosen for an update, encoded outside the lock
struct Plan {
    slot: usize,
    generation: u32,
    buffer: Box<[u8]>,
    rect: Rect,
    convert: Converter,
}

impl Plan {
    fn encode(self, source: &FramebufferView<'_>) -> Job {
        let Plan {
            slot,
            generation,
            mut buffer,
            rect,
            convert,
        } = self;
        let header = FrameUpdateHeader::for_rect(rect.x, rect.y, rect.width, rect.height);
        let mut len = header.encode(&mut buffer);
        len += convert(source, &rect, &mut buffer[len..]);
        trace!("queue slot {=usize}: {=usize} bytes", slot, len);
        Job {
            slot,
            generation,
            rect,
            len,
            buffer,
        }
    }
}

enum Outcome {
    Sent,
    Failed(ErrorKind),
    Cancelled,
}

/// Frame transfer pipeline shared by the producer and the bulk worker
pub struct Pipeline {
    config: PipelineConfig,
    state: Mutex<CriticalSectionRawMutex, RefCell<State>>,
    jobs: Channel<CriticalSectionRawMutex, Job, SLOT_COUNT>,
    completions: [Signal<CriticalSectionRawMutex, ()>; SLOT_COUNT],
    cancel: Signal<CriticalSectionRawMutex, ()>,
    lost: Signal<CriticalSectionRawMutex, ()>,
}

impl Pipeline {
    /// Create a closed pipeline; nothing is allocated until [`Pipeline::open`]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RefCell::new(State::new())),
            jobs: Channel::new(),
            completions: core::array::from_fn(|_| Signal::new()),
            cancel: Signal::new(),
            lost: Signal::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        self.state.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Allocate the slot buffers and start a fresh session
    ///
    /// Opening an open pipeline does nothing.
    pub fn open(&self) -> Result<(), Error> {
        self.config.validate()?;
        let capacity = self.config.slot_capacity();
        let opened = self.with_state(|state| {
            if state.pool.is_allocated() {
                return false;
            }
            let worker_active = state.worker_active;
            *state = State::new();
            state.worker_active = worker_active;
            state.pool.allocate(capacity);
            true
        });
        if opened {
            self.cancel.reset();
            self.lost.reset();
            for completion in &self.completions {
                completion.reset();
            }
            info!("pipeline open, {=usize} bytes per slot", capacity);
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.with_state(|state| state.check_open().is_ok())
    }

    /// Check whether a mode fits the slot buffers and has a converter
    pub fn accepts(&self, mode: &ModeDescriptor) -> bool {
        converter(mode.pixel_format).is_some()
            && mode.aligned_width() <= self.config.max_width
            && mode.height <= self.config.max_height
    }

    /// Switch the active mode
    ///
    /// Pending and carried-over damage refer to the old geometry and are
    /// dropped; the next transfer is a full frame. Transfers still queued
    /// or on the wire for the old mode are abandoned and their damage
    /// discarded.
    pub fn set_mode(&self, mode: ModeDescriptor) -> Result<(), Error> {
        let convert = match converter(mode.pixel_format) {
            Some(convert) if self.accepts(&mode) => convert,
            _ => {
                return Err(Error::UnsupportedMode {
                    width: mode.width,
                    height: mode.height,
                    hz: mode.refresh_hz,
                })
            }
        };
        self.with_state(|state| {
            state.check_open()?;
            state.mode = Some(ActiveMode {
                descriptor: mode,
                convert,
            });
            state.pending = None;
            state.previous = None;
            state.force_full = true;
            state.generation = state.generation.wrapping_add(1);
            Ok(())
        })
    }

    /// Make the next transfer a full frame
    pub fn force_full_frame(&self) {
        self.with_state(|state| state.force_full = true);
    }

    /// Damage waiting for a free slot
    pub fn pending_damage(&self) -> Option<Rect> {
        self.with_state(|state| state.pending)
    }

    /// Number of slots currently lent to transfers
    pub fn in_flight(&self) -> usize {
        self.with_state(|state| state.pool.busy_count())
    }

    /// Submit damage for transfer
    ///
    /// Never waits for the bulk endpoint. Damage that cannot be sent now
    /// is kept and folded into the next update. Empty damage is accepted
    /// and ignored.
    pub fn submit_update(&self, damage: Damage, source: &FramebufferView<'_>) -> Result<(), Error> {
        if let Some(plan) = self.plan(damage, source)? {
            let job = plan.encode(source);
            self.enqueue(job);
        }
        Ok(())
    }

    /// Record damage as pending without starting a transfer
    ///
    /// Validated like [`Pipeline::submit_update`]. The damage goes out
    /// with the next submitted update.
    pub fn defer_update(&self, damage: Damage, source: &FramebufferView<'_>) -> Result<(), Error> {
        self.with_state(|state| -> Result<(), Error> {
            let (_, rect) = state.clip(damage, source)?;
            state.pending = merge(state.pending, rect);
            Ok(())
        })
    }

    /// Pick a slot and the rectangle to send, or fold the damage into
    /// pending when both slots are busy
    fn plan(&self, damage: Damage, source: &FramebufferView<'_>) -> Result<Option<Plan>, Error> {
        self.with_state(|state| -> Result<Option<Plan>, Error> {
            let (mode, rect) = state.clip(damage, source)?;
            let descriptor = mode.descriptor;
            let extent = Rect::from_extent(descriptor.width, descriptor.height);
            if rect.is_empty() {
                return Ok(None);
            }

            let Some((slot, buffer)) = state.pool.acquire() else {
                state.pending = merge(state.pending, rect);
                trace!("slots busy, damage pending");
                return Ok(None);
            };

            let send = if state.force_full || damage == Damage::Full {
                state.force_full = false;
                state.pending = None;
                state.previous = Some(extent);
                extent
            } else {
                let fresh = state.pending.take().map_or(rect, |pending| pending.union(&rect));
                let send = state.previous.map_or(fresh, |previous| previous.union(&fresh));
                state.previous = Some(fresh);
                send
            };
            Ok(Some(Plan {
                slot,
                generation: state.generation,
                buffer,
                rect: send
                    .clamp_to(descriptor.width, descriptor.height)
                    .align_columns(descriptor.aligned_width()),
                convert: mode.convert,
            }))
        })
    }

    /// Hand an encoded job to the worker
    ///
    /// A close, loss or mode switch that happened while encoding takes
    /// the job back.
    fn enqueue(&self, job: Job) {
        let rejected = self.state.lock(|cell| {
            let state = cell.borrow();
            if state.check_open().is_err() || job.generation != state.generation {
                return Some(job);
            }
            match self.jobs.try_send(job) {
                Ok(()) => None,
                Err(TrySendError::Full(job)) => Some(job),
            }
        });
        if let Some(job) = rejected {
            self.finish(job, Outcome::Cancelled);
        }
    }

    /// Drive the bulk endpoint
    ///
    /// Transfers queued jobs one at a time, in submission order, splitting
    /// each into writes of at most [`MAX_TRANSFER_LENGTH`] bytes. Runs until
    /// the future is dropped. Only one worker may run; a second call
    /// returns immediately.
    pub async fn run<B: BulkOut>(&self, bulk: &mut B) {
        let claimed = self.with_state(|state| !core::mem::replace(&mut state.worker_active, true));
        if !claimed {
            warn!("transfer worker already running");
            return;
        }
        let _worker = WorkerGuard { pipeline: self };

        loop {
            let job = self.jobs.receive().await;
            if self.with_state(|state| state.check_open().is_err() || state.is_stale(&job)) {
                self.finish(job, Outcome::Cancelled);
                continue;
            }

            let mut transfer = Transfer {
                pipeline: self,
                job: Some(job),
            };
            let outcome = match &transfer.job {
                Some(job) => self.transmit(bulk, job).await,
                None => Outcome::Cancelled,
            };
            transfer.complete(outcome);
        }
    }

    async fn transmit<B: BulkOut>(&self, bulk: &mut B, job: &Job) -> Outcome {
        let frame = &job.buffer[..job.len];
        let write_all = async {
            for chunk in frame.chunks(MAX_TRANSFER_LENGTH) {
                if self.with_state(|state| state.is_stale(job)) {
                    debug!("mode switched, frame abandoned");
                    return Outcome::Cancelled;
                }
                if let Err(e) = bulk.write(chunk).await {
                    let kind = e.kind();
                    warn!("frame transfer failed: {}", kind);
                    return Outcome::Failed(kind);
                }
            }
            Outcome::Sent
        };

        match select(write_all, self.cancel.wait()).await {
            Either::First(outcome) => outcome,
            Either::Second(()) => {
                debug!("frame transfer cancelled");
                Outcome::Cancelled
            }
        }
    }

    /// Return a job's buffer to its slot and account for the outcome
    ///
    /// The rectangle of a job from an older mode is never merged back.
    fn finish(&self, job: Job, outcome: Outcome) {
        let Job {
            slot,
            generation,
            rect,
            buffer,
            ..
        } = job;
        let retry = self.config.retry;
        let limit = self.config.failure_limit;

        let give_up = self.with_state(|state| {
            state.pool.restore(slot, buffer);
            let current = generation == state.generation;
            match outcome {
                Outcome::Sent => {
                    state.failures = 0;
                    false
                }
                Outcome::Cancelled => {
                    if current {
                        state.pending = merge(state.pending, rect);
                    }
                    false
                }
                Outcome::Failed(kind) => {
                    if current && retry == RetryPolicy::Remerge {
                        state.pending = merge(state.pending, rect);
                    }
                    state.failures = state.failures.saturating_add(1);
                    kind.is_fatal() || state.failures >= limit
                }
            }
        });

        if give_up {
            self.mark_lost();
        }
        self.completions[slot].signal(());
    }

    /// Check whether the adapter has been declared lost
    pub fn is_lost(&self) -> bool {
        self.with_state(|state| state.lost)
    }

    /// Declare the adapter lost
    ///
    /// Returns `true` for the call that made the transition; the loss
    /// signal is raised only then.
    pub fn mark_lost(&self) -> bool {
        let newly_lost = self.with_state(|state| !core::mem::replace(&mut state.lost, true));
        if newly_lost {
            error!("device lost");
            self.cancel.signal(());
            self.lost.signal(());
        }
        newly_lost
    }

    /// Wait until the adapter is declared lost
    pub async fn wait_device_lost(&self) {
        while !self.is_lost() {
            self.lost.wait().await;
        }
    }

    /// Stop accepting updates, cancel outstanding transfers and free the
    /// slot buffers
    ///
    /// Resolves once no transfer holds a slot. Queued jobs are dropped
    /// without touching the endpoint; the transfer on the wire is
    /// abandoned by the worker.
    pub async fn close(&self) -> Result<(), Error> {
        self.with_state(|state| {
            if state.closed {
                return Err(Error::AlreadyClosed);
            }
            if !state.pool.is_allocated() {
                return Err(Error::NotOpen);
            }
            state.closed = true;
            Ok(())
        })?;

        self.cancel.signal(());
        while let Ok(job) = self.jobs.try_receive() {
            self.finish(job, Outcome::Cancelled);
        }
        for (slot, completion) in self.completions.iter().enumerate() {
            while self.with_state(|state| state.pool.is_busy(slot)) {
                completion.wait().await;
            }
        }

        self.with_state(|state| {
            state.pool.release();
            state.mode = None;
            state.pending = None;
            state.previous = None;
        });
        info!("pipeline closed");
        Ok(())
    }
}

/// Clears the worker claim when `run` ends or is dropped
struct WorkerGuard<'a> {
    pipeline: &'a Pipeline,
}

impl Drop for WorkerGuard<'_> {
    fn drop(&mut self) {
        self.pipeline.with_state(|state| state.worker_active = false);
    }
}

/// A job on the wire; dropping it mid-write finishes it as cancelled
struct Transfer<'a> {
    pipeline: &'a Pipeline,
    job: Option<Job>,
}

impl Transfer<'_> {
    fn complete(&mut self, outcome: Outcome) {
        if let Some(job) = self.job.take() {
            self.pipeline.finish(job, outcome);
        }
    }
}

impl Drop for Transfer<'_> {
    fn drop(&mut self) {
        self.complete(Outcome::Cancelled);
    }
}
