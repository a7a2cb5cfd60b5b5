//! Scripted bulk endpoint shared by the unit tests

use core::cell::RefCell;
use core::future::Future;
use std::collections::VecDeque;

use embassy_futures::select::{select, Either};
use embassy_futures::{block_on, yield_now};
use ms912x_hal::{BulkOut, ErrorKind};
use ms912x_protocol::FrameUpdateHeader;

use super::Pipeline;

#[derive(Default)]
pub struct BulkLog {
    /// Every successful write, in order
    pub chunks: Vec<Vec<u8>>,
    /// Writes currently in progress
    pub active: usize,
    pub max_active: usize,
    /// Park writes until cleared
    pub hold: bool,
    /// Errors returned by the next writes, one per write
    pub fail_next: VecDeque<ErrorKind>,
    /// Writes dropped before completing
    pub cancelled: usize,
}

impl BulkLog {
    /// Chunks regrouped into whole frame updates
    pub fn frames(&self) -> Vec<Vec<u8>> {
        let mut frames: Vec<Vec<u8>> = Vec::new();
        for chunk in &self.chunks {
            let complete = frames.last().map_or(true, |frame| {
                let header = FrameUpdateHeader::parse(frame).unwrap();
                frame.len() >= 8 + header.payload_len()
            });
            if complete {
                frames.push(chunk.clone());
            } else if let Some(frame) = frames.last_mut() {
                frame.extend_from_slice(chunk);
            }
        }
        frames
    }
}

pub struct MockBulk<'a> {
    log: &'a RefCell<BulkLog>,
}

impl<'a> MockBulk<'a> {
    pub fn new(log: &'a RefCell<BulkLog>) -> Self {
        Self { log }
    }
}

struct Active<'a> {
    log: &'a RefCell<BulkLog>,
    completed: bool,
}

impl Drop for Active<'_> {
    fn drop(&mut self) {
        let mut log = self.log.borrow_mut();
        log.active -= 1;
        if !self.completed {
            log.cancelled += 1;
        }
    }
}

impl BulkOut for MockBulk<'_> {
    type Error = ErrorKind;

    async fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        {
            let mut log = self.log.borrow_mut();
            log.active += 1;
            log.max_active = log.max_active.max(log.active);
        }
        let mut active = Active {
            log: self.log,
            completed: false,
        };
        while self.log.borrow().hold {
            yield_now().await;
        }
        active.completed = true;
        drop(active);

        let mut log = self.log.borrow_mut();
        if let Some(kind) = log.fail_next.pop_front() {
            return Err(kind);
        }
        log.chunks.push(data.to_vec());
        Ok(())
    }
}

/// Give the worker a chance to drain the queue
pub async fn settle() {
    for _ in 0..32 {
        yield_now().await;
    }
}

/// Run `body` alongside the pipeline worker
pub fn drive<F: Future>(pipeline: &Pipeline, bulk: &mut MockBulk<'_>, body: F) -> F::Output {
    match block_on(select(pipeline.run(bulk), body)) {
        Either::First(()) => panic!("transfer worker exited"),
        Either::Second(out) => out,
    }
}
