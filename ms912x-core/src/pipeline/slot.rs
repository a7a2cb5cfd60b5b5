//! Fixed pool of reusable transfer buffers
//!
//! A slot owns its buffer only while idle. Acquiring a slot moves the
//! buffer out to the transfer job; the job hands it back on completion.
//! A busy slot therefore has nothing to give, and releasing the pool can
//! only free buffers no transfer is using.

use alloc::boxed::Box;
use alloc::vec;

/// Number of slots in the pool
pub const SLOT_COUNT: usize = 2;

enum SlotState {
    /// No buffer allocated (before open, after close)
    Released,
    /// Buffer available for the next transfer
    Idle(Box<[u8]>),
    /// Buffer lent to a transfer job
    InFlight,
}

/// Round-robin slot pool
pub(crate) struct SlotPool {
    slots: [SlotState; SLOT_COUNT],
    next: usize,
}

impl SlotPool {
    pub fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| SlotState::Released),
            next: 0,
        }
    }

    /// Allocate every buffer with `capacity` bytes
    pub fn allocate(&mut self, capacity: usize) {
        for slot in self.slots.iter_mut() {
            *slot = SlotState::Idle(vec![0u8; capacity].into_boxed_slice());
        }
        self.next = 0;
    }

    /// Free every buffer
    ///
    /// Callers wait until no slot is busy first; a lent buffer is
    /// owned by its job and is not affected.
    pub fn release(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = SlotState::Released;
        }
    }

    pub fn is_allocated(&self) -> bool {
        self.slots.iter().any(|s| !matches!(s, SlotState::Released))
    }

    /// Take the next slot in round-robin order if it is idle
    ///
    /// A busy slot is never skipped, so transfers are queued in
    /// submission order.
    pub fn acquire(&mut self) -> Option<(usize, Box<[u8]>)> {
        let index = self.next;
        match core::mem::replace(&mut self.slots[index], SlotState::InFlight) {
            SlotState::Idle(buffer) => {
                self.next = (index + 1) % SLOT_COUNT;
                Some((index, buffer))
            }
            other => {
                self.slots[index] = other;
                None
            }
        }
    }

    /// Return a lent buffer
    pub fn restore(&mut self, index: usize, buffer: Box<[u8]>) {
        self.slots[index] = SlotState::Idle(buffer);
    }

    pub fn is_busy(&self, index: usize) -> bool {
        matches!(self.slots[index], SlotState::InFlight)
    }

    pub fn busy_count(&self) -> usize {
        self.slots.iter().filter(|s| matches!(s, SlotState::InFlight)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unallocated_pool_has_nothing_to_lend() {
        let mut pool = SlotPool::new();
        assert!(!pool.is_allocated());
        assert!(pool.acquire().is_none());
        assert_eq!(pool.busy_count(), 0);
    }

    #[test]
    fn test_round_robin() {
        let mut pool = SlotPool::new();
        pool.allocate(16);
        let (a, buf_a) = pool.acquire().unwrap();
        let (b, buf_b) = pool.acquire().unwrap();
        assert_eq!((a, b), (0, 1));
        assert_eq!(pool.busy_count(), 2);

        pool.restore(a, buf_a);
        let (c, _) = pool.acquire().unwrap();
        assert_eq!(c, 0);
        drop(buf_b);
    }

    #[test]
    fn test_busy_slot_is_not_skipped() {
        let mut pool = SlotPool::new();
        pool.allocate(16);
        let (_, buf0) = pool.acquire().unwrap();
        let (_, buf1) = pool.acquire().unwrap();
        // Slot 1 comes back first, but slot 0 is next in order
        pool.restore(1, buf1);
        assert!(pool.acquire().is_none());
        assert!(pool.is_busy(0));
        pool.restore(0, buf0);
        assert_eq!(pool.acquire().unwrap().0, 0);
    }

    #[test]
    fn test_release_frees_idle_buffers() {
        let mut pool = SlotPool::new();
        pool.allocate(16);
        pool.release();
        assert!(!pool.is_allocated());
    }
}
