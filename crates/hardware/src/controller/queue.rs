//! Request Queue.
//!
//! Accepted requests wait here until their terminating RD/WR command is emitted.
//! The queue provides:
//! 1. **Admission:** Time-ordered acceptance with backpressure when full or early.
//! 2. **Aging:** Every resident entry ages by one each controller cycle.
//! 3. **Selection:** Oldest-first views of entries that have not yet been handed to a bank.
//! 4. **Retirement:** Removal of a specific entry once its command is on the bus.
//!
//! Storage is a ring buffer. New entries are inserted at `head`; the oldest entry
//! sits at `tail`. Retirement normally removes the tail entry; when a younger
//! request overtook an older one to an idle bank, the gap is closed by shifting
//! the older entries one slot toward the head.

use crate::common::data::Opcode;

/// Monotonic identifier assigned to each admitted request.
pub type RequestId = u64;

/// A memory request as delivered by the request source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRequest {
    /// Read or write.
    pub opcode: Opcode,
    /// Physical address.
    pub address: u64,
    /// Earliest controller cycle at which the request may be admitted.
    pub issue_time: u64,
}

impl MemoryRequest {
    /// Creates a request.
    pub const fn new(opcode: Opcode, address: u64, issue_time: u64) -> Self {
        Self {
            opcode,
            address,
            issue_time,
        }
    }
}

/// A resident queue entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueueEntry {
    /// Identifier assigned at admission.
    pub id: RequestId,
    /// The admitted request; never modified after admission.
    pub request: MemoryRequest,
    /// Cycles spent in the queue.
    pub age: u64,
    /// Cycle at which the request was admitted.
    pub admitted_at: u64,
    /// Whether the request has been latched into a bank.
    pub dispatched: bool,
}

/// Result of offering a request to the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdmitOutcome {
    /// The request now lives in the queue under this id.
    Admitted(RequestId),
    /// The request was refused; the source must resubmit it.
    Pending,
}

/// Bounded, time-ordered request queue.
#[derive(Debug)]
pub struct RequestQueue {
    slots: Vec<Option<QueueEntry>>,
    /// Index where the next entry will be inserted.
    head: usize,
    /// Index of the oldest entry.
    tail: usize,
    /// Number of resident entries.
    count: usize,
    next_id: RequestId,
}

impl RequestQueue {
    /// Creates an empty queue holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; configuration validation rejects that case.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "request queue capacity must be non-zero");
        Self {
            slots: vec![None; capacity],
            head: 0,
            tail: 0,
            count: 0,
            next_id: 0,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of resident entries.
    #[inline]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no entries are resident.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the queue holds `capacity` entries.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.slots.len()
    }

    /// Offers a request to the queue.
    ///
    /// The request is admitted if the queue is empty, or if it has room and
    /// `current_time` has reached the request's issue time. Otherwise it is
    /// refused and nothing is stored.
    ///
    /// # Arguments
    ///
    /// * `request` - The offered request.
    /// * `current_time` - The controller cycle of the offer.
    ///
    /// # Returns
    ///
    /// `AdmitOutcome::Admitted` with the new id, or `AdmitOutcome::Pending`.
    pub fn try_admit(&mut self, request: MemoryRequest, current_time: u64) -> AdmitOutcome {
        let admissible =
            self.is_empty() || (!self.is_full() && current_time >= request.issue_time);
        if !admissible {
            return AdmitOutcome::Pending;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.slots[self.head] = Some(QueueEntry {
            id,
            request,
            age: 0,
            admitted_at: current_time,
            dispatched: false,
        });
        self.head = (self.head + 1) % self.slots.len();
        self.count += 1;
        AdmitOutcome::Admitted(id)
    }

    /// Increments the age of every resident entry.
    pub fn age_all(&mut self) {
        for entry in self.slots.iter_mut().flatten() {
            entry.age += 1;
        }
    }

    /// Iterates resident entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &QueueEntry> + '_ {
        let cap = self.slots.len();
        (0..self.count).filter_map(move |i| self.slots[(self.tail + i) % cap].as_ref())
    }

    /// Returns the oldest resident entry without removing it.
    pub fn oldest(&self) -> Option<&QueueEntry> {
        if self.is_empty() {
            None
        } else {
            self.slots[self.tail].as_ref()
        }
    }

    /// Iterates entries not yet latched into a bank, oldest first.
    pub fn candidates(&self) -> impl Iterator<Item = &QueueEntry> + '_ {
        self.iter().filter(|e| !e.dispatched)
    }

    /// Returns the oldest entry not yet latched into a bank.
    pub fn select_candidate(&self) -> Option<&QueueEntry> {
        self.candidates().next()
    }

    /// Looks up a resident entry by id.
    pub fn get(&self, id: RequestId) -> Option<&QueueEntry> {
        self.iter().find(|e| e.id == id)
    }

    /// Records that entry `id` has been latched into a bank.
    ///
    /// # Returns
    ///
    /// `false` if no such entry is resident.
    pub fn mark_dispatched(&mut self, id: RequestId) -> bool {
        match self.position(id) {
            Some(offset) => {
                let idx = self.physical(offset);
                if let Some(entry) = self.slots[idx].as_mut() {
                    entry.dispatched = true;
                }
                true
            }
            None => false,
        }
    }

    /// Removes entry `id` from the queue.
    ///
    /// # Returns
    ///
    /// The removed entry, or `None` if it was not resident.
    pub fn retire(&mut self, id: RequestId) -> Option<QueueEntry> {
        let offset = self.position(id)?;
        let at = self.physical(offset);
        let removed = self.slots[at].take();

        // Close the gap by moving every older entry one slot toward the head.
        for k in (0..offset).rev() {
            let from = self.physical(k);
            let to = self.physical(k + 1);
            self.slots[to] = self.slots[from].take();
        }

        self.tail = (self.tail + 1) % self.slots.len();
        self.count -= 1;
        removed
    }

    /// Offset from the tail of entry `id`.
    fn position(&self, id: RequestId) -> Option<usize> {
        self.iter().position(|e| e.id == id)
    }

    #[inline]
    fn physical(&self, offset: usize) -> usize {
        (self.tail + offset) % self.slots.len()
    }
}
