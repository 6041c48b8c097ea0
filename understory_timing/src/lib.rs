// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_timing --heading-base-level=0

//! Understory Timing: host-agnostic timer queue primitives for UI runtimes.
//!
//! UI code frequently needs "do this in 400 ms" or "do this every frame until
//! told otherwise". On the web that is `setTimeout`/`setInterval`; in native
//! shells it is whatever the event loop offers. This crate keeps the
//! bookkeeping host-agnostic: a [`TimerQueue`] stores deadlines and payloads,
//! and the host decides when time advances.
//!
//! - Time is a plain `u64` in milliseconds. The epoch is up to the host; only
//!   differences matter.
//! - [`TimerQueue::schedule_at`] and [`TimerQueue::schedule_after`] return a
//!   [`TimerId`] handle that can be used to cancel the timer.
//! - [`TimerQueue::pop_due`] yields expired timers in deadline order. Timers
//!   sharing a deadline are yielded in the order they were scheduled.
//! - [`TimerQueue::next_deadline`] tells the host when it needs to wake up.
//!
//! Repeating timers are expressed by rescheduling from the expired deadline
//! (not from "now"), which keeps the cadence free of drift.
//!
//! ## Minimal example
//!
//! ```rust
//! use understory_timing::TimerQueue;
//!
//! #[derive(Debug, PartialEq)]
//! enum Wake {
//!     Blink,
//!     Tooltip,
//! }
//!
//! let mut timers = TimerQueue::new();
//! let blink = timers.schedule_after(0, 500, Wake::Blink);
//! timers.schedule_after(0, 300, Wake::Tooltip);
//!
//! assert_eq!(timers.next_deadline(), Some(300));
//! assert!(timers.pop_due(299).is_none());
//!
//! let expired = timers.pop_due(300).unwrap();
//! assert_eq!(expired.payload, Wake::Tooltip);
//!
//! // The blink timer is no longer wanted.
//! assert_eq!(timers.cancel(blink), Some(Wake::Blink));
//! assert!(timers.is_empty());
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

use alloc::collections::VecDeque;

/// Handle to a scheduled timer.
///
/// Handles are never reused by the queue that issued them, so a stale handle
/// can be cancelled safely (it simply no longer matches anything).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// An expired timer returned by [`TimerQueue::pop_due`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expired<T> {
    /// Handle the timer was scheduled with.
    pub id: TimerId,
    /// Deadline the timer was scheduled for.
    ///
    /// This may be earlier than the `now` passed to [`TimerQueue::pop_due`]
    /// when the host wakes up late.
    pub deadline: u64,
    /// Payload supplied when scheduling.
    pub payload: T,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    deadline: u64,
    id: TimerId,
    payload: T,
}

/// Deadline-ordered queue of pending timers.
///
/// The queue is optimized for the small number of concurrent timers typical of
/// a single widget or controller: entries live in a sorted ring buffer, so
/// popping the earliest timer is O(1) and scheduling is a binary search plus
/// an insert.
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    entries: VecDeque<Entry<T>>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Schedules `payload` to expire at the absolute time `deadline`.
    pub fn schedule_at(&mut self, deadline: u64, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        // Equal deadlines keep scheduling order.
        let index = self.entries.partition_point(|e| e.deadline <= deadline);
        self.entries.insert(
            index,
            Entry {
                deadline,
                id,
                payload,
            },
        );
        id
    }

    /// Schedules `payload` to expire `delay` milliseconds after `now`.
    pub fn schedule_after(&mut self, now: u64, delay: u64, payload: T) -> TimerId {
        self.schedule_at(now.saturating_add(delay), payload)
    }

    /// Cancels a pending timer, returning its payload.
    ///
    /// Returns `None` if the timer already expired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> Option<T> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        self.entries.remove(index).map(|e| e.payload)
    }

    /// Cancels the timer held in `slot`, if any, leaving the slot empty.
    ///
    /// This is convenient for state machines that keep one optional handle per
    /// state.
    pub fn cancel_slot(&mut self, slot: &mut Option<TimerId>) -> Option<T> {
        slot.take().and_then(|id| self.cancel(id))
    }

    /// Returns `true` if the timer is still waiting to expire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Returns the deadline of a pending timer.
    #[must_use]
    pub fn deadline(&self, id: TimerId) -> Option<u64> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.deadline)
    }

    /// Returns the earliest pending deadline.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.entries.front().map(|e| e.deadline)
    }

    /// Removes and returns the earliest timer whose deadline is `<= now`.
    ///
    /// Call this in a loop to drain every timer that is due.
    pub fn pop_due(&mut self, now: u64) -> Option<Expired<T>> {
        if self.entries.front()?.deadline > now {
            return None;
        }
        self.entries.pop_front().map(|e| Expired {
            id: e.id,
            deadline: e.deadline,
            payload: e.payload,
        })
    }

    /// Cancels every pending timer.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
