// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;
use core::ops::{Add, Sub};
use pacer_core::{CancellationToken, PacerError, Result};
use pacer_runtime::{Callback, Clock, ScheduledHandle, Scheduler};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::{Arc, Weak};
use std::time::Duration;

/// Point on the virtual timeline, measured from the scheduler's creation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ManualInstant(Duration);

impl ManualInstant {
    pub const fn since_start(self) -> Duration {
        self.0
    }

    /// Whole milliseconds since the scheduler was created.
    pub fn as_millis(self) -> u64 {
        u64::try_from(self.0.as_millis()).unwrap_or(u64::MAX)
    }
}

impl Add<Duration> for ManualInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs))
    }
}

impl Sub for ManualInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

type EntryKey = (Duration, u64);

struct Entry {
    callback: Callback,
    token: CancellationToken,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    next_seq: u64,
    entries: BTreeMap<EntryKey, Entry>,
    shut_down: bool,
}

impl Queue {
    fn pop_due(&mut self, target: Duration) -> Option<Entry> {
        let key = *self.entries.keys().next().filter(|(deadline, _)| *deadline <= target)?;
        let entry = self.entries.remove(&key)?;
        self.now = self.now.max(key.0);
        Some(entry)
    }
}

/// Deterministic scheduler over virtual time.
///
/// Clones share the same timeline and queue. Callbacks only run inside
/// [`advance`](Self::advance) and its variants, on the calling thread, in
/// deadline order (ties in scheduling order). The queue lock is released
/// while a callback runs, so callbacks may schedule or cancel further work;
/// anything that becomes due before the advance target runs in the same
/// advance. A panicking callback unwinds out of `advance`.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<Queue>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> ManualInstant {
        ManualInstant(self.queue.lock().now)
    }

    pub fn now_ms(&self) -> u64 {
        self.now().as_millis()
    }

    /// Move the clock forward by `by`, running every callback that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.queue.lock().now.saturating_add(by);

        loop {
            let due = self.queue.lock().pop_due(target);
            match due {
                Some(entry) if !entry.token.is_cancelled() => (entry.callback)(),
                Some(_) => {}
                None => break,
            }
        }

        let mut queue = self.queue.lock();
        queue.now = queue.now.max(target);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }

    /// Advance to an absolute virtual time. Going backwards is a no-op.
    pub fn advance_to_ms(&self, ms: u64) {
        let target = Duration::from_millis(ms);
        let now = self.queue.lock().now;
        self.advance(target.saturating_sub(now));
    }

    /// Run callbacks that are already due without moving the clock.
    pub fn run_pending(&self) {
        self.advance(Duration::ZERO);
    }

    /// Number of scheduled callbacks that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.queue.lock().entries.len()
    }

    /// Deadline of the earliest outstanding callback.
    pub fn next_deadline(&self) -> Option<ManualInstant> {
        self.queue
            .lock()
            .entries
            .keys()
            .next()
            .map(|(deadline, _)| ManualInstant(*deadline))
    }

    /// Drop every outstanding callback and reject further scheduling.
    pub fn shut_down(&self) {
        let mut queue = self.queue.lock();
        queue.shut_down = true;
        queue.entries.clear();
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queue = self.queue.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &queue.now)
            .field("pending", &queue.entries.len())
            .field("shut_down", &queue.shut_down)
            .finish()
    }
}

impl Clock for ManualScheduler {
    type Instant = ManualInstant;

    fn now(&self) -> ManualInstant {
        ManualScheduler::now(self)
    }
}

impl Scheduler for ManualScheduler {
    type Handle = ManualHandle;

    fn schedule(&self, delay: Duration, callback: Callback) -> Result<ManualHandle> {
        let mut queue = self.queue.lock();
        if queue.shut_down {
            return Err(PacerError::scheduler_shutdown("manual scheduler"));
        }

        let key = (queue.now.saturating_add(delay), queue.next_seq);
        queue.next_seq += 1;

        let token = CancellationToken::new();
        queue.entries.insert(
            key,
            Entry {
                callback,
                token: token.clone(),
            },
        );

        Ok(ManualHandle {
            key,
            token,
            queue: Arc::downgrade(&self.queue),
        })
    }
}

/// Handle to a callback queued on a [`ManualScheduler`].
pub struct ManualHandle {
    key: EntryKey,
    token: CancellationToken,
    queue: Weak<Mutex<Queue>>,
}

impl ManualHandle {
    pub fn deadline(&self) -> ManualInstant {
        ManualInstant(self.key.0)
    }
}

impl fmt::Debug for ManualHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualHandle")
            .field("deadline", &self.key.0)
            .field("cancelled", &self.token.is_cancelled())
            .finish()
    }
}

impl ScheduledHandle for ManualHandle {
    fn cancel(&self) {
        self.token.cancel();
        if let Some(queue) = self.queue.upgrade() {
            queue.lock().entries.remove(&self.key);
        }
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}
