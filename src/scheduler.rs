#![warn(clippy::all, clippy::pedantic)]

use bevy_ecs::prelude::*;
use log::trace;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// The cancellable periodic processes of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Process {
    Countdown,
    Spawn,
    Accelerate,
    TargetTick,
}

impl Process {
    pub const ALL: [Process; 4] = [
        Process::Countdown,
        Process::Spawn,
        Process::Accelerate,
        Process::TargetTick,
    ];
}

// Field order matters: entries sort by fire time, then by scheduling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    fire_at_ms: u64,
    seq: u64,
    process: Process,
    arm_id: u64,
    period_ms: u64,
}

/// Discrete-event scheduler.
///
/// Each process has at most one live arm id. Cancelling a process drops its
/// live id; heap entries carrying a dead id are discarded when they surface,
/// so a cancelled process can never fire again.
#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<Entry>>,
    live: HashMap<Process, u64>,
    next_seq: u64,
    next_arm_id: u64,
}

impl Scheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms `process` to fire every `period_ms`, first at `now_ms + period_ms`.
    /// Any previous arming of the same process is cancelled.
    pub fn every(&mut self, process: Process, now_ms: u64, period_ms: u64) {
        let period_ms = period_ms.max(1);
        let arm_id = self.next_arm_id;
        self.next_arm_id += 1;
        self.live.insert(process, arm_id);
        self.push(process, arm_id, now_ms.saturating_add(period_ms), period_ms);
        trace!("Armed {process:?} every {period_ms}ms from {now_ms}ms");
    }

    /// Returns whether the process was live
    pub fn cancel(&mut self, process: Process) -> bool {
        let was_live = self.live.remove(&process).is_some();
        if was_live {
            trace!("Cancelled {process:?}");
        }
        was_live
    }

    pub fn cancel_all(&mut self) {
        for process in Process::ALL {
            self.cancel(process);
        }
        self.heap.clear();
    }

    #[must_use]
    pub fn is_live(&self, process: Process) -> bool {
        self.live.contains_key(&process)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Fire time of the earliest live entry
    pub fn next_fire_at(&mut self) -> Option<u64> {
        self.discard_stale();
        self.heap.peek().map(|Reverse(entry)| entry.fire_at_ms)
    }

    /// Pops the earliest live entry due at or before `until_ms`.
    ///
    /// The process is re-armed for its next period before it is handed out,
    /// so a handler that cancels its own process leaves nothing behind.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(u64, Process)> {
        self.discard_stale();
        let due = matches!(self.heap.peek(), Some(Reverse(entry)) if entry.fire_at_ms <= until_ms);
        if !due {
            return None;
        }

        let Reverse(entry) = self.heap.pop()?;
        match entry.fire_at_ms.checked_add(entry.period_ms) {
            Some(next_fire_at) => {
                self.push(entry.process, entry.arm_id, next_fire_at, entry.period_ms);
            }
            // No later time exists on the clock, so this was the last firing
            None => {
                self.live.remove(&entry.process);
            }
        }
        Some((entry.fire_at_ms, entry.process))
    }

    fn push(&mut self, process: Process, arm_id: u64, fire_at_ms: u64, period_ms: u64) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            fire_at_ms,
            seq,
            process,
            arm_id,
            period_ms,
        }));
    }

    fn discard_stale(&mut self) {
        while let Some(Reverse(entry)) = self.heap.peek() {
            if self.live.get(&entry.process) == Some(&entry.arm_id) {
                break;
            }
            self.heap.pop();
        }
    }
}
