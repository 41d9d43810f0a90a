use crate::worker::WorkerResult;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct CounterState {
    /// Bumped by every reset; identifies the wave currently being counted
    epoch: u64,
    failures: u64,
    late_discarded: u64,
}

/// Failure counter for the wave in flight
///
/// All mutation happens under one mutex, so concurrent `record_failure`
/// calls never lose an increment. Each [`reset`](Self::reset) opens a new
/// epoch; results recorded through a [`WaveTicket`] from an older epoch are
/// dropped instead of leaking into the next wave's count.
#[derive(Debug, Default)]
pub struct AggregateCounter {
    state: Mutex<CounterState>,
}

/// Outcome of handing a worker result to the counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Success,
    Failure,
    /// The wave the result belongs to has already been reported
    Discarded,
}

impl AggregateCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, CounterState> {
        // Plain counters stay consistent even if a holder panicked
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Zeroes the failure count and starts a new epoch
    pub fn reset(&self) {
        let mut state = self.lock();
        state.epoch += 1;
        state.failures = 0;
    }

    /// Counts one failure against the current wave and returns the new total
    pub fn record_failure(&self) -> u64 {
        let mut state = self.lock();
        state.failures += 1;
        state.failures
    }

    /// Current failure count
    pub fn snapshot(&self) -> u64 {
        self.lock().failures
    }

    /// Reads the count and opens a new epoch under a single lock, so no
    /// result can land between the read and the reset
    pub fn snapshot_and_reset(&self) -> u64 {
        let mut state = self.lock();
        let failures = state.failures;
        state.epoch += 1;
        state.failures = 0;
        failures
    }

    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Total number of failures that arrived after their wave was closed
    pub fn late_discarded(&self) -> u64 {
        self.lock().late_discarded
    }

    /// Hands out a recorder bound to the current epoch
    ///
    /// Take the ticket before the wave's first launch; a ticket taken after
    /// the wave has been closed belongs to the next one.
    pub fn ticket(self: &Arc<Self>) -> WaveTicket {
        WaveTicket {
            counter: Arc::clone(self),
            epoch: self.epoch(),
        }
    }

    fn record_failure_in(&self, epoch: u64) -> Recorded {
        let mut state = self.lock();
        if state.epoch == epoch {
            state.failures += 1;
            Recorded::Failure
        } else {
            state.late_discarded += 1;
            Recorded::Discarded
        }
    }
}

/// A worker's handle on the counter for the wave it was launched in
#[derive(Debug, Clone)]
pub struct WaveTicket {
    counter: Arc<AggregateCounter>,
    epoch: u64,
}

impl WaveTicket {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Records a failure if the ticket's wave is still open
    pub fn record_failure(&self) -> Recorded {
        self.counter.record_failure_in(self.epoch)
    }

    /// Records a worker outcome; successes leave the counter untouched
    pub fn record(&self, result: &WorkerResult) -> Recorded {
        if result.succeeded {
            Recorded::Success
        } else {
            self.record_failure()
        }
    }
}
