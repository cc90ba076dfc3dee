//! Free-running tick scheduler.
//!
//! [`AutoTick`] drives a shared [`Circuit`] from a dedicated thread,
//! issuing tick cycles back-to-back until paused or stopped. The circuit
//! stays behind its mutex, so editors and parameter changes interleave
//! with ticking at cycle granularity.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::circuit::{Circuit, TickMode};

struct SchedulerState {
    paused: bool,
    stop: bool,
}

struct SchedulerShared {
    state: Mutex<SchedulerState>,
    cond: Condvar,
}

/// Continuously ticks a circuit on a background thread.
///
/// Dropping an `AutoTick` stops the scheduler and joins its thread; the
/// cycle in flight at that moment completes first.
pub struct AutoTick {
    circuit: Arc<Mutex<Circuit>>,
    mode: TickMode,
    shared: Arc<SchedulerShared>,
    handle: Option<JoinHandle<()>>,
}

impl AutoTick {
    /// Creates a stopped scheduler for `circuit`.
    pub fn new(circuit: Arc<Mutex<Circuit>>, mode: TickMode) -> Self {
        Self {
            circuit,
            mode,
            shared: Arc::new(SchedulerShared {
                state: Mutex::new(SchedulerState {
                    paused: false,
                    stop: false,
                }),
                cond: Condvar::new(),
            }),
            handle: None,
        }
    }

    /// Starts (or restarts) free-running ticking. Idempotent while
    /// running; a paused scheduler resumes.
    pub fn start(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.paused = false;
            self.shared.cond.notify_all();
        }
        if self.handle.is_some() {
            return;
        }
        self.shared.state.lock().unwrap().stop = false;

        let circuit = Arc::clone(&self.circuit);
        let shared = Arc::clone(&self.shared);
        let mode = self.mode;
        self.handle = Some(std::thread::spawn(move || loop {
            {
                let mut state = shared.state.lock().unwrap();
                loop {
                    if state.stop {
                        return;
                    }
                    if !state.paused {
                        break;
                    }
                    state = shared.cond.wait(state).unwrap();
                }
            }
            circuit.lock().unwrap().tick(mode);
        }));
        tracing::debug!("autotick_start: {mode:?}");
    }

    /// Parks the scheduler after the cycle in flight completes. The
    /// circuit itself is untouched — pipelined cycles already dispatched
    /// keep draining.
    pub fn pause(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.paused = true;
        self.shared.cond.notify_all();
    }

    /// Resumes a paused scheduler. No-op when running or stopped.
    pub fn resume(&self) {
        let mut state = self.shared.state.lock().unwrap();
        state.paused = false;
        self.shared.cond.notify_all();
    }

    /// Whether the scheduler is currently parked.
    pub fn is_paused(&self) -> bool {
        self.shared.state.lock().unwrap().paused
    }

    /// Stops the scheduler and joins its thread. The cycle in flight
    /// completes; further `start` calls spin up a fresh thread.
    pub fn stop(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.stop = true;
            self.shared.cond.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        tracing::debug!("autotick_stop");
    }
}

impl Drop for AutoTick {
    fn drop(&mut self) {
        self.stop();
    }
}
