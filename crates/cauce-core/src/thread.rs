//! Parked worker threads for parallel ticking.
//!
//! Two thread shapes, both following the same resume/sync protocol: the
//! thread parks on a condition variable until handed work, runs it, marks
//! itself idle, and parks again. Threads are spawned once and reused for
//! every cycle; nothing is spawned per tick.
//!
//! - [`SlotWorker`] — one per (component × buffer slot). Receives a boxed
//!   closure per tick (the component's pull-inputs-and-process job).
//! - [`CircuitThread`] — one per buffer slot when the circuit is
//!   pipelined. Runs a fixed whole-graph traversal closure, parameterized
//!   only by the tick mode.

use std::sync::{Arc, Condvar, Mutex};
use std::thread::JoinHandle;

use crate::circuit::TickMode;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct WorkerState {
    job: Option<Job>,
    busy: bool,
    stop: bool,
}

struct WorkerShared {
    state: Mutex<WorkerState>,
    cond: Condvar,
}

/// A persistent worker thread executing one job per tick.
///
/// `busy` is raised by [`resume`](Self::resume) and lowered by the worker
/// after the job returns, so [`sync`](Self::sync) doubles as the
/// completion signal downstream components block on.
pub(crate) struct SlotWorker {
    shared: Arc<WorkerShared>,
    handle: Option<JoinHandle<()>>,
}

impl SlotWorker {
    /// Spawns a parked worker.
    pub fn spawn() -> Self {
        let shared = Arc::new(WorkerShared {
            state: Mutex::new(WorkerState {
                job: None,
                busy: false,
                stop: false,
            }),
            cond: Condvar::new(),
        });
        let worker_shared = Arc::clone(&shared);
        let handle = std::thread::spawn(move || loop {
            let job = {
                let mut state = worker_shared.state.lock().unwrap();
                loop {
                    // Drain a handed-over job before honoring stop, so a
                    // resume racing with drop still runs to completion.
                    if let Some(job) = state.job.take() {
                        break job;
                    }
                    if state.stop {
                        return;
                    }
                    state = worker_shared.cond.wait(state).unwrap();
                }
            };
            job();
            let mut state = worker_shared.state.lock().unwrap();
            state.busy = false;
            worker_shared.cond.notify_all();
        });
        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Hands the worker a job, waiting first for any previous job to
    /// finish.
    pub fn resume(&self, job: Job) {
        let mut state = self.shared.state.lock().unwrap();
        while state.busy {
            state = self.shared.cond.wait(state).unwrap();
        }
        state.busy = true;
        state.job = Some(job);
        self.shared.cond.notify_all();
    }

    /// Blocks until the worker is idle (the last job, if any, completed).
    pub fn sync(&self) {
        let mut state = self.shared.state.lock().unwrap();
        while state.busy {
            state = self.shared.cond.wait(state).unwrap();
        }
    }
}

impl Drop for SlotWorker {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.stop = true;
            self.shared.cond.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

struct TraversalState {
    pending: Option<TickMode>,
    busy: bool,
    stop: bool,
}

struct TraversalShared {
    state: Mutex<TraversalState>,
    cond: Condvar,
}

/// A persistent whole-graph traversal thread for one buffer slot.
///
/// Dispatching to per-slot traversal threads is what lets N graph
/// traversals overlap: the scheduler round-robins cycles across slots and
/// each traversal runs on its own thread against its own buses.
pub(crate) struct CircuitThread {
    shared: Arc<TraversalShared>,
    handle: Option<JoinHandle<()>>,
}

impl CircuitThread {
    /// Spawns a parked traversal thread running `traverse(mode)` per cycle.
    pub fn spawn(traverse: impl Fn(TickMode) + Send + 'static) -> Self {
        let shared = Arc::new(TraversalShared {
            state: Mutex::new(TraversalState {
                pending: None,
                busy: false,
                stop: false,
            }),
            cond: Condvar::new(),
        });
        let thread_shared = Arc::clone(&shared);
        let handle = std::thread::spawn(move || loop {
            let mode = {
                let mut state = thread_shared.state.lock().unwrap();
                loop {
                    // Same ordering as SlotWorker: a dispatched cycle runs
                    // even if drop raises stop before the thread wakes.
                    if let Some(mode) = state.pending.take() {
                        break mode;
                    }
                    if state.stop {
                        return;
                    }
                    state = thread_shared.cond.wait(state).unwrap();
                }
            };
            traverse(mode);
            let mut state = thread_shared.state.lock().unwrap();
            state.busy = false;
            thread_shared.cond.notify_all();
        });
        Self {
            shared,
            handle: Some(handle),
        }
    }

    /// Waits for the previous cycle on this slot to finish, then starts
    /// the next one.
    ///
    /// The wait is the pipelining backpressure: the scheduler can run at
    /// most one lap ahead of the slowest buffer slot.
    pub fn sync_and_resume(&self, mode: TickMode) {
        let mut state = self.shared.state.lock().unwrap();
        while state.busy {
            state = self.shared.cond.wait(state).unwrap();
        }
        state.busy = true;
        state.pending = Some(mode);
        self.shared.cond.notify_all();
    }

    /// Blocks until the in-flight cycle, if any, completes.
    pub fn sync(&self) {
        let mut state = self.shared.state.lock().unwrap();
        while state.busy {
            state = self.shared.cond.wait(state).unwrap();
        }
    }
}

impl Drop for CircuitThread {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock().unwrap();
            state.stop = true;
            self.shared.cond.notify_all();
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
