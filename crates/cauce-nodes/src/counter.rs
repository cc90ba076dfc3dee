//! Incrementing integer source.

use std::sync::Mutex;

use cauce_core::{
    NodeCategory, Processor, ProcessorInfo, SignalBus, SignalKind, SlotSpec,
};
use serde_json::json;

use crate::state;

struct CounterState {
    next: i64,
    step: i64,
}

/// Emits `start`, `start + step`, `start + 2·step`, … one value per tick.
///
/// # Example
///
/// ```rust
/// use cauce_nodes::Counter;
/// use cauce_core::{Processor, SignalBus};
///
/// let counter = Counter::new(10, 5);
/// let mut inputs = SignalBus::new();
/// let mut outputs = SignalBus::with_count(1);
/// counter.process(&mut inputs, &mut outputs);
/// assert_eq!(outputs.value::<i64>(0), Some(&10));
/// ```
pub struct Counter {
    state: Mutex<CounterState>,
}

impl Counter {
    /// Creates a counter starting at `start` and advancing by `step`.
    pub fn new(start: i64, step: i64) -> Self {
        Self {
            state: Mutex::new(CounterState { next: start, step }),
        }
    }

    /// The value the next tick will emit.
    pub fn peek(&self) -> i64 {
        self.state.lock().unwrap().next
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new(0, 1)
    }
}

impl Processor for Counter {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Counter",
            category: NodeCategory::Source,
            author: "cauce developers",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::new("count", SignalKind::Int)]
    }

    fn process(&self, _inputs: &mut SignalBus, outputs: &mut SignalBus) {
        let mut state = self.state.lock().unwrap();
        outputs.set_value(0, state.next);
        state.next += state.step;
    }

    fn save_state(&self) -> String {
        let state = self.state.lock().unwrap();
        json!({ "next": state.next, "step": state.step }).to_string()
    }

    fn restore_state(&self, blob: &str) {
        let parsed = state::parse(blob);
        let mut state = self.state.lock().unwrap();
        if let Some(next) = state::field(&parsed, "next") {
            state.next = next;
        }
        if let Some(step) = state::field(&parsed, "step") {
            state.step = step;
        }
    }
}
