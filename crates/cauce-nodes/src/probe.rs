//! Inspection sink.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use cauce_core::{
    NodeCategory, Processor, ProcessorInfo, SignalBus, SignalValue, SlotSpec,
};
use serde_json::json;

use crate::state;

/// Records the last value it saw and counts ticks.
///
/// The standard sink for tests, headless runs, and editor value readouts:
/// keep an `Arc<Probe>` clone when adding the node and poll
/// [`last_value`](Self::last_value) while the circuit runs.
#[derive(Default)]
pub struct Probe {
    last: Mutex<Option<SignalValue>>,
    ticks: AtomicU64,
}

impl Probe {
    /// Creates an empty probe.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent value seen, if any. Ticks with no input leave the
    /// recorded value in place.
    pub fn last_value(&self) -> Option<SignalValue> {
        self.last.lock().unwrap().clone()
    }

    /// How many times the node has been processed.
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }
}

impl Processor for Probe {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Probe",
            category: NodeCategory::Sink,
            author: "cauce developers",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::untyped("in")]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![]
    }

    fn process(&self, inputs: &mut SignalBus, _outputs: &mut SignalBus) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
        if let Some(value) = inputs.take_value(0) {
            *self.last.lock().unwrap() = Some(value);
        }
    }

    fn save_state(&self) -> String {
        json!({
            "ticks": self.ticks.load(Ordering::Relaxed),
            "last": *self.last.lock().unwrap(),
        })
        .to_string()
    }

    fn restore_state(&self, blob: &str) {
        let parsed = state::parse(blob);
        if let Some(ticks) = state::field(&parsed, "ticks") {
            self.ticks.store(ticks, Ordering::Relaxed);
        }
        if let Some(last) = state::field::<Option<SignalValue>>(&parsed, "last") {
            *self.last.lock().unwrap() = last;
        }
    }
}
