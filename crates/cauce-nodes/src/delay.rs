//! One-tick latch.

use std::sync::Mutex;

use cauce_core::{
    NodeCategory, Processor, ProcessorInfo, SignalBus, SignalValue, SlotSpec,
};
use serde_json::json;

use crate::state;

/// Emits the previous tick's input.
///
/// The explicit alternative to relying on feedback-wire timing: a `Delay`
/// in a loop makes the one-cycle latency a visible node instead of an
/// artifact of traversal order.
#[derive(Default)]
pub struct Delay {
    held: Mutex<Option<SignalValue>>,
}

impl Delay {
    /// Creates an empty latch; the first tick emits nothing.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Processor for Delay {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Delay",
            category: NodeCategory::Utility,
            author: "cauce developers",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::untyped("in")]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::untyped("out")]
    }

    fn process(&self, inputs: &mut SignalBus, outputs: &mut SignalBus) {
        let incoming = inputs.take_value(0);
        let previous = std::mem::replace(&mut *self.held.lock().unwrap(), incoming);
        if let Some(value) = previous {
            outputs.set_value(0, value);
        }
    }

    fn save_state(&self) -> String {
        json!({ "held": *self.held.lock().unwrap() }).to_string()
    }

    fn restore_state(&self, blob: &str) {
        let parsed = state::parse(blob);
        if let Some(held) = state::field::<Option<SignalValue>>(&parsed, "held") {
            *self.held.lock().unwrap() = held;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(delay: &Delay, input: Option<i64>) -> Option<i64> {
        let mut inputs = SignalBus::with_count(1);
        if let Some(v) = input {
            inputs.set_value(0, v);
        }
        let mut outputs = SignalBus::with_count(1);
        delay.process(&mut inputs, &mut outputs);
        outputs.value::<i64>(0).copied()
    }

    #[test]
    fn emits_previous_input() {
        let delay = Delay::new();
        assert_eq!(run(&delay, Some(1)), None);
        assert_eq!(run(&delay, Some(2)), Some(1));
        assert_eq!(run(&delay, None), Some(2));
        // The gap propagates one tick late, like any other value.
        assert_eq!(run(&delay, Some(3)), None);
        assert_eq!(run(&delay, None), Some(3));
    }

    #[test]
    fn state_round_trip() {
        let delay = Delay::new();
        run(&delay, Some(42));
        let blob = delay.save_state();

        let restored = Delay::new();
        restored.restore_state(&blob);
        assert_eq!(run(&restored, None), Some(42));
    }
}
