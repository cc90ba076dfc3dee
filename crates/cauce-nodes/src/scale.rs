//! Numeric multiplier.

use std::sync::Mutex;

use cauce_core::{
    NodeCategory, Processor, ProcessorInfo, SignalBus, SignalKind, SignalValue, SlotSpec,
};
use serde_json::json;

use crate::state;

/// Multiplies a numeric input by a factor.
///
/// Accepts `Int` or `Float` inputs; the output is always `Float`
/// (integers widen). Non-numeric or missing inputs produce no output for
/// that tick.
pub struct Scale {
    factor: Mutex<f64>,
}

impl Scale {
    /// Creates a scaler with the given factor.
    pub fn new(factor: f64) -> Self {
        Self {
            factor: Mutex::new(factor),
        }
    }

    /// Replaces the factor.
    pub fn set_factor(&self, factor: f64) {
        *self.factor.lock().unwrap() = factor;
    }

    /// The current factor.
    pub fn factor(&self) -> f64 {
        *self.factor.lock().unwrap()
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Processor for Scale {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Scale",
            category: NodeCategory::Transform,
            author: "cauce developers",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        // Untyped: a slot declares at most one kind, and this one accepts
        // Int or Float. The kind check happens in process instead.
        vec![SlotSpec::untyped("in")]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::new("out", SignalKind::Float)]
    }

    fn process(&self, inputs: &mut SignalBus, outputs: &mut SignalBus) {
        let operand = match inputs.value_raw(0) {
            Some(SignalValue::Int(v)) => Some(*v as f64),
            Some(SignalValue::Float(v)) => Some(*v),
            _ => None,
        };
        if let Some(v) = operand {
            outputs.set_value(0, v * *self.factor.lock().unwrap());
        }
    }

    fn save_state(&self) -> String {
        json!({ "factor": *self.factor.lock().unwrap() }).to_string()
    }

    fn restore_state(&self, blob: &str) {
        let parsed = state::parse(blob);
        if let Some(factor) = state::field(&parsed, "factor") {
            *self.factor.lock().unwrap() = factor;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(scale: &Scale, input: Option<SignalValue>) -> Option<f64> {
        let mut inputs = SignalBus::with_count(1);
        if let Some(v) = input {
            inputs.set_value(0, v);
        }
        let mut outputs = SignalBus::with_count(1);
        scale.process(&mut inputs, &mut outputs);
        outputs.value::<f64>(0).copied()
    }

    #[test]
    fn scales_ints_and_floats() {
        let scale = Scale::new(2.0);
        assert_eq!(run(&scale, Some(SignalValue::Int(3))), Some(6.0));
        assert_eq!(run(&scale, Some(SignalValue::Float(1.5))), Some(3.0));
    }

    #[test]
    fn non_numeric_input_is_silent() {
        let scale = Scale::new(2.0);
        assert_eq!(run(&scale, Some(SignalValue::Str("x".into()))), None);
        assert_eq!(run(&scale, None), None);
    }

    #[test]
    fn slot_layout() {
        let scale = Scale::default();
        let inputs = scale.inputs();
        let outputs = scale.outputs();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].kind, None, "accepts Int or Float");
        assert_eq!(outputs[0].kind, Some(SignalKind::Float));
    }

    #[test]
    fn state_round_trip() {
        let scale = Scale::new(0.25);
        let blob = scale.save_state();
        let restored = Scale::default();
        restored.restore_state(&blob);
        assert_eq!(restored.factor(), 0.25);

        restored.restore_state(r#"{"factor": []}"#);
        assert_eq!(restored.factor(), 0.25);
    }
}
