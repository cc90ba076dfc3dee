//! Fixed-value source.

use std::sync::Mutex;

use cauce_core::{
    NodeCategory, Processor, ProcessorInfo, SignalBus, SignalValue, SlotSpec,
};

/// Emits the same configured value every tick.
///
/// The value is settable while the circuit runs; each tick emits whatever
/// is current.
pub struct Constant {
    value: Mutex<SignalValue>,
}

impl Constant {
    /// Creates a constant emitting `value`.
    pub fn new(value: impl Into<SignalValue>) -> Self {
        Self {
            value: Mutex::new(value.into()),
        }
    }

    /// Replaces the emitted value.
    pub fn set(&self, value: impl Into<SignalValue>) {
        *self.value.lock().unwrap() = value.into();
    }

    /// The currently configured value.
    pub fn get(&self) -> SignalValue {
        self.value.lock().unwrap().clone()
    }
}

impl Processor for Constant {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Constant",
            category: NodeCategory::Source,
            author: "cauce developers",
            version: env!("CARGO_PKG_VERSION"),
        }
    }

    fn inputs(&self) -> Vec<SlotSpec> {
        vec![]
    }

    fn outputs(&self) -> Vec<SlotSpec> {
        vec![SlotSpec::untyped("value")]
    }

    fn process(&self, _inputs: &mut SignalBus, outputs: &mut SignalBus) {
        outputs.set_value(0, self.value.lock().unwrap().clone());
    }

    fn save_state(&self) -> String {
        serde_json::to_string(&*self.value.lock().unwrap()).unwrap_or_default()
    }

    fn restore_state(&self, blob: &str) {
        if let Ok(value) = serde_json::from_str::<SignalValue>(blob) {
            *self.value.lock().unwrap() = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_configured_value() {
        let constant = Constant::new(2.5f64);
        let mut inputs = SignalBus::new();
        let mut outputs = SignalBus::with_count(1);
        constant.process(&mut inputs, &mut outputs);
        assert_eq!(outputs.value::<f64>(0), Some(&2.5));

        constant.set("hello".to_string());
        constant.process(&mut inputs, &mut outputs);
        assert_eq!(outputs.value::<String>(0).map(String::as_str), Some("hello"));
    }

    #[test]
    fn state_round_trip_preserves_kind() {
        let constant = Constant::new(7i64);
        let blob = constant.save_state();
        let restored = Constant::new(false);
        restored.restore_state(&blob);
        assert_eq!(restored.get(), SignalValue::Int(7));
    }

    #[test]
    fn restore_keeps_old_value_on_garbage() {
        let constant = Constant::new(1i64);
        constant.restore_state("not a value");
        assert_eq!(constant.get(), SignalValue::Int(1));
    }
}
