//! Identity node.

use cauce_core::{
    NodeCategory, ProcessOrder, Processor, ProcessorInfo, SignalBus, SlotSpec,
};

/// Forwards any input value unchanged.
///
/// Stateless, so it declares [`ProcessOrder::OutOfOrder`]: pipelined
/// buffer slots may run it concurrently without the in-order release
/// ring.
#[derive(Default)]
pub struct Passthrough;

impl Processor for Passthrough {
    fn info(&self) -> ProcessorInfo {
        ProcessorInfo {
            name: "Passthrough",
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
        if let Some(value) = inputs.take_value(0) {
            outputs.set_value(0, value);
        }
    }

    fn process_order(&self) -> ProcessOrder {
        ProcessOrder::OutOfOrder
    }
}
