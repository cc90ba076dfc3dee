//! The node contract: what the engine requires of a processing plugin.
//!
//! The engine is processor-agnostic. Everything node-specific — the
//! computation, its parameters, its serialized state — lives behind the
//! [`Processor`] trait; the engine only pulls inputs in, invokes
//! [`process`](Processor::process), and hands outputs downstream.
//!
//! ## Design decisions
//!
//! - **`process` takes `&self`**: in parallel mode the engine invokes a
//!   processor from worker threads, and a processor declared
//!   [`ProcessOrder::OutOfOrder`] may run concurrently with itself across
//!   buffer slots. Implementations own their interior mutability (a
//!   `Mutex` around mutable state is the common shape) and are thereby
//!   safe under every tick mode without the engine knowing anything about
//!   their state.
//!
//! - **Object-safe**: processors are stored as `Arc<dyn Processor>` so the
//!   creating code (GUI, registry, tests) can keep a handle for parameter
//!   edits and inspection while the circuit runs.

use crate::signal::SignalKind;
use crate::SignalBus;

/// Whether a processor's invocations must preserve tick order across
/// buffer slots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProcessOrder {
    /// Calls commit in tick order. With more than one buffer slot the
    /// engine enforces a round-robin release ring: slot k's call runs only
    /// after slot k−1's call has finished.
    #[default]
    InOrder,
    /// Calls may overlap and complete in any order across buffer slots.
    /// The processor must be safe to invoke concurrently with itself.
    OutOfOrder,
}

/// Coarse grouping of node types, used by registries and UIs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    /// Produces signals from nothing (generators, readers, captures).
    Source,
    /// Consumes inputs and produces outputs.
    Transform,
    /// Consumes signals without producing any (displays, writers, probes).
    Sink,
    /// Plumbing helpers (passthrough, delay, routing).
    Utility,
}

impl NodeCategory {
    /// Returns a human-readable name for the category.
    pub const fn name(&self) -> &'static str {
        match self {
            NodeCategory::Source => "Source",
            NodeCategory::Transform => "Transform",
            NodeCategory::Sink => "Sink",
            NodeCategory::Utility => "Utility",
        }
    }
}

/// Static metadata describing a processor type.
#[derive(Clone, Copy, Debug)]
pub struct ProcessorInfo {
    /// Human-readable node name.
    pub name: &'static str,
    /// Category for organization.
    pub category: NodeCategory,
    /// Author attribution.
    pub author: &'static str,
    /// Version string.
    pub version: &'static str,
}

/// Declares one input or output slot: a name plus an optional kind tag.
///
/// The kind tag is advisory metadata for editors and validation; the
/// engine transports any [`SignalValue`](crate::SignalValue) regardless,
/// and kind mismatches surface as "no value" reads in the consumer.
#[derive(Clone, Copy, Debug)]
pub struct SlotSpec {
    /// Slot name, shown on the node's pin in an editor.
    pub name: &'static str,
    /// Expected kind, or `None` for slots that accept any kind.
    pub kind: Option<SignalKind>,
}

impl SlotSpec {
    /// A slot expecting values of a specific kind.
    pub const fn new(name: &'static str, kind: SignalKind) -> Self {
        Self {
            name,
            kind: Some(kind),
        }
    }

    /// A slot accepting any value kind.
    pub const fn untyped(name: &'static str) -> Self {
        Self { name, kind: None }
    }
}

/// A unit of computation pluggable into a circuit.
///
/// Implementations must be safe to invoke from any worker thread; see the
/// module docs for the concurrency contract.
pub trait Processor: Send + Sync {
    /// Static metadata for this processor type.
    fn info(&self) -> ProcessorInfo;

    /// Declared input slots, in positional order. Fixed for the
    /// processor's lifetime.
    fn inputs(&self) -> Vec<SlotSpec>;

    /// Declared output slots, in positional order. Fixed for the
    /// processor's lifetime.
    fn outputs(&self) -> Vec<SlotSpec>;

    /// Computes one tick: reads zero or more inputs, writes zero or more
    /// outputs.
    ///
    /// Missing or wrong-kind inputs read as `None`; the conventional
    /// response is to skip work for this tick. Must not block
    /// indefinitely.
    fn process(&self, inputs: &mut SignalBus, outputs: &mut SignalBus);

    /// Ordering requirement across buffer slots. Defaults to
    /// [`ProcessOrder::InOrder`].
    fn process_order(&self) -> ProcessOrder {
        ProcessOrder::InOrder
    }

    /// Serializes node-specific state to an opaque string blob.
    ///
    /// The engine never interprets the blob; the only requirement is that
    /// [`restore_state`](Self::restore_state) on the result reproduces the
    /// node's observable behavior.
    fn save_state(&self) -> String {
        String::new()
    }

    /// Restores node-specific state from a blob produced by
    /// [`save_state`](Self::save_state).
    ///
    /// Malformed blobs are tolerated field by field: each recognizable
    /// field is applied, everything else falls back to its default. Never
    /// an error.
    fn restore_state(&self, blob: &str) {
        let _ = blob;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Nop;

    impl Processor for Nop {
        fn info(&self) -> ProcessorInfo {
            ProcessorInfo {
                name: "Nop",
                category: NodeCategory::Utility,
                author: "tests",
                version: "1.0",
            }
        }

        fn inputs(&self) -> Vec<SlotSpec> {
            vec![]
        }

        fn outputs(&self) -> Vec<SlotSpec> {
            vec![]
        }

        fn process(&self, _inputs: &mut SignalBus, _outputs: &mut SignalBus) {}
    }

    #[test]
    fn defaults_are_in_order_and_stateless() {
        let nop = Nop;
        assert_eq!(nop.process_order(), ProcessOrder::InOrder);
        assert_eq!(nop.save_state(), "");
        nop.restore_state("{not json at all");
    }

    #[test]
    fn slot_spec_constructors() {
        let typed = SlotSpec::new("in", SignalKind::Int);
        assert_eq!(typed.kind, Some(SignalKind::Int));
        let untyped = SlotSpec::untyped("any");
        assert_eq!(untyped.kind, None);
    }
}
