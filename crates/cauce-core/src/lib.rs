//! Cauce Core - dataflow execution engine for node graphs
//!
//! This crate provides the execution engine behind cauce's node graphs:
//! typed signals flow along wires between processors, and the circuit
//! ticks the whole graph by pulling values depth-first from sinks back to
//! sources.
//!
//! # Core Abstractions
//!
//! ## Signals
//!
//! - [`SignalValue`] - The closed set of payload types a slot can carry
//! - [`Signal`] - One slot: empty or holding a value
//! - [`SignalBus`] - A component's ordered input or output slots
//! - [`SignalPayload`] - Typed access into a slot (`bus.value::<i64>(0)`)
//!
//! ## Processors
//!
//! - [`Processor`] - Object-safe trait a node implements: declare slots,
//!   consume inputs, produce outputs
//! - [`SlotSpec`] / [`ProcessorInfo`] - Slot and node metadata for
//!   registries and editors
//!
//! ## The circuit
//!
//! - [`Circuit`] - Component arena plus wiring; `tick` runs one cycle
//! - [`TickMode`] - Series (one thread) or Parallel (worker per node)
//! - [`AutoTick`] - Free-running scheduler on a background thread
//!
//! # Execution model
//!
//! A tick cycle visits every component; each visit recursively ticks the
//! component's upstream sources first, so values arrive before consumers
//! run. Wires that close a cycle are detected mid-traversal and read the
//! previous cycle's output instead of waiting — feedback loops execute
//! without deadlock and need no special wiring.
//!
//! Output values are handed downstream by move when one wire reads them
//! and by copy-then-final-move when several do, so fan-out never clones
//! more than it must.
//!
//! Raising the circuit's buffer count pipelines whole-graph cycles across
//! per-slot traversal threads; components keep their results committing in
//! tick order through a release ring.
//!
//! # Example
//!
//! ```rust,ignore
//! use cauce_core::{Circuit, TickMode};
//!
//! let mut circuit = Circuit::new();
//! let source = circuit.add_node(Arc::new(Counter::default()));
//! let sink = circuit.add_node(Arc::new(Printer::default()));
//! circuit.connect(source, 0, sink, 0)?;
//!
//! // One synchronous cycle, then four pipelined ones.
//! circuit.tick(TickMode::Series);
//! circuit.set_buffer_count(4);
//! for _ in 0..4 {
//!     circuit.tick(TickMode::Parallel);
//! }
//! circuit.sync();
//! ```

pub mod autotick;
pub mod bus;
pub mod circuit;
pub mod error;
pub mod processor;
pub mod signal;
pub mod wire;

mod component;
mod thread;

// Re-export main types at crate root
pub use autotick::AutoTick;
pub use bus::SignalBus;
pub use circuit::{Circuit, TickMode};
pub use error::CircuitError;
pub use processor::{NodeCategory, ProcessOrder, Processor, ProcessorInfo, SlotSpec};
pub use signal::{ImageFrame, Signal, SignalKind, SignalPayload, SignalValue};
pub use wire::{ComponentId, Wire};
