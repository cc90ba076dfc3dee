//! Cauce Nodes - utility processors for cauce circuits
//!
//! Generic sources, transforms, and sinks that work in any graph:
//!
//! - [`Counter`] - emits an incrementing integer each tick
//! - [`Constant`] - emits a configured value each tick
//! - [`Scale`] - multiplies numeric inputs by a factor
//! - [`Passthrough`] - forwards any value unchanged
//! - [`Delay`] - emits the previous tick's input (one-tick latch)
//! - [`Probe`] - records the last value it saw; the standard sink
//!
//! Every node guards its mutable state internally, so instances are safe
//! under any tick mode. State round-trips through
//! [`save_state`](cauce_core::Processor::save_state) as a JSON blob and
//! restores field by field: unrecognized or malformed fields are skipped,
//! never fatal.

pub mod constant;
pub mod counter;
pub mod delay;
pub mod passthrough;
pub mod probe;
pub mod scale;

mod state;

pub use constant::Constant;
pub use counter::Counter;
pub use delay::Delay;
pub use passthrough::Passthrough;
pub use probe::Probe;
pub use scale::Scale;
