//! Error types for circuit operations.

use crate::wire::ComponentId;
use thiserror::Error;

/// Errors that can occur during circuit mutations.
///
/// Connection and lookup failures are always recoverable `Err` values,
/// never panics — an editor surfaces them as a rejected action and the
/// circuit stays in its previous state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CircuitError {
    /// The referenced component is not in the circuit.
    #[error("component {0} not found")]
    ComponentNotFound(ComponentId),

    /// An output index beyond the source component's output count.
    #[error("output index {index} out of range for {component} ({count} outputs)")]
    InvalidOutput {
        /// Component whose outputs were indexed.
        component: ComponentId,
        /// The offending index.
        index: usize,
        /// The component's actual output count.
        count: usize,
    },

    /// An input index beyond the destination component's input count.
    #[error("input index {index} out of range for {component} ({count} inputs)")]
    InvalidInput {
        /// Component whose inputs were indexed.
        component: ComponentId,
        /// The offending index.
        index: usize,
        /// The component's actual input count.
        count: usize,
    },

    /// No wire is connected at the given input.
    #[error("no wire connected to input {index} of {component}")]
    NotConnected {
        /// Component whose input was addressed.
        component: ComponentId,
        /// The unconnected input index.
        index: usize,
    },
}
