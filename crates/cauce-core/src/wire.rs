//! Component handles and wires.
//!
//! A [`Wire`] records where one component input draws its value from. It
//! carries a [`ComponentId`] — an index into the circuit's component arena
//! — rather than any owning or raw reference, so removing a component
//! cannot leave a dangling wire: removal sweeps the arena's wire lists
//! first, and a stale id simply fails the arena lookup.

/// Unique handle for a component in a circuit.
///
/// Ids are assigned sequentially and never reused within a circuit
/// instance. They remain stable across mutations and buffer-count changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(pub(crate) u32);

impl ComponentId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "ComponentId({})", self.0)
    }
}

/// A directed edge: one component's output feeding another's input.
///
/// Stored on the destination component; the destination input index is
/// unique within that component's wire list (connecting replaces any prior
/// wire into the same input).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wire {
    /// Source component.
    pub from: ComponentId,
    /// Output index on the source component.
    pub from_output: usize,
    /// Input index on the destination component.
    pub to_input: usize,
}
