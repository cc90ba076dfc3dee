//! The circuit: component arena, wiring, and tick orchestration.
//!
//! A [`Circuit`] owns its components in an arena (`Vec<Option<...>>`
//! indexed by [`ComponentId`], ids assigned sequentially and never
//! reused) and the wiring between them. Ticking follows wires transitively
//! — there is no topological sort, and the graph need not be acyclic:
//! cycles resolve through the feedback protocol in
//! [`component`](crate::component).
//!
//! # Pipelining
//!
//! With a buffer count of 1 a tick cycle runs inline on the caller.
//! With N > 1 buffer slots the circuit keeps one parked
//! [`CircuitThread`] per slot and round-robins cycles across them, so up
//! to N whole-graph traversals overlap while each component's in-order
//! release ring keeps its own results committing in tick order.
//!
//! Structural mutations take the arena's write lock, which in-flight
//! traversals hold for reading — mutation blocks until the cycle ends,
//! never interleaves with it.

use std::sync::{Arc, RwLock};

use crate::component::Component;
use crate::error::CircuitError;
use crate::processor::Processor;
use crate::thread::CircuitThread;
use crate::wire::{ComponentId, Wire};

/// How a tick cycle executes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TickMode {
    /// Depth-first and synchronous on the ticking thread.
    #[default]
    Series,
    /// Each component's work runs on its own per-slot worker thread;
    /// downstream hand-offs wait on upstream completion.
    Parallel,
}

type Arena = Vec<Option<Arc<Component>>>;

/// One full traversal of the arena for one buffer slot: tick every
/// component, then reset every component.
///
/// The reset pass can only start after the tick pass finished, i.e. after
/// every component has at least entered `Ticking` — `reset` then blocks on
/// each worker's completion.
fn tick_slot(arena: &Arena, mode: TickMode, slot: usize) {
    for component in arena.iter().flatten() {
        component.tick(arena, mode, slot);
    }
    for component in arena.iter().flatten() {
        component.reset(slot);
    }
}

fn lookup(arena: &Arena, id: ComponentId) -> Result<Arc<Component>, CircuitError> {
    arena
        .get(id.index() as usize)
        .and_then(|entry| entry.clone())
        .ok_or(CircuitError::ComponentNotFound(id))
}

/// An ordered collection of components plus the wiring between them.
pub struct Circuit {
    arena: Arc<RwLock<Arena>>,
    next_slot: u32,
    buffer_count: usize,
    threads: Vec<CircuitThread>,
    current_slot: usize,
}

impl Circuit {
    /// Creates an empty circuit with a single buffer slot.
    pub fn new() -> Self {
        Self {
            arena: Arc::new(RwLock::new(Vec::new())),
            next_slot: 0,
            buffer_count: 1,
            threads: Vec::new(),
            current_slot: 0,
        }
    }

    // --- Node mutations ---

    /// Mounts a processor as a new component. Returns its handle.
    ///
    /// The caller may keep its own `Arc` clone of the processor for
    /// parameter access while the circuit runs.
    pub fn add_node(&mut self, processor: Arc<dyn Processor>) -> ComponentId {
        let id = ComponentId(self.next_slot);
        self.next_slot += 1;
        let component = Arc::new(Component::new(id, processor, self.buffer_count));
        let name = component.processor().info().name;

        let mut arena = self.arena.write().unwrap();
        let index = id.index() as usize;
        if index >= arena.len() {
            arena.resize_with(index + 1, || None);
        }
        arena[index] = Some(component);
        tracing::debug!("circuit_add: {name} as {id}");
        id
    }

    /// Removes a component, disconnecting every wire touching it first.
    pub fn remove_node(&mut self, id: ComponentId) -> Result<(), CircuitError> {
        let mut arena = self.arena.write().unwrap();
        let component = arena
            .get_mut(id.index() as usize)
            .and_then(Option::take)
            .ok_or(CircuitError::ComponentNotFound(id))?;

        // Its incoming wires release their sources' reference counts.
        for wire in component.take_all_wires() {
            let source = if wire.from == id {
                Some(component.clone())
            } else {
                arena
                    .get(wire.from.index() as usize)
                    .and_then(|entry| entry.clone())
            };
            if let Some(source) = source {
                source.deref_output(wire.from_output);
            }
        }

        // Sweep every remaining component for wires drawing from the
        // removed one.
        for other in arena.iter().flatten() {
            other.take_wires_from(id);
        }

        tracing::debug!("circuit_remove: {id}");
        Ok(())
    }

    // --- Wiring ---

    /// Wires `from`'s output into `to`'s input, replacing any existing
    /// wire into that input.
    ///
    /// Fails without side effects if either component is missing or an
    /// index is out of range. Self-connections are permitted and behave as
    /// feedback.
    pub fn connect(
        &mut self,
        from: ComponentId,
        from_output: usize,
        to: ComponentId,
        to_input: usize,
    ) -> Result<(), CircuitError> {
        let arena = self.arena.write().unwrap();
        let src = lookup(&arena, from)?;
        let dst = lookup(&arena, to)?;

        if from_output >= src.output_count() {
            return Err(CircuitError::InvalidOutput {
                component: from,
                index: from_output,
                count: src.output_count(),
            });
        }
        if to_input >= dst.input_count() {
            return Err(CircuitError::InvalidInput {
                component: to,
                index: to_input,
                count: dst.input_count(),
            });
        }

        if let Some(old) = dst.take_wire_at(to_input) {
            if let Ok(old_src) = lookup(&arena, old.from) {
                old_src.deref_output(old.from_output);
            }
        }
        dst.add_wire(Wire {
            from,
            from_output,
            to_input,
        });
        src.ref_output(from_output);
        tracing::debug!("circuit_connect: {from}[{from_output}] → {to}[{to_input}]");
        Ok(())
    }

    /// Removes the wire into `to`'s input `to_input`.
    pub fn disconnect_input(
        &mut self,
        to: ComponentId,
        to_input: usize,
    ) -> Result<(), CircuitError> {
        let arena = self.arena.write().unwrap();
        let dst = lookup(&arena, to)?;
        let wire = dst
            .take_wire_at(to_input)
            .ok_or(CircuitError::NotConnected {
                component: to,
                index: to_input,
            })?;
        if let Ok(src) = lookup(&arena, wire.from) {
            src.deref_output(wire.from_output);
        }
        tracing::debug!("circuit_disconnect: {to}[{to_input}]");
        Ok(())
    }

    /// Removes every wire into `to` that draws from `from`.
    pub fn disconnect_source(
        &mut self,
        to: ComponentId,
        from: ComponentId,
    ) -> Result<(), CircuitError> {
        let arena = self.arena.write().unwrap();
        let dst = lookup(&arena, to)?;
        let src = lookup(&arena, from)?;
        for wire in dst.take_wires_from(from) {
            src.deref_output(wire.from_output);
        }
        Ok(())
    }

    /// Removes all of `to`'s incoming wires.
    pub fn disconnect_all_inputs(&mut self, to: ComponentId) -> Result<(), CircuitError> {
        let arena = self.arena.write().unwrap();
        let dst = lookup(&arena, to)?;
        for wire in dst.take_all_wires() {
            if let Ok(src) = lookup(&arena, wire.from) {
                src.deref_output(wire.from_output);
            }
        }
        Ok(())
    }

    // --- Introspection ---

    /// Number of components currently mounted.
    pub fn node_count(&self) -> usize {
        self.arena.read().unwrap().iter().flatten().count()
    }

    /// Component handles in insertion order.
    pub fn node_ids(&self) -> Vec<ComponentId> {
        self.arena
            .read()
            .unwrap()
            .iter()
            .flatten()
            .map(|c| c.id())
            .collect()
    }

    /// The processor mounted at `id`, for parameter access and state
    /// serialization.
    pub fn processor(&self, id: ComponentId) -> Option<Arc<dyn Processor>> {
        let arena = self.arena.read().unwrap();
        lookup(&arena, id).ok().map(|c| c.processor().clone())
    }

    /// Incoming wires of `id`, for persistence and editors.
    pub fn wires_of(&self, id: ComponentId) -> Option<Vec<Wire>> {
        let arena = self.arena.read().unwrap();
        lookup(&arena, id).ok().map(|c| c.wires())
    }

    /// How many wires currently draw from `id`'s output `output`.
    pub fn fan_out(&self, id: ComponentId, output: usize) -> Option<usize> {
        let arena = self.arena.read().unwrap();
        let component = lookup(&arena, id).ok()?;
        if output >= component.output_count() {
            return None;
        }
        Some(component.output_ref_total(output))
    }

    /// Gates whether `id`'s processor runs on tick. The component still
    /// participates in the tick/reset cycle while disabled.
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> Result<(), CircuitError> {
        let arena = self.arena.read().unwrap();
        lookup(&arena, id)?.set_enabled(enabled);
        Ok(())
    }

    /// Whether `id`'s processor runs on tick.
    pub fn is_enabled(&self, id: ComponentId) -> Result<bool, CircuitError> {
        let arena = self.arena.read().unwrap();
        Ok(lookup(&arena, id)?.is_enabled())
    }

    // --- Ticking ---

    /// Runs (or dispatches) one tick-and-reset cycle over all components.
    ///
    /// With one buffer slot the cycle completes before this returns. With
    /// more, the cycle is dispatched to the next buffer slot's traversal
    /// thread and this returns once that slot is free to accept it —
    /// callers observe completion via [`sync`](Self::sync).
    pub fn tick(&mut self, mode: TickMode) {
        if self.threads.is_empty() {
            let arena = self.arena.read().unwrap();
            tick_slot(&arena, mode, 0);
        } else {
            self.threads[self.current_slot].sync_and_resume(mode);
            self.current_slot = (self.current_slot + 1) % self.threads.len();
        }
    }

    /// Blocks until every in-flight cycle has completed.
    pub fn sync(&self) {
        for thread in &self.threads {
            thread.sync();
        }
    }

    /// Current buffer slot count.
    pub fn buffer_count(&self) -> usize {
        self.buffer_count
    }

    /// Reconfigures every component to `max(count, 1)` buffer slots and
    /// rebuilds the traversal threads.
    ///
    /// Drains all in-flight cycles first. Wiring and per-output fan-out
    /// totals are preserved exactly.
    pub fn set_buffer_count(&mut self, count: usize) {
        let count = count.max(1);
        self.sync();
        self.threads.clear();
        {
            let arena = self.arena.read().unwrap();
            for component in arena.iter().flatten() {
                component.set_buffer_count(count);
            }
        }
        self.buffer_count = count;
        self.current_slot = 0;
        if count > 1 {
            for slot in 0..count {
                let arena = Arc::clone(&self.arena);
                self.threads.push(CircuitThread::spawn(move |mode| {
                    let arena = arena.read().unwrap();
                    tick_slot(&arena, mode, slot);
                }));
            }
        }
        tracing::debug!("circuit_buffers: {count}");
    }

    #[cfg(test)]
    pub(crate) fn component(&self, id: ComponentId) -> Option<Arc<Component>> {
        let arena = self.arena.read().unwrap();
        lookup(&arena, id).ok()
    }
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Circuit {
    fn drop(&mut self) {
        self.sync();
    }
}
