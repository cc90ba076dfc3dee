//! Engine-side component cell: buses, tick state, hand-off, workers.
//!
//! A [`Component`] wraps one [`Processor`] with everything the engine
//! needs to tick it: per-buffer-slot input/output buses, the tick state
//! machine, per-output fan-out reference counts, a parked worker thread
//! per slot, and the in-order release ring.
//!
//! # Tick protocol
//!
//! Traversal for a given buffer slot is single-threaded (the circuit walks
//! the graph depth-first on one thread per slot); only the
//! pull-inputs-and-process job is handed to worker threads in parallel
//! mode. [`Component::tick`] therefore implements the state machine
//! without cross-thread races on the status word:
//!
//! - `NotTicked` → mark `TickStarted`, recursively tick upstream sources,
//!   mark `Ticking`, then run (series) or dispatch (parallel) the slot job.
//!   Returns `true`.
//! - `TickStarted` → return `false` with no side effects. The caller is a
//!   descendant that reached us through a cycle; it records the wire as
//!   feedback and will not wait on us.
//! - `Ticking` → return `true`. Already running or done; the caller's
//!   hand-off blocks on our worker if it needs to.
//!
//! # Reference-counted hand-off
//!
//! Each output carries `(total, count)` per slot: `total` is the number of
//! wires currently reading that output, `count` the reads so far this
//! cycle. The final reader of a cycle takes the value by move; every
//! earlier reader copies. Single-consumer outputs skip the count mutex
//! entirely — the move path is lock-free against other outputs.

use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, RwLock};

use crate::bus::SignalBus;
use crate::circuit::TickMode;
use crate::processor::{ProcessOrder, Processor, SlotSpec};
use crate::thread::SlotWorker;
use crate::wire::{ComponentId, Wire};

/// Tick progress of one (component, buffer slot) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TickStatus {
    /// Not yet visited this cycle.
    NotTicked,
    /// Visited; upstream recursion in progress. Seeing this from below
    /// means the wire closes a cycle.
    TickStarted,
    /// Upstream recursion done; the slot job is running or finished.
    Ticking,
}

impl TickStatus {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => TickStatus::NotTicked,
            1 => TickStatus::TickStarted,
            _ => TickStatus::Ticking,
        }
    }

    fn as_u8(self) -> u8 {
        match self {
            TickStatus::NotTicked => 0,
            TickStatus::TickStarted => 1,
            TickStatus::Ticking => 2,
        }
    }
}

/// Per-output fan-out bookkeeping for one buffer slot.
struct OutputRef {
    /// Number of wires currently drawing from this output.
    total: AtomicUsize,
    /// Reads performed this cycle; wraps to 0 on the final (moving) read.
    count: Mutex<usize>,
}

impl OutputRef {
    fn new(total: usize) -> Self {
        Self {
            total: AtomicUsize::new(total),
            count: Mutex::new(0),
        }
    }
}

/// One buffer slot: an independent (input bus, output bus, worker) triple.
struct BufferSlot {
    input_bus: Mutex<SignalBus>,
    output_bus: Mutex<SignalBus>,
    status: AtomicU8,
    refs: Vec<OutputRef>,
    worker: SlotWorker,
    /// In-order release flag: set by the previous slot's job on completion.
    released: Mutex<bool>,
    release_cond: Condvar,
}

impl BufferSlot {
    fn new(input_count: usize, output_count: usize, ref_totals: &[usize]) -> Self {
        Self {
            input_bus: Mutex::new(SignalBus::with_count(input_count)),
            output_bus: Mutex::new(SignalBus::with_count(output_count)),
            status: AtomicU8::new(TickStatus::NotTicked.as_u8()),
            refs: ref_totals.iter().map(|&t| OutputRef::new(t)).collect(),
            worker: SlotWorker::spawn(),
            released: Mutex::new(false),
            release_cond: Condvar::new(),
        }
    }
}

/// A resolved upstream link for one tick: source component, indices, and
/// whether this cycle classified the wire as feedback.
struct UpstreamLink {
    src: Arc<Component>,
    from_output: usize,
    to_input: usize,
    feedback: bool,
}

/// A processor mounted in a circuit.
pub(crate) struct Component {
    id: ComponentId,
    processor: Arc<dyn Processor>,
    input_specs: Vec<SlotSpec>,
    output_specs: Vec<SlotSpec>,
    order: ProcessOrder,
    enabled: AtomicBool,
    /// Incoming wires; at most one per destination input index.
    wires: Mutex<Vec<Wire>>,
    /// Write-locked only by buffer-count changes, which the circuit
    /// serializes against ticking. Read guards are never held across a
    /// recursion into another `tick` call.
    slots: RwLock<Vec<BufferSlot>>,
}

impl Component {
    pub fn new(id: ComponentId, processor: Arc<dyn Processor>, buffer_count: usize) -> Self {
        let input_specs = processor.inputs();
        let output_specs = processor.outputs();
        let order = processor.process_order();
        let totals = vec![0usize; output_specs.len()];
        let slots: Vec<BufferSlot> = (0..buffer_count.max(1))
            .map(|_| BufferSlot::new(input_specs.len(), output_specs.len(), &totals))
            .collect();
        *slots[0].released.lock().unwrap() = true;
        Self {
            id,
            processor,
            input_specs,
            output_specs,
            order,
            enabled: AtomicBool::new(true),
            wires: Mutex::new(Vec::new()),
            slots: RwLock::new(slots),
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn processor(&self) -> &Arc<dyn Processor> {
        &self.processor
    }

    pub fn input_count(&self) -> usize {
        self.input_specs.len()
    }

    pub fn output_count(&self) -> usize {
        self.output_specs.len()
    }

    pub fn input_specs(&self) -> &[SlotSpec] {
        &self.input_specs
    }

    pub fn output_specs(&self) -> &[SlotSpec] {
        &self.output_specs
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    // --- Wire bookkeeping (driven by the circuit) ---

    /// Snapshot of the incoming wires.
    pub fn wires(&self) -> Vec<Wire> {
        self.wires.lock().unwrap().clone()
    }

    /// Removes and returns the wire into `to_input`, if any.
    pub fn take_wire_at(&self, to_input: usize) -> Option<Wire> {
        let mut wires = self.wires.lock().unwrap();
        let pos = wires.iter().position(|w| w.to_input == to_input)?;
        Some(wires.remove(pos))
    }

    /// Removes and returns every wire sourced from `from`.
    pub fn take_wires_from(&self, from: ComponentId) -> Vec<Wire> {
        let mut wires = self.wires.lock().unwrap();
        let mut removed = Vec::new();
        wires.retain(|w| {
            if w.from == from {
                removed.push(*w);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Removes and returns all incoming wires.
    pub fn take_all_wires(&self) -> Vec<Wire> {
        std::mem::take(&mut *self.wires.lock().unwrap())
    }

    pub fn add_wire(&self, wire: Wire) {
        self.wires.lock().unwrap().push(wire);
    }

    /// Registers one more reader of `output`, on every buffer slot.
    pub fn ref_output(&self, output: usize) {
        let slots = self.slots.read().unwrap();
        for slot in slots.iter() {
            slot.refs[output].total.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Unregisters one reader of `output`, on every buffer slot.
    pub fn deref_output(&self, output: usize) {
        let slots = self.slots.read().unwrap();
        for slot in slots.iter() {
            slot.refs[output].total.fetch_sub(1, Ordering::Relaxed);
        }
    }

    /// Current fan-out of `output` (readers registered on slot 0).
    pub fn output_ref_total(&self, output: usize) -> usize {
        let slots = self.slots.read().unwrap();
        slots[0].refs[output].total.load(Ordering::Relaxed)
    }

    // --- Buffer slots ---

    pub fn buffer_count(&self) -> usize {
        self.slots.read().unwrap().len()
    }

    /// Resizes to `max(count, 1)` buffer slots.
    ///
    /// New slots clone slot 0's bus sizing and reference-count totals so
    /// they are immediately wire-consistent. Slot 0's release flag is
    /// pre-set so a fresh pipeline isn't waiting on a predecessor that
    /// will never run; all other flags start lowered.
    ///
    /// Must not be called while a tick cycle is in flight — the circuit
    /// serializes this against ticking.
    pub fn set_buffer_count(&self, count: usize) {
        let count = count.max(1);
        let mut slots = self.slots.write().unwrap();
        let totals: Vec<usize> = slots[0]
            .refs
            .iter()
            .map(|r| r.total.load(Ordering::Relaxed))
            .collect();
        slots.truncate(count);
        while slots.len() < count {
            slots.push(BufferSlot::new(
                self.input_specs.len(),
                self.output_specs.len(),
                &totals,
            ));
        }
        for (i, slot) in slots.iter().enumerate() {
            *slot.released.lock().unwrap() = i == 0;
            slot.status
                .store(TickStatus::NotTicked.as_u8(), Ordering::Release);
        }
    }

    fn status(&self, slot: usize) -> TickStatus {
        let slots = self.slots.read().unwrap();
        TickStatus::from_u8(slots[slot].status.load(Ordering::Acquire))
    }

    fn set_status(&self, slot: usize, status: TickStatus) {
        let slots = self.slots.read().unwrap();
        slots[slot].status.store(status.as_u8(), Ordering::Release);
    }

    // --- Tick / reset ---

    /// Advances the tick state machine for `slot`.
    ///
    /// Returns `false` only when this component is already `TickStarted`,
    /// i.e. the caller reached us through a cycle and must treat its wire
    /// as feedback.
    pub fn tick(
        self: &Arc<Self>,
        arena: &[Option<Arc<Component>>],
        mode: TickMode,
        slot: usize,
    ) -> bool {
        match self.status(slot) {
            TickStatus::TickStarted => return false,
            TickStatus::Ticking => return true,
            TickStatus::NotTicked => {}
        }
        self.set_status(slot, TickStatus::TickStarted);

        let wires = self.wires();
        let mut upstream: Vec<UpstreamLink> = Vec::with_capacity(wires.len());
        for wire in &wires {
            let Some(src) = arena
                .get(wire.from.index() as usize)
                .and_then(Clone::clone)
            else {
                debug_assert!(false, "wire references a component outside the arena");
                continue;
            };
            let started = src.tick(arena, mode, slot);
            upstream.push(UpstreamLink {
                src,
                from_output: wire.from_output,
                to_input: wire.to_input,
                feedback: !started,
            });
        }

        self.set_status(slot, TickStatus::Ticking);

        match mode {
            TickMode::Series => self.do_tick(&upstream, mode, slot),
            TickMode::Parallel => {
                let this = Arc::clone(self);
                let slots = self.slots.read().unwrap();
                slots[slot].worker.resume(Box::new(move || {
                    this.do_tick(&upstream, mode, slot);
                }));
            }
        }
        true
    }

    /// The per-slot job: pull inputs, clear outputs, honor the in-order
    /// ring, invoke the processor.
    fn do_tick(&self, upstream: &[UpstreamLink], mode: TickMode, slot: usize) {
        let slots = self.slots.read().unwrap();
        let s = &slots[slot];

        {
            let mut input_bus = s.input_bus.lock().unwrap();
            for link in upstream {
                if link.src.id == self.id {
                    // Self-loop: we already hold our slots guard; go
                    // straight at our own output bus.
                    Self::transfer_from_slot(s, link.from_output, &mut input_bus, link.to_input);
                } else {
                    if mode == TickMode::Parallel && !link.feedback {
                        link.src.sync_slot(slot);
                    }
                    link.src
                        .transfer_output(slot, link.from_output, &mut input_bus, link.to_input);
                }
            }
        }

        let mut output_bus = s.output_bus.lock().unwrap();
        output_bus.clear_all_values();

        let gated = self.order == ProcessOrder::InOrder && slots.len() > 1;
        if gated {
            let mut released = s.released.lock().unwrap();
            while !*released {
                released = s.release_cond.wait(released).unwrap();
            }
            *released = false;
        }

        if self.enabled.load(Ordering::Relaxed) {
            let mut input_bus = s.input_bus.lock().unwrap();
            self.processor.process(&mut input_bus, &mut output_bus);
        }

        if gated {
            let next = &slots[(slot + 1) % slots.len()];
            *next.released.lock().unwrap() = true;
            next.release_cond.notify_all();
        }
    }

    /// Blocks until `slot`'s worker has finished its job.
    fn sync_slot(&self, slot: usize) {
        let slots = self.slots.read().unwrap();
        slots[slot].worker.sync();
    }

    /// Reference-counted hand-off of one output value into `dest_bus`.
    ///
    /// Called by the *downstream* component while it holds its own input
    /// bus; `self` here is the upstream source.
    fn transfer_output(
        &self,
        slot: usize,
        output: usize,
        dest_bus: &mut SignalBus,
        dest_index: usize,
    ) {
        let slots = self.slots.read().unwrap();
        Self::transfer_from_slot(&slots[slot], output, dest_bus, dest_index);
    }

    fn transfer_from_slot(
        s: &BufferSlot,
        output: usize,
        dest_bus: &mut SignalBus,
        dest_index: usize,
    ) {
        let total = s.refs[output].total.load(Ordering::Relaxed);
        let mut output_bus = s.output_bus.lock().unwrap();
        let Some(signal) = output_bus.signal_mut(output) else {
            return;
        };
        if total <= 1 {
            // Sole consumer: take ownership, no copy, no count lock.
            dest_bus.move_signal(dest_index, signal);
        } else {
            let mut count = s.refs[output].count.lock().unwrap();
            if *count + 1 == total {
                *count = 0;
                dest_bus.move_signal(dest_index, signal);
            } else {
                *count += 1;
                let signal = &*signal;
                dest_bus.copy_signal(dest_index, signal);
            }
        }
    }

    /// Ends the cycle for `slot`: waits out the worker, clears the input
    /// bus, and rearms the state machine.
    ///
    /// The output bus is deliberately left intact — feedback wires read
    /// last cycle's outputs at the start of the next traversal.
    pub fn reset(&self, slot: usize) {
        let slots = self.slots.read().unwrap();
        let s = &slots[slot];
        s.worker.sync();
        s.input_bus.lock().unwrap().clear_all_values();
        s.status
            .store(TickStatus::NotTicked.as_u8(), Ordering::Release);
    }

    // --- Bus access (inspection, tests, persistence) ---

    /// Runs `f` against the output bus of `slot`.
    pub fn with_output_bus<R>(&self, slot: usize, f: impl FnOnce(&SignalBus) -> R) -> R {
        let slots = self.slots.read().unwrap();
        let bus = slots[slot].output_bus.lock().unwrap();
        f(&bus)
    }

    /// Runs `f` against the input bus of `slot`.
    pub fn with_input_bus<R>(&self, slot: usize, f: impl FnOnce(&SignalBus) -> R) -> R {
        let slots = self.slots.read().unwrap();
        let bus = slots[slot].input_bus.lock().unwrap();
        f(&bus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::{NodeCategory, ProcessorInfo};
    use crate::signal::SignalKind;

    struct Emit(i64);

    impl Processor for Emit {
        fn info(&self) -> ProcessorInfo {
            ProcessorInfo {
                name: "Emit",
                category: NodeCategory::Source,
                author: "tests",
                version: "1.0",
            }
        }

        fn inputs(&self) -> Vec<SlotSpec> {
            vec![]
        }

        fn outputs(&self) -> Vec<SlotSpec> {
            vec![SlotSpec::new("out", SignalKind::Int)]
        }

        fn process(&self, _inputs: &mut SignalBus, outputs: &mut SignalBus) {
            outputs.set_value(0, self.0);
        }
    }

    fn component(id: u32, processor: impl Processor + 'static, buffers: usize) -> Arc<Component> {
        Arc::new(Component::new(
            ComponentId(id),
            Arc::new(processor),
            buffers,
        ))
    }

    #[test]
    fn tick_runs_state_machine_and_reset_rearms() {
        let comp = component(0, Emit(9), 1);
        let arena = vec![Some(Arc::clone(&comp))];

        assert!(comp.tick(&arena, TickMode::Series, 0));
        assert_eq!(comp.status(0), TickStatus::Ticking);
        // A second tick in the same cycle is a no-op success.
        assert!(comp.tick(&arena, TickMode::Series, 0));

        comp.with_output_bus(0, |bus| {
            assert_eq!(bus.value::<i64>(0), Some(&9));
        });

        comp.reset(0);
        assert_eq!(comp.status(0), TickStatus::NotTicked);
        // Outputs survive the reset for feedback readers.
        comp.with_output_bus(0, |bus| assert!(bus.has_value(0)));
    }

    #[test]
    fn disabled_component_skips_process() {
        let comp = component(0, Emit(5), 1);
        let arena = vec![Some(Arc::clone(&comp))];

        comp.set_enabled(false);
        assert!(!comp.is_enabled());
        assert!(comp.tick(&arena, TickMode::Series, 0));
        comp.with_output_bus(0, |bus| assert!(!bus.has_value(0)));
        comp.reset(0);
    }

    #[test]
    fn set_buffer_count_clones_ref_totals() {
        let comp = component(0, Emit(1), 1);
        comp.ref_output(0);
        comp.ref_output(0);
        assert_eq!(comp.output_ref_total(0), 2);

        comp.set_buffer_count(3);
        assert_eq!(comp.buffer_count(), 3);
        let slots = comp.slots.read().unwrap();
        for slot in slots.iter() {
            assert_eq!(slot.refs[0].total.load(Ordering::Relaxed), 2);
        }
        assert!(*slots[0].released.lock().unwrap());
        assert!(!*slots[1].released.lock().unwrap());
        assert!(!*slots[2].released.lock().unwrap());
        drop(slots);

        comp.set_buffer_count(0);
        assert_eq!(comp.buffer_count(), 1, "count clamps to at least 1");
        assert_eq!(comp.output_ref_total(0), 2);
    }

    #[test]
    fn parallel_tick_dispatches_to_worker() {
        let comp = component(0, Emit(3), 1);
        let arena = vec![Some(Arc::clone(&comp))];

        assert!(comp.tick(&arena, TickMode::Parallel, 0));
        comp.reset(0); // reset syncs the worker
        comp.with_output_bus(0, |bus| {
            assert_eq!(bus.value::<i64>(0), Some(&3));
        });
    }
}
